use audiopus::coder::Decoder;
use audiopus::packet::Packet;
use audiopus::{Channels, MutSignals, SampleRate};

use super::context::DecodeError;

/// Opus always decodes at 48 kHz regardless of the input rate in OpusHead
pub const OPUS_SAMPLE_RATE: u32 = 48_000;

/// 120 ms at 48 kHz, the longest a single Opus packet may run
const MAX_FRAMES_PER_PACKET: usize = 5760;

/// Decodes the Opus track that browser recorders put in WebM and Ogg.
///
/// Symphonia demuxes both containers but ships no Opus codec, so packets
/// from an Opus track are handed to libopus here instead. The first
/// `pre_skip` frames are encoder priming and are dropped.
pub struct OpusTrack {
    decoder: Decoder,
    channels: usize,
    pre_skip: usize,
    pcm: Vec<f32>,
}

impl OpusTrack {
    pub fn new(channel_count: usize, pre_skip: u32) -> Result<Self, DecodeError> {
        let channels = match channel_count {
            1 => Channels::Mono,
            2 => Channels::Stereo,
            n => {
                return Err(DecodeError::Unsupported(format!(
                    "opus with {} channels",
                    n
                )))
            }
        };

        let decoder = Decoder::new(SampleRate::Hz48000, channels)
            .map_err(|e| DecodeError::Unsupported(format!("opus decoder: {}", e)))?;

        Ok(Self {
            decoder,
            channels: channel_count,
            pre_skip: pre_skip as usize,
            pcm: vec![0.0; MAX_FRAMES_PER_PACKET * channel_count],
        })
    }

    /// Decode one packet and append its first channel to `out`
    pub fn decode_into(&mut self, data: &[u8], out: &mut Vec<f32>) -> Result<(), audiopus::Error> {
        let packet = Packet::try_from(data)?;
        let signals = MutSignals::try_from(&mut self.pcm)?;
        let frames = self.decoder.decode_float(Some(packet), signals, false)?;

        let skip = self.pre_skip.min(frames);
        self.pre_skip -= skip;

        out.extend(
            self.pcm[..frames * self.channels]
                .iter()
                .step_by(self.channels)
                .skip(skip)
                .copied(),
        );
        Ok(())
    }
}
