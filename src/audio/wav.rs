use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

use super::blob::WavBlob;
use super::context::DecodedAudio;

/// Float sample to 16-bit PCM.
///
/// Clamped to [-1, 1], negatives scaled by 32768 and the rest by 32767,
/// truncating toward zero. Downstream analysis tools compare against this
/// exact mapping, so it must not be "fixed" to a symmetric scale.
pub fn f32_to_pcm16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Encode decoded mono samples as a canonical 16-bit PCM mono WAV.
pub fn encode_wav(audio: &DecodedAudio) -> Result<WavBlob> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(
        WavBlob::HEADER_LEN + audio.samples.len() * 2,
    ));
    {
        let mut writer = WavWriter::new(&mut cursor, spec).context("Failed to start WAV header")?;
        for &sample in &audio.samples {
            writer
                .write_sample(f32_to_pcm16(sample))
                .context("Failed to write sample to WAV")?;
        }
        writer.finalize().context("Failed to finalize WAV")?;
    }

    let bytes = cursor.into_inner();
    debug!(
        "Encoded WAV: {}Hz, {} samples, {} bytes",
        audio.sample_rate,
        audio.samples.len(),
        bytes.len()
    );

    Ok(WavBlob::from_parts(bytes, audio.sample_rate, audio.samples.len()))
}

/// Header facts of a WAV buffer, as a downstream consumer would read them
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Length of the data chunk in bytes
    pub data_len: u32,
    pub duration_seconds: f64,
    pub samples: Vec<i16>,
}

impl WavInfo {
    pub fn read(bytes: &[u8]) -> Result<Self> {
        let reader = WavReader::new(Cursor::new(bytes)).context("Failed to parse WAV header")?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let data_len = u32::from_le_bytes(
            bytes
                .get(40..44)
                .context("WAV shorter than its header")?
                .try_into()
                .context("WAV data length field")?,
        );

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        Ok(Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            data_len,
            duration_seconds,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_scaling_is_asymmetric() {
        assert_eq!(f32_to_pcm16(1.0), 32767);
        assert_eq!(f32_to_pcm16(-1.0), -32768);
        assert_eq!(f32_to_pcm16(0.0), 0);
        assert_eq!(f32_to_pcm16(0.5), 16383);
        assert_eq!(f32_to_pcm16(-0.5), -16384);
    }

    #[test]
    fn test_pcm_clipping() {
        assert_eq!(f32_to_pcm16(1.5), 32767);
        assert_eq!(f32_to_pcm16(-1.5), -32768);
        assert_eq!(f32_to_pcm16(f32::INFINITY), 32767);
        assert_eq!(f32_to_pcm16(f32::NEG_INFINITY), -32768);
    }

    #[test]
    fn test_pcm_nan_is_silence() {
        assert_eq!(f32_to_pcm16(f32::NAN), 0);
    }

    #[test]
    fn test_canonical_header_layout() {
        let audio = DecodedAudio {
            sample_rate: 48000,
            samples: vec![0.0, 0.25, -0.25, 1.0],
        };
        let wav = encode_wav(&audio).unwrap();
        let b = wav.bytes();

        assert_eq!(b.len(), 44 + 8);
        assert_eq!(&b[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(b[4..8].try_into().unwrap()), 36 + 8);
        assert_eq!(&b[8..12], b"WAVE");
        assert_eq!(&b[12..16], b"fmt ");
        assert_eq!(u32::from_le_bytes(b[16..20].try_into().unwrap()), 16);
        assert_eq!(u16::from_le_bytes(b[20..22].try_into().unwrap()), 1); // PCM
        assert_eq!(u16::from_le_bytes(b[22..24].try_into().unwrap()), 1); // mono
        assert_eq!(u32::from_le_bytes(b[24..28].try_into().unwrap()), 48000);
        assert_eq!(u32::from_le_bytes(b[28..32].try_into().unwrap()), 96000);
        assert_eq!(u16::from_le_bytes(b[32..34].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(b[34..36].try_into().unwrap()), 16);
        assert_eq!(&b[36..40], b"data");
        assert_eq!(u32::from_le_bytes(b[40..44].try_into().unwrap()), 8);
        assert_eq!(i16::from_le_bytes([b[50], b[51]]), 32767);
    }
}
