// Integration tests for WAV transcoding and export
//
// Input recordings are generated with hound, or encoded to Ogg/Opus the way
// browser recorders produce them.

mod common;

use anyhow::Result;
use async_trait::async_trait;
use common::{ogg_opus_file, wav_file};
use interview_capture::audio::{
    AudioBlob, AudioFormat, AudioTranscoder, CompressedAudio, ContextState, DecodeError,
    DecodedAudio, DecodingContext, DecodingContextFactory, RecordingExporter,
    SharedDecodingContext, SymphoniaContextFactory, WavInfo,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn transcoder(limit: usize) -> (AudioTranscoder, Arc<SymphoniaContextFactory>) {
    let factory = Arc::new(SymphoniaContextFactory::new(limit));
    (AudioTranscoder::new(factory.clone()), factory)
}

#[tokio::test]
async fn test_output_is_canonical_mono_wav() -> Result<()> {
    let (transcoder, _) = transcoder(6);
    let input = CompressedAudio::new(wav_file(48000, 2, 1.5, 16384, -16384), "audio/wav");

    let outcome = transcoder.to_wav(&input).await;
    assert!(outcome.is_ok(), "unexpected fallback: {:?}", outcome.reason());

    let blob = outcome.into_value().unwrap();
    assert_eq!(blob.format(), AudioFormat::Wav);
    assert_eq!(blob.mime_type(), "audio/wav");
    assert_eq!(blob.extension(), "wav");

    let info = WavInfo::read(blob.bytes())?;
    assert_eq!(info.sample_rate, 48000);
    assert_eq!(info.channels, 1);
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.data_len as usize, blob.bytes().len() - 44);
    assert!((info.duration_seconds - 1.5).abs() < 0.01);

    // Only the first (left) channel survives
    assert!(info.samples.iter().all(|&s| (16380..=16385).contains(&s)));
    Ok(())
}

#[tokio::test]
async fn test_ogg_opus_recording_becomes_wav() -> Result<()> {
    let (transcoder, _) = transcoder(6);
    let input = CompressedAudio::new(ogg_opus_file(1.0, 440.0, 0.5), "audio/ogg;codecs=opus");

    let outcome = transcoder.to_wav(&input).await;
    assert!(outcome.is_ok(), "unexpected fallback: {:?}", outcome.reason());

    let blob = outcome.into_value().unwrap();
    assert_eq!(blob.format(), AudioFormat::Wav);

    let info = WavInfo::read(blob.bytes())?;
    assert_eq!(info.sample_rate, 48000);
    assert_eq!(info.channels, 1);
    // 50 packets of 20 ms minus the 312-frame pre-skip
    let expected = 50 * 960 - 312;
    assert!(
        info.samples.len().abs_diff(expected) <= 960,
        "decoded {} frames",
        info.samples.len()
    );

    let peak = info.samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
    assert!(peak > 8000, "tone lost in decoding, peak {}", peak);
    Ok(())
}

#[tokio::test]
async fn test_context_is_created_once_for_many_recordings() {
    let (transcoder, factory) = transcoder(1);

    for i in 0..10 {
        let input = CompressedAudio::new(wav_file(16000, 1, 0.2, i * 100, 0), "audio/wav");
        let outcome = transcoder.to_wav(&input).await;
        assert!(outcome.is_ok(), "recording {} fell back: {:?}", i, outcome.reason());
    }

    assert_eq!(transcoder.context().created_count(), 1);
    assert_eq!(factory.live_contexts(), 1);
}

#[tokio::test]
async fn test_garbage_falls_back_to_original_bytes() {
    let (transcoder, _) = transcoder(6);
    let input = CompressedAudio::new(b"definitely not audio".to_vec(), "audio/webm;codecs=opus");

    let outcome = transcoder.to_wav(&input).await;

    assert!(outcome.is_fallback());
    let blob = outcome.into_value().unwrap();
    assert_eq!(blob, AudioBlob::Compressed(input));
    assert_eq!(blob.extension(), "webm");
    assert_eq!(blob.format(), AudioFormat::Compressed);
}

#[tokio::test]
async fn test_empty_recording_falls_back() {
    let (transcoder, factory) = transcoder(6);

    let outcome = transcoder
        .to_wav(&CompressedAudio::new(Vec::new(), "audio/webm"))
        .await;

    assert!(outcome.is_fallback());
    // Nothing to decode, so no context was spent
    assert_eq!(factory.live_contexts(), 0);
}

#[tokio::test]
async fn test_context_limit_degrades_instead_of_failing() {
    let factory = Arc::new(SymphoniaContextFactory::new(1));
    let first = AudioTranscoder::new(factory.clone());
    let second = AudioTranscoder::new(factory.clone());
    let input = CompressedAudio::new(wav_file(16000, 1, 0.5, 1000, 0), "audio/wav");

    assert!(first.to_wav(&input).await.is_ok());

    let outcome = second.to_wav(&input).await;
    assert!(outcome.is_fallback());
    assert!(outcome.reason().unwrap().contains("limit"));
    assert_eq!(second.context().created_count(), 0);
}

#[tokio::test]
async fn test_closed_context_is_rebuilt() {
    let factory = Arc::new(SymphoniaContextFactory::new(1));
    let shared = SharedDecodingContext::new(factory.clone());

    let ctx = shared.acquire().await.unwrap();
    assert_eq!(ctx.state(), ContextState::Running);
    drop(ctx);

    shared.close().await;
    assert_eq!(factory.live_contexts(), 0);

    shared.acquire().await.unwrap();
    assert_eq!(shared.created_count(), 2);
}

/// Context that starts suspended, as a host does for a backgrounded page
struct SuspendedContext {
    suspended: AtomicBool,
    resumes: AtomicUsize,
}

#[async_trait]
impl DecodingContext for SuspendedContext {
    fn state(&self) -> ContextState {
        if self.suspended.load(Ordering::SeqCst) {
            ContextState::Suspended
        } else {
            ContextState::Running
        }
    }

    async fn resume(&self) -> Result<(), DecodeError> {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        self.suspended.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn decode(&self, _data: &[u8], _mime_type: &str) -> Result<DecodedAudio, DecodeError> {
        Ok(DecodedAudio {
            sample_rate: 8000,
            samples: vec![0.0; 80],
        })
    }

    fn close(&self) {}
}

struct SuspendedFactory {
    context: Arc<SuspendedContext>,
}

impl DecodingContextFactory for SuspendedFactory {
    fn create(&self) -> Result<Arc<dyn DecodingContext>, DecodeError> {
        Ok(self.context.clone())
    }
}

#[tokio::test]
async fn test_suspended_context_is_resumed_before_use() {
    let context = Arc::new(SuspendedContext {
        suspended: AtomicBool::new(true),
        resumes: AtomicUsize::new(0),
    });
    let transcoder = AudioTranscoder::new(Arc::new(SuspendedFactory {
        context: context.clone(),
    }));

    let outcome = transcoder
        .to_wav(&CompressedAudio::new(vec![1, 2, 3], "audio/webm"))
        .await;

    assert!(outcome.is_ok());
    assert_eq!(context.resumes.load(Ordering::SeqCst), 1);
    assert_eq!(context.state(), ContextState::Running);
}

#[tokio::test]
async fn test_exporter_writes_question_numbered_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let exporter = RecordingExporter::new(temp_dir.path().join("answers"))?;
    let (transcoder, _) = transcoder(6);

    let wav = transcoder
        .to_wav(&CompressedAudio::new(wav_file(16000, 1, 2.0, 500, 0), "audio/wav"))
        .await
        .into_value()
        .unwrap();
    let webm = AudioBlob::Compressed(CompressedAudio::new(vec![0x1a, 0x45], "audio/webm"));

    let saved = exporter.save_all([(2, &webm), (0, &wav)])?;

    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].question_index, 0);
    assert_eq!(saved[0].format, AudioFormat::Wav);
    assert!((saved[0].duration_seconds.unwrap() - 2.0).abs() < 0.01);
    assert_eq!(saved[1].question_index, 2);
    assert_eq!(saved[1].duration_seconds, None);

    let first = saved[0].file_path.file_name().unwrap().to_string_lossy();
    assert!(first.starts_with("answer_q1_"));
    assert!(first.ends_with(".wav"));
    let third = saved[1].file_path.file_name().unwrap().to_string_lossy();
    assert!(third.starts_with("answer_q3_"));
    assert!(third.ends_with(".webm"));

    assert_eq!(std::fs::read(&saved[1].file_path)?, vec![0x1a, 0x45]);
    Ok(())
}
