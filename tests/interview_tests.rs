// Integration tests for the interview session
//
// A hound-generated WAV file is replayed through `ReplayDevice` as if it
// were live microphone output, so the whole capture path runs: device,
// recorder slices, background transcode, voice analysis and evaluation.

mod common;

use common::{wav_file, FakeDevice, FakeMode, FixedVoice, ScriptedText};
use interview_capture::audio::{AudioBlob, AudioFormat, CompressedAudio, SymphoniaContextFactory, WavInfo};
use interview_capture::config::Config;
use interview_capture::guard::Page;
use interview_capture::http::BridgeViewport;
use interview_capture::interview::{InterviewConfig, InterviewSession};
use interview_capture::questions::{AnswerEvaluator, ExperienceLevel, QuestionGenerator};
use interview_capture::recording::{DeviceError, ReplayDevice};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const SAMPLE_RATE: u32 = 16000;

/// Bytes per 100 ms slice for real-time replay of 16 kHz mono 16-bit audio
const REALTIME_SLICE: usize = (SAMPLE_RATE as usize * 2) / 10;

fn interview() -> InterviewConfig {
    InterviewConfig {
        company: "Acme".to_string(),
        role: "Backend Engineer".to_string(),
        level: ExperienceLevel::Junior,
    }
}

fn replay(seconds: f64) -> Arc<ReplayDevice> {
    let wav = wav_file(SAMPLE_RATE, 1, seconds, 3000, 0);
    Arc::new(ReplayDevice::new(
        CompressedAudio::new(wav, "audio/wav"),
        REALTIME_SLICE,
    ))
}

fn session(device: Arc<ReplayDevice>) -> InterviewSession {
    InterviewSession::new(
        Config::default(),
        interview(),
        device,
        Arc::new(BridgeViewport::new()),
        Arc::new(SymphoniaContextFactory::new(1)),
    )
}

#[tokio::test(start_paused = true)]
async fn test_long_answer_becomes_full_length_wav() -> anyhow::Result<()> {
    let device = replay(90.0);
    let session = session(device.clone());

    session.start_recording(0).await?;
    sleep(Duration::from_secs(90)).await;

    let stats = session.stats().await;
    assert!(stats.is_recording);
    assert_eq!(stats.recording_question, Some(0));
    assert!(stats.recording_elapsed_secs >= 89);

    assert_eq!(session.stop_recording().await, Some(0));
    session.settle().await;

    let blob = session.recording(0).await.expect("answer stored");
    assert_eq!(blob.format(), AudioFormat::Wav);

    let info = WavInfo::read(blob.bytes())?;
    assert_eq!(info.sample_rate, SAMPLE_RATE);
    assert_eq!(info.channels, 1);
    assert!((info.duration_seconds - 90.0).abs() < 1.0);
    assert!(!session.slot(0).await.unwrap().degraded);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_second_start_is_ignored() -> anyhow::Result<()> {
    let device = replay(2.0);
    let session = session(device.clone());

    session.start_recording(0).await?;
    session.start_recording(1).await?;

    assert_eq!(device.opened_count(), 1);
    assert_eq!(session.stop_recording().await, Some(0));
    assert_eq!(session.stop_recording().await, None);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_time_up_stops_that_questions_recording() -> anyhow::Result<()> {
    let device = replay(10.0);
    let session = Arc::new(session(device.clone()));

    session.start_recording(2).await?;
    let _display = session.start_question_timer(2, 3).await;

    sleep(Duration::from_secs(4)).await;
    assert!(!session.is_recording().await);

    session.settle().await;
    assert!(session.recording(2).await.is_some());
    assert_eq!(device.released_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_time_up_leaves_other_question_recording() -> anyhow::Result<()> {
    let session = Arc::new(session(replay(10.0)));

    let _display = session.start_question_timer(0, 2).await;
    session.start_recording(1).await?;

    sleep(Duration::from_secs(3)).await;
    assert!(session.is_recording().await);

    session.stop_recording().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_evaluations_land_in_their_own_slots() {
    let text = Arc::new(
        ScriptedText::replying(r#"{"score": 90, "assessment": "Excellent"}"#).when(
            "Describe a conflict",
            Duration::from_secs(5),
            r#"{"score": 40, "assessment": "Needs Improvement"}"#,
        ),
    );
    let session = session(replay(1.0)).with_evaluator(AnswerEvaluator::new(text));

    // The slow evaluation starts first and finishes last
    session
        .submit_answer(0, "Describe a conflict with a teammate", "We disagreed on the API design and talked it through")
        .await;
    session
        .submit_answer(1, "Why Acme?", "Acme builds the payment tools I use every day")
        .await;

    sleep(Duration::from_secs(1)).await;
    assert!(session.evaluation(0).await.is_none());
    assert_eq!(session.evaluation(1).await.unwrap().value().unwrap().score, 90);

    session.settle().await;
    assert_eq!(session.evaluation(0).await.unwrap().value().unwrap().score, 40);
    assert_eq!(session.evaluation(1).await.unwrap().value().unwrap().score, 90);
    assert_eq!(session.stats().await.evaluations, 2);
}

#[tokio::test(start_paused = true)]
async fn test_voice_only_answer_is_scored_from_transcript() -> anyhow::Result<()> {
    let text = Arc::new(ScriptedText::replying(r#"{"score": 70}"#));
    let voice = Arc::new(FixedVoice::new("I organised a hackathon for two hundred students"));
    let session = session(replay(2.0))
        .with_voice(voice.clone())
        .with_evaluator(AnswerEvaluator::new(text.clone()));

    session.start_recording(0).await?;
    sleep(Duration::from_secs(3)).await;
    session.stop_recording().await;
    session.settle().await;

    assert_eq!(voice.calls.load(Ordering::SeqCst), 1);
    let analysis = session.voice_analysis(0).await.unwrap();
    assert!((analysis.duration - 2.0).abs() < 0.1);

    session.submit_answer(0, "Tell me about yourself", "").await;
    session.settle().await;

    let prompts = text.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("hackathon for two hundred students"));
    assert_eq!(session.slot(0).await.unwrap().answer.as_deref(), Some(""));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_undecodable_upload_is_kept_compressed() {
    let voice = Arc::new(FixedVoice::new("unused"));
    let session = session(replay(1.0)).with_voice(voice.clone());

    let stored = session
        .store_upload(1, CompressedAudio::new(vec![0x1a, 0x45, 0xdf, 0xa3], "audio/webm"))
        .await;
    session.settle().await;

    assert!(stored.degraded);
    assert_eq!(stored.format, AudioFormat::Compressed);
    assert_eq!(stored.bytes, 4);
    assert!(matches!(session.recording(1).await, Some(AudioBlob::Compressed(_))));
    // Only WAV goes to the analysis service
    assert_eq!(voice.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_questions_fall_back_to_defaults() {
    let session = session(replay(1.0));
    let generator = QuestionGenerator::new(Arc::new(ScriptedText::failing()));

    let outcome = session.load_questions(&generator).await;

    assert!(outcome.is_fallback());
    assert!(session.question(0).await.contains("Acme"));
    assert_eq!(session.question(42).await, "Interview question");
}

#[tokio::test(start_paused = true)]
async fn test_exit_releases_everything_once() -> anyhow::Result<()> {
    let device = replay(5.0);
    let session = Arc::new(session(device.clone()));

    session.enter_page(Page::Hr).await;
    session.ensure_camera().await?;
    session.ensure_camera().await?;
    session.start_recording(0).await?;
    let _display = session.start_question_timer(0, 60).await;
    sleep(Duration::from_secs(2)).await;

    assert!(session.guard().is_active().await);
    assert_eq!(device.opened_count(), 2);

    assert!(session.exit().await.is_some());
    assert!(session.exit().await.is_none());
    session.settle().await;

    assert_eq!(device.released_count(), 2);
    assert!(!session.camera_active().await);
    assert!(!session.guard().is_active().await);
    assert!(session.has_exited());

    // The partial answer survives the exit
    assert!(session.recording(0).await.is_some());

    assert_eq!(
        session.start_recording(1).await,
        Err(DeviceError::SessionEnded)
    );
    assert_eq!(session.ensure_camera().await, Err(DeviceError::SessionEnded));

    // Running out the old timer does nothing after exit
    sleep(Duration::from_secs(120)).await;
    drop(session);
    assert_eq!(device.opened_count(), 2);
    assert_eq!(device.released_count(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_drop_without_exit_releases_camera() -> anyhow::Result<()> {
    let device = replay(1.0);
    let session = session(device.clone());

    session.ensure_camera().await?;
    drop(session);

    assert_eq!(device.released_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_export_writes_answers_in_question_order() -> anyhow::Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let exporter = interview_capture::audio::RecordingExporter::new(temp_dir.path())?;
    let session = session(replay(1.0));

    session
        .store_upload(1, CompressedAudio::new(wav_file(SAMPLE_RATE, 1, 0.5, 100, 0), "audio/wav"))
        .await;
    session
        .store_upload(0, CompressedAudio::new(wav_file(SAMPLE_RATE, 1, 0.5, 200, 0), "audio/wav"))
        .await;

    let saved = session.export(&exporter).await?;

    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].question_index, 0);
    assert_eq!(saved[1].question_index, 1);
    assert!(saved.iter().all(|m| m.file_path.exists()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_exit_reports_warnings_before_reset() {
    let session = session(replay(1.0));
    session.enter_page(Page::Mock).await;

    session.guard().on_visibility_change(true).await;
    sleep(Duration::from_secs(2)).await;
    session.guard().on_visibility_change(false).await;

    let last = session.exit().await.expect("first exit reports");
    assert_eq!(last.guard.tab_switch_warnings, 1);
    assert!(last.guard.active);

    // Teardown itself clears the count
    assert_eq!(session.stats().await.guard.tab_switch_warnings, 0);
}

#[tokio::test(start_paused = true)]
async fn test_queued_camera_request_sees_exit() {
    let device = Arc::new(FakeDevice::new(FakeMode::DenyFirst));
    let session = Arc::new(InterviewSession::new(
        Config::default(),
        interview(),
        device.clone(),
        Arc::new(BridgeViewport::new()),
        Arc::new(SymphoniaContextFactory::new(1)),
    ));

    // First request holds the camera slot while the prompt is up
    let first = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.ensure_camera().await }
    });
    sleep(Duration::from_millis(10)).await;

    // Second request queues behind it
    let second = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.ensure_camera().await }
    });
    sleep(Duration::from_millis(10)).await;

    session.exit().await;

    assert!(matches!(first.await.unwrap(), Err(DeviceError::AccessDenied(_))));
    assert_eq!(second.await.unwrap(), Err(DeviceError::SessionEnded));
    assert_eq!(device.opened.load(Ordering::SeqCst), 0);
    assert!(!session.camera_active().await);
}
