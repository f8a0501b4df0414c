// Integration tests for the voice-analysis client

mod common;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use common::wav_blob;
use interview_capture::config::VoiceAnalysisConfig;
use interview_capture::voice::{Availability, VoiceAnalysisClient, VoiceAnalysisError, VoiceAnalyzer};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Clone, Default)]
struct MockVoice {
    failing: Arc<AtomicBool>,
    last_body: Arc<Mutex<Vec<u8>>>,
}

async fn analyze(State(mock): State<MockVoice>, body: Bytes) -> axum::response::Response {
    *mock.last_body.lock().unwrap() = body.to_vec();
    if mock.failing.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "analyzer crashed").into_response();
    }
    Json(json!({
        "success": true,
        "score": 78.5,
        "transcript": "I led the migration to the new billing system",
        "wpm": 132.0,
        "filler_count": 2,
        "duration": 4.2,
        "features": { "pitch_mean": 180.0, "jitter": 0.01 },
        "suggestions": ["Slow down slightly"]
    }))
    .into_response()
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "analyzer_available": true }))
}

async fn start_mock_voice() -> (VoiceAnalysisConfig, MockVoice, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mock = MockVoice::default();

    let app = Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .with_state(mock.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    let config = VoiceAnalysisConfig {
        base_url: format!("http://{}/", addr),
        ..VoiceAnalysisConfig::default()
    };

    (config, mock, shutdown_tx)
}

#[tokio::test]
async fn test_analysis_reply_is_decoded() {
    let (config, _mock, shutdown_tx) = start_mock_voice().await;
    let client = VoiceAnalysisClient::new(&config);
    assert_eq!(client.availability(), Availability::Unknown);

    let analysis = client
        .analyze(&wav_blob(16000, 16000), "Tell me about a project", 1)
        .await
        .unwrap();

    assert_eq!(analysis.score, 78.5);
    assert_eq!(analysis.filler_count, 2);
    assert_eq!(analysis.features.pitch_mean, 180.0);
    assert_eq!(analysis.features.shimmer, 0.0);
    assert_eq!(analysis.suggestions, vec!["Slow down slightly".to_string()]);
    assert!(!analysis.mock);
    assert_eq!(client.availability(), Availability::Online);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn test_upload_is_multipart_wav() {
    let (config, mock, shutdown_tx) = start_mock_voice().await;
    let client = VoiceAnalysisClient::new(&config);

    client
        .analyze(&wav_blob(16000, 800), "Why this company?", 3)
        .await
        .unwrap();

    let body = String::from_utf8_lossy(&mock.last_body.lock().unwrap()).to_string();
    assert!(body.contains(r#"name="audio"; filename="answer_q3.wav""#));
    assert!(body.to_lowercase().contains("content-type: audio/wav"));
    assert!(body.contains("RIFF"));
    assert!(body.contains(r#"name="question""#));
    assert!(body.contains("Why this company?"));
    assert!(body.contains(r#"name="q_index""#));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn test_blank_question_gets_placeholder() {
    let (config, mock, shutdown_tx) = start_mock_voice().await;
    let client = VoiceAnalysisClient::new(&config);

    client.analyze(&wav_blob(16000, 800), "", 0).await.unwrap();

    let body = String::from_utf8_lossy(&mock.last_body.lock().unwrap()).to_string();
    assert!(body.contains("Interview question"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn test_service_error_marks_offline() {
    let (config, mock, shutdown_tx) = start_mock_voice().await;
    let client = VoiceAnalysisClient::new(&config);

    client.analyze(&wav_blob(16000, 800), "q", 0).await.unwrap();
    assert_eq!(client.availability(), Availability::Online);

    mock.failing.store(true, Ordering::SeqCst);
    let err = client.analyze(&wav_blob(16000, 800), "q", 0).await.unwrap_err();
    assert_eq!(err, VoiceAnalysisError::Status(500));
    assert_eq!(client.availability(), Availability::Offline);

    // Recovers as soon as the service does
    mock.failing.store(false, Ordering::SeqCst);
    client.analyze(&wav_blob(16000, 800), "q", 0).await.unwrap();
    assert_eq!(client.availability(), Availability::Online);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn test_health_probe() {
    let (config, _mock, shutdown_tx) = start_mock_voice().await;
    let client = VoiceAnalysisClient::new(&config);

    assert_eq!(client.check_health().await, Availability::Online);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn test_unreachable_service_is_offline() {
    // Grab a free port and close it again
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = VoiceAnalysisClient::new(&VoiceAnalysisConfig {
        base_url: format!("http://{}", addr),
        ..VoiceAnalysisConfig::default()
    });

    assert_eq!(client.check_health().await, Availability::Offline);

    let err = client.analyze(&wav_blob(16000, 800), "q", 0).await.unwrap_err();
    assert!(matches!(err, VoiceAnalysisError::Request(_)));
    assert_eq!(client.availability(), Availability::Offline);
}
