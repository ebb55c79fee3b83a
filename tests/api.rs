//! API endpoint integration tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use talk_relay::{ApiServerBuilder, SynthesisFailurePolicy, TranscriptStore, Turn};
use tower::ServiceExt;

mod common;
use common::{FixedSynthesizer, RecordingCompleter, ScriptedTranscriber, orchestrator, talk_request, temp_store};

/// Build a test API router around the given doubles
fn build_test_router(
    store: Arc<TranscriptStore>,
    transcriber: ScriptedTranscriber,
    completer: RecordingCompleter,
    synthesizer: FixedSynthesizer,
    policy: SynthesisFailurePolicy,
) -> axum::Router {
    let relay = orchestrator(store, transcriber, Arc::new(completer), synthesizer);
    ApiServerBuilder::new(relay)
        .on_synthesis_failure(policy)
        .max_upload_bytes(1024)
        .build()
        .router()
}

fn happy_router(store: Arc<TranscriptStore>) -> axum::Router {
    build_test_router(
        store,
        ScriptedTranscriber::new(&["Hello"]),
        RecordingCompleter::new(&["Hi Daniel"]),
        FixedSynthesizer::new(b"ID3-fake-mpeg"),
        SynthesisFailurePolicy::Empty,
    )
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_root_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = happy_router(temp_store(&dir));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, br#"{"Hello":"World"}"#);
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = happy_router(temp_store(&dir));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_talk_returns_mpeg_and_commits() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let app = happy_router(store.clone());

    let response = app
        .oneshot(talk_request("file", "question.mp3", b"fake audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(body_bytes(response).await, b"ID3-fake-mpeg");

    let turns = store.load().await.unwrap();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1], Turn::user("Hello"));
    assert_eq!(turns[2], Turn::assistant("Hi Daniel"));
}

#[tokio::test]
async fn test_talk_synthesis_failure_returns_empty_audio() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let app = build_test_router(
        store.clone(),
        ScriptedTranscriber::new(&["Hello"]),
        RecordingCompleter::new(&["Hi Daniel"]),
        FixedSynthesizer::failing(),
        SynthesisFailurePolicy::Empty,
    );

    let response = app
        .oneshot(talk_request("file", "question.mp3", b"fake audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert!(body_bytes(response).await.is_empty());
    assert_eq!(store.load().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_talk_synthesis_failure_as_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let app = build_test_router(
        store.clone(),
        ScriptedTranscriber::new(&["Hello"]),
        RecordingCompleter::new(&["Hi Daniel"]),
        FixedSynthesizer::failing(),
        SynthesisFailurePolicy::Error,
    );

    let response = app
        .oneshot(talk_request("file", "question.mp3", b"fake audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["error"]["code"], "synthesis_failed");

    // Persisted before synthesis was attempted
    assert_eq!(store.load().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_talk_transcription_failure_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let app = build_test_router(
        store.clone(),
        ScriptedTranscriber::failing(),
        RecordingCompleter::new(&["unused"]),
        FixedSynthesizer::new(b"mp3"),
        SynthesisFailurePolicy::Empty,
    );

    let response = app
        .oneshot(talk_request("file", "question.mp3", b"fake audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["error"]["code"], "transcription_failed");
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_talk_completion_failure_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let app = build_test_router(
        store.clone(),
        ScriptedTranscriber::new(&["Hello"]),
        RecordingCompleter::failing(),
        FixedSynthesizer::new(b"mp3"),
        SynthesisFailurePolicy::Empty,
    );

    let response = app
        .oneshot(talk_request("file", "question.mp3", b"fake audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["error"]["code"], "completion_failed");
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_talk_corrupt_transcript_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    std::fs::write(store.path(), "not json at all").unwrap();
    let app = happy_router(store);

    let response = app
        .oneshot(talk_request("file", "question.mp3", b"fake audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["error"]["code"], "storage_error");
}

#[tokio::test]
async fn test_talk_requires_file_field() {
    let dir = tempfile::tempdir().unwrap();
    let app = happy_router(temp_store(&dir));

    let response = app
        .oneshot(talk_request("audio", "question.mp3", b"fake audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_talk_rejects_empty_upload() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let app = happy_router(store.clone());

    let response = app
        .oneshot(talk_request("file", "question.mp3", b""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_talk_rejects_oversized_upload() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let app = happy_router(store.clone());

    let response = app
        .oneshot(talk_request("file", "question.mp3", &vec![0u8; 4096]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_transcript_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    store.append("Hello", "Hi Daniel").await.unwrap();
    let app = happy_router(store);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/transcript")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let turns: Vec<Turn> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[2], Turn::assistant("Hi Daniel"));
}

#[tokio::test]
async fn test_transcript_endpoint_reports_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    std::fs::write(store.path(), "[{\"role\":").unwrap();
    let app = happy_router(store);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/transcript")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
