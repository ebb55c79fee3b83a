//! Shared test utilities

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use talk_relay::{
    AudioClip, ChatCompleter, Error, Persona, Result, Synthesizer, Transcriber, TranscriptStore,
    Turn, TurnOrchestrator,
};

/// Transcriber returning a fixed sequence of transcripts
pub struct ScriptedTranscriber {
    texts: Mutex<VecDeque<String>>,
    fail: bool,
}

impl ScriptedTranscriber {
    pub fn new(texts: &[&str]) -> Self {
        Self {
            texts: Mutex::new(texts.iter().map(ToString::to_string).collect()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            texts: Mutex::new(VecDeque::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, _clip: &AudioClip) -> Result<String> {
        if self.fail {
            return Err(Error::Transcription("Whisper API error 500".to_string()));
        }
        Ok(self
            .texts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "Hello".to_string()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Completer that replies from a script and records every context it receives
pub struct RecordingCompleter {
    replies: Mutex<VecDeque<String>>,
    contexts: Mutex<Vec<Vec<Turn>>>,
    delay: Duration,
    fail: bool,
}

impl RecordingCompleter {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(ToString::to_string).collect()),
            contexts: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&[])
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn contexts(&self) -> Vec<Vec<Turn>> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompleter for RecordingCompleter {
    async fn complete(&self, turns: &[Turn]) -> Result<String> {
        self.contexts.lock().unwrap().push(turns.to_vec());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(Error::Completion("OpenAI API error 503".to_string()));
        }
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "Tell me about React hooks.".to_string()))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Synthesizer returning fixed audio, or failing like a non-200 response
pub struct FixedSynthesizer {
    audio: Option<Vec<u8>>,
}

impl FixedSynthesizer {
    pub fn new(audio: &[u8]) -> Self {
        Self {
            audio: Some(audio.to_vec()),
        }
    }

    pub fn failing() -> Self {
        Self { audio: None }
    }
}

#[async_trait]
impl Synthesizer for FixedSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        self.audio
            .clone()
            .ok_or_else(|| Error::Synthesis("ElevenLabs TTS error 500: upstream".to_string()))
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Transcript store in a fresh temp directory
pub fn temp_store(dir: &tempfile::TempDir) -> Arc<TranscriptStore> {
    Arc::new(TranscriptStore::new(
        dir.path().join("database.json"),
        Persona::default(),
    ))
}

/// Orchestrator wired to test doubles
pub fn orchestrator(
    store: Arc<TranscriptStore>,
    transcriber: ScriptedTranscriber,
    completer: Arc<RecordingCompleter>,
    synthesizer: FixedSynthesizer,
) -> TurnOrchestrator {
    TurnOrchestrator::new(
        Arc::new(transcriber),
        completer,
        Arc::new(synthesizer),
        store,
    )
}

/// A small clip; the doubles never look at its contents
pub fn clip() -> AudioClip {
    AudioClip::new(vec![0xFF, 0xFB, 0x90, 0x00], "question.mp3", Some("audio/mpeg".to_string()))
}

const BOUNDARY: &str = "talk-relay-test-boundary";

/// Build a multipart `POST /talk` request with one file field
pub fn talk_request(field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: audio/mpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/talk")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
