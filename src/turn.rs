//! Turn orchestration
//!
//! One round runs strictly in sequence:
//!
//! ```text
//! audio ─▶ transcribe ─▶ load transcript + user turn ─▶ complete
//!                                                         │
//!            speech ◀─ synthesize ◀─ commit user/assistant pair
//! ```
//!
//! The transcript lock is held from load to commit so concurrent rounds
//! cannot lose each other's turns. Speech synthesis happens after the
//! commit; its failure never undoes the round.

use std::sync::Arc;

use crate::config::Config;
use crate::llm::{ChatCompleter, OpenAiChat};
use crate::openai::OpenAiAuth;
use crate::transcript::{TranscriptStore, Turn};
use crate::voice::{AudioClip, ElevenLabsSynthesizer, Synthesizer, Transcriber, WhisperTranscriber};
use crate::Result;

/// Spoken form of the assistant reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Speech {
    /// MPEG audio bytes
    Audio(Vec<u8>),
    /// Synthesis failed; the reason is kept for logging and error replies
    Failed(String),
}

impl Speech {
    /// Audio bytes, if synthesis succeeded
    #[must_use]
    pub fn audio(&self) -> Option<&[u8]> {
        match self {
            Self::Audio(bytes) => Some(bytes.as_slice()),
            Self::Failed(_) => None,
        }
    }
}

/// Result of one conversational round
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// What the user said
    pub user_text: String,
    /// What the assistant replied
    pub assistant_text: String,
    /// The reply as speech
    pub speech: Speech,
}

/// Sequences transcription, completion, persistence and synthesis
#[derive(Clone)]
pub struct TurnOrchestrator {
    transcriber: Arc<dyn Transcriber>,
    completer: Arc<dyn ChatCompleter>,
    synthesizer: Arc<dyn Synthesizer>,
    store: Arc<TranscriptStore>,
}

impl TurnOrchestrator {
    /// Create an orchestrator from its collaborators
    #[must_use]
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        completer: Arc<dyn ChatCompleter>,
        synthesizer: Arc<dyn Synthesizer>,
        store: Arc<TranscriptStore>,
    ) -> Self {
        Self {
            transcriber,
            completer,
            synthesizer,
            store,
        }
    }

    /// Wire the hosted-service adapters described by `config`
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::new();
        let auth = OpenAiAuth::from_config(&config.api_keys, &config.endpoints);

        let transcriber = WhisperTranscriber::new(
            client.clone(),
            auth.clone(),
            config.voice.stt_model.clone(),
        );
        let completer = OpenAiChat::new(client.clone(), auth, config.llm.model.clone());
        let synthesizer = ElevenLabsSynthesizer::new(
            client,
            config.api_keys.elevenlabs.clone(),
            &config.endpoints.elevenlabs,
            config.voice.tts_voice.clone(),
            config.voice.tts_model.clone(),
            config.voice.settings,
        );
        let store = TranscriptStore::new(config.transcript_path.clone(), config.persona.clone());

        Self::new(
            Arc::new(transcriber),
            Arc::new(completer),
            Arc::new(synthesizer),
            Arc::new(store),
        )
    }

    /// The transcript store this orchestrator commits to
    #[must_use]
    pub fn store(&self) -> &Arc<TranscriptStore> {
        &self.store
    }

    /// The speech synthesizer
    #[must_use]
    pub fn synthesizer(&self) -> &Arc<dyn Synthesizer> {
        &self.synthesizer
    }

    /// Run one round for an uploaded clip
    ///
    /// # Errors
    ///
    /// Returns `Transcription` or `Completion` errors from the adapters and
    /// storage errors from the transcript. Synthesis failure is reported in
    /// [`TurnOutcome::speech`] instead.
    pub async fn run(&self, clip: &AudioClip) -> Result<TurnOutcome> {
        tracing::debug!(
            audio_bytes = clip.len(),
            transcriber = self.transcriber.name(),
            "round started"
        );

        let user_text = self.transcriber.transcribe(clip).await?;
        let assistant_text = self.converse(&user_text).await?;
        let speech = self.speak(&assistant_text).await;

        Ok(TurnOutcome {
            user_text,
            assistant_text,
            speech,
        })
    }

    /// Complete against the transcript and commit the user/assistant pair
    async fn converse(&self, user_text: &str) -> Result<String> {
        let session = self.store.session().await;

        let mut context = session.load()?;
        context.push(Turn::user(user_text));
        tracing::debug!(
            turns = context.len(),
            completer = self.completer.name(),
            "requesting reply"
        );

        let assistant_text = self.completer.complete(&context).await?;
        session.append(user_text, &assistant_text)?;
        tracing::info!(turns = context.len() + 1, "round committed");

        Ok(assistant_text)
    }

    async fn speak(&self, text: &str) -> Speech {
        match self.synthesizer.synthesize(text).await {
            Ok(audio) => Speech::Audio(audio),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    synthesizer = self.synthesizer.name(),
                    "speech synthesis failed, reply committed without audio"
                );
                Speech::Failed(e.to_string())
            }
        }
    }
}
