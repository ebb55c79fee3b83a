//! Talk Relay - voice chat relay for hosted AI services
//!
//! Accepts a recorded clip, transcribes it, asks a chat model for a reply
//! with the running transcript as context, and speaks the reply back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            HTTP API (axum)                    │
//! │     GET /   │   POST /talk   │   /health      │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │             Turn Orchestrator                 │
//! │  STT ─▶ transcript ─▶ chat ─▶ commit ─▶ TTS   │
//! └──────┬──────────────┬───────────────┬────────┘
//!        │              │               │
//!   ┌────▼────┐   ┌─────▼─────┐   ┌─────▼──────┐
//!   │ Whisper │   │  OpenAI   │   │ ElevenLabs │
//!   └─────────┘   │   chat    │   └────────────┘
//!                 └───────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod openai;
pub mod persona;
pub mod transcript;
pub mod turn;
pub mod voice;

#[cfg(test)]
mod test_util;

pub use api::{ApiServer, ApiServerBuilder, ApiState};
pub use config::{Config, SynthesisFailurePolicy, VoiceSettings};
pub use error::{Error, Result};
pub use llm::{ChatCompleter, OpenAiChat};
pub use persona::Persona;
pub use transcript::{Role, TranscriptSession, TranscriptStore, Turn};
pub use turn::{Speech, TurnOrchestrator, TurnOutcome};
pub use voice::{AudioClip, ElevenLabsSynthesizer, Synthesizer, Transcriber, WhisperTranscriber};
