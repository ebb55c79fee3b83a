//! Conversation transcript
//!
//! The transcript is the running dialogue replayed to the completion service
//! as context on every round. It lives in one JSON document and only grows.

mod store;
mod turn;

pub use store::{DEFAULT_TRANSCRIPT_PATH, TranscriptSession, TranscriptStore};
pub use turn::{Role, Turn};
