//! Chat completion
//!
//! The completion service receives the whole transcript as context and
//! returns the next assistant message.

mod openai;

pub use openai::OpenAiChat;

use async_trait::async_trait;

use crate::Result;
use crate::transcript::Turn;

/// Produces the next assistant message for a conversation
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Complete the conversation
    ///
    /// # Errors
    ///
    /// Returns `Error::Completion` if the service call fails or yields no message
    async fn complete(&self, turns: &[Turn]) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
