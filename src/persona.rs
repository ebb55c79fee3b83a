//! Persona that seeds a fresh transcript
//!
//! The persona is the instruction text placed in the leading `system` turn.
//! It is only consulted when the transcript document is absent or empty;
//! once a transcript exists its stored system turn wins.

use crate::transcript::Turn;

/// Default interviewer instructions
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are interviewing the user for a front-end React developer position. Ask short questions that are relevant to a junior level developer. Your name is Greg. The user is Daniel. Keep responses under 30 words and be funny sometimes.";

/// Conversation persona
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    system_prompt: String,
}

impl Persona {
    /// Create a persona from custom instruction text
    #[must_use]
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// Instruction text for the system turn
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// The `system` turn that opens a new transcript
    #[must_use]
    pub fn system_turn(&self) -> Turn {
        Turn::system(self.system_prompt.clone())
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}
