//! `OpenAI` chat completions provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ChatCompleter;
use crate::openai::OpenAiAuth;
use crate::transcript::Turn;
use crate::{Error, Result};

/// `OpenAI` chat completions client
pub struct OpenAiChat {
    client: reqwest::Client,
    auth: OpenAiAuth,
    model: String,
}

impl OpenAiChat {
    /// Create a new chat client
    #[must_use]
    pub fn new(client: reqwest::Client, auth: OpenAiAuth, model: String) -> Self {
        Self {
            client,
            auth,
            model,
        }
    }
}

#[async_trait]
impl ChatCompleter for OpenAiChat {
    async fn complete(&self, turns: &[Turn]) -> Result<String> {
        tracing::debug!(turns = turns.len(), model = %self.model, "requesting chat completion");

        let request = self
            .auth
            .authorize(self.client.post(self.auth.url("chat/completions")))
            .ok_or_else(|| {
                Error::Completion("OpenAI API key not configured (OPEN_AI_KEY)".to_string())
            })?;

        let response = request
            .json(&ChatCompletionRequest {
                model: &self.model,
                messages: turns,
            })
            .send()
            .await
            .map_err(|e| Error::Completion(format!("OpenAI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat completion API error");
            return Err(Error::Completion(format!("OpenAI API error {status}: {body}")));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Completion(format!("failed to parse OpenAI response: {e}")))?;

        let reply = first_message(result)?;
        tracing::info!(reply = %reply, "chat completion received");
        Ok(reply)
    }

    fn name(&self) -> &'static str {
        "openai-chat"
    }
}

fn first_message(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| Error::Completion("OpenAI response contained no message".to_string()))
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
