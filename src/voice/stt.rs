//! Speech-to-text (STT) processing

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::AudioClip;
use crate::openai::OpenAiAuth;
use crate::{Error, Result};

/// Turns recorded speech into text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a clip
    ///
    /// # Errors
    ///
    /// Returns `Error::Transcription` if the service call fails
    async fn transcribe(&self, clip: &AudioClip) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Response from `OpenAI` Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcribes speech with `OpenAI` Whisper
pub struct WhisperTranscriber {
    client: reqwest::Client,
    auth: OpenAiAuth,
    model: String,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber
    #[must_use]
    pub fn new(client: reqwest::Client, auth: OpenAiAuth, model: String) -> Self {
        Self {
            client,
            auth,
            model,
        }
    }

    fn form(&self, clip: &AudioClip) -> Result<Form> {
        let part = Part::bytes(clip.data.clone())
            .file_name(clip.upload_name())
            .mime_str(clip.mime_type())
            .map_err(|e| Error::Transcription(format!("invalid MIME type: {e}")))?;

        Ok(Form::new()
            .text("model", self.model.clone())
            .part("file", part))
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String> {
        tracing::debug!(
            audio_bytes = clip.len(),
            file_name = %clip.file_name,
            model = %self.model,
            "starting Whisper transcription"
        );

        let request = self
            .auth
            .authorize(self.client.post(self.auth.url("audio/transcriptions")))
            .ok_or_else(|| {
                Error::Transcription("OpenAI API key not configured (OPEN_AI_KEY)".to_string())
            })?;

        let response = request
            .multipart(self.form(clip)?)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                Error::Transcription(format!("Whisper request failed: {e}"))
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Transcription(format!(
                "Whisper API error {status}: {body}"
            )));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse response");
            Error::Transcription(format!("failed to parse Whisper response: {e}"))
        })?;

        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }

    fn name(&self) -> &'static str {
        "whisper"
    }
}
