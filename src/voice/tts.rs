//! Text-to-speech (TTS) processing

use async_trait::async_trait;
use serde::Serialize;

use crate::config::VoiceSettings;
use crate::{Error, Result};

/// Turns text into spoken audio
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize text to speech
    ///
    /// Returns MPEG audio bytes.
    ///
    /// # Errors
    ///
    /// Returns `Error::Synthesis` if the service call fails
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

#[derive(Serialize)]
struct ElevenLabsRequest<'a> {
    model_id: &'a str,
    text: &'a str,
    voice_settings: VoiceSettings,
}

/// Synthesizes speech with `ElevenLabs`
pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    voice_id: String,
    model: String,
    settings: VoiceSettings,
}

impl ElevenLabsSynthesizer {
    /// Create a new `ElevenLabs` synthesizer
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        api_key: Option<String>,
        base_url: &str,
        voice_id: String,
        model: String,
        settings: VoiceSettings,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            voice_id,
            model,
            settings,
        }
    }

    fn url(&self) -> String {
        format!("{}/text-to-speech/{}", self.base_url, self.voice_id)
    }

    fn request_body<'a>(&'a self, text: &'a str) -> ElevenLabsRequest<'a> {
        ElevenLabsRequest {
            model_id: &self.model,
            text,
            voice_settings: self.settings,
        }
    }
}

#[async_trait]
impl Synthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            Error::Synthesis("ElevenLabs API key not configured (ELEVENLABS_KEY)".to_string())
        })?;

        tracing::debug!(chars = text.len(), voice = %self.voice_id, "starting ElevenLabs synthesis");

        let response = self
            .client
            .post(self.url())
            .header("Content-Type", "application/json")
            .header("accept", "audio/mpeg")
            .header("xi-api-key", api_key)
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| Error::Synthesis(format!("ElevenLabs request failed: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Synthesis(format!(
                "ElevenLabs TTS error {status}: {body}"
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::Synthesis(format!("failed to read ElevenLabs audio: {e}")))?;

        tracing::info!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }

    fn name(&self) -> &'static str {
        "elevenlabs"
    }
}
