//! Shared `OpenAI` request plumbing for Whisper and chat completions

use crate::config::{ApiKeys, Endpoints};

/// Credentials and base URL for the `OpenAI` API
#[derive(Clone)]
pub struct OpenAiAuth {
    api_key: Option<String>,
    organization: Option<String>,
    base_url: String,
}

impl OpenAiAuth {
    /// Create from explicit values
    #[must_use]
    pub fn new(api_key: Option<String>, organization: Option<String>, base_url: String) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            organization: organization.filter(|o| !o.is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from loaded configuration
    #[must_use]
    pub fn from_config(keys: &ApiKeys, endpoints: &Endpoints) -> Self {
        Self::new(
            keys.openai.clone(),
            keys.openai_org.clone(),
            endpoints.openai.clone(),
        )
    }

    /// Full URL for an API path such as `chat/completions`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach authorization headers
    ///
    /// Returns `None` when no API key is configured.
    #[must_use]
    pub fn authorize(&self, request: reqwest::RequestBuilder) -> Option<reqwest::RequestBuilder> {
        let api_key = self.api_key.as_ref()?;
        let request = request.header("Authorization", format!("Bearer {api_key}"));
        Some(match &self.organization {
            Some(org) => request.header("OpenAI-Organization", org),
            None => request,
        })
    }
}

impl std::fmt::Debug for OpenAiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAuth")
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("organization", &self.organization)
            .field("base_url", &self.base_url)
            .finish()
    }
}
