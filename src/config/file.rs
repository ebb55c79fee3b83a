//! TOML configuration file loading
//!
//! Supports `~/.config/talk-relay/config.toml` (or the path in
//! `TALK_RELAY_CONFIG`) as a persistent config source. All fields are
//! optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::SynthesisFailurePolicy;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct RelayConfigFile {
    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Service base URLs
    #[serde(default)]
    pub endpoints: EndpointsFileConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Transcript storage
    #[serde(default)]
    pub storage: StorageFileConfig,

    /// LLM configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Voice configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Persona configuration
    #[serde(default)]
    pub persona: PersonaFileConfig,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub openai_org: Option<String>,
    pub elevenlabs: Option<String>,
}

/// Service base URLs
#[derive(Debug, Default, Deserialize)]
pub struct EndpointsFileConfig {
    pub openai: Option<String>,
    pub elevenlabs: Option<String>,
}

/// Server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// HTTP port
    pub port: Option<u16>,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: Option<usize>,
}

/// Transcript storage configuration
#[derive(Debug, Default, Deserialize)]
pub struct StorageFileConfig {
    /// Path of the transcript document
    pub path: Option<PathBuf>,
}

/// LLM configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Chat model identifier (e.g. "gpt-3.5-turbo")
    pub model: Option<String>,
}

/// Voice configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "eleven_monolingual_v1")
    pub tts_model: Option<String>,

    /// TTS voice identifier
    pub tts_voice: Option<String>,

    /// What `/talk` returns when synthesis fails
    pub on_failure: Option<SynthesisFailurePolicy>,

    /// Synthesis tuning
    #[serde(default)]
    pub settings: VoiceSettingsFileConfig,
}

/// Synthesis tuning overrides
#[derive(Debug, Default, Deserialize)]
pub struct VoiceSettingsFileConfig {
    pub similarity_boost: Option<f32>,
    pub stability: Option<f32>,
    pub style: Option<f32>,
    pub use_speaker_boost: Option<bool>,
}

/// Persona configuration
#[derive(Debug, Default, Deserialize)]
pub struct PersonaFileConfig {
    /// Replacement system prompt
    pub system_prompt: Option<String>,
}

/// Load the TOML config file from `path`, or the standard location
///
/// Returns `RelayConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file(path: Option<&Path>) -> RelayConfigFile {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_file_path) else {
        return RelayConfigFile::default();
    };

    if !path.exists() {
        return RelayConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to parse config file, using defaults"
            );
            RelayConfigFile::default()
        }),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            RelayConfigFile::default()
        }
    }
}

/// Parse config file contents
///
/// # Errors
///
/// Returns the TOML error if the contents are not a valid config file
pub fn parse_config(content: &str) -> Result<RelayConfigFile, toml::de::Error> {
    let config = toml::from_str(content)?;
    tracing::info!("loaded config file");
    Ok(config)
}

/// Return the config file path: `~/.config/talk-relay/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("talk-relay").join("config.toml"))
}
