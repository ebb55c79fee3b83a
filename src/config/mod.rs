//! Configuration management for the talk relay
//!
//! Settings resolve in priority order: environment (including `.env`) >
//! TOML file > defaults. CLI flags are applied on top by the binary.

pub mod file;

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::persona::Persona;
use crate::transcript::DEFAULT_TRANSCRIPT_PATH;
use crate::{Error, Result};

use file::RelayConfigFile;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Default upload limit, matching the Whisper API limit
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Talk relay configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API keys
    pub api_keys: ApiKeys,

    /// Base URLs of the hosted services
    pub endpoints: Endpoints,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Path of the transcript document
    pub transcript_path: PathBuf,

    /// Chat completion configuration
    pub llm: LlmConfig,

    /// Voice processing configuration
    pub voice: VoiceConfig,

    /// Persona seeding new transcripts
    pub persona: Persona,
}

/// API keys for external services
///
/// Missing keys do not stop startup; calls to the corresponding service fail instead.
#[derive(Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper and chat completions)
    pub openai: Option<String>,

    /// `OpenAI` organization ID
    pub openai_org: Option<String>,

    /// `ElevenLabs` API key
    pub elevenlabs: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(key: Option<&String>) -> &'static str {
            if key.is_some() { "<set>" } else { "<unset>" }
        }

        f.debug_struct("ApiKeys")
            .field("openai", &redact(self.openai.as_ref()))
            .field("openai_org", &self.openai_org)
            .field("elevenlabs", &redact(self.elevenlabs.as_ref()))
            .finish()
    }
}

/// Base URLs of the hosted services
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// `OpenAI` API base, e.g. `https://api.openai.com/v1`
    pub openai: String,

    /// `ElevenLabs` API base, e.g. `https://api.elevenlabs.io/v1`
    pub elevenlabs: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai: "https://api.openai.com/v1".to_string(),
            elevenlabs: "https://api.elevenlabs.io/v1".to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Maximum accepted request body
    pub max_upload_bytes: usize,
}

/// Chat completion configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "`eleven_monolingual_v1`")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// Synthesis tuning sent with every request
    pub settings: VoiceSettings,

    /// What `/talk` returns when synthesis fails
    pub on_failure: SynthesisFailurePolicy,
}

/// `ElevenLabs` voice settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub similarity_boost: f32,
    pub stability: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            similarity_boost: 0.0,
            stability: 0.0,
            style: 0.5,
            use_speaker_boost: true,
        }
    }
}

/// Response policy when speech synthesis fails after the turn was committed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisFailurePolicy {
    /// Reply 200 with an empty `audio/mpeg` body
    #[default]
    Empty,
    /// Reply with an error status
    Error,
}

impl FromStr for SynthesisFailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(Self::Empty),
            "error" => Ok(Self::Error),
            other => Err(Error::Config(format!(
                "unknown synthesis failure policy {other:?} (expected \"empty\" or \"error\")"
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_keys: ApiKeys::default(),
            endpoints: Endpoints::default(),
            server: ServerConfig {
                port: DEFAULT_PORT,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            transcript_path: PathBuf::from(DEFAULT_TRANSCRIPT_PATH),
            llm: LlmConfig {
                model: "gpt-3.5-turbo".to_string(),
            },
            voice: VoiceConfig {
                stt_model: "whisper-1".to_string(),
                tts_model: "eleven_monolingual_v1".to_string(),
                tts_voice: "TX3LPaxmHKxFdv7VOQHJ".to_string(),
                settings: VoiceSettings::default(),
                on_failure: SynthesisFailurePolicy::default(),
            },
            persona: Persona::default(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment and config file
    ///
    /// # Errors
    ///
    /// Returns error if an environment value is invalid
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os("TALK_RELAY_CONFIG").map(PathBuf::from);
        let fc = file::load_config_file(explicit.as_deref());
        Self::resolve(fc, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from a parsed config file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if an environment value is invalid
    pub fn resolve(fc: RelayConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let api_keys = ApiKeys {
            openai: env("OPEN_AI_KEY").or(fc.api_keys.openai),
            openai_org: env("OPEN_AI_ORG").or(fc.api_keys.openai_org),
            elevenlabs: env("ELEVENLABS_KEY").or(fc.api_keys.elevenlabs),
        };

        let endpoints = Endpoints {
            openai: fc.endpoints.openai.unwrap_or(defaults.endpoints.openai),
            elevenlabs: fc
                .endpoints
                .elevenlabs
                .unwrap_or(defaults.endpoints.elevenlabs),
        };

        let port = match env("TALK_RELAY_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("invalid TALK_RELAY_PORT {raw:?}: {e}")))?,
            None => fc.server.port.unwrap_or(defaults.server.port),
        };
        let server = ServerConfig {
            port,
            max_upload_bytes: fc
                .server
                .max_upload_bytes
                .unwrap_or(defaults.server.max_upload_bytes),
        };

        let transcript_path = env("TALK_RELAY_DATABASE")
            .map(PathBuf::from)
            .or(fc.storage.path)
            .unwrap_or(defaults.transcript_path);

        let llm = LlmConfig {
            model: env("TALK_RELAY_LLM_MODEL")
                .or(fc.llm.model)
                .unwrap_or(defaults.llm.model),
        };

        let on_failure = match env("TALK_RELAY_SYNTHESIS_FAILURE") {
            Some(raw) => raw.parse()?,
            None => fc.voice.on_failure.unwrap_or_default(),
        };
        let base = defaults.voice.settings;
        let tuning = fc.voice.settings;
        let voice = VoiceConfig {
            stt_model: env("TALK_RELAY_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or(defaults.voice.stt_model),
            tts_model: fc.voice.tts_model.unwrap_or(defaults.voice.tts_model),
            tts_voice: env("TALK_RELAY_TTS_VOICE")
                .or(fc.voice.tts_voice)
                .unwrap_or(defaults.voice.tts_voice),
            settings: VoiceSettings {
                similarity_boost: tuning.similarity_boost.unwrap_or(base.similarity_boost),
                stability: tuning.stability.unwrap_or(base.stability),
                style: tuning.style.unwrap_or(base.style),
                use_speaker_boost: tuning.use_speaker_boost.unwrap_or(base.use_speaker_boost),
            },
            on_failure,
        };

        let persona = fc
            .persona
            .system_prompt
            .map_or(defaults.persona, Persona::new);

        Ok(Self {
            api_keys,
            endpoints,
            server,
            transcript_path,
            llm,
            voice,
            persona,
        })
    }
}
