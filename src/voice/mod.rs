//! Voice processing module
//!
//! Wraps the hosted speech services: Whisper for speech-to-text and
//! `ElevenLabs` for text-to-speech.

mod stt;
mod tts;

pub use stt::{Transcriber, WhisperTranscriber};
pub use tts::{ElevenLabsSynthesizer, Synthesizer};

/// An uploaded audio recording
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Raw encoded audio
    pub data: Vec<u8>,
    /// File name as uploaded (may be empty)
    pub file_name: String,
    /// MIME type as uploaded, if any
    pub content_type: Option<String>,
}

impl AudioClip {
    /// Create a clip from raw bytes
    #[must_use]
    pub fn new(data: Vec<u8>, file_name: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            data,
            file_name: file_name.into(),
            content_type,
        }
    }

    /// Number of encoded bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the clip carries no audio
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// MIME type, falling back to one inferred from the file extension
    #[must_use]
    pub fn mime_type(&self) -> &str {
        if let Some(ct) = self.content_type.as_deref().filter(|ct| ct.starts_with("audio/")) {
            return ct;
        }
        let extension = std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("mp3" | "mpeg" | "mpga") => "audio/mpeg",
            Some("m4a" | "mp4") => "audio/mp4",
            Some("wav") => "audio/wav",
            Some("webm") => "audio/webm",
            Some("ogg" | "oga") => "audio/ogg",
            Some("flac") => "audio/flac",
            _ => "application/octet-stream",
        }
    }

    /// File name to present upstream
    ///
    /// Whisper detects the container from the extension, so a missing name is
    /// replaced with one derived from the MIME type.
    #[must_use]
    pub fn upload_name(&self) -> String {
        let has_extension = std::path::Path::new(&self.file_name)
            .extension()
            .is_some();
        if has_extension {
            return self.file_name.clone();
        }
        format!("audio.{}", extension_for_mime(self.mime_type()))
    }
}

/// Get file extension for MIME type
fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "audio/mp4" | "audio/m4a" => "m4a",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/webm" => "webm",
        "audio/ogg" => "ogg",
        "audio/flac" => "flac",
        _ => "mp3",
    }
}
