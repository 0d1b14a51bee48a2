// src/transcribe/types.rs
// Transcription request types and error definitions

use thiserror::Error;

/// Media body of one transcription request. Lives only for the duration of a
/// single call.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    /// MIME type of the encoded bytes
    pub mime_type: String,
    /// Base64-encoded file bytes (standard alphabet)
    pub data: String,
}

/// Decoding settings forwarded to the remote model.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl DecodeOptions {
    /// Near-deterministic decoding keeps the SRT formatting stable.
    pub fn subtitles() -> Self {
        Self {
            temperature: 0.1,
            max_output_tokens: 32_768,
        }
    }
}

/// Subtitle generation errors. Every variant renders as a single
/// human-readable message for the UI.
#[derive(Debug, Error)]
pub enum SubtitleError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Authentication failed")]
    Authentication,

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("The service returned no usable text")]
    EmptyResponse,

    #[error("Failed to read media file: {0}")]
    MediaRead(String),

    #[error("Gemini API key missing. Configure it in Settings.")]
    NotConfigured,
}
