// src/transcribe/mod.rs
// Transcription Orchestrator - one request out, one SRT text or failure back

mod gemini;
mod prompt;
mod types;

pub use gemini::GeminiAdapter;
pub use types::{DecodeOptions, MediaPayload, SubtitleError};

use crate::media::SelectedMedia;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

/// Capability boundary to a transcription-capable generative model.
#[async_trait]
pub trait TranscriptionAdapter: Send + Sync {
    /// Run one transcription request: media payload + instruction in, raw
    /// text out. No retries, no streaming, no multi-turn state.
    async fn transcribe(
        &self,
        media: &MediaPayload,
        instruction: &str,
        options: &DecodeOptions,
    ) -> Result<String, SubtitleError>;

    /// Provider name
    fn name(&self) -> &str;
}

/// Outcome of one successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedSubtitles {
    /// Trimmed, non-empty SRT text, passed through verbatim otherwise
    pub srt: String,
    /// Lenient cue count, for logging and preview only
    pub cue_count: usize,
}

/// Builds the request from the selected file and glossary, issues the single
/// outbound call, and maps the outcome. Identical inputs always trigger a
/// fresh remote call.
pub struct SubtitleOrchestrator {
    adapter: Option<Box<dyn TranscriptionAdapter>>,
    language: String,
}

impl SubtitleOrchestrator {
    pub fn new(adapter: Box<dyn TranscriptionAdapter>, language: &str) -> Self {
        Self {
            adapter: Some(adapter),
            language: language.to_string(),
        }
    }

    /// Create from environment variables. `GEMINI_API_KEY` selects the Gemini
    /// backend; without it, generation fails until the key is configured.
    pub fn from_env(language: &str) -> Self {
        let adapter: Option<Box<dyn TranscriptionAdapter>> = match std::env::var("GEMINI_API_KEY")
        {
            Ok(key) if !key.trim().is_empty() => {
                tracing::info!("Transcription backend: Gemini");
                Some(Box::new(GeminiAdapter::new(key.trim().to_string())))
            }
            _ => {
                tracing::warn!("GEMINI_API_KEY not set; subtitle generation disabled until configured");
                None
            }
        };

        Self {
            adapter,
            language: language.to_string(),
        }
    }

    pub async fn generate(
        &self,
        media: &SelectedMedia,
        glossary: &[String],
    ) -> Result<GeneratedSubtitles, SubtitleError> {
        let adapter = self.adapter.as_deref().ok_or(SubtitleError::NotConfigured)?;

        let request_id = uuid::Uuid::new_v4();
        tracing::info!(
            "Generating subtitles [{}]: '{}' ({} bytes, {}), {} glossary terms",
            request_id,
            media.file_name,
            media.size_bytes,
            media.mime_type,
            glossary.len()
        );

        let bytes = tokio::fs::read(&media.path)
            .await
            .map_err(|e| SubtitleError::MediaRead(e.to_string()))?;
        if bytes.is_empty() {
            return Err(SubtitleError::MediaRead("file is empty".to_string()));
        }

        let payload = MediaPayload {
            mime_type: media.mime_type.clone(),
            data: BASE64_STANDARD.encode(&bytes),
        };
        let instruction = prompt::build_instruction(&self.language, glossary);

        let raw = adapter
            .transcribe(&payload, &instruction, &DecodeOptions::subtitles())
            .await?;

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SubtitleError::EmptyResponse);
        }

        let cue_count = crate::subtitle::parse_segments(trimmed).len();
        tracing::info!(
            "Subtitles generated [{}] via {}: {} chars, {} cues",
            request_id,
            adapter.name(),
            trimmed.len(),
            cue_count
        );

        Ok(GeneratedSubtitles {
            srt: trimmed.to_string(),
            cue_count,
        })
    }
}
