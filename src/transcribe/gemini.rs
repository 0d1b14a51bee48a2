// src/transcribe/gemini.rs — Google Gemini transcription adapter

use super::types::{DecodeOptions, MediaPayload, SubtitleError};
use super::TranscriptionAdapter;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
// Long recordings take a while to transcribe; the transport owns the timeout.
const TIMEOUT_SECS: u64 = 300;

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Part {
    fn media(payload: &MediaPayload) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: payload.mime_type.clone(),
                data: payload.data.clone(),
            }),
            text: None,
        }
    }

    fn text(text: &str) -> Self {
        Self {
            inline_data: None,
            text: Some(text.to_string()),
        }
    }
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct GeminiAdapter {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiAdapter {
    pub fn new(api_key: String) -> Self {
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        tracing::info!("Gemini adapter initialized: model={}", model);

        Self {
            client,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl TranscriptionAdapter for GeminiAdapter {
    async fn transcribe(
        &self,
        media: &MediaPayload,
        instruction: &str,
        options: &DecodeOptions,
    ) -> Result<String, SubtitleError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part::media(media), Part::text(instruction)],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SubtitleError::Timeout
                } else {
                    SubtitleError::Network(format!("Gemini: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => SubtitleError::Authentication,
                429 => SubtitleError::RateLimit,
                _ => SubtitleError::Provider(format!("Gemini {}: {}", status, body)),
            });
        }

        let gemini: GeminiResponse = response
            .json()
            .await
            .map_err(|e| SubtitleError::Provider(format!("Gemini parse: {}", e)))?;

        let text = gemini
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .concat()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(SubtitleError::EmptyResponse);
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
