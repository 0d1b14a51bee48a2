// src/media.rs
// Selected media file - probe, metadata, MIME resolution

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// MIME type assumed when the extension is unknown or missing.
pub const DEFAULT_MIME_TYPE: &str = "audio/mpeg";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("File is empty: {0}")]
    Empty(String),

    #[error("Failed to read file metadata: {0}")]
    Unreadable(String),
}

/// The user's chosen audio/video file. Bytes are read lazily at generation
/// time; only metadata is captured on selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedMedia {
    pub file_name: String,
    pub path: String,
    pub size_bytes: u64,
    pub mime_type: String,
}

impl SelectedMedia {
    /// Validate a path chosen in the file dialog and capture its metadata.
    pub fn from_path(path: &str) -> Result<Self, MediaError> {
        let fs_path = Path::new(path);
        let metadata = match fs_path.metadata() {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MediaError::NotFound(path.to_string()));
            }
            Err(e) => return Err(MediaError::Unreadable(e.to_string())),
        };

        if !metadata.is_file() {
            return Err(MediaError::NotAFile(path.to_string()));
        }
        if metadata.len() == 0 {
            return Err(MediaError::Empty(path.to_string()));
        }

        let file_name = fs_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string());

        Ok(Self {
            mime_type: mime_for_file_name(&file_name).to_string(),
            file_name,
            path: path.to_string(),
            size_bytes: metadata.len(),
        })
    }
}

/// Map a file name's extension to a MIME type the transcription service
/// understands. Unknown extensions fall back to a generic audio type.
pub fn mime_for_file_name(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "ogg" | "opus" => "audio/ogg",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        _ => DEFAULT_MIME_TYPE,
    }
}
