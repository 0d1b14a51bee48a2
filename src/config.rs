use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tauri::path::BaseDirectory;
use tauri::{AppHandle, Manager};

const CONFIG_DIR: &str = "subgen";
const CONFIG_FILE: &str = "config.json";
const API_KEY_XOR_KEY: &[u8] = b"subgen-local-key-v1";

pub const DEFAULT_LANGUAGE: &str = "zh-tw";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gemini_api_key_obfuscated: Option<String>,
    pub language: String,
    /// Whether a reset keeps the selected file so the user can retry without
    /// re-picking it.
    pub retain_media_on_reset: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key_obfuscated: None,
            language: DEFAULT_LANGUAGE.to_string(),
            retain_media_on_reset: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsState {
    pub has_api_key: bool,
    pub api_key_masked: Option<String>,
    pub language: String,
    pub retain_media_on_reset: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub retain_media_on_reset: Option<bool>,
}

pub fn normalize_language(input: &str) -> String {
    match input.trim().to_lowercase().as_str() {
        "zh-tw" => "zh-tw".to_string(),
        "en" => "en".to_string(),
        "auto" => "auto".to_string(),
        _ => DEFAULT_LANGUAGE.to_string(),
    }
}

pub fn load_or_create(app: &AppHandle) -> Result<AppConfig, String> {
    let path = config_path(app)?;
    if !path.exists() {
        let config = AppConfig::default();
        save_raw(&path, &config)?;
        return Ok(config);
    }

    let raw = fs::read_to_string(&path).map_err(|e| format!("Failed to read config: {}", e))?;
    match serde_json::from_str::<AppConfig>(&raw) {
        Ok(mut config) => {
            config.language = normalize_language(&config.language);
            Ok(config)
        }
        Err(_) => {
            let backup = path.with_extension("json.bak");
            let _ = fs::copy(&path, backup);
            let config = AppConfig::default();
            save_raw(&path, &config)?;
            Ok(config)
        }
    }
}

pub fn save(app: &AppHandle, config: &AppConfig) -> Result<(), String> {
    let path = config_path(app)?;
    save_raw(&path, config)
}

pub fn settings_state(config: &AppConfig) -> SettingsState {
    SettingsState {
        has_api_key: config.gemini_api_key_obfuscated.is_some(),
        api_key_masked: decode_api_key(config).map(|key| mask_api_key(&key)),
        language: normalize_language(&config.language),
        retain_media_on_reset: config.retain_media_on_reset,
    }
}

pub fn update_settings(app: &AppHandle, payload: UpdateSettingsPayload) -> Result<AppConfig, String> {
    let mut config = load_or_create(app)?;

    if let Some(api_key) = payload.api_key {
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            config.gemini_api_key_obfuscated = None;
        } else {
            config.gemini_api_key_obfuscated = Some(obfuscate_api_key(trimmed));
        }
    }

    if let Some(language) = payload.language {
        config.language = normalize_language(&language);
    }

    if let Some(retain) = payload.retain_media_on_reset {
        config.retain_media_on_reset = retain;
    }

    save(app, &config)?;
    Ok(config)
}

pub fn decode_api_key(config: &AppConfig) -> Option<String> {
    config
        .gemini_api_key_obfuscated
        .as_deref()
        .and_then(deobfuscate_api_key)
}

fn config_path(app: &AppHandle) -> Result<PathBuf, String> {
    let dir = app
        .path()
        .resolve(CONFIG_DIR, BaseDirectory::AppData)
        .map_err(|e| format!("Failed to resolve config dir: {}", e))?;
    fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
    Ok(dir.join(CONFIG_FILE))
}

fn save_raw(path: &PathBuf, config: &AppConfig) -> Result<(), String> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, json).map_err(|e| format!("Failed to save config: {}", e))
}

fn obfuscate_api_key(api_key: &str) -> String {
    let mut bytes = api_key.as_bytes().to_vec();
    for (idx, byte) in bytes.iter_mut().enumerate() {
        *byte ^= API_KEY_XOR_KEY[idx % API_KEY_XOR_KEY.len()];
    }
    BASE64_STANDARD.encode(bytes)
}

fn deobfuscate_api_key(obfuscated: &str) -> Option<String> {
    let mut bytes = BASE64_STANDARD.decode(obfuscated).ok()?;
    for (idx, byte) in bytes.iter_mut().enumerate() {
        *byte ^= API_KEY_XOR_KEY[idx % API_KEY_XOR_KEY.len()];
    }
    String::from_utf8(bytes).ok()
}

fn mask_api_key(api_key: &str) -> String {
    if api_key.len() <= 10 {
        return "******".to_string();
    }

    let prefix = &api_key[..6];
    let suffix = &api_key[api_key.len().saturating_sub(4)..];
    format!("{}********{}", prefix, suffix)
}
