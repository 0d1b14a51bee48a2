mod config;
mod glossary;
mod media;
mod session;
mod subtitle;
mod transcribe;

use config::{AppConfig, SettingsState, UpdateSettingsPayload};
use media::SelectedMedia;
use reqwest::Client;
use session::{Phase, SessionEvent, SessionSnapshot, SessionState};
use std::sync::{Arc, Mutex};
use subtitle::SubtitleSegment;
use tauri::{Manager, State};
use tauri_plugin_clipboard_manager::ClipboardExt;
use tokio::sync::Mutex as TokioMutex;
use transcribe::SubtitleOrchestrator;

struct AppState {
    session: Arc<Mutex<SessionState>>,
    orchestrator: Arc<TokioMutex<SubtitleOrchestrator>>,
}

fn gemini_key_configured() -> bool {
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .is_some()
}

fn apply_runtime_config(state: &AppState, config: &AppConfig) {
    let decoded_key = config::decode_api_key(config)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());

    match decoded_key {
        Some(api_key) => std::env::set_var("GEMINI_API_KEY", api_key),
        None => {
            std::env::remove_var("GEMINI_API_KEY");
            tracing::warn!("Gemini API key missing in local config");
        }
    }

    let language = config::normalize_language(&config.language);
    let mut orchestrator = state.orchestrator.blocking_lock();
    *orchestrator = SubtitleOrchestrator::from_env(&language);
}

#[tauri::command]
fn select_media(path: String, state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let media = SelectedMedia::from_path(&path).map_err(|e| e.to_string())?;
    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    session::dispatch(&mut session, SessionEvent::MediaSelected(media));
    Ok(session.snapshot())
}

#[tauri::command]
fn get_session(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let session = state.session.lock().map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

#[tauri::command]
fn add_glossary_term(term: String, state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    session::dispatch(&mut session, SessionEvent::GlossaryTermAdded(term));
    Ok(session.snapshot())
}

#[tauri::command]
fn remove_glossary_term(
    term: String,
    state: State<'_, AppState>,
) -> Result<SessionSnapshot, String> {
    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    session::dispatch(&mut session, SessionEvent::GlossaryTermRemoved(term));
    Ok(session.snapshot())
}

#[tauri::command]
async fn generate_subtitles(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    if !gemini_key_configured() {
        return Err("Gemini API key missing. Configure it in Settings.".to_string());
    }

    let (media, glossary) = {
        let mut session = state.session.lock().map_err(|e| e.to_string())?;
        let Some(media) = session.media.clone() else {
            return Err("Select an audio or video file first.".to_string());
        };
        if session.phase != Phase::Idle {
            return Err("Subtitle generation is already running or finished.".to_string());
        }
        session::dispatch(&mut session, SessionEvent::GenerationStarted);
        (media, session.glossary.terms().to_vec())
    };

    let outcome = {
        let orchestrator = state.orchestrator.lock().await;
        orchestrator.generate(&media, &glossary).await
    };

    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    let event = match outcome {
        Ok(generated) => SessionEvent::GenerationCompleted { srt: generated.srt },
        Err(e) => SessionEvent::GenerationFailed {
            message: e.to_string(),
        },
    };
    session::dispatch(&mut session, event);
    Ok(session.snapshot())
}

#[tauri::command]
fn reset_session(
    state: State<'_, AppState>,
    app_handle: tauri::AppHandle,
) -> Result<SessionSnapshot, String> {
    let retain_media = config::load_or_create(&app_handle)
        .map(|config| config.retain_media_on_reset)
        .unwrap_or(false);

    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    session::dispatch(&mut session, SessionEvent::Reset { retain_media });
    Ok(session.snapshot())
}

#[tauri::command]
fn suggested_srt_file_name(state: State<'_, AppState>) -> Result<String, String> {
    let session = state.session.lock().map_err(|e| e.to_string())?;
    let source_name = session
        .media
        .as_ref()
        .map(|media| media.file_name.as_str())
        .unwrap_or("");
    Ok(subtitle::srt_file_name(source_name))
}

#[tauri::command]
fn save_subtitles(path: String, state: State<'_, AppState>) -> Result<String, String> {
    let srt = {
        let session = state.session.lock().map_err(|e| e.to_string())?;
        session.result_srt().map(str::to_string)
    }
    .ok_or_else(|| "No subtitles to save yet.".to_string())?;

    std::fs::write(&path, srt).map_err(|e| format!("Failed to save subtitles: {}", e))?;
    tracing::info!("Subtitles saved to {}", path);
    Ok(path)
}

#[tauri::command]
fn copy_subtitles_to_clipboard(
    state: State<'_, AppState>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    let srt = {
        let session = state.session.lock().map_err(|e| e.to_string())?;
        session.result_srt().map(str::to_string)
    }
    .ok_or_else(|| "No subtitles to copy yet.".to_string())?;

    app_handle
        .clipboard()
        .write_text(srt)
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn preview_segments(state: State<'_, AppState>) -> Result<Vec<SubtitleSegment>, String> {
    let session = state.session.lock().map_err(|e| e.to_string())?;
    Ok(session
        .result_srt()
        .map(subtitle::parse_segments)
        .unwrap_or_default())
}

#[tauri::command]
fn get_settings(app_handle: tauri::AppHandle) -> Result<SettingsState, String> {
    let config = config::load_or_create(&app_handle)?;
    Ok(config::settings_state(&config))
}

#[tauri::command]
fn update_settings(
    payload: UpdateSettingsPayload,
    state: State<'_, AppState>,
    app_handle: tauri::AppHandle,
) -> Result<SettingsState, String> {
    let config = config::update_settings(&app_handle, payload)?;
    apply_runtime_config(state.inner(), &config);
    Ok(config::settings_state(&config))
}

#[tauri::command]
async fn validate_gemini_key(api_key: String) -> Result<bool, String> {
    if api_key.trim().is_empty() {
        return Ok(false);
    }

    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models?key={}",
        api_key.trim()
    );
    let response = Client::new()
        .get(&url)
        .timeout(std::time::Duration::from_secs(8))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    Ok(response.status().is_success())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Load environment variables from .env file
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let orchestrator = Arc::new(TokioMutex::new(SubtitleOrchestrator::from_env(
        config::DEFAULT_LANGUAGE,
    )));

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_clipboard_manager::init())
        .manage(AppState {
            session: Arc::new(Mutex::new(SessionState::new())),
            orchestrator,
        })
        .setup(|app| {
            let state = app.state::<AppState>();
            let config = config::load_or_create(app.handle())?;
            apply_runtime_config(state.inner(), &config);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            select_media,
            get_session,
            add_glossary_term,
            remove_glossary_term,
            generate_subtitles,
            reset_session,
            suggested_srt_file_name,
            save_subtitles,
            copy_subtitles_to_clipboard,
            preview_segments,
            get_settings,
            update_settings,
            validate_gemini_key
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
