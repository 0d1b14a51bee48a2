// src/session/mod.rs
// Session State Machine - a pure reducer over the UI lifecycle

use crate::glossary::Glossary;
use crate::media::SelectedMedia;
use serde::{Deserialize, Serialize};

/// Shown when a failure carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Subtitle generation failed. Please try again.";

/// UI-facing status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Uploading,
    Processing,
    Completed,
    Error,
}

/// Lifecycle phase. The result text lives only inside `Completed` and the
/// error message only inside `Error`, so the two can never coexist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// Reserved. File selection is synchronous local I/O, so nothing enters
    /// this phase today.
    Uploading,
    Processing,
    Completed {
        srt: String,
    },
    Error {
        message: String,
    },
}

impl Phase {
    pub fn status(&self) -> Status {
        match self {
            Phase::Idle => Status::Idle,
            Phase::Uploading => Status::Uploading,
            Phase::Processing => Status::Processing,
            Phase::Completed { .. } => Status::Completed,
            Phase::Error { .. } => Status::Error,
        }
    }
}

/// The whole mutable session. Created once at startup, reduced on every UI
/// event, dropped when the app exits. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub media: Option<SelectedMedia>,
    pub glossary: Glossary,
    pub phase: Phase,
}

impl SessionState {
    /// Fresh session with the default glossary seed.
    pub fn new() -> Self {
        Self {
            media: None,
            glossary: Glossary::with_defaults(),
            phase: Phase::Idle,
        }
    }

    pub fn result_srt(&self) -> Option<&str> {
        match &self.phase {
            Phase::Completed { srt } => Some(srt),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (result_srt, error) = match &self.phase {
            Phase::Completed { srt } => (Some(srt.clone()), None),
            Phase::Error { message } => (None, Some(message.clone())),
            _ => (None, None),
        };

        SessionSnapshot {
            status: self.phase.status(),
            media: self.media.clone(),
            glossary: self.glossary.terms().to_vec(),
            result_srt,
            error,
        }
    }
}

/// Serializable view of the session for the webview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: Status,
    pub media: Option<SelectedMedia>,
    pub glossary: Vec<String>,
    pub result_srt: Option<String>,
    pub error: Option<String>,
}

/// Everything that can happen to a session. Each command dispatches exactly
/// one event; the asynchronous generation call dispatches its outcome as a
/// single completed/failed event instead of mutating state mid-flight.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    MediaSelected(SelectedMedia),
    GenerationStarted,
    GenerationCompleted { srt: String },
    GenerationFailed { message: String },
    Reset { retain_media: bool },
    GlossaryTermAdded(String),
    GlossaryTermRemoved(String),
}

/// Compute the next session from the current one and an event. Events that
/// are invalid in the current phase leave the state unchanged.
pub fn reduce(state: SessionState, event: SessionEvent) -> SessionState {
    let mut next = state;

    match event {
        SessionEvent::MediaSelected(media) => {
            if matches!(next.phase, Phase::Processing | Phase::Uploading) {
                tracing::warn!("Ignoring file selection while {:?}", next.phase.status());
                return next;
            }
            tracing::info!("Media selected: '{}' ({} bytes)", media.file_name, media.size_bytes);
            next.media = Some(media);
            next.phase = Phase::Idle;
        }
        SessionEvent::GenerationStarted => {
            if next.phase != Phase::Idle || next.media.is_none() {
                tracing::warn!(
                    "Ignoring start: status={:?}, media_selected={}",
                    next.phase.status(),
                    next.media.is_some()
                );
                return next;
            }
            next.phase = Phase::Processing;
        }
        SessionEvent::GenerationCompleted { srt } => {
            if next.phase != Phase::Processing {
                tracing::warn!("Ignoring completion while {:?}", next.phase.status());
                return next;
            }
            next.phase = Phase::Completed { srt };
        }
        SessionEvent::GenerationFailed { message } => {
            if next.phase != Phase::Processing {
                tracing::warn!("Ignoring failure while {:?}", next.phase.status());
                return next;
            }
            let message = if message.trim().is_empty() {
                GENERIC_FAILURE_MESSAGE.to_string()
            } else {
                message
            };
            next.phase = Phase::Error { message };
        }
        SessionEvent::Reset { retain_media } => {
            if next.phase == Phase::Processing {
                // No cancellation: the in-flight request must settle first.
                tracing::warn!("Ignoring reset while processing");
                return next;
            }
            if !retain_media {
                next.media = None;
            }
            next.phase = Phase::Idle;
        }
        SessionEvent::GlossaryTermAdded(term) => {
            if next.glossary.add(&term) {
                tracing::debug!("Glossary term added ({} total)", next.glossary.len());
            }
        }
        SessionEvent::GlossaryTermRemoved(term) => {
            if next.glossary.remove(&term) {
                tracing::debug!("Glossary term removed ({} total)", next.glossary.len());
            }
        }
    }

    next
}

/// Reduce in place. Commands hold the session lock around this call, so every
/// transition is atomic from the UI's point of view.
pub fn dispatch(state: &mut SessionState, event: SessionEvent) {
    *state = reduce(std::mem::take(state), event);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(name: &str) -> SelectedMedia {
        SelectedMedia {
            file_name: name.to_string(),
            path: format!("/tmp/{}", name),
            size_bytes: 1024,
            mime_type: "audio/mpeg".to_string(),
        }
    }

    fn assert_invariant(state: &SessionState) {
        let snapshot = state.snapshot();
        assert_eq!(
            snapshot.result_srt.is_some(),
            snapshot.status == Status::Completed,
            "Result text must exist exactly when completed"
        );
        assert_eq!(
            snapshot.error.is_some(),
            snapshot.status == Status::Error,
            "Error message must exist exactly when errored"
        );
        assert!(
            !(snapshot.result_srt.is_some() && snapshot.error.is_some()),
            "Result and error are mutually exclusive"
        );
    }

    #[test]
    fn test_selection_keeps_idle_and_stores_media() {
        let state = reduce(
            SessionState::new(),
            SessionEvent::MediaSelected(media("lecture.mp4")),
        );
        assert_eq!(state.phase.status(), Status::Idle);
        assert_eq!(state.media.as_ref().unwrap().file_name, "lecture.mp4");
        assert_invariant(&state);
    }

    #[test]
    fn test_selection_clears_stale_result() {
        let mut state = SessionState::new();
        state.media = Some(media("old.mp3"));
        state.phase = Phase::Completed {
            srt: "1\n...".to_string(),
        };

        let state = reduce(state, SessionEvent::MediaSelected(media("new.mp3")));
        assert_eq!(state.phase.status(), Status::Idle);
        assert!(state.result_srt().is_none());
        assert_invariant(&state);
    }

    #[test]
    fn test_happy_path_to_completed() {
        let mut state = SessionState::new();
        dispatch(&mut state, SessionEvent::MediaSelected(media("talk.mp3")));
        dispatch(&mut state, SessionEvent::GenerationStarted);
        assert_eq!(state.phase.status(), Status::Processing);
        assert_invariant(&state);

        let srt = "1\n00:00:00,000 --> 00:00:02,000\nHello";
        dispatch(
            &mut state,
            SessionEvent::GenerationCompleted { srt: srt.to_string() },
        );
        assert_eq!(state.phase.status(), Status::Completed);
        assert_eq!(state.result_srt(), Some(srt));
        assert_invariant(&state);
    }

    #[test]
    fn test_failure_surfaces_message() {
        let mut state = SessionState::new();
        dispatch(&mut state, SessionEvent::MediaSelected(media("talk.mp3")));
        dispatch(&mut state, SessionEvent::GenerationStarted);
        dispatch(
            &mut state,
            SessionEvent::GenerationFailed {
                message: "quota exceeded".to_string(),
            },
        );
        assert_eq!(state.phase.status(), Status::Error);
        assert_eq!(state.snapshot().error.as_deref(), Some("quota exceeded"));
        assert_invariant(&state);
    }

    #[test]
    fn test_blank_failure_message_gets_fallback() {
        let mut state = SessionState::new();
        dispatch(&mut state, SessionEvent::MediaSelected(media("talk.mp3")));
        dispatch(&mut state, SessionEvent::GenerationStarted);
        dispatch(
            &mut state,
            SessionEvent::GenerationFailed {
                message: "  ".to_string(),
            },
        );
        assert_eq!(
            state.snapshot().error.as_deref(),
            Some(GENERIC_FAILURE_MESSAGE)
        );
    }

    #[test]
    fn test_start_requires_media() {
        let state = reduce(SessionState::new(), SessionEvent::GenerationStarted);
        assert_eq!(state.phase.status(), Status::Idle);
    }

    #[test]
    fn test_outcome_events_ignored_outside_processing() {
        let state = reduce(
            SessionState::new(),
            SessionEvent::GenerationCompleted {
                srt: "1".to_string(),
            },
        );
        assert_eq!(state.phase.status(), Status::Idle);
        assert!(state.result_srt().is_none());

        let state = reduce(
            state,
            SessionEvent::GenerationFailed {
                message: "late".to_string(),
            },
        );
        assert_eq!(state.phase.status(), Status::Idle);
        assert_invariant(&state);
    }

    #[test]
    fn test_reset_clears_everything_but_glossary() {
        let mut state = SessionState::new();
        dispatch(&mut state, SessionEvent::GlossaryTermAdded("Fabric".to_string()));
        let glossary_before = state.glossary.clone();

        dispatch(&mut state, SessionEvent::MediaSelected(media("talk.mp3")));
        dispatch(&mut state, SessionEvent::GenerationStarted);
        dispatch(
            &mut state,
            SessionEvent::GenerationCompleted {
                srt: "1\n...".to_string(),
            },
        );

        dispatch(&mut state, SessionEvent::Reset { retain_media: false });
        assert_eq!(state.phase.status(), Status::Idle);
        assert!(state.media.is_none());
        assert!(state.result_srt().is_none());
        assert_eq!(state.glossary, glossary_before);
        assert_invariant(&state);
    }

    #[test]
    fn test_reset_can_retain_media_after_error() {
        let mut state = SessionState::new();
        dispatch(&mut state, SessionEvent::MediaSelected(media("talk.mp3")));
        dispatch(&mut state, SessionEvent::GenerationStarted);
        dispatch(
            &mut state,
            SessionEvent::GenerationFailed {
                message: "boom".to_string(),
            },
        );

        dispatch(&mut state, SessionEvent::Reset { retain_media: true });
        assert_eq!(state.phase.status(), Status::Idle);
        assert_eq!(state.media.as_ref().unwrap().file_name, "talk.mp3");
        assert!(state.snapshot().error.is_none());
        assert_invariant(&state);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = SessionState::new();
        dispatch(&mut state, SessionEvent::MediaSelected(media("talk.mp3")));
        dispatch(&mut state, SessionEvent::GenerationStarted);
        dispatch(
            &mut state,
            SessionEvent::GenerationCompleted {
                srt: "1\n...".to_string(),
            },
        );

        dispatch(&mut state, SessionEvent::Reset { retain_media: false });
        let first = state.clone();
        dispatch(&mut state, SessionEvent::Reset { retain_media: false });
        assert_eq!(state, first);
    }

    #[test]
    fn test_no_reset_or_selection_while_processing() {
        let mut state = SessionState::new();
        dispatch(&mut state, SessionEvent::MediaSelected(media("talk.mp3")));
        dispatch(&mut state, SessionEvent::GenerationStarted);

        let during = state.clone();
        dispatch(&mut state, SessionEvent::Reset { retain_media: false });
        assert_eq!(state, during);

        dispatch(&mut state, SessionEvent::MediaSelected(media("other.mp3")));
        assert_eq!(state, during);
    }

    #[test]
    fn test_glossary_events_do_not_change_phase() {
        let mut state = SessionState::new();
        dispatch(&mut state, SessionEvent::MediaSelected(media("talk.mp3")));
        dispatch(&mut state, SessionEvent::GenerationStarted);

        dispatch(&mut state, SessionEvent::GlossaryTermAdded("Fabric".to_string()));
        assert_eq!(state.phase.status(), Status::Processing);
        assert!(state.glossary.terms().contains(&"Fabric".to_string()));
        assert_invariant(&state);
    }
}
