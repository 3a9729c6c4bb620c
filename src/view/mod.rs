//! View models — derived, memoized projections of canonical state.
//!
//! View models never own ordering state. They read the engine's canonical
//! state, cache the derived projection keyed on the engine's state version,
//! and translate drag payloads into move intents. Failures come back as
//! [`DragFeedback`], never as panics or stale views.

mod backlog;
mod board;

pub use backlog::{BacklogFilter, BacklogViewModel};
pub use board::{BoardView, BoardViewModel, ColumnView, LaneView};

use crate::engine::MoveOutcome;
use crate::error::EngineError;

/// A human-readable notice the presentation layer can surface directly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotice {
    pub message: String,
}

impl UserNotice {
    /// The notice for a failed (rolled back or aborted) move
    pub fn for_error(err: &EngineError) -> Self {
        let message = match err {
            EngineError::RemoteRejected { message } => {
                format!("The server declined this move: {message}. Your board was restored.")
            }
            EngineError::Network { .. } => {
                "The move could not reach the server. Your board was restored.".to_string()
            }
            EngineError::Timeout { .. } => {
                "The server did not respond in time. Your change was undone.".to_string()
            }
            EngineError::ConflictingPush { .. } => {
                "This list was just updated elsewhere; your move was discarded.".to_string()
            }
            other => other.to_string(),
        };
        Self { message }
    }
}

/// What a completed drag gesture amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragFeedback {
    /// Applied and confirmed
    Completed,
    /// The gesture changed nothing; no remote call was made
    NoOp,
    /// Malformed or stale gesture, dropped silently before any mutation
    Ignored,
    /// The optimistic change was rolled back (or aborted by a refresh);
    /// show the notice
    Failed(UserNotice),
}

pub(crate) fn feedback(result: crate::error::Result<MoveOutcome>) -> DragFeedback {
    match result {
        Ok(MoveOutcome::Committed) => DragFeedback::Completed,
        Ok(MoveOutcome::NoOp) => DragFeedback::NoOp,
        Err(err) if err.is_rejected_intent() => {
            tracing::debug!("drag gesture ignored: {err}");
            DragFeedback::Ignored
        }
        Err(err) => DragFeedback::Failed(UserNotice::for_error(&err)),
    }
}
