//! Error types for the reordering engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while applying or confirming a move.
///
/// Nothing here is fatal: every failure is recovered locally by rolling the
/// optimistic state back, and only a human-readable summary reaches the
/// presentation layer.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed intent — bad indices, unknown containers, unrecognized
    /// payload shape. Rejected before any state mutation.
    #[error("invalid move: {reason}")]
    InvalidMove { reason: String },

    /// Stale id — treated like an invalid move
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Duplicate id in an ordered sequence
    #[error("duplicate {resource} id: {id}")]
    DuplicateId { resource: String, id: String },

    /// Board configuration violates an invariant (e.g. non-contiguous
    /// column positions)
    #[error("invalid board: {reason}")]
    InvalidBoard { reason: String },

    /// The remote authority declined the change; local state was rolled back
    #[error("remote authority rejected the move: {message}")]
    RemoteRejected { message: String },

    /// Request-level network failure; local state was rolled back
    #[error("network failure during confirmation: {message}")]
    Network { message: String },

    /// The confirmation call did not resolve in time; treated as a rejection
    #[error("confirmation timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// An authoritative refresh arrived while the move was pending; the move
    /// was aborted and the refreshed state kept
    #[error("container '{container}' was refreshed while a move was pending")]
    ConflictingPush { container: String },
}

impl EngineError {
    /// Create an invalid move error
    pub fn invalid_move(reason: impl Into<String>) -> Self {
        Self::InvalidMove {
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a duplicate id error
    pub fn duplicate_id(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create an invalid board error
    pub fn invalid_board(reason: impl Into<String>) -> Self {
        Self::InvalidBoard {
            reason: reason.into(),
        }
    }

    /// True for errors rejected before any state mutation. These are silent
    /// no-ops from the engine's perspective — logged, never toasted.
    pub fn is_rejected_intent(&self) -> bool {
        matches!(
            self,
            Self::InvalidMove { .. } | Self::NotFound { .. } | Self::DuplicateId { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EngineError::invalid_move("index 9 out of range");
        assert_eq!(err.to_string(), "invalid move: index 9 out of range");

        let err = EngineError::not_found("task", "t-404");
        assert_eq!(err.to_string(), "task not found: t-404");
    }

    #[test]
    fn test_rejected_intent_classification() {
        assert!(EngineError::invalid_move("x").is_rejected_intent());
        assert!(EngineError::not_found("task", "t").is_rejected_intent());
        assert!(!EngineError::Timeout { elapsed_ms: 10 }.is_rejected_intent());
        assert!(!EngineError::RemoteRejected {
            message: "conflict".into()
        }
        .is_rejected_intent());
    }
}
