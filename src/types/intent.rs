//! Move intents — the discrete outcome of a completed drag gesture

use super::board::ContainerId;
use super::ids::{ColumnId, TaskId};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single discrete move instruction.
///
/// Gesture libraries hand over loosely shaped payloads; this is the closed
/// set of shapes the engine accepts. Anything else is rejected at the
/// boundary as `InvalidMove` before any state is touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveIntent {
    /// Move a task within or across containers
    TaskMove {
        item: TaskId,
        source: ContainerId,
        destination: ContainerId,
        /// 0-based index the task occupies after the move
        destination_index: usize,
    },
    /// Move a column within the board's column strip
    ColumnMove {
        column: ColumnId,
        /// 0-based position the column occupies after the move
        destination_index: usize,
    },
}

impl MoveIntent {
    /// Parse a dynamic gesture payload into a move intent
    pub fn from_payload(payload: Value) -> Result<Self> {
        serde_json::from_value(payload)
            .map_err(|err| EngineError::invalid_move(format!("unrecognized gesture payload: {err}")))
    }

    /// Convenience constructor for a task move
    pub fn task_move(
        item: impl Into<TaskId>,
        source: impl Into<ContainerId>,
        destination: impl Into<ContainerId>,
        destination_index: usize,
    ) -> Self {
        Self::TaskMove {
            item: item.into(),
            source: source.into(),
            destination: destination.into(),
            destination_index,
        }
    }

    /// Convenience constructor for a column move
    pub fn column_move(column: impl Into<ColumnId>, destination_index: usize) -> Self {
        Self::ColumnMove {
            column: column.into(),
            destination_index,
        }
    }
}
