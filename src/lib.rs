//! Board and backlog reordering for a project-management client.
//!
//! This crate is the client-side ordering engine behind a kanban board and a
//! ranked backlog: it turns drag gestures into validated move intents,
//! applies them optimistically, confirms each one with the remote authority,
//! and rolls back on any rejection, failure or timeout. Derived projections
//! (columns with WIP badges, swimlanes, filtered backlog) are recomputed
//! from canonical state and memoized on a state version.
//!
//! # Architecture
//!
//! - [`types`] — the domain vocabulary: tasks, boards, columns, ranks,
//!   container ids and move intents
//! - [`ordering`] — pure ordered-sequence operations
//! - [`mapping`] — column/status mapping
//! - [`swimlane`] — lane grouping
//! - [`wip`] — advisory WIP limit evaluation
//! - [`remote`] — the [`remote::RemoteAuthority`] seam and its scripted
//!   test double
//! - [`state`] — canonical per-context state
//! - [`engine`] — the [`engine::ReorderEngine`] orchestrator
//! - [`view`] — board and backlog view models
//!
//! # Example
//!
//! ```
//! use boardflow::engine::ReorderEngine;
//! use boardflow::remote::testing::ScriptedRemote;
//! use boardflow::state::BoardState;
//! use boardflow::types::{Board, Column, ContainerId, MoveIntent, Task, TaskStatus};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), boardflow::error::EngineError> {
//! let board = Board::new(
//!     "b1",
//!     "Delivery",
//!     vec![
//!         Column::new("todo", "To Do", 0, TaskStatus::Todo),
//!         Column::new("doing", "Doing", 1, TaskStatus::InProgress).with_wip_limit(3),
//!     ],
//! );
//! let tasks = vec![Task::new("t1", "PROJ-1", "Fix login")];
//! let state = BoardState::new(board, tasks)?;
//!
//! let engine = ReorderEngine::new(state, Arc::new(ScriptedRemote::confirming()));
//! engine
//!     .apply_move(MoveIntent::task_move("t1", "todo", "doing", 0))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod mapping;
pub mod ordering;
pub mod remote;
pub mod state;
pub mod swimlane;
pub mod types;
pub mod view;
pub mod wip;

pub use engine::{EngineConfig, MoveOutcome, ReorderEngine};
pub use error::{EngineError, Result};
pub use remote::{RemoteAuthority, RemoteError, TaskMoved};
pub use state::BoardState;
pub use types::{
    Board, Column, ContainerId, MoveIntent, Rank, SwimlaneMode, Task, TaskId, TaskPriority,
    TaskStatus, WipLimit,
};
pub use view::{BacklogFilter, BacklogViewModel, BoardViewModel, DragFeedback, UserNotice};
