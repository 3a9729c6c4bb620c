//! Core types for the reordering engine

mod board;
mod ids;
mod intent;
mod rank;
mod task;

pub use board::{Board, Column, ContainerId, SwimlaneMode, WipLimit, BACKLOG_CONTAINER};
pub use ids::{ActorId, BoardId, ColumnId, EpicId, TaskId};
pub use intent::MoveIntent;
pub use rank::Rank;
pub use task::{Assignee, Task, TaskPriority, TaskStatus};
