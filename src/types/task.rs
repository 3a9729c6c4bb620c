//! Task types: Task, TaskStatus, TaskPriority, Assignee

use super::ids::{ActorId, EpicId, TaskId};
use super::rank::Rank;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a task. Board columns map onto these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    InReview,
    Done,
    Blocked,
}

/// Task priority, used for the priority swimlane grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl TaskPriority {
    /// All priorities, most severe first — the lane order for priority
    /// swimlanes.
    pub const SEVERITY_DESCENDING: [TaskPriority; 4] = [
        TaskPriority::Critical,
        TaskPriority::High,
        TaskPriority::Medium,
        TaskPriority::Low,
    ];
}

/// The person a task is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: ActorId,
    /// Display name, the key for assignee swimlanes
    pub name: String,
}

/// A task as cached on the client during an edit session.
///
/// The server owns the record; the engine mutates this copy optimistically
/// and the remote authority confirms or rejects the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Human-facing key, e.g. `PROJ-17`
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Assignee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic: Option<EpicId>,
    /// Backlog ordering key, independent of status and column placement
    pub rank: Rank,
}

impl Task {
    /// Create a task with the given id, key and title
    pub fn new(id: impl Into<TaskId>, key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            assignee: None,
            epic: None,
            rank: Rank::first(),
        }
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the assignee
    pub fn with_assignee(mut self, id: impl Into<ActorId>, name: impl Into<String>) -> Self {
        self.assignee = Some(Assignee {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// Set the epic
    pub fn with_epic(mut self, epic: impl Into<EpicId>) -> Self {
        self.epic = Some(epic.into());
        self
    }

    /// Set the backlog rank
    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
