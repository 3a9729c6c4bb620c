//! Board types: Board, Column, WipLimit, SwimlaneMode, ContainerId

use super::ids::{BoardId, ColumnId};
use super::task::TaskStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Advisory work-in-progress cap for a column.
///
/// Serialized as the original wire shape: a positive integer or `null` for
/// unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum WipLimit {
    Unlimited,
    Limited(NonZeroU32),
}

impl WipLimit {
    /// A limited cap. Panics only on zero, which the wire format cannot
    /// produce; use `From<Option<u32>>` for untrusted input.
    pub fn limited(limit: u32) -> Self {
        match NonZeroU32::new(limit) {
            Some(n) => Self::Limited(n),
            None => Self::Unlimited,
        }
    }
}

impl From<Option<u32>> for WipLimit {
    fn from(value: Option<u32>) -> Self {
        match value.and_then(NonZeroU32::new) {
            Some(n) => Self::Limited(n),
            None => Self::Unlimited,
        }
    }
}

impl From<WipLimit> for Option<u32> {
    fn from(value: WipLimit) -> Self {
        match value {
            WipLimit::Unlimited => None,
            WipLimit::Limited(n) => Some(n.get()),
        }
    }
}

impl fmt::Display for WipLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WipLimit::Unlimited => f.write_str("unlimited"),
            WipLimit::Limited(n) => write!(f, "{n}"),
        }
    }
}

/// How the board groups tasks into swimlanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwimlaneMode {
    #[default]
    None,
    Assignee,
    Priority,
    Epic,
}

/// A workflow stage on the board.
///
/// Dropping a task into this column implies `mapped_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    /// Left-to-right position, unique and contiguous within a board at rest
    pub position: usize,
    #[serde(default = "unlimited")]
    pub wip_limit: WipLimit,
    pub mapped_status: TaskStatus,
}

fn unlimited() -> WipLimit {
    WipLimit::Unlimited
}

impl Column {
    /// Create a column
    pub fn new(
        id: impl Into<ColumnId>,
        name: impl Into<String>,
        position: usize,
        mapped_status: TaskStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            wip_limit: WipLimit::Unlimited,
            mapped_status,
        }
    }

    /// Set the WIP limit
    pub fn with_wip_limit(mut self, limit: u32) -> Self {
        self.wip_limit = WipLimit::limited(limit);
        self
    }
}

/// A board: an ordered set of columns plus a swimlane mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default)]
    pub swimlane_mode: SwimlaneMode,
    pub columns: Vec<Column>,
}

impl Board {
    /// Create a board with the given columns
    pub fn new(id: impl Into<BoardId>, name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            swimlane_mode: SwimlaneMode::None,
            columns,
        }
    }

    /// Set the swimlane mode
    pub fn with_swimlane_mode(mut self, mode: SwimlaneMode) -> Self {
        self.swimlane_mode = mode;
        self
    }

    /// Find a column by id
    pub fn find_column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    /// Columns in ascending `position` order
    pub fn columns_in_order(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.position);
        columns
    }
}

/// Anything with its own ordered id sequence: a board column or the backlog.
///
/// On the wire this is a plain container id string; the literal `"backlog"`
/// names the backlog list, anything else is a column id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContainerId {
    Backlog,
    Column(ColumnId),
}

/// The wire name of the backlog container
pub const BACKLOG_CONTAINER: &str = "backlog";

impl From<String> for ContainerId {
    fn from(s: String) -> Self {
        if s == BACKLOG_CONTAINER {
            Self::Backlog
        } else {
            Self::Column(ColumnId::from(s))
        }
    }
}

impl From<&str> for ContainerId {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ContainerId> for String {
    fn from(value: ContainerId) -> Self {
        match value {
            ContainerId::Backlog => BACKLOG_CONTAINER.to_string(),
            ContainerId::Column(id) => id.to_string(),
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Backlog => f.write_str(BACKLOG_CONTAINER),
            ContainerId::Column(id) => f.write_str(id.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wip_limit_wire_shape() {
        let col = Column::new("c1", "Doing", 0, TaskStatus::InProgress).with_wip_limit(3);
        let value = serde_json::to_value(&col).unwrap();
        assert_eq!(value["wipLimit"], 3);
        assert_eq!(value["mappedStatus"], "IN_PROGRESS");

        let unlimited: Column =
            serde_json::from_value(serde_json::json!({
                "id": "c2",
                "name": "Done",
                "position": 1,
                "wipLimit": null,
                "mappedStatus": "DONE",
            }))
            .unwrap();
        assert_eq!(unlimited.wip_limit, WipLimit::Unlimited);
    }

    #[test]
    fn test_container_id_wire_shape() {
        let backlog: ContainerId = serde_json::from_str("\"backlog\"").unwrap();
        assert_eq!(backlog, ContainerId::Backlog);

        let column: ContainerId = serde_json::from_str("\"col-1\"").unwrap();
        assert_eq!(column, ContainerId::Column(ColumnId::from("col-1")));
        assert_eq!(serde_json::to_string(&column).unwrap(), "\"col-1\"");
    }

    #[test]
    fn test_columns_in_order() {
        let board = Board::new(
            "b1",
            "Delivery",
            vec![
                Column::new("review", "Review", 2, TaskStatus::InReview),
                Column::new("todo", "To Do", 0, TaskStatus::Todo),
                Column::new("doing", "Doing", 1, TaskStatus::InProgress),
            ],
        );
        let ids: Vec<&str> = board
            .columns_in_order()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, ["todo", "doing", "review"]);
    }
}
