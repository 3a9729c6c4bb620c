//! Status ↔ column mapping.
//!
//! A task appears in the column whose mapped status equals its own. When a
//! board configuration maps two columns to the same status the lowest
//! position wins; nothing upstream prevents such configurations.

use crate::types::{Board, Column, TaskStatus};

/// The status a task takes on when dropped into this column
pub fn status_for_column(column: &Column) -> TaskStatus {
    column.mapped_status
}

/// The column a task with this status belongs in, or `None` when no column
/// maps to it (the task then lives only on the backlog and a move must leave
/// its status unchanged).
pub fn column_for_status(board: &Board, status: TaskStatus) -> Option<&Column> {
    board
        .columns
        .iter()
        .filter(|c| c.mapped_status == status)
        .min_by_key(|c| c.position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_for_status() {
        let board = Board::new(
            "b1",
            "Delivery",
            vec![
                Column::new("todo", "To Do", 0, TaskStatus::Todo),
                Column::new("doing", "Doing", 1, TaskStatus::InProgress),
                Column::new("done", "Done", 2, TaskStatus::Done),
            ],
        );

        let col = column_for_status(&board, TaskStatus::InProgress).unwrap();
        assert_eq!(col.id.as_str(), "doing");
        assert_eq!(status_for_column(col), TaskStatus::InProgress);

        assert!(column_for_status(&board, TaskStatus::Blocked).is_none());
    }

    #[test]
    fn test_ambiguous_mapping_lowest_position_wins() {
        let board = Board::new(
            "b1",
            "Delivery",
            vec![
                Column::new("review-2", "Second Review", 3, TaskStatus::InReview),
                Column::new("review-1", "First Review", 1, TaskStatus::InReview),
                Column::new("todo", "To Do", 0, TaskStatus::Todo),
            ],
        );

        let col = column_for_status(&board, TaskStatus::InReview).unwrap();
        assert_eq!(col.id.as_str(), "review-1");
    }
}
