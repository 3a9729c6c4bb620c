//! WIP limit evaluation — advisory only.
//!
//! A column at or over its limit still accepts drops; the evaluation only
//! drives badges and highlighting in the presentation layer.

use crate::types::{Column, WipLimit};
use serde::Serialize;

/// Where a column stands relative to its limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WipStatus {
    Under,
    Near,
    AtOrOver,
}

/// The evaluation result for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WipEvaluation {
    pub status: WipStatus,
    pub limit: WipLimit,
}

/// Evaluate a column against its configured limit.
///
/// `Near` starts at `ceil(limit * 0.8)`; an unlimited column is always
/// `Under`.
pub fn evaluate(column: &Column, current_count: usize) -> WipEvaluation {
    let status = match column.wip_limit {
        WipLimit::Unlimited => WipStatus::Under,
        WipLimit::Limited(limit) => {
            let limit = limit.get() as usize;
            if current_count >= limit {
                WipStatus::AtOrOver
            } else if current_count >= (limit * 4).div_ceil(5) {
                WipStatus::Near
            } else {
                WipStatus::Under
            }
        }
    };
    WipEvaluation {
        status,
        limit: column.wip_limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskStatus;

    fn column(limit: Option<u32>) -> Column {
        let col = Column::new("doing", "Doing", 1, TaskStatus::InProgress);
        match limit {
            Some(n) => col.with_wip_limit(n),
            None => col,
        }
    }

    #[test]
    fn test_unlimited_always_under() {
        let col = column(None);
        for count in [0, 5, 500] {
            assert_eq!(evaluate(&col, count).status, WipStatus::Under);
        }
    }

    #[test]
    fn test_thresholds_limit_five() {
        let col = column(Some(5));
        assert_eq!(evaluate(&col, 0).status, WipStatus::Under);
        assert_eq!(evaluate(&col, 3).status, WipStatus::Under);
        // ceil(5 * 0.8) = 4
        assert_eq!(evaluate(&col, 4).status, WipStatus::Near);
        assert_eq!(evaluate(&col, 5).status, WipStatus::AtOrOver);
        assert_eq!(evaluate(&col, 9).status, WipStatus::AtOrOver);
    }

    #[test]
    fn test_thresholds_small_limit() {
        // ceil(2 * 0.8) = 2, so the near band collapses into at-or-over.
        let col = column(Some(2));
        assert_eq!(evaluate(&col, 1).status, WipStatus::Under);
        assert_eq!(evaluate(&col, 2).status, WipStatus::AtOrOver);
    }

    #[test]
    fn test_evaluation_reports_limit() {
        let col = column(Some(3));
        let eval = evaluate(&col, 1);
        assert_eq!(eval.limit, WipLimit::limited(3));
    }
}
