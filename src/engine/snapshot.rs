//! Pre-move snapshots.
//!
//! A snapshot captures exactly what one move can touch: the affected
//! ordering(s), the moved task's prior state, and the refresh epochs of the
//! involved scopes. It lives for the duration of one in-flight confirmation —
//! consumed on rollback, dropped on success — and is never shared.

use crate::state::{BoardState, Scope};
use crate::types::{Column, ContainerId, Task, TaskId};

#[derive(Debug)]
pub(crate) struct Snapshot {
    orders: Vec<(ContainerId, Vec<TaskId>)>,
    task: Option<Task>,
    columns: Option<Vec<Column>>,
    epochs: Vec<(Scope, u64)>,
}

impl Snapshot {
    /// Capture the state a task move can touch
    pub(crate) fn for_task_move(
        state: &BoardState,
        item: &TaskId,
        source: &ContainerId,
        destination: &ContainerId,
    ) -> Self {
        let mut containers = vec![source.clone()];
        if destination != source {
            containers.push(destination.clone());
        }

        let orders = containers
            .iter()
            .map(|c| {
                let order = state.container_order(c).map(<[TaskId]>::to_vec).unwrap_or_default();
                (c.clone(), order)
            })
            .collect();
        let epochs = containers
            .iter()
            .map(|c| {
                let scope = Scope::Tasks(c.clone());
                let epoch = state.epoch(&scope);
                (scope, epoch)
            })
            .collect();

        Self {
            orders,
            task: state.task(item).cloned(),
            columns: None,
            epochs,
        }
    }

    /// Capture the state a column move can touch
    pub(crate) fn for_column_move(state: &BoardState) -> Self {
        Self {
            orders: Vec::new(),
            task: None,
            columns: Some(state.board.columns.clone()),
            epochs: vec![(Scope::Columns, state.epoch(&Scope::Columns))],
        }
    }

    /// True while no authoritative refresh has touched the involved scopes
    /// since capture. A stale snapshot must not be reapplied.
    pub(crate) fn epochs_current(&self, state: &BoardState) -> bool {
        self.epochs
            .iter()
            .all(|(scope, epoch)| state.epoch(scope) == *epoch)
    }

    /// Restore the captured state verbatim
    pub(crate) fn restore(self, state: &mut BoardState) {
        for (container, order) in self.orders {
            state.set_container_order(&container, order);
        }
        if let Some(task) = self.task {
            state.upsert_tasks(vec![task]);
        }
        if let Some(columns) = self.columns {
            state.set_columns(columns);
        }
    }

    /// Selective restore after a mid-flight refresh invalidated the move.
    ///
    /// Every captured container whose scope epoch still matches gets its
    /// captured order back; refreshed containers keep their refreshed
    /// contents. When a refreshed container claims the moved task, the task
    /// is dropped from every restored order so it appears at most once. The
    /// task's prior state comes back only while it still reads exactly as
    /// the optimistic apply left it, meaning no refresh replaced it.
    pub(crate) fn restore_unrefreshed(
        self,
        state: &mut BoardState,
        moved: Option<(&TaskId, &Task)>,
    ) {
        let Snapshot {
            orders,
            task,
            columns,
            epochs,
        } = self;

        let task_in_refreshed = moved.is_some_and(|(id, _)| {
            orders.iter().any(|(container, _)| {
                !epoch_matches(&epochs, state, &Scope::Tasks(container.clone()))
                    && state
                        .container_order(container)
                        .is_some_and(|order| order.contains(id))
            })
        });

        for (container, mut order) in orders {
            if !epoch_matches(&epochs, state, &Scope::Tasks(container.clone())) {
                continue;
            }
            if task_in_refreshed {
                if let Some((id, _)) = moved {
                    order.retain(|t| t != id);
                }
            }
            state.set_container_order(&container, order);
        }

        if let (Some(prior), Some((id, optimistic))) = (task, moved) {
            if state.task(id) == Some(optimistic) {
                state.upsert_tasks(vec![prior]);
            }
        }

        if let Some(columns) = columns {
            if epoch_matches(&epochs, state, &Scope::Columns) {
                state.set_columns(columns);
            }
        }
    }
}

fn epoch_matches(epochs: &[(Scope, u64)], state: &BoardState, scope: &Scope) -> bool {
    epochs
        .iter()
        .any(|(s, captured)| s == scope && state.epoch(scope) == *captured)
}
