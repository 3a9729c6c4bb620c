//! Canonical board state.
//!
//! One owned state object per board/backlog context. Only the engine writes
//! it; everything a renderer sees is a derived view recomputed from here.

use crate::error::{EngineError, Result};
use crate::mapping;
use crate::types::{Board, Column, ColumnId, ContainerId, Task, TaskId};
use std::collections::HashMap;

/// Serialization scope for in-flight moves. Task containers each get their
/// own scope; the board's column strip is a scope of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Scope {
    Tasks(ContainerId),
    Columns,
}

/// The canonical task set and orderings for one board/backlog context
#[derive(Debug, Clone)]
pub struct BoardState {
    pub board: Board,
    tasks: HashMap<TaskId, Task>,
    /// Per-column task order
    column_orders: HashMap<ColumnId, Vec<TaskId>>,
    /// Backlog order over all tasks, by rank ascending at load time
    backlog: Vec<TaskId>,
    /// Refresh epoch per scope; bumped whenever an authoritative refresh
    /// replaces a container's contents
    epochs: HashMap<Scope, u64>,
}

impl BoardState {
    /// Build canonical state from a board and its task set.
    ///
    /// The backlog orders all tasks by rank ascending (ties broken by id,
    /// matching the server's tie-break). Each task with a status some column
    /// maps appears in that column's order; with several candidate columns
    /// the lowest position wins.
    pub fn new(board: Board, tasks: Vec<Task>) -> Result<Self> {
        let positions: Vec<usize> = {
            let mut p: Vec<usize> = board.columns.iter().map(|c| c.position).collect();
            p.sort_unstable();
            p
        };
        if positions.iter().enumerate().any(|(i, &p)| i != p) {
            return Err(EngineError::invalid_board(format!(
                "column positions must be contiguous from 0, got {positions:?}"
            )));
        }

        let mut map: HashMap<TaskId, Task> = HashMap::with_capacity(tasks.len());
        for task in &tasks {
            if map.insert(task.id.clone(), task.clone()).is_some() {
                return Err(EngineError::duplicate_id("task", task.id.to_string()));
            }
        }

        let mut ordered = tasks;
        ordered.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.id.cmp(&b.id)));
        let backlog: Vec<TaskId> = ordered.iter().map(|t| t.id.clone()).collect();

        let mut column_orders: HashMap<ColumnId, Vec<TaskId>> = board
            .columns
            .iter()
            .map(|c| (c.id.clone(), Vec::new()))
            .collect();
        for task in &ordered {
            if let Some(column) = mapping::column_for_status(&board, task.status) {
                if let Some(order) = column_orders.get_mut(&column.id) {
                    order.push(task.id.clone());
                }
            }
        }

        Ok(Self {
            board,
            tasks: map,
            column_orders,
            backlog,
            epochs: HashMap::new(),
        })
    }

    /// Look up a task
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Mutable task lookup (engine use)
    pub(crate) fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    /// All tasks, unordered
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Number of tasks in the context
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// The ordering of a container, when the container exists
    pub fn container_order(&self, container: &ContainerId) -> Option<&[TaskId]> {
        match container {
            ContainerId::Backlog => Some(&self.backlog),
            ContainerId::Column(id) => self.column_orders.get(id).map(Vec::as_slice),
        }
    }

    /// Replace the ordering of a container. The container must exist.
    pub(crate) fn set_container_order(&mut self, container: &ContainerId, order: Vec<TaskId>) {
        match container {
            ContainerId::Backlog => self.backlog = order,
            ContainerId::Column(id) => {
                if let Some(existing) = self.column_orders.get_mut(id) {
                    *existing = order;
                }
            }
        }
    }

    /// Replace the board's columns (column reorder / refresh), keeping the
    /// task order of every surviving column and dropping removed ones.
    pub(crate) fn set_columns(&mut self, columns: Vec<Column>) {
        let mut orders = HashMap::with_capacity(columns.len());
        for column in &columns {
            let order = self.column_orders.remove(&column.id).unwrap_or_default();
            orders.insert(column.id.clone(), order);
        }
        self.column_orders = orders;
        self.board.columns = columns;
    }

    /// Refresh epoch for a scope (0 until first refresh)
    pub(crate) fn epoch(&self, scope: &Scope) -> u64 {
        self.epochs.get(scope).copied().unwrap_or(0)
    }

    /// Bump the refresh epoch for a scope, invalidating pending snapshots
    pub(crate) fn bump_epoch(&mut self, scope: Scope) {
        *self.epochs.entry(scope).or_insert(0) += 1;
    }

    /// Insert or replace tasks in the canonical set (authoritative refresh)
    pub(crate) fn upsert_tasks(&mut self, tasks: Vec<Task>) {
        for task in tasks {
            self.tasks.insert(task.id.clone(), task);
        }
    }

    /// Tasks placed on the board, traversed column by column in position
    /// order — the input order for swimlane grouping.
    pub fn board_tasks(&self) -> Vec<&Task> {
        let mut out = Vec::new();
        for column in self.board.columns_in_order() {
            if let Some(order) = self.column_orders.get(&column.id) {
                for id in order {
                    if let Some(task) = self.tasks.get(id) {
                        out.push(task);
                    }
                }
            }
        }
        out
    }

    /// Tasks in backlog order
    pub fn backlog_tasks(&self) -> Vec<&Task> {
        self.backlog
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .collect()
    }
}
