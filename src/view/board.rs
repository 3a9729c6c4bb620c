//! Board view model: columns with WIP badges, optional swimlanes.

use super::{feedback, DragFeedback};
use crate::engine::ReorderEngine;
use crate::state::BoardState;
use crate::swimlane;
use crate::types::{Column, ContainerId, MoveIntent, Task};
use crate::wip::{self, WipEvaluation};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// One rendered column: its config, its tasks in order, and its WIP badge
#[derive(Debug, Clone)]
pub struct ColumnView {
    pub column: Column,
    pub tasks: Vec<Task>,
    pub wip: WipEvaluation,
}

/// One rendered swimlane
#[derive(Debug, Clone)]
pub struct LaneView {
    pub label: String,
    pub tasks: Vec<Task>,
}

/// The full derived board projection
#[derive(Debug, Clone)]
pub struct BoardView {
    /// Columns left to right
    pub columns: Vec<ColumnView>,
    /// Lanes in display order; a single "All Tasks" lane when swimlanes are
    /// off
    pub lanes: Vec<LaneView>,
}

/// Memoized projection of one board.
///
/// `view()` recomputes only when the engine's state version moved, so a
/// render loop can call it every frame.
pub struct BoardViewModel {
    engine: ReorderEngine,
    cache: Mutex<Option<(u64, Arc<BoardView>)>>,
}

impl BoardViewModel {
    /// Wrap an engine
    pub fn new(engine: ReorderEngine) -> Self {
        Self {
            engine,
            cache: Mutex::new(None),
        }
    }

    /// The underlying engine
    pub fn engine(&self) -> &ReorderEngine {
        &self.engine
    }

    /// The current board projection, recomputed only after a state change
    pub fn view(&self) -> Arc<BoardView> {
        let version = self.engine.state_version();
        {
            let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some((cached_version, view)) = cache.as_ref() {
                if *cached_version == version {
                    return Arc::clone(view);
                }
            }
        }
        let view = Arc::new(self.engine.with_state(render));
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        *cache = Some((version, Arc::clone(&view)));
        view
    }

    /// Route a raw drag payload through the engine
    pub async fn handle_drag(&self, payload: Value) -> DragFeedback {
        let intent = match MoveIntent::from_payload(payload) {
            Ok(intent) => intent,
            Err(err) => {
                tracing::debug!("drag payload rejected: {err}");
                return DragFeedback::Ignored;
            }
        };
        feedback(self.engine.apply_move(intent).await)
    }

    /// Apply an authoritative refresh of one container
    pub fn apply_remote_refresh(&self, container: &ContainerId, tasks: Vec<Task>) {
        self.engine.refresh_container(container, tasks);
    }

    /// Apply an authoritative refresh of the column list
    pub fn apply_column_refresh(&self, columns: Vec<Column>) {
        self.engine.refresh_columns(columns);
    }
}

fn render(state: &BoardState) -> BoardView {
    let columns = state
        .board
        .columns_in_order()
        .into_iter()
        .map(|column| {
            let tasks: Vec<Task> = state
                .container_order(&ContainerId::Column(column.id.clone()))
                .unwrap_or_default()
                .iter()
                .filter_map(|id| state.task(id))
                .cloned()
                .collect();
            ColumnView {
                wip: wip::evaluate(column, tasks.len()),
                column: column.clone(),
                tasks,
            }
        })
        .collect();

    let board_tasks = state.board_tasks();
    let lanes = swimlane::group(board_tasks, state.board.swimlane_mode)
        .into_iter()
        .map(|(lane, tasks)| LaneView {
            label: lane.label().into_owned(),
            tasks: tasks.into_iter().cloned().collect(),
        })
        .collect();

    BoardView { columns, lanes }
}
