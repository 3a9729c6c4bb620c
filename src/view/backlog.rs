//! Backlog view model: a filterable, rank-ordered list.
//!
//! Filters are presentation-only. A drag lands on a *visible* index; the
//! translation to a canonical index anchors on the nearest visible neighbor,
//! so hidden tasks keep their relative positions untouched.

use super::{feedback, DragFeedback};
use crate::engine::ReorderEngine;
use crate::types::{ActorId, ContainerId, EpicId, MoveIntent, Task, TaskId};
use std::sync::{Arc, Mutex};

/// Presentation filter over the backlog. All set criteria must match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BacklogFilter {
    pub epic: Option<EpicId>,
    pub assignee: Option<ActorId>,
    /// Case-insensitive substring over key, title and description
    pub search: Option<String>,
}

impl BacklogFilter {
    /// True when the task passes every set criterion
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(epic) = &self.epic {
            if task.epic.as_ref() != Some(epic) {
                return false;
            }
        }
        if let Some(assignee) = &self.assignee {
            if task.assignee.as_ref().map(|a| &a.id) != Some(assignee) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = task.key.to_lowercase().contains(&needle)
                || task.title.to_lowercase().contains(&needle)
                || task
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Memoized, filterable projection of the backlog
pub struct BacklogViewModel {
    engine: ReorderEngine,
    filter: Mutex<BacklogFilter>,
    cache: Mutex<Option<(u64, BacklogFilter, Arc<Vec<Task>>)>>,
}

impl BacklogViewModel {
    /// Wrap an engine with no filter set
    pub fn new(engine: ReorderEngine) -> Self {
        Self {
            engine,
            filter: Mutex::new(BacklogFilter::default()),
            cache: Mutex::new(None),
        }
    }

    /// The underlying engine
    pub fn engine(&self) -> &ReorderEngine {
        &self.engine
    }

    /// The active filter
    pub fn filter(&self) -> BacklogFilter {
        self.filter.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Replace the active filter
    pub fn set_filter(&self, filter: BacklogFilter) {
        *self.filter.lock().unwrap_or_else(|e| e.into_inner()) = filter;
    }

    /// The visible backlog: canonical order with the filter applied
    pub fn visible(&self) -> Arc<Vec<Task>> {
        let version = self.engine.state_version();
        let filter = self.filter();
        {
            let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some((cached_version, cached_filter, tasks)) = cache.as_ref() {
                if *cached_version == version && *cached_filter == filter {
                    return Arc::clone(tasks);
                }
            }
        }
        let tasks = Arc::new(self.engine.with_state(|state| {
            state
                .backlog_tasks()
                .into_iter()
                .filter(|t| filter.matches(t))
                .cloned()
                .collect::<Vec<Task>>()
        }));
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        *cache = Some((version, filter, Arc::clone(&tasks)));
        tasks
    }

    /// A drag that dropped `item` at `visible_index` within the filtered
    /// list. Stale gestures (hidden item, out-of-range index) are ignored.
    pub async fn handle_drag(&self, item: TaskId, visible_index: usize) -> DragFeedback {
        let filter = self.filter();
        let destination = self.engine.with_state(|state| {
            let canonical: Vec<TaskId> = state
                .container_order(&ContainerId::Backlog)
                .map(<[TaskId]>::to_vec)
                .unwrap_or_default();
            let visible: Vec<TaskId> = state
                .backlog_tasks()
                .into_iter()
                .filter(|t| filter.matches(t))
                .map(|t| t.id.clone())
                .collect();
            canonical_destination(&canonical, &visible, &item, visible_index)
        });

        let Some(destination_index) = destination else {
            tracing::debug!("backlog drag of {item} ignored: stale visible index");
            return DragFeedback::Ignored;
        };
        let intent = MoveIntent::task_move(
            item,
            ContainerId::Backlog,
            ContainerId::Backlog,
            destination_index,
        );
        feedback(self.engine.apply_move(intent).await)
    }
}

/// Translate a visible drop index into a canonical one.
///
/// The moved item lands immediately before the visible task that follows it
/// in the filtered list; dropped past the last visible task, it lands right
/// after that task. With no other visible task the canonical position is
/// unchanged.
fn canonical_destination(
    canonical: &[TaskId],
    visible: &[TaskId],
    item: &TaskId,
    visible_index: usize,
) -> Option<usize> {
    if !visible.contains(item) {
        return None;
    }
    let visible_rest: Vec<&TaskId> = visible.iter().filter(|id| *id != item).collect();
    if visible_index > visible_rest.len() {
        return None;
    }
    let canonical_rest: Vec<&TaskId> = canonical.iter().filter(|id| *id != item).collect();

    if visible_rest.is_empty() {
        return canonical.iter().position(|id| id == item);
    }
    if visible_index == visible_rest.len() {
        let last = visible_rest[visible_rest.len() - 1];
        return canonical_rest.iter().position(|id| *id == last).map(|i| i + 1);
    }
    let anchor = visible_rest[visible_index];
    canonical_rest.iter().position(|id| *id == anchor)
}
