//! Swimlane grouping — a pure partition of a task set into ordered lanes.
//!
//! Grouping never drops a task: every input task lands in exactly one lane,
//! with reserved catch-all lanes for tasks lacking the grouping dimension.

use crate::types::{EpicId, SwimlaneMode, Task, TaskPriority};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A lane key. Lanes are ordered: named lanes sort per their mode's rule and
/// the catch-all lane always comes last.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lane {
    /// The single lane in `SwimlaneMode::None`
    All,
    /// Keyed by assignee display name
    Assignee(String),
    /// Tasks without an assignee
    Unassigned,
    /// Keyed by priority, severity-descending
    Priority(TaskPriority),
    /// Keyed by epic
    Epic(EpicId),
    /// Tasks without an epic
    NoEpic,
}

impl Lane {
    /// Human-facing lane label
    pub fn label(&self) -> Cow<'_, str> {
        match self {
            Lane::All => Cow::Borrowed("All Tasks"),
            Lane::Assignee(name) => Cow::Borrowed(name.as_str()),
            Lane::Unassigned => Cow::Borrowed("Unassigned"),
            Lane::Priority(p) => Cow::Owned(format!("{p:?}")),
            Lane::Epic(id) => Cow::Borrowed(id.as_str()),
            Lane::NoEpic => Cow::Borrowed("No Epic"),
        }
    }
}

/// Partition `tasks` into ordered lanes for the given mode.
///
/// The relative order of tasks within a lane follows the input order.
pub fn group<'a, I>(tasks: I, mode: SwimlaneMode) -> IndexMap<Lane, Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    match mode {
        SwimlaneMode::None => {
            let mut lanes = IndexMap::new();
            lanes.insert(Lane::All, tasks);
            lanes
        }
        SwimlaneMode::Assignee => {
            let mut named: BTreeMap<String, Vec<&Task>> = BTreeMap::new();
            let mut unassigned: Vec<&Task> = Vec::new();
            for task in tasks {
                match &task.assignee {
                    Some(assignee) => named.entry(assignee.name.clone()).or_default().push(task),
                    None => unassigned.push(task),
                }
            }
            let mut lanes = IndexMap::new();
            for (name, group) in named {
                lanes.insert(Lane::Assignee(name), group);
            }
            if !unassigned.is_empty() {
                lanes.insert(Lane::Unassigned, unassigned);
            }
            lanes
        }
        SwimlaneMode::Priority => {
            let mut lanes = IndexMap::new();
            for priority in TaskPriority::SEVERITY_DESCENDING {
                let group: Vec<&Task> =
                    tasks.iter().copied().filter(|t| t.priority == priority).collect();
                if !group.is_empty() {
                    lanes.insert(Lane::Priority(priority), group);
                }
            }
            lanes
        }
        SwimlaneMode::Epic => {
            let mut by_epic: BTreeMap<EpicId, Vec<&Task>> = BTreeMap::new();
            let mut no_epic: Vec<&Task> = Vec::new();
            for task in tasks {
                match &task.epic {
                    Some(epic) => by_epic.entry(epic.clone()).or_default().push(task),
                    None => no_epic.push(task),
                }
            }
            let mut lanes = IndexMap::new();
            for (epic, group) in by_epic {
                lanes.insert(Lane::Epic(epic), group);
            }
            if !no_epic.is_empty() {
                lanes.insert(Lane::NoEpic, no_epic);
            }
            lanes
        }
    }
}
