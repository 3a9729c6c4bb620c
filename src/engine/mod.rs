//! ReorderEngine — the move orchestrator.
//!
//! Each move runs through one state machine:
//! `IDLE → PENDING_CONFIRMATION → RESOLVED_SUCCESS | RESOLVED_FAILURE`.
//!
//! The optimistic apply is synchronous and atomic from the caller's
//! perspective; the remote confirmation is the single await point. At most
//! one move is pending per container scope — later intents on a busy scope
//! queue FIFO behind it (tokio's mutex hands the lock to waiters in arrival
//! order), while moves on disjoint scopes proceed concurrently. On failure,
//! timeout included, the pre-move snapshot is restored verbatim; if an
//! authoritative refresh landed mid-flight the pending move aborts instead,
//! leaving the refreshed state in place.

mod snapshot;

use crate::error::{EngineError, Result};
use crate::mapping;
use crate::ordering::{OrderError, OrderedCollection};
use crate::remote::{RemoteAuthority, RemoteError};
use crate::state::{BoardState, Scope};
use crate::types::{Column, ColumnId, ContainerId, MoveIntent, Rank, Task, TaskId, TaskStatus};
use snapshot::Snapshot;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Mutex as Gate;

/// Engine tuning knobs
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Budget for one remote confirmation; elapse counts as rejection
    pub confirm_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confirm_timeout: Duration::from_secs(10),
        }
    }
}

/// How a move resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Source, destination and index coincide — resolved locally, zero
    /// remote calls
    NoOp,
    /// Optimistically applied and confirmed; the server's order is now
    /// local state
    Committed,
}

struct EngineInner {
    state: Mutex<BoardState>,
    gates: Mutex<HashMap<Scope, Arc<Gate<()>>>>,
    remote: Arc<dyn RemoteAuthority>,
    config: EngineConfig,
    /// Bumped on every state mutation; lets view models memoize safely
    version: AtomicU64,
}

/// The reordering orchestrator for one board/backlog context.
///
/// Cheap to clone; clones share the same canonical state.
#[derive(Clone)]
pub struct ReorderEngine {
    inner: Arc<EngineInner>,
}

impl ReorderEngine {
    /// Create an engine over canonical state and a remote authority
    pub fn new(state: BoardState, remote: Arc<dyn RemoteAuthority>) -> Self {
        Self::with_config(state, remote, EngineConfig::default())
    }

    /// Create an engine with explicit configuration
    pub fn with_config(
        state: BoardState,
        remote: Arc<dyn RemoteAuthority>,
        config: EngineConfig,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                state: Mutex::new(state),
                gates: Mutex::new(HashMap::new()),
                remote,
                config,
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Monotonic state version; changes whenever canonical state does
    pub fn state_version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Read canonical state under the lock
    pub fn with_state<R>(&self, f: impl FnOnce(&BoardState) -> R) -> R {
        f(&self.lock_state())
    }

    /// True while a move on this container is awaiting confirmation
    pub fn is_pending(&self, container: &ContainerId) -> bool {
        let gate = self
            .lock_gates()
            .get(&Scope::Tasks(container.clone()))
            .cloned();
        match gate {
            Some(gate) => gate.try_lock().is_err(),
            None => false,
        }
    }

    /// Apply one move intent end to end.
    ///
    /// Validation failures (`InvalidMove`, `NotFound`) reject before any
    /// state mutation. Remote failures and timeouts roll the optimistic
    /// apply back and surface as errors; the caller turns them into a
    /// user-visible notice.
    pub async fn apply_move(&self, intent: MoveIntent) -> Result<MoveOutcome> {
        match intent {
            MoveIntent::TaskMove {
                item,
                source,
                destination,
                destination_index,
            } => {
                self.apply_task_move(item, source, destination, destination_index)
                    .await
            }
            MoveIntent::ColumnMove {
                column,
                destination_index,
            } => self.apply_column_move(column, destination_index).await,
        }
    }

    /// Authoritative refresh of one container from the push channel.
    ///
    /// Replaces the container's tasks and order, and invalidates any pending
    /// move whose snapshot predates this refresh.
    pub fn refresh_container(&self, container: &ContainerId, tasks: Vec<Task>) {
        let order: Vec<TaskId> = tasks.iter().map(|t| t.id.clone()).collect();
        {
            let mut state = self.lock_state();
            state.upsert_tasks(tasks);
            state.set_container_order(container, order);
            state.bump_epoch(Scope::Tasks(container.clone()));
        }
        self.bump_version();
        tracing::debug!("container '{container}' replaced by authoritative refresh");
    }

    /// Authoritative update of task fields from the push channel.
    ///
    /// Orderings are untouched, so a pending move stays valid; a reorder
    /// arriving over the push channel goes through
    /// [`refresh_container`](Self::refresh_container) instead.
    pub fn refresh_tasks(&self, tasks: Vec<Task>) {
        {
            let mut state = self.lock_state();
            state.upsert_tasks(tasks);
        }
        self.bump_version();
        tracing::debug!("task fields updated by authoritative refresh");
    }

    /// Authoritative refresh of the board's column list
    pub fn refresh_columns(&self, columns: Vec<Column>) {
        {
            let mut state = self.lock_state();
            state.set_columns(columns);
            state.bump_epoch(Scope::Columns);
        }
        self.bump_version();
        tracing::debug!("column list replaced by authoritative refresh");
    }

    async fn apply_task_move(
        &self,
        item: TaskId,
        source: ContainerId,
        destination: ContainerId,
        destination_index: usize,
    ) -> Result<MoveOutcome> {
        // Backlog and board are separate drag contexts; a mixed pair can
        // only be a malformed payload.
        if mixed_kinds(&source, &destination) {
            return rejected(EngineError::invalid_move(
                "cannot move between the backlog and a board column in one gesture",
            ));
        }

        let mut scopes = vec![Scope::Tasks(source.clone())];
        if destination != source {
            scopes.push(Scope::Tasks(destination.clone()));
            scopes.sort();
        }
        let _guards = self.acquire(&scopes).await;

        // Validate, snapshot, optimistic apply. Synchronous: the caller
        // observes either the full pre-move or the full post-move state.
        let same_container = source == destination;
        let (snapshot, submitted, optimistic) = {
            let mut state = self.lock_state();

            let source_order = match state.container_order(&source) {
                Some(order) => order.to_vec(),
                None => {
                    return rejected(EngineError::invalid_move(format!(
                        "unknown source container '{source}'"
                    )))
                }
            };
            let dest_order = match state.container_order(&destination) {
                Some(order) => order.to_vec(),
                None => {
                    return rejected(EngineError::invalid_move(format!(
                        "unknown destination container '{destination}'"
                    )))
                }
            };
            if state.task(&item).is_none() {
                return rejected(EngineError::not_found("task", item.to_string()));
            }
            let current = match source_order.iter().position(|id| id == &item) {
                Some(index) => index,
                None => {
                    return rejected(EngineError::not_found(
                        "task",
                        format!("{item} in container '{source}'"),
                    ))
                }
            };

            if same_container {
                if destination_index >= source_order.len() {
                    return rejected(EngineError::invalid_move(format!(
                        "index {destination_index} out of range for container '{destination}' of length {}",
                        source_order.len()
                    )));
                }
                if destination_index == current {
                    tracing::debug!("self-move of task {item} resolved as no-op");
                    return Ok(MoveOutcome::NoOp);
                }
            } else if destination_index > dest_order.len() {
                return rejected(EngineError::invalid_move(format!(
                    "index {destination_index} out of range for container '{destination}' of length {}",
                    dest_order.len()
                )));
            }

            // Dropping into a column implies that column's status, visible
            // immediately, before the server confirms.
            let new_status: Option<TaskStatus> = match (&destination, same_container) {
                (ContainerId::Column(dest_col), false) => {
                    let column = state
                        .board
                        .find_column(dest_col)
                        .ok_or_else(|| EngineError::not_found("column", dest_col.to_string()))?;
                    Some(mapping::status_for_column(column))
                }
                _ => None,
            };

            let snapshot = Snapshot::for_task_move(&state, &item, &source, &destination);

            let submitted = if same_container {
                let next = OrderedCollection::new(source_order)
                    .move_item(&item, destination_index)
                    .map_err(|e| order_error(e, &item))?;
                let order = next.into_vec();
                state.set_container_order(&source, order.clone());
                order
            } else {
                let next_source = OrderedCollection::new(source_order)
                    .remove_item(&item)
                    .map_err(|e| order_error(e, &item))?;
                let next_dest = OrderedCollection::new(dest_order)
                    .insert_item(item.clone(), destination_index)
                    .map_err(|e| order_error(e, &item))?;
                state.set_container_order(&source, next_source.into_vec());
                let order = next_dest.into_vec();
                state.set_container_order(&destination, order.clone());
                order
            };

            if let Some(status) = new_status {
                if let Some(task) = state.task_mut(&item) {
                    task.status = status;
                }
            }
            if destination == ContainerId::Backlog {
                let rank = rank_for_position(&state, &submitted, destination_index);
                if let Some(task) = state.task_mut(&item) {
                    task.rank = rank;
                }
            }

            let optimistic = state.task(&item).cloned();
            (snapshot, submitted, optimistic)
        };
        self.bump_version();

        // The single await point: one confirmation call, under a timeout.
        let timeout = self.inner.config.confirm_timeout;
        let confirmation: Result<(Option<TaskStatus>, Vec<TaskId>)> = if same_container {
            let call = self.inner.remote.reorder(&destination, &submitted);
            match tokio::time::timeout(timeout, call).await {
                Err(_) => Err(timeout_error(timeout)),
                Ok(Err(err)) => Err(err.into()),
                Ok(Ok(order)) => Ok((None, order)),
            }
        } else {
            let call = self.inner.remote.move_task(&item, &destination, &submitted);
            match tokio::time::timeout(timeout, call).await {
                Err(_) => Err(timeout_error(timeout)),
                Ok(Err(err)) => Err(err.into()),
                Ok(Ok(moved)) => Ok((moved.status, moved.order)),
            }
        };

        // Resolution.
        let mut state = self.lock_state();
        if !snapshot.epochs_current(&state) {
            // Keep the refreshed container(s), roll the untouched ones back
            // so the task lands in at most one place.
            snapshot.restore_unrefreshed(&mut state, optimistic.as_ref().map(|t| (&item, t)));
            drop(state);
            self.bump_version();
            tracing::warn!(
                "move of task {item} aborted: container '{destination}' was refreshed mid-flight"
            );
            return Err(EngineError::ConflictingPush {
                container: destination.to_string(),
            });
        }
        match confirmation {
            Ok((status, server_order)) => {
                // The server is authoritative over final positions, even
                // when it re-sorted relative to the optimistic guess.
                state.set_container_order(&destination, server_order);
                if let Some(status) = status {
                    if let Some(task) = state.task_mut(&item) {
                        task.status = status;
                    }
                }
                drop(state);
                self.bump_version();
                tracing::debug!("move of task {item} to '{destination}' confirmed");
                Ok(MoveOutcome::Committed)
            }
            Err(err) => {
                snapshot.restore(&mut state);
                drop(state);
                self.bump_version();
                tracing::warn!("move of task {item} rolled back: {err}");
                Err(err)
            }
        }
    }

    async fn apply_column_move(
        &self,
        column: ColumnId,
        destination_index: usize,
    ) -> Result<MoveOutcome> {
        let _guard = self.acquire(&[Scope::Columns]).await;

        let (snapshot, ordered_ids, board_id) = {
            let mut state = self.lock_state();

            let ids: Vec<ColumnId> = state
                .board
                .columns_in_order()
                .iter()
                .map(|c| c.id.clone())
                .collect();
            let current = match ids.iter().position(|id| id == &column) {
                Some(index) => index,
                None => return rejected(EngineError::not_found("column", column.to_string())),
            };
            if destination_index >= ids.len() {
                return rejected(EngineError::invalid_move(format!(
                    "index {destination_index} out of range for {} columns",
                    ids.len()
                )));
            }
            if destination_index == current {
                tracing::debug!("self-move of column {column} resolved as no-op");
                return Ok(MoveOutcome::NoOp);
            }

            let snapshot = Snapshot::for_column_move(&state);
            let next = OrderedCollection::new(ids)
                .move_item(&column, destination_index)
                .map_err(|e| EngineError::invalid_move(e.to_string()))?;
            let ordered_ids = next.into_vec();

            let mut by_id: HashMap<ColumnId, Column> = state
                .board
                .columns
                .iter()
                .cloned()
                .map(|c| (c.id.clone(), c))
                .collect();
            let mut reordered = Vec::with_capacity(ordered_ids.len());
            for (position, id) in ordered_ids.iter().enumerate() {
                if let Some(mut col) = by_id.remove(id) {
                    col.position = position;
                    reordered.push(col);
                }
            }
            state.set_columns(reordered);

            let board_id = state.board.id.clone();
            (snapshot, ordered_ids, board_id)
        };
        self.bump_version();

        let timeout = self.inner.config.confirm_timeout;
        let call = self.inner.remote.reorder_columns(&board_id, &ordered_ids);
        let confirmation: Result<()> = match tokio::time::timeout(timeout, call).await {
            Err(_) => Err(timeout_error(timeout)),
            Ok(Err(err)) => Err(err.into()),
            Ok(Ok(())) => Ok(()),
        };

        let mut state = self.lock_state();
        if !snapshot.epochs_current(&state) {
            // The only captured scope is the refreshed one, so this keeps
            // the refreshed column list and restores nothing.
            snapshot.restore_unrefreshed(&mut state, None);
            drop(state);
            self.bump_version();
            tracing::warn!("move of column {column} aborted: column list refreshed mid-flight");
            return Err(EngineError::ConflictingPush {
                container: "columns".to_string(),
            });
        }
        match confirmation {
            Ok(()) => {
                drop(state);
                tracing::debug!("column {column} reorder confirmed");
                Ok(MoveOutcome::Committed)
            }
            Err(err) => {
                snapshot.restore(&mut state);
                drop(state);
                self.bump_version();
                tracing::warn!("move of column {column} rolled back: {err}");
                Err(err)
            }
        }
    }

    /// Acquire the per-scope gates, sorted order, one at a time. Tokio's
    /// mutex is fair, so waiters on a busy scope form the FIFO queue the
    /// serialization contract requires.
    async fn acquire(&self, scopes: &[Scope]) -> Vec<tokio::sync::OwnedMutexGuard<()>> {
        let gates: Vec<Arc<Gate<()>>> = {
            let mut map = self.lock_gates();
            scopes
                .iter()
                .map(|scope| {
                    map.entry(scope.clone())
                        .or_insert_with(|| Arc::new(Gate::new(())))
                        .clone()
                })
                .collect()
        };
        let mut guards = Vec::with_capacity(gates.len());
        for gate in gates {
            guards.push(gate.lock_owned().await);
        }
        guards
    }

    fn lock_state(&self) -> MutexGuard<'_, BoardState> {
        // Recover the guard if a holder panicked; the state itself is
        // value-consistent at every lock release.
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_gates(&self) -> MutexGuard<'_, HashMap<Scope, Arc<Gate<()>>>> {
        self.inner.gates.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn bump_version(&self) {
        self.inner.version.fetch_add(1, Ordering::Release);
    }
}

/// A backlog rank between the moved task's new neighbors
fn rank_for_position(state: &BoardState, order: &[TaskId], index: usize) -> Rank {
    let prev = index
        .checked_sub(1)
        .and_then(|i| order.get(i))
        .and_then(|id| state.task(id))
        .map(|t| t.rank.clone());
    let next = order
        .get(index + 1)
        .and_then(|id| state.task(id))
        .map(|t| t.rank.clone());
    match (prev, next) {
        (Some(p), Some(n)) if p < n => Rank::between(&p, &n),
        (Some(p), _) => Rank::after(&p),
        (None, Some(n)) => Rank::before(&n),
        (None, None) => Rank::first(),
    }
}

fn mixed_kinds(source: &ContainerId, destination: &ContainerId) -> bool {
    matches!(
        (source, destination),
        (ContainerId::Backlog, ContainerId::Column(_))
            | (ContainerId::Column(_), ContainerId::Backlog)
    )
}

fn rejected<T>(err: EngineError) -> Result<T> {
    tracing::debug!("rejected move intent: {err}");
    Err(err)
}

fn order_error(err: OrderError, item: &TaskId) -> EngineError {
    match err {
        OrderError::InvalidIndex { index, len } => {
            EngineError::invalid_move(format!("index {index} out of range for length {len}"))
        }
        OrderError::NotFound => EngineError::not_found("task", item.to_string()),
        OrderError::DuplicateId => EngineError::duplicate_id("task", item.to_string()),
    }
}

fn timeout_error(timeout: Duration) -> EngineError {
    EngineError::Timeout {
        elapsed_ms: timeout.as_millis() as u64,
    }
}

impl From<RemoteError> for EngineError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Rejected { message } => Self::RemoteRejected { message },
            RemoteError::Network { message } => Self::Network { message },
        }
    }
}
