//! The remote authority seam.
//!
//! The server owns the canonical order of every container. The engine applies
//! a move optimistically, then asks the authority to confirm; whatever order
//! the server answers with becomes gospel client state. Any error — and any
//! timeout, enforced by the engine — is a rejection that triggers rollback.

use crate::types::{BoardId, ColumnId, ContainerId, TaskId, TaskStatus};
use async_trait::async_trait;
use thiserror::Error;

/// Errors a remote confirmation can produce
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The authority declined the change (validation failure, conflict,
    /// any non-2xx response)
    #[error("rejected: {message}")]
    Rejected { message: String },

    /// Request-level network failure
    #[error("network: {message}")]
    Network { message: String },
}

/// Result type for remote calls
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Server response to a cross-container task move
#[derive(Debug, Clone)]
pub struct TaskMoved {
    /// Authoritative status, when the server overrides the client's
    /// column-derived one
    pub status: Option<TaskStatus>,
    /// Authoritative destination container order
    pub order: Vec<TaskId>,
}

/// The remote authority confirming every mutation.
///
/// Implementations wrap the REST endpoints of the project-management server;
/// tests use [`testing::ScriptedRemote`].
#[async_trait]
pub trait RemoteAuthority: Send + Sync {
    /// Confirm a reorder within one container. The server may itself
    /// re-sort; the returned order is authoritative.
    async fn reorder(
        &self,
        container: &ContainerId,
        ordered: &[TaskId],
    ) -> RemoteResult<Vec<TaskId>>;

    /// Confirm a cross-container task move, carrying the full resulting
    /// destination order.
    async fn move_task(
        &self,
        task: &TaskId,
        target: &ContainerId,
        destination_order: &[TaskId],
    ) -> RemoteResult<TaskMoved>;

    /// Confirm a column reorder on a board
    async fn reorder_columns(&self, board: &BoardId, ordered: &[ColumnId]) -> RemoteResult<()>;
}

pub mod testing {
    //! A scripted in-memory authority for tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// What the next remote call should do
    #[derive(Debug, Clone)]
    pub enum Script {
        /// Echo the submitted order back (plain acceptance)
        Confirm,
        /// Accept, but answer with a server-side re-sort
        ConfirmWith(Vec<TaskId>),
        /// Accept a cross-container move, overriding the task's status
        OverrideStatus(TaskStatus),
        /// Decline
        Reject(String),
        /// Fail at the network level
        Fail(String),
        /// Sleep before confirming — long enough to trip the engine timeout
        /// when the test wants one
        Stall(Duration),
    }

    /// A record of one call the double received
    #[derive(Debug, Clone, PartialEq)]
    pub enum RemoteCall {
        Reorder {
            container: ContainerId,
            ordered: Vec<TaskId>,
        },
        MoveTask {
            task: TaskId,
            target: ContainerId,
            destination_order: Vec<TaskId>,
        },
        ReorderColumns {
            board: BoardId,
            ordered: Vec<ColumnId>,
        },
    }

    /// Scripted [`RemoteAuthority`] double. Scripts are consumed per call,
    /// FIFO; with the script queue empty every call confirms.
    #[derive(Default)]
    pub struct ScriptedRemote {
        scripts: Mutex<VecDeque<Script>>,
        calls: Mutex<Vec<RemoteCall>>,
    }

    impl ScriptedRemote {
        /// A double that confirms everything
        pub fn confirming() -> Self {
            Self::default()
        }

        /// Queue a script for the next call
        pub fn push_script(&self, script: Script) {
            self.scripts
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push_back(script);
        }

        /// Every call received so far, in order
        pub fn calls(&self) -> Vec<RemoteCall> {
            self.calls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }

        fn record(&self, call: RemoteCall) {
            self.calls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(call);
        }

        fn next_script(&self) -> Script {
            self.scripts
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front()
                .unwrap_or(Script::Confirm)
        }

        async fn resolve_order(&self, submitted: &[TaskId]) -> RemoteResult<Vec<TaskId>> {
            self.resolve_move(submitted).await.map(|moved| moved.order)
        }

        async fn resolve_move(&self, submitted: &[TaskId]) -> RemoteResult<TaskMoved> {
            let moved = |status, order| TaskMoved { status, order };
            match self.next_script() {
                Script::Confirm => Ok(moved(None, submitted.to_vec())),
                Script::ConfirmWith(order) => Ok(moved(None, order)),
                Script::OverrideStatus(status) => Ok(moved(Some(status), submitted.to_vec())),
                Script::Reject(message) => Err(RemoteError::Rejected { message }),
                Script::Fail(message) => Err(RemoteError::Network { message }),
                Script::Stall(duration) => {
                    tokio::time::sleep(duration).await;
                    Ok(moved(None, submitted.to_vec()))
                }
            }
        }
    }

    #[async_trait]
    impl RemoteAuthority for ScriptedRemote {
        async fn reorder(
            &self,
            container: &ContainerId,
            ordered: &[TaskId],
        ) -> RemoteResult<Vec<TaskId>> {
            self.record(RemoteCall::Reorder {
                container: container.clone(),
                ordered: ordered.to_vec(),
            });
            self.resolve_order(ordered).await
        }

        async fn move_task(
            &self,
            task: &TaskId,
            target: &ContainerId,
            destination_order: &[TaskId],
        ) -> RemoteResult<TaskMoved> {
            self.record(RemoteCall::MoveTask {
                task: task.clone(),
                target: target.clone(),
                destination_order: destination_order.to_vec(),
            });
            self.resolve_move(destination_order).await
        }

        async fn reorder_columns(
            &self,
            board: &BoardId,
            ordered: &[ColumnId],
        ) -> RemoteResult<()> {
            self.record(RemoteCall::ReorderColumns {
                board: board.clone(),
                ordered: ordered.to_vec(),
            });
            self.resolve_order(&[]).await.map(|_| ())
        }
    }
}
