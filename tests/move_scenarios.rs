//! End-to-end move scenarios: optimistic apply, confirmation, rollback.

use boardflow::engine::{MoveOutcome, ReorderEngine};
use boardflow::remote::testing::{RemoteCall, Script, ScriptedRemote};
use boardflow::state::BoardState;
use boardflow::types::{
    Board, Column, ContainerId, MoveIntent, Rank, Task, TaskId, TaskStatus,
};
use boardflow::wip::{self, WipStatus};
use boardflow::EngineError;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;

fn board() -> Board {
    Board::new(
        "b1",
        "Delivery",
        vec![
            Column::new("todo", "To Do", 0, TaskStatus::Todo),
            Column::new("doing", "Doing", 1, TaskStatus::InProgress).with_wip_limit(1),
            Column::new("done", "Done", 2, TaskStatus::Done),
        ],
    )
}

fn tasks() -> Vec<Task> {
    let r1 = Rank::first();
    let r2 = Rank::after(&r1);
    let r3 = Rank::after(&r2);
    let r4 = Rank::after(&r3);
    vec![
        Task::new("t1", "PROJ-1", "Login fix").with_rank(r1),
        Task::new("t2", "PROJ-2", "Search index").with_rank(r2),
        Task::new("t3", "PROJ-3", "Billing export")
            .with_rank(r3)
            .with_status(TaskStatus::InProgress),
        Task::new("t4", "PROJ-4", "Release notes")
            .with_rank(r4)
            .with_status(TaskStatus::Done),
    ]
}

fn engine(remote: Arc<ScriptedRemote>) -> ReorderEngine {
    ReorderEngine::new(BoardState::new(board(), tasks()).unwrap(), remote)
}

fn order_of(engine: &ReorderEngine, container: &ContainerId) -> Vec<String> {
    engine.with_state(|s| {
        s.container_order(container)
            .unwrap()
            .iter()
            .map(|id| id.to_string())
            .collect()
    })
}

fn status_of(engine: &ReorderEngine, id: &str) -> TaskStatus {
    engine.with_state(|s| s.task(&TaskId::from(id)).unwrap().status)
}

#[tokio::test]
async fn test_cross_column_move_updates_status_and_confirms() {
    let remote = Arc::new(ScriptedRemote::confirming());
    let engine = engine(remote.clone());

    let outcome = assert_ok!(
        engine
            .apply_move(MoveIntent::task_move("t1", "todo", "doing", 0))
            .await
    );
    assert_eq!(outcome, MoveOutcome::Committed);

    assert_eq!(order_of(&engine, &"todo".into()), ["t2"]);
    assert_eq!(order_of(&engine, &"doing".into()), ["t1", "t3"]);
    assert_eq!(status_of(&engine, "t1"), TaskStatus::InProgress);

    match &remote.calls()[0] {
        RemoteCall::MoveTask {
            task,
            target,
            destination_order,
        } => {
            assert_eq!(task.as_str(), "t1");
            assert_eq!(*target, ContainerId::from("doing"));
            let order: Vec<&str> = destination_order.iter().map(|id| id.as_str()).collect();
            assert_eq!(order, ["t1", "t3"]);
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_move_restores_exact_pre_move_state() {
    let remote = Arc::new(ScriptedRemote::confirming());
    remote.push_script(Script::Reject("column is frozen".into()));
    let engine = engine(remote.clone());

    let before_rank = engine.with_state(|s| s.task(&"t1".into()).unwrap().rank.clone());
    let err = engine
        .apply_move(MoveIntent::task_move("t1", "todo", "done", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::RemoteRejected { .. }));

    assert_eq!(order_of(&engine, &"todo".into()), ["t1", "t2"]);
    assert_eq!(order_of(&engine, &"done".into()), ["t4"]);
    assert_eq!(status_of(&engine, "t1"), TaskStatus::Todo);
    let after_rank = engine.with_state(|s| s.task(&"t1".into()).unwrap().rank.clone());
    assert_eq!(before_rank, after_rank);
    // The rejected confirmation was still a single real call.
    assert_eq!(remote.calls().len(), 1);
}

#[tokio::test]
async fn test_network_failure_rolls_back() {
    let remote = Arc::new(ScriptedRemote::confirming());
    remote.push_script(Script::Fail("connection reset".into()));
    let engine = engine(remote.clone());

    let err = engine
        .apply_move(MoveIntent::task_move(
            "t2",
            ContainerId::Backlog,
            ContainerId::Backlog,
            0,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Network { .. }));
    assert_eq!(
        order_of(&engine, &ContainerId::Backlog),
        ["t1", "t2", "t3", "t4"]
    );
}

#[tokio::test]
async fn test_server_resort_becomes_local_order() {
    let remote = Arc::new(ScriptedRemote::confirming());
    remote.push_script(Script::ConfirmWith(
        ["t2", "t4", "t1", "t3"].iter().map(|id| TaskId::from(*id)).collect(),
    ));
    let engine = engine(remote.clone());

    // Optimistic guess is [t2, t1, t3, t4]; the server re-sorts and wins.
    engine
        .apply_move(MoveIntent::task_move(
            "t2",
            ContainerId::Backlog,
            ContainerId::Backlog,
            0,
        ))
        .await
        .unwrap();
    assert_eq!(
        order_of(&engine, &ContainerId::Backlog),
        ["t2", "t4", "t1", "t3"]
    );
}

#[tokio::test]
async fn test_server_status_override_is_adopted() {
    let remote = Arc::new(ScriptedRemote::confirming());
    remote.push_script(Script::OverrideStatus(TaskStatus::Blocked));
    let engine = engine(remote.clone());

    engine
        .apply_move(MoveIntent::task_move("t1", "todo", "doing", 0))
        .await
        .unwrap();

    // The client guessed IN_PROGRESS from the column; the server said
    // otherwise.
    assert_eq!(status_of(&engine, "t1"), TaskStatus::Blocked);
    assert_eq!(order_of(&engine, &"doing".into()), ["t1", "t3"]);
}

#[tokio::test]
async fn test_wip_limit_is_advisory_only() {
    let remote = Arc::new(ScriptedRemote::confirming());
    let engine = engine(remote.clone());

    // Doing is already at its limit of 1.
    let (column, count) = engine.with_state(|s| {
        let column = s.board.find_column(&"doing".into()).unwrap().clone();
        let count = s.container_order(&"doing".into()).unwrap().len();
        (column, count)
    });
    assert_eq!(wip::evaluate(&column, count).status, WipStatus::AtOrOver);

    // The drop is still accepted and confirmed.
    let outcome = engine
        .apply_move(MoveIntent::task_move("t1", "todo", "doing", 1))
        .await
        .unwrap();
    assert_eq!(outcome, MoveOutcome::Committed);
    assert_eq!(order_of(&engine, &"doing".into()), ["t3", "t1"]);
}

#[tokio::test]
async fn test_moves_on_distinct_containers_run_concurrently() {
    let remote = Arc::new(ScriptedRemote::confirming());
    remote.push_script(Script::Stall(Duration::from_millis(30)));
    remote.push_script(Script::Stall(Duration::from_millis(30)));
    let engine = engine(remote.clone());

    let a = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .apply_move(MoveIntent::task_move("t2", "todo", "todo", 0))
                .await
        })
    };
    let b = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .apply_move(MoveIntent::task_move(
                    "t4",
                    ContainerId::Backlog,
                    ContainerId::Backlog,
                    0,
                ))
                .await
        })
    };

    assert_eq!(a.await.unwrap().unwrap(), MoveOutcome::Committed);
    assert_eq!(b.await.unwrap().unwrap(), MoveOutcome::Committed);
    assert_eq!(remote.calls().len(), 2);
    assert_eq!(order_of(&engine, &"todo".into()), ["t2", "t1"]);
    assert_eq!(
        order_of(&engine, &ContainerId::Backlog),
        ["t4", "t1", "t2", "t3"]
    );
}

#[tokio::test]
async fn test_column_refresh_aborts_pending_column_move() {
    let remote = Arc::new(ScriptedRemote::confirming());
    remote.push_script(Script::Stall(Duration::from_millis(50)));
    let engine = engine(remote.clone());

    let pending = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.apply_move(MoveIntent::column_move("done", 0)).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    // An authoritative column refresh lands while the reorder is pending.
    engine.refresh_columns(vec![
        Column::new("todo", "To Do", 0, TaskStatus::Todo),
        Column::new("doing", "Doing", 1, TaskStatus::InProgress).with_wip_limit(1),
    ]);

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, EngineError::ConflictingPush { .. }));

    // The refreshed column list stands.
    engine.with_state(|s| {
        let ids: Vec<&str> = s
            .board
            .columns_in_order()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, ["todo", "doing"]);
    });
}
