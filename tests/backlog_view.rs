//! Backlog view model scenarios: filters and visible-index translation.

use boardflow::engine::ReorderEngine;
use boardflow::remote::testing::{RemoteCall, Script, ScriptedRemote};
use boardflow::state::BoardState;
use boardflow::types::{Board, Column, ContainerId, Rank, Task, TaskStatus};
use boardflow::view::{BacklogFilter, BacklogViewModel, DragFeedback};
use std::sync::Arc;

fn board() -> Board {
    Board::new(
        "b1",
        "Delivery",
        vec![Column::new("todo", "To Do", 0, TaskStatus::Todo)],
    )
}

fn tasks() -> Vec<Task> {
    let mut ranks = vec![Rank::first()];
    for _ in 0..4 {
        ranks.push(Rank::after(ranks.last().unwrap()));
    }
    vec![
        Task::new("t1", "PROJ-1", "Login fix")
            .with_rank(ranks[0].clone())
            .with_epic("epic-auth")
            .with_assignee("u1", "ada"),
        Task::new("t2", "PROJ-2", "Search index")
            .with_rank(ranks[1].clone())
            .with_epic("epic-search"),
        Task::new("t3", "PROJ-3", "Password reset")
            .with_rank(ranks[2].clone())
            .with_epic("epic-auth"),
        Task::new("t4", "PROJ-4", "Search facets")
            .with_rank(ranks[3].clone())
            .with_epic("epic-search")
            .with_assignee("u1", "ada"),
        Task::new("t5", "PROJ-5", "Session expiry")
            .with_rank(ranks[4].clone())
            .with_epic("epic-auth")
            .with_description("Sessions never expire on mobile"),
    ]
}

fn view_model(remote: Arc<ScriptedRemote>) -> BacklogViewModel {
    let state = BoardState::new(board(), tasks()).unwrap();
    BacklogViewModel::new(ReorderEngine::new(state, remote))
}

fn visible_ids(vm: &BacklogViewModel) -> Vec<String> {
    vm.visible().iter().map(|t| t.id.to_string()).collect()
}

fn canonical_ids(vm: &BacklogViewModel) -> Vec<String> {
    vm.engine().with_state(|s| {
        s.container_order(&ContainerId::Backlog)
            .unwrap()
            .iter()
            .map(|id| id.to_string())
            .collect()
    })
}

#[tokio::test]
async fn test_epic_filter_projects_in_canonical_order() {
    let vm = view_model(Arc::new(ScriptedRemote::confirming()));
    vm.set_filter(BacklogFilter {
        epic: Some("epic-auth".into()),
        ..Default::default()
    });
    assert_eq!(visible_ids(&vm), ["t1", "t3", "t5"]);
}

#[tokio::test]
async fn test_search_filter_covers_key_title_description() {
    let vm = view_model(Arc::new(ScriptedRemote::confirming()));

    vm.set_filter(BacklogFilter {
        search: Some("proj-2".into()),
        ..Default::default()
    });
    assert_eq!(visible_ids(&vm), ["t2"]);

    vm.set_filter(BacklogFilter {
        search: Some("search".into()),
        ..Default::default()
    });
    assert_eq!(visible_ids(&vm), ["t2", "t4"]);

    vm.set_filter(BacklogFilter {
        search: Some("mobile".into()),
        ..Default::default()
    });
    assert_eq!(visible_ids(&vm), ["t5"]);
}

#[tokio::test]
async fn test_filtered_drag_leaves_hidden_tasks_in_place() {
    let remote = Arc::new(ScriptedRemote::confirming());
    let vm = view_model(remote.clone());
    vm.set_filter(BacklogFilter {
        epic: Some("epic-auth".into()),
        ..Default::default()
    });

    // Visible [t1, t3, t5]; drop t5 at the top of the filtered list.
    let result = vm.handle_drag("t5".into(), 0).await;
    assert_eq!(result, DragFeedback::Completed);

    // t5 lands immediately before t1; hidden t2 and t4 keep their slots
    // relative to their visible neighbors.
    assert_eq!(canonical_ids(&vm), ["t5", "t1", "t2", "t3", "t4"]);
    assert_eq!(visible_ids(&vm), ["t5", "t1", "t3"]);

    // The reorder was submitted over the full canonical backlog.
    match &remote.calls()[0] {
        RemoteCall::Reorder { container, ordered } => {
            assert_eq!(*container, ContainerId::Backlog);
            assert_eq!(ordered.len(), 5);
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn test_drop_past_filtered_end_lands_after_last_visible() {
    let vm = view_model(Arc::new(ScriptedRemote::confirming()));
    vm.set_filter(BacklogFilter {
        epic: Some("epic-auth".into()),
        ..Default::default()
    });

    // Visible [t1, t3, t5]; drag t1 past the end.
    let result = vm.handle_drag("t1".into(), 2).await;
    assert_eq!(result, DragFeedback::Completed);
    assert_eq!(canonical_ids(&vm), ["t2", "t3", "t4", "t5", "t1"]);
    assert_eq!(visible_ids(&vm), ["t3", "t5", "t1"]);
}

#[tokio::test]
async fn test_drag_of_hidden_task_ignored() {
    let remote = Arc::new(ScriptedRemote::confirming());
    let vm = view_model(remote.clone());
    vm.set_filter(BacklogFilter {
        epic: Some("epic-auth".into()),
        ..Default::default()
    });

    let result = vm.handle_drag("t2".into(), 0).await;
    assert_eq!(result, DragFeedback::Ignored);
    assert!(remote.calls().is_empty());
    assert_eq!(canonical_ids(&vm), ["t1", "t2", "t3", "t4", "t5"]);
}

#[tokio::test]
async fn test_stale_visible_index_ignored() {
    let remote = Arc::new(ScriptedRemote::confirming());
    let vm = view_model(remote.clone());
    vm.set_filter(BacklogFilter {
        epic: Some("epic-auth".into()),
        ..Default::default()
    });

    // Only three tasks are visible; index 5 belongs to a stale render.
    let result = vm.handle_drag("t1".into(), 5).await;
    assert_eq!(result, DragFeedback::Ignored);
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn test_failed_drag_restores_filtered_view() {
    let remote = Arc::new(ScriptedRemote::confirming());
    remote.push_script(Script::Reject("backlog locked".into()));
    let vm = view_model(remote.clone());
    vm.set_filter(BacklogFilter {
        epic: Some("epic-auth".into()),
        ..Default::default()
    });

    let result = vm.handle_drag("t5".into(), 0).await;
    assert!(matches!(result, DragFeedback::Failed(_)));
    assert_eq!(visible_ids(&vm), ["t1", "t3", "t5"]);
    assert_eq!(canonical_ids(&vm), ["t1", "t2", "t3", "t4", "t5"]);
}

#[tokio::test]
async fn test_visible_memoized_until_filter_or_state_changes() {
    let vm = view_model(Arc::new(ScriptedRemote::confirming()));
    let first = vm.visible();
    let second = vm.visible();
    assert!(Arc::ptr_eq(&first, &second));

    vm.set_filter(BacklogFilter {
        assignee: Some("u1".into()),
        ..Default::default()
    });
    let filtered = vm.visible();
    assert!(!Arc::ptr_eq(&second, &filtered));
    assert_eq!(visible_ids(&vm), ["t1", "t4"]);

    vm.handle_drag("t4".into(), 0).await;
    let moved = vm.visible();
    assert!(!Arc::ptr_eq(&filtered, &moved));
    assert_eq!(visible_ids(&vm), ["t4", "t1"]);
}
