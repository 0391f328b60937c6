//! End-to-end flows through the store and its derived views.

#![allow(clippy::unwrap_used)] // Tests can use unwrap

use async_trait::async_trait;
use recall_core::Selector;
use recall_runtime::StoreError;
use recall_testing::Recorder;
use recall_todo::shell::Command;
use recall_todo::{
    FilterMode, FilteredTodos, StatsSnapshot, TodoAction, TodoApp, TodoEnvironment, TodoId,
    TodoItem, TodoState, TodoStats, UserDirectory, UserFetchError,
};
use std::sync::Arc;

struct OfflineDirectory;

#[async_trait]
impl UserDirectory for OfflineDirectory {
    async fn fetch_user_name(&self, _id: u64) -> Result<String, UserFetchError> {
        Err(UserFetchError::RequestFailed("offline".to_string()))
    }
}

fn test_app() -> TodoApp {
    TodoApp::new(TodoEnvironment::new(Arc::new(OfflineDirectory), 1))
}

async fn run(app: &TodoApp, line: &str) -> Result<(), StoreError> {
    let command = Command::parse(line).unwrap().unwrap();
    app.send_all(command.actions()).await.map(|_| ())
}

#[tokio::test]
async fn add_two_toggle_one() -> Result<(), StoreError> {
    let app = test_app();

    run(&app, "add buy milk").await?;
    assert_eq!(app.filtered().await, vec![TodoItem::new(TodoId::new(0), "buy milk")]);

    run(&app, "add walk dog").await?;
    run(&app, "toggle 0").await?;

    let items = app.filtered().await;
    assert_eq!(items[1].id, TodoId::new(1));
    assert!(items[0].is_completed);

    assert_eq!(
        app.stats().await,
        StatsSnapshot {
            total: 2,
            to_do: 1,
            not_todo: 1,
            completed_percentage: 0.5,
        }
    );
    assert!(app.render().await.contains("Efficiency: 50%"));
    Ok(())
}

#[tokio::test]
async fn filters_follow_the_list() -> Result<(), StoreError> {
    let app = test_app();
    for line in ["add a", "add b", "add c", "toggle 1"] {
        run(&app, line).await?;
    }

    run(&app, "filter done").await?;
    let done: Vec<_> = app.filtered().await.into_iter().map(|item| item.text).collect();
    assert_eq!(done, vec!["b"]);

    run(&app, "filter notDone").await?;
    let open: Vec<_> = app.filtered().await.into_iter().map(|item| item.text).collect();
    assert_eq!(open, vec!["a", "c"]);

    // Unknown modes fall back to showing everything
    run(&app, "filter archived").await?;
    assert_eq!(app.filtered().await.len(), 3);
    assert_eq!(app.store().state(|s| *s.filter.get()).await, FilterMode::All);
    Ok(())
}

#[tokio::test]
async fn filter_changes_do_not_recompute_stats() -> Result<(), StoreError> {
    let app = test_app();
    run(&app, "add a").await?;
    app.stats().await;
    app.filtered().await;

    run(&app, "filter done").await?;
    run(&app, "filter all").await?;
    app.stats().await;
    app.filtered().await;

    assert_eq!(app.stats_view().recomputations(), 1);
    assert_eq!(app.filtered_view().recomputations(), 2);
    Ok(())
}

#[tokio::test]
async fn delete_and_edit_keep_the_tail() -> Result<(), StoreError> {
    let app = test_app();
    for line in ["add a", "add b", "add c", "add d"] {
        run(&app, line).await?;
    }

    run(&app, "delete 1").await?;
    run(&app, "edit 2 see").await?;

    let texts: Vec<_> = app.filtered().await.into_iter().map(|item| item.text).collect();
    assert_eq!(texts, vec!["a", "see", "d"]);
    Ok(())
}

#[tokio::test]
async fn rejected_edit_is_shown() -> Result<(), StoreError> {
    let app = test_app();
    run(&app, "add a").await?;
    run(&app, "toggle 42").await?;

    let screen = app.render().await;
    assert!(screen.ends_with("! Todo with ID 42 not found\n"));
    assert_eq!(app.stats().await.total, 1);
    Ok(())
}

#[tokio::test]
async fn observers_get_initial_value_then_changes() -> Result<(), StoreError> {
    let app = test_app();
    let totals = Recorder::new();

    app.store()
        .observe(TodoStats, totals.sink(|stats: &StatsSnapshot| stats.total))
        .await;

    run(&app, "add a").await?;
    run(&app, "filter done").await?;
    run(&app, "add b").await?;

    assert_eq!(totals.events(), vec![0, 1, 2]);
    Ok(())
}

#[tokio::test]
async fn observers_see_views_consistent_with_the_list() -> Result<(), StoreError> {
    let app = test_app();
    let snapshots = Recorder::new();

    app.store().subscribe(snapshots.sink(|state: &TodoState| {
        let visible = FilteredTodos.select(state);
        let stats = TodoStats.select(state);
        (state.todos.get().clone(), *state.filter.get(), visible, stats)
    }));

    for line in ["add a", "add b", "toggle 0", "filter notDone", "delete 1"] {
        run(&app, line).await?;
    }

    for (list, filter, visible, stats) in snapshots.events() {
        assert_eq!(stats.total, list.len());
        assert_eq!(visible, recall_todo::selectors::filter_todos(&list, filter));
    }
    Ok(())
}

#[tokio::test]
async fn failed_fetch_resolves_to_failure() -> Result<(), StoreError> {
    let app = test_app();

    let mut handles = app.send_all([TodoAction::LoadUserName]).await?;
    handles[0].wait().await;

    let screen = app.render().await;
    assert!(screen.starts_with("User: unavailable (User request failed: offline)"));
    Ok(())
}
