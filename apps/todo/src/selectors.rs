//! Derived views of the to-do state.

use crate::types::{FilterMode, StatsSnapshot, TodoItem, TodoList, TodoState};
use recall_core::{selector::Revisions, smallvec, Selector};

/// Items visible under `mode`, in list order
#[must_use]
pub fn filter_todos(list: &[TodoItem], mode: FilterMode) -> TodoList {
    match mode {
        FilterMode::Done => list.iter().filter(|item| item.is_completed).cloned().collect(),
        FilterMode::NotDone => list.iter().filter(|item| !item.is_completed).cloned().collect(),
        FilterMode::All => list.to_vec(),
    }
}

/// Aggregate counts of `list`
#[must_use]
#[allow(clippy::cast_precision_loss)] // Lists never get near 2^52 items
pub fn compute_stats(list: &[TodoItem]) -> StatsSnapshot {
    let total = list.len();
    let not_todo = list.iter().filter(|item| item.is_completed).count();
    let completed_percentage = if total == 0 {
        0.0
    } else {
        not_todo as f64 / total as f64
    };

    StatsSnapshot {
        total,
        to_do: total - not_todo,
        not_todo,
        completed_percentage,
    }
}

/// The list narrowed by the selected filter
#[derive(Clone, Copy, Debug, Default)]
pub struct FilteredTodos;

impl Selector<TodoState> for FilteredTodos {
    type Output = TodoList;

    fn key(&self) -> &'static str {
        "filteredTodoList"
    }

    fn dependencies(&self, state: &TodoState) -> Revisions {
        smallvec![state.todos.revision(), state.filter.revision()]
    }

    fn select(&self, state: &TodoState) -> TodoList {
        filter_todos(state.todos.get(), *state.filter.get())
    }
}

/// Completion statistics; independent of the filter
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoStats;

impl Selector<TodoState> for TodoStats {
    type Output = StatsSnapshot;

    fn key(&self) -> &'static str {
        "todoListStats"
    }

    fn dependencies(&self, state: &TodoState) -> Revisions {
        smallvec![state.todos.revision()]
    }

    fn select(&self, state: &TodoState) -> StatsSnapshot {
        compute_stats(state.todos.get())
    }
}
