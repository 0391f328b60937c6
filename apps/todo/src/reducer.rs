//! Reducer for the to-do application.
//!
//! Every list change goes through one of the [`editor`](crate::editor)
//! operations and replaces the list atom wholesale. A rejected edit leaves
//! the list untouched and is recorded in `last_error`.

use crate::editor::{self, EditorError};
use crate::types::{TodoAction, TodoId, TodoItem, TodoList, TodoState};
use crate::user::UserDirectory;
use recall_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Environment dependencies for the to-do reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Where user names come from
    pub users: Arc<dyn UserDirectory>,
    /// Which user's name to show
    pub user_id: u64,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(users: Arc<dyn UserDirectory>, user_id: u64) -> Self {
        Self { users, user_id }
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Reducer for the to-do application
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Swaps in the edited list, or records why the edit was rejected
    fn apply_edit(state: &mut TodoState, edit: Result<TodoList, EditorError>) {
        match edit {
            Ok(list) => {
                let revision = state.todos.set(list);
                tracing::debug!(atom = state.todos.key(), %revision, "Todo list replaced");
                state.last_error = None;
            },
            Err(error) => {
                tracing::warn!(%error, "Edit rejected");
                state.last_error = Some(error.to_string());
            },
        }
    }

    /// Rewrites the item at `id` with `change`
    fn edit_item<F>(state: &TodoState, id: TodoId, change: F) -> Result<TodoList, EditorError>
    where
        F: FnOnce(&TodoItem) -> TodoItem,
    {
        let item = state.get(id).map(change).ok_or(EditorError::NotFound(id))?;
        editor::update_by_id(id, item, state.todos.get())
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::SetInput { text } => {
                state.input = text;
            },
            TodoAction::AddTodo => {
                let text = std::mem::take(&mut state.input);
                let (list, next_id) = editor::insert(state.todos.get(), state.next_id, text);
                state.next_id = next_id;
                Self::apply_edit(state, Ok(list));
            },
            TodoAction::EditTodo { id, text } => {
                let edit = Self::edit_item(state, id, |item| item.with_text(text));
                Self::apply_edit(state, edit);
            },
            TodoAction::ToggleTodo { id } => {
                let edit = Self::edit_item(state, id, TodoItem::toggled);
                Self::apply_edit(state, edit);
            },
            TodoAction::UpdateTodo { id, item } => {
                let edit = editor::update_by_id(id, item, state.todos.get());
                Self::apply_edit(state, edit);
            },
            TodoAction::DeleteTodo { id } => {
                let edit = editor::delete_by_id(id, state.todos.get());
                Self::apply_edit(state, edit);
            },
            TodoAction::ReplaceTodos { update } => {
                state.todos.replace(update);
            },
            TodoAction::SetFilter { mode } => {
                state.filter.set(mode);
            },
            TodoAction::LoadUserName => {
                if !state.user_name.begin() {
                    tracing::debug!("User name already requested");
                    return SmallVec::new();
                }

                state.user_request += 1;
                let request = state.user_request;
                let users = Arc::clone(&env.users);
                let user_id = env.user_id;
                tracing::debug!(user_id, request, "Fetching user name");
                return smallvec![async_effect! {
                    let result = users.fetch_user_name(user_id).await;
                    Some(TodoAction::UserNameLoaded { request, result })
                }];
            },
            TodoAction::ResetUserName => {
                state.user_name.reset();
            },
            TodoAction::UserNameLoaded { request, result } => {
                if !state.user_name.is_pending() || request != state.user_request {
                    // Reset or superseded while in flight
                    tracing::debug!(
                        request,
                        current = state.user_request,
                        "Discarding stale user name"
                    );
                    return SmallVec::new();
                }

                match &result {
                    Ok(name) => tracing::info!(name = %name, "User name loaded"),
                    Err(error) => tracing::warn!(%error, "User name lookup failed"),
                }
                state.user_name.resolve(result);
            },
        }

        SmallVec::new()
    }
}
