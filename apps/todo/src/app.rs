//! The store wired to its derived views.

use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::selectors::{FilteredTodos, TodoStats};
use crate::shell::Section;
use crate::types::{StatsSnapshot, TodoAction, TodoList, TodoState};
use crate::view::{self, Frame};
use recall_runtime::{Derived, EffectHandle, Store, StoreError};

/// Store type of the application
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// A store plus the two derived views every screen reads
#[derive(Clone)]
pub struct TodoApp {
    store: TodoStore,
    filtered: Derived<TodoState, FilteredTodos>,
    stats: Derived<TodoState, TodoStats>,
}

impl TodoApp {
    /// Creates an app with an empty list
    #[must_use]
    pub fn new(environment: TodoEnvironment) -> Self {
        Self::with_state(TodoState::new(), environment)
    }

    /// Creates an app starting from `state`
    #[must_use]
    pub fn with_state(state: TodoState, environment: TodoEnvironment) -> Self {
        let store = Store::new(state, TodoReducer::new(), environment);
        let filtered = store.derive(FilteredTodos);
        let stats = store.derive(TodoStats);
        Self {
            store,
            filtered,
            stats,
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Sends `actions` in order
    ///
    /// Returns one handle per action so callers can wait for their effects.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once the store is shutting
    /// down; earlier actions of the batch stay applied.
    pub async fn send_all<I>(&self, actions: I) -> Result<Vec<EffectHandle>, StoreError>
    where
        I: IntoIterator<Item = TodoAction>,
    {
        let mut handles = Vec::new();
        for action in actions {
            handles.push(self.store.send(action).await?);
        }
        Ok(handles)
    }

    /// Items passing the current filter
    pub async fn filtered(&self) -> TodoList {
        self.filtered.get().await
    }

    /// Statistics of the whole list
    pub async fn stats(&self) -> StatsSnapshot {
        self.stats.get().await
    }

    /// Derived view handle for the filtered list
    #[must_use]
    pub const fn filtered_view(&self) -> &Derived<TodoState, FilteredTodos> {
        &self.filtered
    }

    /// Derived view handle for the statistics
    #[must_use]
    pub const fn stats_view(&self) -> &Derived<TodoState, TodoStats> {
        &self.stats
    }

    /// Renders every section from one consistent state
    pub async fn render(&self) -> String {
        self.store
            .state(|state| {
                let visible = self.filtered.get_in(state);
                let stats = self.stats.get_in(state);
                Frame {
                    user_name: &state.user_name,
                    filter: *state.filter.get(),
                    stats: &stats,
                    input: &state.input,
                    visible: &visible,
                    last_error: state.last_error.as_deref(),
                }
                .to_string()
            })
            .await
    }

    /// Renders one section
    pub async fn render_section(&self, section: Section) -> String {
        match section {
            Section::List => self.filtered.with(|items| view::list_block(items)).await,
            Section::Stats => self.stats.with(view::stats_block).await,
        }
    }
}

impl std::fmt::Debug for TodoApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoApp")
            .field("filtered_recomputations", &self.filtered.recomputations())
            .field("stats_recomputations", &self.stats.recomputations())
            .finish_non_exhaustive()
    }
}
