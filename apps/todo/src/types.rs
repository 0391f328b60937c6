//! Domain types for the to-do list.
//!
//! The list and the filter are two independent [`Atom`]s so that a derived
//! view reading only the list is not recomputed when the filter changes.

use crate::user::UserFetchError;
use recall_core::{Atom, Loadable, Replace};
use recall_macros::Action;
use serde::{Deserialize, Serialize};

/// Identifier of a to-do item
///
/// Allocated from an [`IdCounter`]; never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from a raw value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A single to-do entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Free text, may be empty
    pub text: String,
    /// Whether the item is done
    pub is_completed: bool,
}

impl TodoItem {
    /// Creates an incomplete item
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            is_completed: false,
        }
    }

    /// Copy of this item with different text
    #[must_use]
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Copy of this item with the completion flag flipped
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }
}

/// Ordered to-do entries; insertion order is display order
pub type TodoList = Vec<TodoItem>;

/// Source of fresh [`TodoId`]s
///
/// A plain value threaded through state: allocating returns the id together
/// with the advanced counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounter(u64);

impl IdCounter {
    /// Counter that hands out `0` first
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Returns the next id and the counter to use afterwards
    #[must_use]
    pub const fn next(self) -> (TodoId, Self) {
        (TodoId(self.0), Self(self.0 + 1))
    }

    /// Id the next call to [`IdCounter::next`] will return
    #[must_use]
    pub const fn peek(self) -> TodoId {
        TodoId(self.0)
    }
}

/// Which items the filtered view shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterMode {
    /// Every item
    #[default]
    All,
    /// Completed items only
    Done,
    /// Incomplete items only
    NotDone,
}

impl FilterMode {
    /// Every mode, in selector order
    pub const ALL: [Self; 3] = [Self::All, Self::Done, Self::NotDone];

    /// Label shown in the filter selector
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Done => "Done",
            Self::NotDone => "Not Done",
        }
    }

    /// Value used on the wire and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Done => "done",
            Self::NotDone => "notDone",
        }
    }

    /// Parses a selection, falling back to [`FilterMode::All`]
    ///
    /// Matching ignores case; `not-done` and `not_done` are accepted too.
    #[must_use]
    pub fn from_selection(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Self::All,
            "done" => Self::Done,
            "notdone" | "not-done" | "not_done" => Self::NotDone,
            other => {
                tracing::warn!(selection = other, "Unknown filter mode, showing all items");
                Self::All
            },
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate counts over the whole list
///
/// `completed_percentage` is a ratio in `[0, 1]`, exactly `0.0` for an empty
/// list. Displays multiply it by 100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Number of items
    pub total: usize,
    /// Incomplete items
    pub to_do: usize,
    /// Completed items
    pub not_todo: usize,
    /// `not_todo / total`
    pub completed_percentage: f64,
}

/// Application state
#[derive(Clone, Debug)]
pub struct TodoState {
    /// The to-do list
    pub todos: Atom<TodoList>,
    /// Selected filter
    pub filter: Atom<FilterMode>,
    /// Next id to allocate
    pub next_id: IdCounter,
    /// Text typed into the item creator
    pub input: String,
    /// Display name of the remote user
    pub user_name: Loadable<String, UserFetchError>,
    /// Number of the most recent user lookup; older results are dropped
    pub user_request: u64,
    /// Last rejected edit (if any)
    pub last_error: Option<String>,
}

impl TodoState {
    /// Empty list, filter on "all", user name not requested
    #[must_use]
    pub fn new() -> Self {
        Self {
            todos: Atom::new("todoList", Vec::new()),
            filter: Atom::new("todoListFilter", FilterMode::All),
            next_id: IdCounter::new(),
            input: String::new(),
            user_name: Loadable::NotRequested,
            user_request: 0,
            last_error: None,
        }
    }

    /// Finds an item by id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.get().iter().find(|item| item.id == id)
    }
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

/// Commands from the shell and events fed back by effects
#[derive(Action, Clone, Debug)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Replace the item creator's text
    #[command]
    SetInput {
        /// New input text
        text: String,
    },

    /// Command: Append an item with the current input text and clear the input
    #[command]
    AddTodo,

    /// Command: Replace the text of an item
    #[command]
    EditTodo {
        /// Item to edit
        id: TodoId,
        /// New text
        text: String,
    },

    /// Command: Flip the completion flag of an item
    #[command]
    ToggleTodo {
        /// Item to toggle
        id: TodoId,
    },

    /// Command: Replace an item wholesale
    #[command]
    UpdateTodo {
        /// Item to replace
        id: TodoId,
        /// Replacement
        item: TodoItem,
    },

    /// Command: Remove an item
    #[command]
    DeleteTodo {
        /// Item to remove
        id: TodoId,
    },

    /// Command: Replace the whole list, unvalidated
    #[command]
    ReplaceTodos {
        /// Literal list or `old -> new` function
        update: Replace<TodoList>,
    },

    /// Command: Select a filter
    #[command]
    SetFilter {
        /// New filter
        mode: FilterMode,
    },

    /// Command: Fetch the user name unless already requested
    #[command]
    LoadUserName,

    /// Command: Forget the user name so the next load fetches again
    #[command]
    ResetUserName,

    // ========== Events ==========
    /// Event: The user lookup finished
    #[event]
    UserNameLoaded {
        /// Lookup this result answers
        request: u64,
        /// Display name or the reason the lookup failed
        result: Result<String, UserFetchError>,
    },
}
