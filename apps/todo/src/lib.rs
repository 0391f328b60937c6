//! To-do list built on Recall.
//!
//! Two leaf atoms (the list and the filter) feed two memoized derived
//! views (the filtered list and completion statistics). A one-shot user
//! lookup resolves into an explicit [`Loadable`](recall_core::Loadable).
//!
//! - [`editor`]: pure list operations (insert, update by id, delete by id)
//! - [`selectors`]: the derived views
//! - [`reducer`]: actions to atom replacements and effects
//! - [`user`]: the remote user directory
//! - [`app`]: store plus derived views, rendered by [`view`]
//! - [`shell`]: line commands for the `recall-todo` binary
//!
//! # Quick Start
//!
//! ```no_run
//! use recall_todo::{HttpUserDirectory, TodoAction, TodoApp, TodoEnvironment, TodoId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let users = Arc::new(HttpUserDirectory::new("http://localhost:3001"));
//! let app = TodoApp::new(TodoEnvironment::new(users, 1));
//!
//! app.send_all([
//!     TodoAction::SetInput { text: "buy milk".to_string() },
//!     TodoAction::AddTodo,
//!     TodoAction::ToggleTodo { id: TodoId::new(0) },
//! ])
//! .await?;
//!
//! let stats = app.stats().await;
//! println!("{} of {} done", stats.not_todo, stats.total);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod editor;
pub mod reducer;
pub mod selectors;
pub mod shell;
pub mod types;
pub mod user;
pub mod view;

pub use app::{TodoApp, TodoStore};
pub use config::{Config, ConfigError};
pub use editor::EditorError;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use selectors::{FilteredTodos, TodoStats};
pub use types::{FilterMode, IdCounter, StatsSnapshot, TodoAction, TodoId, TodoItem, TodoList, TodoState};
pub use user::{HttpUserDirectory, UserDirectory, UserFetchError};
