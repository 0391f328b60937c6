//! # Recall Testing
//!
//! Testing utilities and helpers for the Recall state architecture.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`assertions`]: Helpers for checking returned effects
//! - [`Recorder`]: Captures what observers were notified with
//!
//! ## Example
//!
//! ```ignore
//! use recall_testing::Recorder;
//!
//! #[tokio::test]
//! async fn stats_follow_the_list() {
//!     let store = todo_store();
//!     let recorder = Recorder::new();
//!
//!     store.observe(TodoStats, recorder.sink(|stats: &StatsSnapshot| stats.total)).await;
//!     store.send(TodoAction::SetInput { text: "milk".into() }).await.unwrap();
//!     store.send(TodoAction::AddTodo).await.unwrap();
//!
//!     assert_eq!(recorder.events(), vec![0, 1]);
//! }
//! ```


/// Observer recording
pub mod recorder;

// Re-export commonly used items
pub use recorder::Recorder;
pub use reducer_test::{assertions, ReducerTest};
