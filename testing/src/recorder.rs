//! Captures values pushed to observers so tests can assert on the sequence.

#![allow(clippy::module_name_repetitions)]

use std::sync::{Arc, Mutex, PoisonError};

/// Shared, append-only log of observed values
///
/// Cloning a `Recorder` yields another handle to the same log.
///
/// # Example
///
/// ```
/// use recall_testing::Recorder;
///
/// let recorder = Recorder::new();
/// let sink = recorder.sink(|n: &i32| n * 10);
///
/// sink(&1);
/// sink(&2);
/// assert_eq!(recorder.events(), vec![10, 20]);
/// ```
#[derive(Debug)]
pub struct Recorder<T> {
    events: Arc<Mutex<Vec<T>>>,
}

impl<T> Recorder<T> {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append a value
    pub fn record(&self, value: T) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value);
    }

    /// Build an observer closure that records `map(input)` on every call
    pub fn sink<S, F>(&self, map: F) -> impl Fn(&S) + Send + Sync + 'static + use<S, F, T>
    where
        S: ?Sized + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
        T: Send + 'static,
    {
        let recorder = self.clone();
        move |input: &S| recorder.record(map(input))
    }

    /// Number of recorded values
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<T: Clone> Recorder<T> {
    /// Snapshot of all recorded values, oldest first
    #[must_use]
    pub fn events(&self) -> Vec<T> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recently recorded value
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}
