//! Explicit state of an asynchronous read.
//!
//! Instead of suspending the reader until a value arrives, a [`Loadable`]
//! exposes where the read currently is and lets the consumer render
//! accordingly.

use serde::{Deserialize, Serialize};

/// Progress of a one-shot asynchronous read
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "outcome", rename_all = "snake_case")]
pub enum Loadable<T, E> {
    /// Nobody has asked for the value yet
    #[default]
    NotRequested,
    /// The read is in flight
    Pending,
    /// The read finished, successfully or not
    Resolved(Result<T, E>),
}

impl<T, E> Loadable<T, E> {
    /// Returns true while the read is in flight
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true once the read has finished
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Returns true if a new read may be started
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::NotRequested)
    }

    /// The successful value, if any
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Resolved(Ok(value)) => Some(value),
            _ => None,
        }
    }

    /// The failure, if any
    #[must_use]
    pub const fn error(&self) -> Option<&E> {
        match self {
            Self::Resolved(Err(error)) => Some(error),
            _ => None,
        }
    }

    /// Marks the read as started
    ///
    /// Returns false, leaving the state untouched, unless the value was
    /// [`Loadable::NotRequested`]: a read happens at most once until reset.
    pub fn begin(&mut self) -> bool {
        if self.is_idle() {
            *self = Self::Pending;
            true
        } else {
            false
        }
    }

    /// Stores the outcome of the read
    pub fn resolve(&mut self, outcome: Result<T, E>) {
        *self = Self::Resolved(outcome);
    }

    /// Forgets any previous read
    pub fn reset(&mut self) {
        *self = Self::NotRequested;
    }
}
