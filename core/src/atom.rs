//! Versioned leaf state.
//!
//! An [`Atom`] holds one independently-replaceable piece of state. Its value
//! is never mutated in place: every write swaps the whole value and bumps the
//! atom's [`Revision`]. Selectors compare revisions to decide whether a
//! derived value has to be recomputed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Monotonic write counter of a single atom
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Revision(u64);

impl Revision {
    /// Revision of a freshly created atom
    pub const INITIAL: Self = Self(0);

    /// Creates a revision from a raw counter value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw counter value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the following revision
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Replacement intent for an atom: a literal value or a pure function of
/// the current value
pub enum Replace<T> {
    /// Swap in this value
    Value(T),
    /// Compute the new value from the old one
    With(Arc<dyn Fn(&T) -> T + Send + Sync>),
}

impl<T> Replace<T> {
    /// Wraps a pure `old -> new` function
    #[must_use]
    pub fn with<F>(f: F) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        Self::With(Arc::new(f))
    }

    /// Resolves the intent against the current value
    #[must_use]
    pub fn resolve(self, current: &T) -> T {
        match self {
            Self::Value(value) => value,
            Self::With(f) => f(current),
        }
    }
}

impl<T: Clone> Clone for Replace<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(value) => Self::Value(value.clone()),
            Self::With(f) => Self::With(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Replace<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Replace::Value").field(value).finish(),
            Self::With(_) => write!(f, "Replace::With(<fn>)"),
        }
    }
}

/// A named, independently replaceable piece of state
#[derive(Clone, Debug)]
pub struct Atom<T> {
    key: &'static str,
    value: T,
    revision: Revision,
}

impl<T> Atom<T> {
    /// Creates an atom holding its default value at [`Revision::INITIAL`]
    #[must_use]
    pub const fn new(key: &'static str, value: T) -> Self {
        Self {
            key,
            value,
            revision: Revision::INITIAL,
        }
    }

    /// Name of the atom, used in logs
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Current value
    #[must_use]
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Revision of the current value
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Swaps in a new value and returns the new revision
    ///
    /// No validation is performed; callers own the invariants of `T`.
    pub fn set(&mut self, value: T) -> Revision {
        self.value = value;
        self.revision = self.revision.next();
        self.revision
    }

    /// Replaces the value with `f(current)`
    pub fn update<F>(&mut self, f: F) -> Revision
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value);
        self.set(next)
    }

    /// Applies a [`Replace`] intent
    pub fn replace(&mut self, intent: Replace<T>) -> Revision {
        let next = intent.resolve(&self.value);
        self.set(next)
    }

    /// Consumes the atom, returning its value
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: PartialEq> PartialEq for Atom<T> {
    /// Atoms compare by key and value; the revision is write history, not content
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}
