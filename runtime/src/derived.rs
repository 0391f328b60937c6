//! Derived views bound to a store.
//!
//! A [`Derived`] pairs a [`Memo`] with the store's state lock. Reading it
//! takes the read lock, checks the selector's input revisions and reruns
//! the selector only if one of them moved since the last read.

use recall_core::selector::{Memo, Selector};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// A memoized selector over a store's state
///
/// Created with [`crate::Store::derive`]. Clones share the same cache.
pub struct Derived<S, Sel>
where
    Sel: Selector<S>,
{
    state: Arc<RwLock<S>>,
    memo: Arc<Mutex<Memo<S, Sel>>>,
}

impl<S, Sel> Derived<S, Sel>
where
    Sel: Selector<S>,
{
    pub(crate) fn new(state: Arc<RwLock<S>>, selector: Sel) -> Self {
        Self {
            state,
            memo: Arc::new(Mutex::new(Memo::new(selector))),
        }
    }

    /// Current derived value
    pub async fn get(&self) -> Sel::Output
    where
        Sel::Output: Clone,
    {
        self.with(Clone::clone).await
    }

    /// Borrow the current derived value through a closure
    ///
    /// ```ignore
    /// let visible = filtered.with(|items| items.len()).await;
    /// ```
    pub async fn with<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Sel::Output) -> T,
    {
        let state = self.state.read().await;
        self.with_in(&*state, f)
    }

    /// Derived value for a state the caller already holds
    ///
    /// Use inside [`crate::Store::state`] to read several derived views and
    /// raw state under one lock. `state` must be the store's current state.
    pub fn get_in(&self, state: &S) -> Sel::Output
    where
        Sel::Output: Clone,
    {
        self.with_in(state, Clone::clone)
    }

    /// Closure form of [`Derived::get_in`]
    pub fn with_in<F, T>(&self, state: &S, f: F) -> T
    where
        F: FnOnce(&Sel::Output) -> T,
    {
        let mut memo = self
            .memo
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let before = memo.recomputations();
        memo.get(state);
        if memo.recomputations() > before {
            let key = memo.selector().key();
            tracing::trace!(selector = key, "Derived value recomputed");
            metrics::counter!("derived.recomputations", "selector" => key).increment(1);
        }

        // Inputs are unchanged since the line above, so this hits the cache
        f(memo.get(state))
    }

    /// Number of times the selector actually ran
    #[must_use]
    pub fn recomputations(&self) -> u64 {
        self.memo
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .recomputations()
    }
}

impl<S, Sel> Clone for Derived<S, Sel>
where
    Sel: Selector<S>,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            memo: Arc::clone(&self.memo),
        }
    }
}
