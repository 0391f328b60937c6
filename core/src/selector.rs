//! Derived state.
//!
//! A [`Selector`] is a pure function of state. It also names the atoms it
//! reads by reporting their [`Revision`]s; a [`Memo`] caches the last output
//! together with those revisions and recomputes only when one of them moved.
//!
//! Because the output is a pure function of its inputs, memoization never
//! changes what a reader observes, only how often the function runs.

use crate::atom::Revision;
use smallvec::SmallVec;
use std::marker::PhantomData;

/// Revisions of the atoms a selector read, in a selector-defined order
pub type Revisions = SmallVec<[Revision; 4]>;

/// A pure derived view of state `S`
///
/// # Example
///
/// ```ignore
/// struct Doubled;
///
/// impl Selector<CounterState> for Doubled {
///     type Output = i64;
///
///     fn key(&self) -> &'static str {
///         "doubled"
///     }
///
///     fn dependencies(&self, state: &CounterState) -> Revisions {
///         smallvec![state.count.revision()]
///     }
///
///     fn select(&self, state: &CounterState) -> i64 {
///         state.count.get() * 2
///     }
/// }
/// ```
pub trait Selector<S> {
    /// The derived value
    type Output;

    /// Name of the selector, used in logs and metrics
    fn key(&self) -> &'static str;

    /// Revisions of every atom `select` reads
    ///
    /// Must list the same atoms in the same order on every call.
    fn dependencies(&self, state: &S) -> Revisions;

    /// Computes the derived value
    fn select(&self, state: &S) -> Self::Output;
}

/// Cache of a selector's last output, keyed on its input revisions
pub struct Memo<S, Sel>
where
    Sel: Selector<S>,
{
    selector: Sel,
    cached: Option<(Revisions, Sel::Output)>,
    recomputations: u64,
    _state: PhantomData<fn(&S)>,
}

impl<S, Sel> Memo<S, Sel>
where
    Sel: Selector<S>,
{
    /// Wraps a selector with an empty cache
    #[must_use]
    pub const fn new(selector: Sel) -> Self {
        Self {
            selector,
            cached: None,
            recomputations: 0,
            _state: PhantomData,
        }
    }

    /// The wrapped selector
    #[must_use]
    pub const fn selector(&self) -> &Sel {
        &self.selector
    }

    /// Returns the derived value for `state`, recomputing it if any input
    /// revision differs from the cached ones
    pub fn get(&mut self, state: &S) -> &Sel::Output {
        let dependencies = self.selector.dependencies(state);

        let entry = match self.cached.take() {
            Some((seen, output)) if seen == dependencies => (seen, output),
            _ => {
                self.recomputations += 1;
                (dependencies, self.selector.select(state))
            },
        };

        &self.cached.insert(entry).1
    }

    /// The cached value, without checking it against any state
    #[must_use]
    pub fn peek(&self) -> Option<&Sel::Output> {
        self.cached.as_ref().map(|(_, output)| output)
    }

    /// Number of times the selector actually ran
    #[must_use]
    pub const fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Drops the cached value
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

impl<S, Sel> std::fmt::Debug for Memo<S, Sel>
where
    Sel: Selector<S>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("selector", &self.selector.key())
            .field("cached", &self.cached.is_some())
            .field("recomputations", &self.recomputations)
            .finish()
    }
}
