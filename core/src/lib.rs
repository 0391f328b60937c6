//! # Recall Core
//!
//! Core traits and types for the Recall state architecture.
//!
//! This crate provides the building blocks for applications whose state lives
//! in a single store, changes only through a reducer, and is read through
//! derived views that recompute when their inputs change.
//!
//! ## Core Concepts
//!
//! - **Atom**: A versioned leaf value, replaced wholesale (never mutated in place)
//! - **Selector**: A pure function of state, memoized on the revisions of the atoms it reads
//! - **Loadable**: Explicit three-state value for asynchronous reads
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//!
//! ## Example
//!
//! ```ignore
//! use recall_core::*;
//!
//! #[derive(Clone, Debug)]
//! struct CounterState {
//!     count: Atom<i64>,
//! }
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         state.count.update(|n| n + 1);
//!         SmallVec::new()
//!     }
//! }
//! ```

pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Versioned leaf state
pub mod atom;

/// Three-state values for asynchronous reads
pub mod loadable;

/// Derived state and memoization
pub mod selector;

/// Declarative helpers for building effects
mod effect_macros;

pub use atom::{Atom, Replace, Revision};
pub use loadable::Loadable;
pub use selector::{Memo, Revisions, Selector};

/// Action module - Unified input type for reducers
///
/// Actions are either commands (intent coming from the outside world) or
/// events (facts produced by effects and fed back into the reducer).
/// `#[derive(Action)]` from `recall-macros` implements [`action::Action`]
/// from `#[command]` / `#[event]` variant markers.
pub mod action {
    /// Common behavior of every action type handled by a store
    pub trait Action {
        /// Variant name, used for logging and metrics labels
        fn name(&self) -> &'static str;

        /// Returns true if this action is a command
        fn is_command(&self) -> bool;

        /// Returns true if this action is an event
        fn is_event(&self) -> bool;
    }
}

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Replaces the affected atoms in state
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most actions produce no effects, so the returned collection stays
        /// inline for up to four effects.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns true for `Effect::None` and empty compositions
        #[must_use]
        pub fn is_noop(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_noop)
                },
                Effect::Future(_) => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[test]
    fn merge_and_chain_build_compositions() {
        let merged: Effect<u8> = Effect::merge(vec![Effect::None, Effect::None]);
        assert!(matches!(merged, Effect::Parallel(ref effects) if effects.len() == 2));

        let chained: Effect<u8> = Effect::chain(vec![Effect::None]);
        assert!(matches!(chained, Effect::Sequential(ref effects) if effects.len() == 1));
    }

    #[test]
    fn noop_detection_looks_through_compositions() {
        let nested: Effect<u8> = Effect::merge(vec![Effect::chain(vec![]), Effect::None]);
        assert!(nested.is_noop());

        let future: Effect<u8> = Effect::Future(Box::pin(async { Some(1) }));
        assert!(!future.is_noop());
        assert!(!Effect::merge(vec![Effect::None, future]).is_noop());
    }

    #[test]
    fn debug_hides_future_body() {
        let effect: Effect<u8> = Effect::Future(Box::pin(async { None }));
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }
}
