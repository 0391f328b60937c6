//! # Recall Runtime
//!
//! Runtime implementation for the Recall state architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution,
//! observer notification, derived views and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer, notifies observers, executes effects
//! - **Derived**: A memoized selector bound to a store, recomputed on read
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to the reducer
//!
//! ## Consistency
//!
//! The reducer, every synchronous observer and the change counter all run
//! while the store holds its write lock. Derived views read under the read
//! lock. A reader therefore never sees a derived value computed from a mix
//! of old and new inputs.
//!
//! ## Example
//!
//! ```ignore
//! use recall_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Push: called synchronously after every action
//! store.subscribe(|state: &MyState| tracing::info!(count = state.count.get(), "changed"));
//!
//! // Pull: recomputed only when the atoms it reads have moved
//! let doubled = store.derive(Doubled);
//!
//! store.send(Action::Increment).await?;
//! let value = doubled.get().await;
//! ```

use recall_core::{effect::Effect, reducer::Reducer};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{watch, RwLock};

/// Derived views bound to a store
pub mod derived;

pub use derived::Derived;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Identifier of a registered observer
///
/// Returned by [`Store::subscribe`] and [`Store::observe`]; pass it to
/// [`Store::unsubscribe`] to stop notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw identifier value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Synchronous state observer
type Observer<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Registered observers, in registration order
type ObserverList<S> = Arc<Mutex<Vec<(SubscriptionId, Observer<S>)>>>;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects spawned by
/// that action to finish.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::LoadUser).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // The fetch has resolved and its result action has been reduced
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle
    ///
    /// Returns the handle given to the caller together with the tracking
    /// context used internally while effects execute.
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracker is gone, so nothing is left to decrement
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicU64, AtomicUsize, DecrementGuard, Derived,
        Duration, Effect, EffectHandle, EffectTracking, Mutex, ObserverList, Ordering, Reducer,
        RwLock, StoreError, SubscriptionId,
    };
    use recall_core::action::Action;
    use recall_core::selector::{Memo, Selector};
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Observers (notified synchronously after every reduced action)
    /// 5. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        observers: ObserverList<S>,
        next_subscription: Arc<AtomicU64>,
        /// Number of actions reduced so far
        changes: Arc<watch::Sender<u64>>,
        /// Action broadcast channel for observing actions produced by effects.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Action + Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast channel buffers 16 actions; use
        /// [`Store::with_broadcast_capacity`] for more.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new Store with custom action broadcast capacity
        ///
        /// # Arguments
        ///
        /// - `initial_state`: The starting state for the store
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        /// - `capacity`: Action broadcast channel capacity (number of actions buffered)
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));
            let (changes, _) = watch::channel(0);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                observers: Arc::new(Mutex::new(Vec::new())),
                next_subscription: Arc::new(AtomicU64::new(0)),
                changes: Arc::new(changes),
                action_broadcast,
            }
        }

        /// Initiate graceful shutdown of the store
        ///
        /// 1. Stops accepting new actions
        /// 2. Waits for running effects to complete (up to `timeout`)
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(20);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        pending_effects = pending,
                        "Shutdown timeout: {} effects still running", pending
                    );
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Notifies every observer with the new state, still under the lock
        /// 4. Bumps the change counter
        /// 5. Executes returned effects asynchronously
        ///
        /// When `send()` returns, every observer has already seen the new
        /// state and any later read reflects it.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer or an observer panics, the panic propagates.
        #[tracing::instrument(skip(self, action), fields(action = action.name()), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions.total", "action" => action.name()).increment(1);

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;

                let start = std::time::Instant::now();
                let effects = {
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();
                    self.reducer.reduce(&mut *state, action, &self.environment)
                };
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());
                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                self.notify_observers(&*state);
                self.changes.send_modify(|count| *count += 1);

                effects
            };

            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }

            Ok(handle)
        }

        /// Send an action and wait for a matching action produced by its effects
        ///
        /// Subscribes to the action broadcast before sending, so the result
        /// cannot be missed.
        ///
        /// # Errors
        ///
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        /// - [`StoreError::Timeout`]: No matching action within `timeout`
        /// - [`StoreError::ChannelClosed`]: Broadcast channel closed
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged, {} actions skipped", skipped);
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to actions produced by effects
        ///
        /// Actions sent directly through [`Store::send`] are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Register a synchronous observer of the whole state
        ///
        /// The observer runs after every reduced action while the store still
        /// holds its write lock, so it must not call back into the store.
        pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
        where
            F: Fn(&S) + Send + Sync + 'static,
        {
            let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
            self.observers
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push((id, Arc::new(observer)));
            tracing::debug!(subscription = %id, "Observer registered");
            id
        }

        /// Register an observer of a derived value
        ///
        /// `on_change` is called once immediately with the current value and
        /// then after every action that moved one of the selector's inputs.
        /// Registration happens under the read lock, so no change can slip
        /// between the initial value and the first notification.
        pub async fn observe<Sel, F>(&self, selector: Sel, on_change: F) -> SubscriptionId
        where
            Sel: Selector<S> + Send + 'static,
            Sel::Output: Send + 'static,
            F: Fn(&Sel::Output) + Send + Sync + 'static,
        {
            let state = self.state.read().await;

            let mut memo = Memo::new(selector);
            on_change(memo.get(&*state));
            let memo = Mutex::new(memo);

            let id = self.subscribe(move |state: &S| {
                let mut memo = memo.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                let before = memo.recomputations();
                memo.get(state);
                if memo.recomputations() > before {
                    if let Some(output) = memo.peek() {
                        on_change(output);
                    }
                }
            });

            drop(state);
            id
        }

        /// Remove an observer
        ///
        /// Returns false if the id was unknown or already removed.
        pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
            let mut observers = self
                .observers
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let before = observers.len();
            observers.retain(|(existing, _)| *existing != id);
            observers.len() != before
        }

        /// Number of registered observers
        #[must_use]
        pub fn observer_count(&self) -> usize {
            self.observers
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .len()
        }

        /// Watch the number of reduced actions
        ///
        /// Async consumers can `changed().await` on the receiver and then
        /// read state or derived views.
        #[must_use]
        pub fn changes(&self) -> watch::Receiver<u64> {
            self.changes.subscribe()
        }

        /// Bind a selector to this store
        ///
        /// The returned [`Derived`] recomputes on read, and only when the
        /// atoms the selector depends on have been replaced.
        #[must_use]
        pub fn derive<Sel>(&self, selector: Sel) -> Derived<S, Sel>
        where
            Sel: Selector<S>,
        {
            Derived::new(Arc::clone(&self.state), selector)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.get().len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Calls every observer with the freshly reduced state
        fn notify_observers(&self, state: &S) {
            // Snapshot so observers may (un)subscribe others without deadlocking
            let observers: Vec<_> = self
                .observers
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect();

            for observer in &observers {
                observer(state);
            }

            if !observers.is_empty() {
                metrics::counter!("store.observers.notified").increment(observers.len() as u64);
            }
        }

        /// Execute an effect with tracking
        ///
        /// Uses [`DecrementGuard`] to ensure the effect counter is always
        /// decremented, even if the effect panics.
        ///
        /// # Effect Types
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, sends resulting action if `Some`
        /// - `Parallel`: Executes effects concurrently
        /// - `Sequential`: Executes effects in order, waiting for each to complete
        ///
        /// Effect failures are isolated: a panicking effect task is logged by
        /// tokio and the store keeps running.
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned into spawned tasks
        fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard;

                        if let Some(action) = fut.await {
                            tracing::trace!(action = action.name(), "Effect::Future produced an action");

                            // Broadcast to observers before feeding back
                            let _ = store.action_broadcast.send(action.clone());

                            if let Err(error) = store.send(action).await {
                                tracing::warn!(%error, "Dropped action produced by effect");
                            }
                        }
                    });
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);

                    for effect in effects {
                        self.execute_effect(effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    let effect_count = effects.len();
                    tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);

                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard;

                        for (idx, effect) in effects.into_iter().enumerate() {
                            tracing::trace!("Executing sequential effect {} of {}", idx + 1, effect_count);

                            let (mut sub_handle, sub_tracking) = EffectHandle::new();
                            store.execute_effect(effect, sub_tracking);
                            sub_handle.wait().await;
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                observers: Arc::clone(&self.observers),
                next_subscription: Arc::clone(&self.next_subscription),
                changes: Arc::clone(&self.changes),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::{smallvec, Atom, SmallVec};
    use recall_macros::Action;

    #[derive(Debug, Clone)]
    struct TestState {
        value: Atom<i32>,
    }

    impl TestState {
        fn new() -> Self {
            Self {
                value: Atom::new("value", 0),
            }
        }
    }

    #[derive(Action, Debug, Clone)]
    enum TestAction {
        #[command]
        Increment,
        #[command]
        Decrement,
        #[command]
        NoOp,
        #[command]
        ProduceEffect,
        #[command]
        ProduceParallelEffects,
        #[command]
        ProduceSequentialEffects,
        #[command]
        ProducePanickingEffect,
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value.update(|v| v + 1);
                    SmallVec::new()
                },
                TestAction::Decrement => {
                    state.value.update(|v| v - 1);
                    SmallVec::new()
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))]
                },
                TestAction::ProduceParallelEffects => {
                    smallvec![Effect::Parallel(vec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    ])]
                },
                TestAction::ProduceSequentialEffects => {
                    smallvec![Effect::Sequential(vec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Decrement) })),
                    ])]
                },
                TestAction::ProducePanickingEffect => {
                    #[allow(clippy::panic)] // Intentional panic for testing error handling
                    {
                        smallvec![Effect::Future(Box::pin(async {
                            panic!("Intentional panic in effect for testing");
                        }))]
                    }
                },
            }
        }
    }

    fn test_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState::new(), TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = test_store();
        assert_eq!(store.state(|s| *s.value.get()).await, 0);
    }

    #[tokio::test]
    async fn test_send_action() -> Result<(), StoreError> {
        let store = test_store();

        store.send(TestAction::Increment).await?;
        store.send(TestAction::Increment).await?;
        store.send(TestAction::Decrement).await?;

        assert_eq!(store.state(|s| *s.value.get()).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_none() -> Result<(), StoreError> {
        let store = test_store();

        let handle = store.send(TestAction::NoOp).await?;
        assert_eq!(handle.pending(), 0);
        assert_eq!(store.state(|s| *s.value.get()).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_future_feeds_back() -> Result<(), StoreError> {
        let store = test_store();

        let mut handle = store.send(TestAction::ProduceEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert_eq!(store.state(|s| *s.value.get()).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_parallel() -> Result<(), StoreError> {
        let store = test_store();

        let mut handle = store.send(TestAction::ProduceParallelEffects).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert_eq!(store.state(|s| *s.value.get()).await, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_sequential() -> Result<(), StoreError> {
        let store = test_store();

        let mut handle = store.send(TestAction::ProduceSequentialEffects).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        // Net result: +1 +1 -1 = 1
        assert_eq!(store.state(|s| *s.value.get()).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() -> Result<(), StoreError> {
        let store = test_store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        store.send(TestAction::Increment).await?;
        assert_eq!(store.state(|s| *s.value.get()).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_observer_sees_new_state_before_send_returns() -> Result<(), StoreError> {
        let store = test_store();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        store.subscribe(move |state: &TestState| {
            sink.lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(*state.value.get());
        });

        store.send(TestAction::Increment).await?;
        store.send(TestAction::Increment).await?;

        let seen = seen.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone();
        assert_eq!(seen, vec![1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_notifications() -> Result<(), StoreError> {
        let store = test_store();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_: &TestState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.observer_count(), 1);

        store.send(TestAction::Increment).await?;
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.send(TestAction::Increment).await?;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.observer_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_changes_counter_tracks_actions() -> Result<(), StoreError> {
        let store = test_store();
        let mut changes = store.changes();
        assert_eq!(*changes.borrow(), 0);

        store.send(TestAction::NoOp).await?;
        store.send(TestAction::Increment).await?;

        assert!(changes.has_changed().unwrap_or(false));
        assert_eq!(*changes.borrow_and_update(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_send_and_wait_for_effect_result() -> Result<(), StoreError> {
        let store = test_store();

        let action = store
            .send_and_wait_for(
                TestAction::ProduceEffect,
                |a| matches!(a, TestAction::Increment),
                Duration::from_secs(1),
            )
            .await?;

        assert!(matches!(action, TestAction::Increment));
        Ok(())
    }

    #[tokio::test]
    async fn test_send_and_wait_for_times_out() {
        let store = test_store();

        let result = store
            .send_and_wait_for(
                TestAction::Increment,
                |a| matches!(a, TestAction::Decrement),
                Duration::from_millis(20),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() -> Result<(), StoreError> {
        let store = test_store();

        store.shutdown(Duration::from_secs(1)).await?;
        let result = store.send(TestAction::Increment).await;

        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        Ok(())
    }

    #[tokio::test]
    async fn test_store_clone_shares_state_and_observers() -> Result<(), StoreError> {
        let store1 = test_store();
        let store2 = store1.clone();

        store1.subscribe(|_: &TestState| {});
        assert_eq!(store2.observer_count(), 1);

        store2.send(TestAction::Increment).await?;
        assert_eq!(store1.state(|s| *s.value.get()).await, 1);
        Ok(())
    }

    #[test]
    fn test_completed_handle_has_no_pending_effects() {
        let handle = EffectHandle::completed();
        assert_eq!(handle.pending(), 0);
        assert!(format!("{handle:?}").contains("pending_effects"));
    }

    #[test]
    fn test_subscription_id_display() {
        assert_eq!(SubscriptionId(7).to_string(), "sub-7");
        assert_eq!(SubscriptionId(7).value(), 7);
    }
}
