//! # Registration Runtime
//!
//! The Store that owns one registrant session.
//!
//! A Store holds the session state behind a lock, runs the reducer for every
//! action sent to it and executes the effects the reducer describes. Actions
//! produced by effects are fed straight back into the reducer, so a single
//! `send` settles the whole feedback loop before it returns.
//!
//! This is the form-state container seam: the UI sends one action per user
//! interaction and reads state back through [`Store::state`].
//!
//! ## Example
//!
//! ```ignore
//! use registration_runtime::Store;
//!
//! let store = Store::new(session, RegistrationReducer::new(), environment);
//!
//! store.send(RegistrationAction::Select(SelectionAction::SetDevotionalSinging(YesNo::Yes))).await?;
//! let complete = store.state(|s| s.section_complete).await;
//! ```

use registration_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

pub use store::Store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Domain failures (a failed aggregate fetch, a rejected field change) are
    /// expressed as actions by the reducer, not as store errors.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;

/// Execute one effect and return the action it feeds back, if any.
async fn execute_effect<A>(effect: Effect<A>) -> Option<A>
where
    A: Send + 'static,
{
    metrics::counter!("store.effects.executed", "type" => effect.kind()).increment(1);
    match effect {
        Effect::None => None,
        Effect::Future(fut) => {
            let produced = fut.await;
            if produced.is_none() {
                tracing::trace!("Effect::Future completed with no action");
            }
            produced
        },
    }
}

/// Store module - the runtime coordinator for a reducer
pub mod store {
    use super::{
        Arc, AtomicBool, Effect, Ordering, Reducer, RwLock, StoreError, VecDeque, execute_effect,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` so reads can run while effects are in flight)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: AtomicBool,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: Send + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock and runs the reducer
        /// 2. Releases the lock and executes the returned effects
        /// 3. Reduces every action the effects produce, until none remain
        ///
        /// The lock is never held across an effect, so `state()` readers are not
        /// blocked by a slow aggregate fetch.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                return Err(StoreError::ShutdownInProgress);
            }

            let mut pending = VecDeque::from([action]);
            while let Some(action) = pending.pop_front() {
                let effects = {
                    let mut state = self.state.write().await;
                    self.reducer.reduce(&mut state, action, &self.environment)
                };
                metrics::counter!("store.actions.processed").increment(1);

                for effect in effects {
                    if matches!(effect, Effect::None) {
                        continue;
                    }
                    if let Some(produced) = execute_effect(effect).await {
                        pending.push_back(produced);
                    }
                }
            }

            Ok(())
        }

        /// Read a value derived from the current state
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Stop accepting new actions
        pub fn shutdown(&self) {
            tracing::info!("Store shutting down");
            self.shutdown.store(true, Ordering::Release);
        }
    }
}
