//! The machine runtime: event dispatch, transition resolution, context
//! updates, subscriptions and the start/stop lifecycle.
//!
//! # Dispatch
//!
//! For each `send`, the runtime:
//!
//! 1. drops the event if the machine is stopped or the calling thread is
//!    already dispatching; other threads wait their turn
//! 2. collects transitions whose source matches the current state (or is the
//!    wildcard) and whose event tag matches, keeping those whose guard passes
//! 3. picks the highest `priority`, earliest in the table on ties
//! 4. commits the target state, runs the action and merges its update into
//!    the context
//! 5. notifies every subscriber with the new state, context and props
//!
//! Guards, actions and listeners run synchronously inside the call that
//! triggered them.

mod definition;
mod error;
mod listener;
mod machine;
mod transition;

pub use definition::{MachineDefinition, DEFAULT_HISTORY_LIMIT};
pub use error::ConfigurationError;
pub use listener::{Listener, SubscribeOptions, Subscription};
pub use machine::{Machine, WeakMachine};
pub use transition::{StateMatcher, Transition, WILDCARD};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a runtime mutex, ignoring poison. Data locks are never held while
/// handlers run, and the dispatch gate guards no data, so a panicking handler
/// cannot leave anything half-written.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
