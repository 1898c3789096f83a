//! Core building blocks shared by the runtime and the builders.
//!
//! - [`State`] tags and [`Event`]s
//! - frozen [`Snapshot`] data with the [`merge`] and [`freeze`] helpers
//! - [`Guard`] and [`Action`] handler wrappers
//! - the immutable [`StateHistory`] log
//!
//! Nothing in this module holds mutable state; the runtime owns all of it.

mod action;
mod event;
mod guard;
mod history;
mod snapshot;
mod state;

pub use action::Action;
pub use event::{Event, Message};
pub use guard::{Guard, HandlerArgs};
pub use history::{StateHistory, StateTransition};
pub use snapshot::{freeze, merge, Data, Snapshot};
pub use state::State;
