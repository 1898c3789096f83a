//! Builder API for ergonomic machine construction.
//!
//! This module provides fluent builders, a JSON-loadable configuration and
//! the `state_enum!` macro for declaring machines with minimal boilerplate.

pub mod config;
pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use config::MachineConfig;
pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::State;
use crate::runtime::{StateMatcher, Transition};

/// Unguarded, action-free transition from one state to another.
///
/// # Example
///
/// ```
/// use statecraft::builder::simple_transition;
/// use statecraft::state_enum;
///
/// state_enum! {
///     enum Light {
///         Red,
///         Green,
///     }
/// }
///
/// let t = simple_transition(Light::Red, "NEXT", Light::Green);
/// assert!(t.accepts(&Light::Red, "NEXT"));
/// ```
pub fn simple_transition<S: State>(from: S, event: &str, to: S) -> Transition<S> {
    Transition::new(from, event, to)
}

/// Transition that fires from any state.
///
/// # Example
///
/// ```
/// use statecraft::builder::wildcard_transition;
/// use statecraft::state_enum;
///
/// state_enum! {
///     enum Light {
///         Red,
///         Green,
///         Off,
///     }
/// }
///
/// let t = wildcard_transition("POWER_CUT", Light::Off);
/// assert!(t.accepts(&Light::Red, "POWER_CUT"));
/// assert!(t.accepts(&Light::Green, "POWER_CUT"));
/// ```
pub fn wildcard_transition<S: State>(event: &str, to: S) -> Transition<S> {
    Transition::new(StateMatcher::Any, event, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum Step {
            One,
            Two,
        }
    }

    #[test]
    fn simple_transition_has_no_handlers() {
        let t = simple_transition(Step::One, "NEXT", Step::Two);

        assert_eq!(t.from, StateMatcher::Exact(Step::One));
        assert!(t.guard.is_none());
        assert!(t.action.is_none());
    }

    #[test]
    fn wildcard_transition_matches_every_state() {
        let t = wildcard_transition("BACK", Step::One);

        assert!(t.accepts(&Step::One, "BACK"));
        assert!(t.accepts(&Step::Two, "BACK"));
        assert!(!t.accepts(&Step::Two, "NEXT"));
    }
}
