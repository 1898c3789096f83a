//! Builder for constructing transition records.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::runtime::{StateMatcher, Transition};

/// Builder for constructing transitions with a fluent API.
///
/// ```rust
/// use statecraft::builder::TransitionBuilder;
///
/// let t = TransitionBuilder::new()
///     .from("locked".to_string())
///     .on("COIN")
///     .to("unlocked".to_string())
///     .guard("hasCredit")
///     .priority(2)
///     .build()
///     .unwrap();
///
/// assert_eq!(t.event, "COIN");
/// assert_eq!(t.priority, 2);
/// ```
#[derive(Debug)]
pub struct TransitionBuilder<S: State> {
    from: Option<StateMatcher<S>>,
    event: Option<String>,
    to: Option<S>,
    action: Option<String>,
    guard: Option<String>,
    priority: i32,
}

impl<S: State> TransitionBuilder<S> {
    pub fn new() -> Self {
        Self {
            from: None,
            event: None,
            to: None,
            action: None,
            guard: None,
            priority: 0,
        }
    }

    /// Set the source state (this or `from_any` is required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(StateMatcher::from(state));
        self
    }

    /// Match any current state.
    pub fn from_any(mut self) -> Self {
        self.from = Some(StateMatcher::Any);
        self
    }

    /// Set the event tag (required).
    pub fn on(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Name the action to run after the transition commits (optional).
    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.action = Some(name.into());
        self
    }

    /// Name the guard gating this transition (optional).
    pub fn guard(mut self, name: impl Into<String>) -> Self {
        self.guard = Some(name.into());
        self
    }

    /// Tie-break weight; higher wins. Defaults to 0.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn build(self) -> Result<Transition<S>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let event = self.event.ok_or(BuildError::MissingEvent)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(Transition {
            from,
            event,
            to,
            action: self.action,
            guard: self.guard,
            priority: self.priority,
        })
    }
}

impl<S: State> Default for TransitionBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum Turnstile {
            Locked,
            Unlocked,
        }
    }

    #[test]
    fn builder_validates_required_fields() {
        let missing_from = TransitionBuilder::<Turnstile>::new()
            .on("COIN")
            .to(Turnstile::Unlocked)
            .build();
        let missing_event = TransitionBuilder::new()
            .from(Turnstile::Locked)
            .to(Turnstile::Unlocked)
            .build();
        let missing_to = TransitionBuilder::new()
            .from(Turnstile::Locked)
            .on("COIN")
            .build();

        assert!(matches!(missing_from, Err(BuildError::MissingFromState)));
        assert!(matches!(missing_event, Err(BuildError::MissingEvent)));
        assert!(matches!(missing_to, Err(BuildError::MissingToState)));
    }

    #[test]
    fn fluent_api_builds_transition() {
        let t = TransitionBuilder::new()
            .from(Turnstile::Locked)
            .on("COIN")
            .to(Turnstile::Unlocked)
            .action("thank")
            .build()
            .unwrap();

        assert_eq!(t.from, StateMatcher::Exact(Turnstile::Locked));
        assert_eq!(t.to, Turnstile::Unlocked);
        assert_eq!(t.action.as_deref(), Some("thank"));
        assert!(t.guard.is_none());
        assert_eq!(t.priority, 0);
    }

    #[test]
    fn from_any_builds_wildcard() {
        let t = TransitionBuilder::new()
            .from_any()
            .on("RESET")
            .to(Turnstile::Locked)
            .build()
            .unwrap();

        assert!(t.accepts(&Turnstile::Unlocked, "RESET"));
        assert!(t.accepts(&Turnstile::Locked, "RESET"));
    }
}
