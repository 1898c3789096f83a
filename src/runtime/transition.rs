//! Transition records making up a machine's table.

use crate::core::State;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Tag accepted in place of a source state to match any current state.
pub const WILDCARD: &str = "*";

/// Source side of a transition: one specific state, or any state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateMatcher<S> {
    Any,
    Exact(S),
}

impl<S: State> StateMatcher<S> {
    pub fn matches(&self, state: &S) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == state,
        }
    }
}

/// A state named `"*"` converts to [`StateMatcher::Any`], matching how the
/// wildcard deserializes.
impl<S: State> From<S> for StateMatcher<S> {
    fn from(state: S) -> Self {
        if state.name() == WILDCARD {
            Self::Any
        } else {
            Self::Exact(state)
        }
    }
}

impl<S: State> Serialize for StateMatcher<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        match self {
            Self::Any => serializer.serialize_str(WILDCARD),
            Self::Exact(state) => state.serialize(serializer),
        }
    }
}

impl<'de, S: State> Deserialize<'de> for StateMatcher<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.as_str() == Some(WILDCARD) {
            return Ok(Self::Any);
        }
        S::deserialize(value)
            .map(Self::Exact)
            .map_err(de::Error::custom)
    }
}

/// One row of the transition table.
///
/// Table order matters: among eligible transitions with equal `priority`,
/// the one listed first wins.
///
/// # Example
///
/// ```rust
/// use statecraft::runtime::{StateMatcher, Transition};
///
/// let t = Transition::new("idle".to_string(), "START", "running".to_string())
///     .with_guard("hasFuel")
///     .with_action("ignite")
///     .with_priority(5);
///
/// assert!(t.accepts(&"idle".to_string(), "START"));
/// assert!(!t.accepts(&"idle".to_string(), "STOP"));
///
/// let reset = Transition::new(StateMatcher::Any, "RESET", "idle".to_string());
/// assert!(reset.accepts(&"running".to_string(), "RESET"));
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "")]
pub struct Transition<S: State> {
    pub from: StateMatcher<S>,
    pub event: String,
    pub to: S,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<String>,
    #[serde(default)]
    pub priority: i32,
}

impl<S: State> Transition<S> {
    pub fn new(from: impl Into<StateMatcher<S>>, event: impl Into<String>, to: S) -> Self {
        Self {
            from: from.into(),
            event: event.into(),
            to,
            action: None,
            guard: None,
            priority: 0,
        }
    }

    pub fn with_action(mut self, name: impl Into<String>) -> Self {
        self.action = Some(name.into());
        self
    }

    pub fn with_guard(mut self, name: impl Into<String>) -> Self {
        self.guard = Some(name.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether this row applies to `event_type` while in `state`, ignoring guards.
    pub fn accepts(&self, state: &S, event_type: &str) -> bool {
        self.event == event_type && self.from.matches(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;
    use serde_json::json;

    state_enum! {
        enum Door {
            Open,
            Closed,
            Locked,
        }
    }

    #[test]
    fn exact_source_only_matches_that_state() {
        let t = Transition::new(Door::Closed, "LOCK", Door::Locked);

        assert!(t.accepts(&Door::Closed, "LOCK"));
        assert!(!t.accepts(&Door::Open, "LOCK"));
        assert!(!t.accepts(&Door::Closed, "OPEN"));
    }

    #[test]
    fn wildcard_matches_every_state() {
        let t = Transition::new(StateMatcher::Any, "RESET", Door::Closed);

        assert!(t.accepts(&Door::Open, "RESET"));
        assert!(t.accepts(&Door::Closed, "RESET"));
        assert!(t.accepts(&Door::Locked, "RESET"));
    }

    #[test]
    fn priority_defaults_to_zero() {
        let t = Transition::new(Door::Open, "CLOSE", Door::Closed);
        assert_eq!(t.priority, 0);
        assert!(t.action.is_none());
        assert!(t.guard.is_none());
    }

    #[test]
    fn wildcard_deserializes_from_star() {
        let t: Transition<Door> =
            serde_json::from_value(json!({"from": "*", "event": "RESET", "to": "Closed"})).unwrap();

        assert_eq!(t.from, StateMatcher::Any);
        assert_eq!(t.to, Door::Closed);
        assert_eq!(t.priority, 0);
    }

    #[test]
    fn optional_fields_deserialize() {
        let t: Transition<Door> = serde_json::from_value(json!({
            "from": "Closed",
            "event": "LOCK",
            "to": "Locked",
            "guard": "hasKey",
            "action": "logLock",
            "priority": 3
        }))
        .unwrap();

        assert_eq!(t.from, StateMatcher::Exact(Door::Closed));
        assert_eq!(t.guard.as_deref(), Some("hasKey"));
        assert_eq!(t.action.as_deref(), Some("logLock"));
        assert_eq!(t.priority, 3);
    }

    #[test]
    fn unknown_source_state_is_rejected() {
        let result: Result<Transition<Door>, _> =
            serde_json::from_value(json!({"from": "Ajar", "event": "X", "to": "Open"}));
        assert!(result.is_err());
    }

    #[test]
    fn star_named_string_state_is_the_wildcard() {
        let t = Transition::new(WILDCARD.to_string(), "RESET", "idle".to_string());

        assert_eq!(t.from, StateMatcher::Any);
        assert!(t.accepts(&"busy".to_string(), "RESET"));
        assert!(t.accepts(&"idle".to_string(), "RESET"));

        let back: Transition<String> =
            serde_json::from_value(serde_json::to_value(&t).unwrap()).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn wildcard_serializes_back_to_star() {
        let t = Transition::new(StateMatcher::Any, "RESET", Door::Open);
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value, json!({"from": "*", "event": "RESET", "to": "Open", "priority": 0}));
    }
}
