//! Events driving transition lookup.

use super::snapshot::Data;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// Anything that can be sent to a machine.
///
/// Only the type tag takes part in transition lookup; any payload is
/// opaque to the runtime and reaches guards and actions untouched.
pub trait Event: Debug + Send + Sync {
    /// Tag matched against the `event` field of each transition.
    fn event_type(&self) -> &str;
}

impl Event for &'static str {
    fn event_type(&self) -> &str {
        self
    }
}

impl Event for String {
    fn event_type(&self) -> &str {
        self.as_str()
    }
}

/// General-purpose event record: a type tag plus a JSON payload.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{Event, Message};
/// use serde_json::json;
///
/// let event = Message::new("DEPOSIT").with("amount", json!(25));
/// assert_eq!(event.event_type(), "DEPOSIT");
/// assert_eq!(event.payload["amount"], json!(25));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub payload: Data,
}

impl Message {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Data::new(),
        }
    }

    /// Attach a payload field.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

impl Event for Message {
    fn event_type(&self) -> &str {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn str_and_string_events_are_their_own_type() {
        assert_eq!("RESET".event_type(), "RESET");
        assert_eq!(String::from("TICK").event_type(), "TICK");
    }

    #[test]
    fn message_carries_payload() {
        let event = Message::new("MOVE").with("dx", json!(3)).with("dy", json!(-1));
        assert_eq!(event.event_type(), "MOVE");
        assert_eq!(event.get("dx"), Some(&json!(3)));
        assert_eq!(event.get("dz"), None);
    }

    #[test]
    fn message_deserializes_from_flat_record() {
        let event: Message = serde_json::from_str(r#"{"type":"ADD","amount":4}"#).unwrap();
        assert_eq!(event.kind, "ADD");
        assert_eq!(event.get("amount"), Some(&json!(4)));
    }
}
