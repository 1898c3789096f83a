//! Declarative machine configuration loaded from JSON.
//!
//! The table, initial state and data come from configuration; handlers are
//! attached in code by the names the table uses.

use crate::builder::error::BuildError;
use crate::builder::machine::MachineBuilder;
use crate::core::{Data, Event, State};
use crate::runtime::Transition;
use serde::{Deserialize, Serialize};

/// Serializable part of a machine definition.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::MachineConfig;
/// use statecraft::core::Message;
///
/// let config: MachineConfig<String> = MachineConfig::from_json(r#"{
///     "id": "door",
///     "initial": "closed",
///     "transitions": [
///         { "from": "closed", "event": "OPEN", "to": "open" },
///         { "from": "*", "event": "SLAM", "to": "closed", "action": "shout" }
///     ]
/// }"#).unwrap();
///
/// let machine = config
///     .into_builder::<Message>()
///     .action("shout", |_| None)
///     .strict()
///     .build()
///     .unwrap();
///
/// machine.start();
/// machine.send(Message::new("OPEN")).unwrap();
/// assert_eq!(machine.get_state(), "open");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MachineConfig<S: State> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub initial: S,
    #[serde(default)]
    pub context: Data,
    #[serde(default)]
    pub props: Data,
    pub transitions: Vec<Transition<S>>,
}

impl<S: State> MachineConfig<S> {
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Start a builder pre-filled with this configuration.
    pub fn into_builder<E: Event>(self) -> MachineBuilder<S, E> {
        let builder = MachineBuilder::new()
            .initial(self.initial)
            .context(self.context)
            .props(self.props)
            .transitions(self.transitions);
        match self.id {
            Some(id) => builder.id(id),
            None => builder,
        }
    }
}
