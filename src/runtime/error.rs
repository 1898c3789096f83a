//! Errors raised while dispatching an event.

use thiserror::Error;

/// A transition references a handler that was never registered.
///
/// Both variants surface from [`Machine::send`](crate::runtime::Machine::send).
/// A missing guard aborts before anything changes; a missing action is only
/// noticed after the target state has been committed, and that commit stays.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Guard not found: {name}")]
    GuardNotFound { name: String },

    #[error("Action not found: {name}")]
    ActionNotFound { name: String },
}

impl ConfigurationError {
    /// Name of the handler that could not be resolved.
    pub fn handler_name(&self) -> &str {
        match self {
            Self::GuardNotFound { name } | Self::ActionNotFound { name } => name,
        }
    }
}
