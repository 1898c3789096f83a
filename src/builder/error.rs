//! Build errors for machine and transition builders.

use crate::runtime::ConfigurationError;
use thiserror::Error;

/// Errors that can occur when building machines and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Transition source state not specified. Call .from(state) or .from_any()")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Transition event not specified. Call .on(event)")]
    MissingEvent,

    #[error("Transition table references unregistered handlers: {}", list(.0))]
    InvalidHandlers(Vec<ConfigurationError>),

    #[error("Invalid machine configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

fn list(errors: &[ConfigurationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_handlers_lists_every_name() {
        let err = BuildError::InvalidHandlers(vec![
            ConfigurationError::GuardNotFound { name: "g".into() },
            ConfigurationError::ActionNotFound { name: "a".into() },
        ]);

        assert_eq!(
            err.to_string(),
            "Transition table references unregistered handlers: Guard not found: g, Action not found: a"
        );
    }
}
