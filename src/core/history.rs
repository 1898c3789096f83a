//! Log of committed transitions.
//!
//! Appends are amortized O(1). A history can be bounded, in which case only
//! the most recent entries are kept.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single committed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    pub from: S,
    pub to: S,
    /// Type tag of the event that caused the move.
    pub event: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of committed transitions, oldest first.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: "idle".to_string(),
///         to: "running".to_string(),
///         event: "START".to_string(),
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: "running".to_string(),
///         to: "idle".to_string(),
///         event: "STOP".to_string(),
///         timestamp: Utc::now(),
///     });
///
/// let path: Vec<&str> = history.get_path().iter().map(|s| s.as_str()).collect();
/// assert_eq!(path, ["idle", "running", "idle"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Unbounded history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            limit: None,
        }
    }

    /// History keeping at most `limit` of the latest transitions. A limit of
    /// zero records nothing.
    pub fn bounded(limit: usize) -> Self {
        Self {
            transitions: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Append `transition`, evicting the oldest entries past the limit.
    pub fn push(&mut self, transition: StateTransition<S>) {
        if self.limit == Some(0) {
            return;
        }
        self.transitions.push(transition);
        if let Some(limit) = self.limit {
            // Evict in batches so each push stays amortized O(1).
            if self.transitions.len() >= limit.saturating_mul(2) {
                let excess = self.transitions.len() - limit;
                self.transitions.drain(..excess);
            }
        }
    }

    /// Builder-style [`push`](Self::push).
    pub fn record(mut self, transition: StateTransition<S>) -> Self {
        self.push(transition);
        self
    }

    /// States traversed, starting with the first recorded `from`.
    pub fn get_path(&self) -> Vec<&S> {
        let transitions = self.transitions();
        let mut path = Vec::with_capacity(transitions.len() + 1);
        if let Some(first) = transitions.first() {
            path.push(&first.from);
        }
        for transition in transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last recorded transitions.
    pub fn duration(&self) -> Option<Duration> {
        let transitions = self.transitions();
        let (first, last) = (transitions.first()?, transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        let skip = match self.limit {
            Some(limit) => self.transitions.len().saturating_sub(limit),
            None => 0,
        };
        &self.transitions[skip..]
    }

    pub fn len(&self) -> usize {
        self.transitions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions().is_empty()
    }
}
