//! Immutable description a machine is created from.

use super::error::ConfigurationError;
use super::transition::Transition;
use crate::core::{Action, Data, Guard, State};
use std::collections::{HashMap, HashSet};
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Number of transitions a machine keeps in its history unless told
/// otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// Everything needed to create a [`Machine`](crate::runtime::Machine).
///
/// Handlers are looked up by name at dispatch time, so a definition may
/// reference names that are not registered. Call [`validate`](Self::validate)
/// to find those up front.
pub struct MachineDefinition<S: State, E> {
    pub id: Option<String>,
    pub initial: S,
    pub context: Data,
    pub props: Data,
    pub transitions: Vec<Transition<S>>,
    pub actions: HashMap<String, Action<E>>,
    pub guards: HashMap<String, Guard<E>>,
    /// Cap on retained history entries; `None` keeps every transition.
    pub history_limit: Option<usize>,
}

impl<S: State, E> MachineDefinition<S, E> {
    /// Definition with empty context, props, table and handler maps, and the
    /// default history limit.
    pub fn new(initial: S) -> Self {
        Self {
            id: None,
            initial,
            context: Data::new(),
            props: Data::new(),
            transitions: Vec::new(),
            actions: HashMap::new(),
            guards: HashMap::new(),
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }

    /// Check that every guard and action named in the table is registered.
    ///
    /// Reports every unresolved name at once rather than stopping at the
    /// first; each name is reported once per handler kind.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigurationError>> {
        let mut seen = HashSet::new();
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigurationError>>> = Vec::new();

        for transition in &self.transitions {
            if let Some(name) = &transition.guard {
                if !self.guards.contains_key(name) && seen.insert(("guard", name.as_str())) {
                    checks.push(Validation::fail(ConfigurationError::GuardNotFound {
                        name: name.clone(),
                    }));
                }
            }
            if let Some(name) = &transition.action {
                if !self.actions.contains_key(name) && seen.insert(("action", name.as_str())) {
                    checks.push(Validation::fail(ConfigurationError::ActionNotFound {
                        name: name.clone(),
                    }));
                }
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

impl<S: State, E> fmt::Debug for MachineDefinition<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<&String> = self.actions.keys().collect();
        let mut guards: Vec<&String> = self.guards.keys().collect();
        actions.sort();
        guards.sort();

        f.debug_struct("MachineDefinition")
            .field("id", &self.id)
            .field("initial", &self.initial)
            .field("context", &self.context)
            .field("props", &self.props)
            .field("transitions", &self.transitions)
            .field("actions", &actions)
            .field("guards", &guards)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Message;

    fn definition() -> MachineDefinition<String, Message> {
        let mut definition = MachineDefinition::new("idle".to_string());
        definition.transitions = vec![
            Transition::new("idle".to_string(), "GO", "busy".to_string())
                .with_guard("ready")
                .with_action("start"),
            Transition::new("busy".to_string(), "DONE", "idle".to_string()).with_action("finish"),
            Transition::new("busy".to_string(), "FAIL", "idle".to_string()).with_action("finish"),
        ];
        definition
    }

    #[test]
    fn new_definition_has_empty_maps() {
        let definition: MachineDefinition<String, Message> = MachineDefinition::new("a".into());
        assert!(definition.id.is_none());
        assert!(definition.context.is_empty());
        assert!(definition.props.is_empty());
        assert!(definition.transitions.is_empty());
        assert_eq!(definition.history_limit, Some(DEFAULT_HISTORY_LIMIT));
        assert!(definition.validate().is_success());
    }

    #[test]
    fn validate_reports_every_missing_handler_once() {
        let definition = definition();

        match definition.validate() {
            Validation::Failure(errors) => {
                let mut names: Vec<&str> = errors.iter().map(|e| e.handler_name()).collect();
                names.sort_unstable();
                assert_eq!(errors.len(), 3);
                assert_eq!(names, vec!["finish", "ready", "start"]);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigurationError::GuardNotFound { .. })));
            }
            Validation::Success(_) => panic!("expected missing handlers"),
        }
    }

    #[test]
    fn validate_passes_once_handlers_are_registered() {
        let mut definition = definition();
        definition
            .guards
            .insert("ready".into(), Guard::<Message>::new(|_| true));
        definition
            .actions
            .insert("start".into(), Action::<Message>::new(|_| None));
        definition
            .actions
            .insert("finish".into(), Action::<Message>::new(|_| None));

        assert!(definition.validate().is_success());
    }
}
