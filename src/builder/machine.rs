//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Action, Data, Event, Guard, HandlerArgs, State};
use crate::runtime::{Machine, MachineDefinition, Transition, DEFAULT_HISTORY_LIMIT};
use std::collections::HashMap;
use stillwater::validation::Validation;

/// Builder for constructing machines with a fluent API.
pub struct MachineBuilder<S: State, E> {
    id: Option<String>,
    initial: Option<S>,
    context: Data,
    props: Data,
    transitions: Vec<Transition<S>>,
    actions: HashMap<String, Action<E>>,
    guards: HashMap<String, Guard<E>>,
    history_limit: Option<usize>,
    strict: bool,
}

impl<S: State, E: Event> MachineBuilder<S, E> {
    pub fn new() -> Self {
        Self {
            id: None,
            initial: None,
            context: Data::new(),
            props: Data::new(),
            transitions: Vec::new(),
            actions: HashMap::new(),
            guards: HashMap::new(),
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            strict: false,
        }
    }

    /// Label exposed through [`Machine::id`]; no effect on behavior.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    pub fn context(mut self, context: Data) -> Self {
        self.context = context;
        self
    }

    pub fn props(mut self, props: Data) -> Self {
        self.props = props;
        self
    }

    /// Append a row to the transition table.
    pub fn transition(mut self, transition: Transition<S>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Append a row built with a [`TransitionBuilder`].
    /// Returns an error if the builder fails validation.
    pub fn transition_with(mut self, builder: TransitionBuilder<S>) -> Result<Self, BuildError> {
        self.transitions.push(builder.build()?);
        Ok(self)
    }

    /// Append several rows, keeping their order.
    pub fn transitions(mut self, transitions: impl IntoIterator<Item = Transition<S>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Register an action under `name`, replacing any previous one.
    pub fn action<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&HandlerArgs<'_, E>) -> Option<Data> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Action::new(handler));
        self
    }

    /// Register a guard under `name`, replacing any previous one.
    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&HandlerArgs<'_, E>) -> bool + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
        self
    }

    /// Cap the number of transitions kept by [`Machine::history`]. `None`
    /// keeps all of them; `Some(0)` disables recording.
    pub fn history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }

    /// Reject the build if any guard or action named in the table is not
    /// registered, instead of failing at dispatch time.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Assemble the definition without creating a machine.
    pub fn definition(self) -> Result<MachineDefinition<S, E>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        let definition = MachineDefinition {
            id: self.id,
            initial,
            context: self.context,
            props: self.props,
            transitions: self.transitions,
            actions: self.actions,
            guards: self.guards,
            history_limit: self.history_limit,
        };

        if self.strict {
            if let Validation::Failure(errors) = definition.validate() {
                return Err(BuildError::InvalidHandlers(errors.iter().cloned().collect()));
            }
        }

        Ok(definition)
    }

    /// Build the machine. It starts out stopped.
    pub fn build(self) -> Result<Machine<S, E>, BuildError> {
        self.definition().map(Machine::new)
    }
}

impl<S: State, E: Event> Default for MachineBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
