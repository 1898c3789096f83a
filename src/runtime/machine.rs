//! The live machine instance.

use super::definition::MachineDefinition;
use super::error::ConfigurationError;
use super::listener::{ListenerRegistry, SubscribeOptions, Subscription};
use super::lock;
use super::transition::Transition;
use crate::core::{
    freeze, merge, Action, Data, Event, Guard, HandlerArgs, Snapshot, State, StateHistory,
    StateTransition,
};
use chrono::Utc;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::thread::{self, ThreadId};
use tracing::{debug, trace, warn};

/// Data the machine evolves. Every field is replaced wholesale, never edited
/// in place, so snapshots handed out earlier stay valid.
struct Live<S: State> {
    state: S,
    context: Snapshot,
    props: Snapshot,
    history: StateHistory<S>,
}

struct Inner<S: State, E> {
    id: Option<String>,
    transitions: Vec<Transition<S>>,
    actions: HashMap<String, Action<E>>,
    guards: HashMap<String, Guard<E>>,
    live: Mutex<Live<S>>,
    running: AtomicBool,
    gate: DispatchGate,
    listeners: Arc<ListenerRegistry<S>>,
}

/// Serializes dispatches and remembers which thread owns the one in flight.
#[derive(Default)]
struct DispatchGate {
    serial: Mutex<()>,
    owner: Mutex<Option<ThreadId>>,
}

impl DispatchGate {
    /// `None` when the calling thread is already dispatching. Other threads
    /// block until the current dispatch finishes.
    fn enter(&self) -> Option<DispatchTurn<'_>> {
        let me = thread::current().id();
        if *lock(&self.owner) == Some(me) {
            return None;
        }
        let serial = lock(&self.serial);
        *lock(&self.owner) = Some(me);
        Some(DispatchTurn {
            gate: self,
            _serial: serial,
        })
    }
}

/// One thread's turn at dispatching. Released on every exit path, unwinding
/// included.
struct DispatchTurn<'a> {
    gate: &'a DispatchGate,
    _serial: MutexGuard<'a, ()>,
}

impl Drop for DispatchTurn<'_> {
    fn drop(&mut self) {
        // Runs before `_serial` is released.
        *lock(&self.gate.owner) = None;
    }
}

/// A running finite state machine.
///
/// `Machine` is a cheap handle: clones share the same instance. The instance
/// is freed when the last `Machine` handle is dropped. Actions and listeners
/// that need to call back into the machine should capture a
/// [`WeakMachine`] from [`Machine::downgrade`]; a captured `Machine` keeps
/// the instance alive forever.
///
/// Events are processed one at a time. A `send` made from inside a dispatch
/// (a guard, an action or a listener on the dispatching thread) is dropped,
/// not queued. A `send` from another thread waits for the dispatch in flight
/// to finish and is then applied.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::MachineBuilder;
/// use statecraft::runtime::Transition;
/// use serde_json::json;
///
/// let machine = MachineBuilder::<String, &'static str>::new()
///     .initial("idle".to_string())
///     .context(json!({"runs": 0}).as_object().unwrap().clone())
///     .transition(
///         Transition::new("idle".to_string(), "START", "running".to_string()).with_action("count"),
///     )
///     .transition(Transition::new("running".to_string(), "STOP", "idle".to_string()))
///     .action("count", |args| {
///         let runs = args.context["runs"].as_i64().unwrap_or(0);
///         json!({"runs": runs + 1}).as_object().cloned()
///     })
///     .build()
///     .unwrap();
///
/// machine.send("START").unwrap(); // not started yet, so ignored
/// assert_eq!(machine.get_state(), "idle");
///
/// machine.start();
/// machine.send("START").unwrap();
/// assert_eq!(machine.get_state(), "running");
/// assert_eq!(machine.get_context()["runs"], json!(1));
/// ```
pub struct Machine<S: State, E> {
    inner: Arc<Inner<S, E>>,
}

impl<S: State, E> Clone for Machine<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State, E: Event> Machine<S, E> {
    /// Create a stopped machine in the definition's initial state.
    pub fn new(definition: MachineDefinition<S, E>) -> Self {
        let MachineDefinition {
            id,
            initial,
            context,
            props,
            transitions,
            actions,
            guards,
            history_limit,
        } = definition;

        debug!(
            machine = id.as_deref().unwrap_or("<anonymous>"),
            initial = initial.name(),
            transitions = transitions.len(),
            "machine created"
        );

        Self {
            inner: Arc::new(Inner {
                id,
                transitions,
                actions,
                guards,
                live: Mutex::new(Live {
                    state: initial,
                    context: freeze(context),
                    props: freeze(props),
                    history: match history_limit {
                        Some(limit) => StateHistory::bounded(limit),
                        None => StateHistory::new(),
                    },
                }),
                running: AtomicBool::new(false),
                gate: DispatchGate::default(),
                listeners: Arc::new(ListenerRegistry::new()),
            }),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.inner.id.as_deref()
    }

    /// Begin accepting events. No-op when already running.
    pub fn start(&self) {
        if !self.inner.running.swap(true, Ordering::AcqRel) {
            debug!(machine = self.label(), "machine started");
        }
    }

    /// Stop accepting events. No-op when already stopped.
    ///
    /// Listeners stay registered; events sent while stopped are discarded.
    pub fn stop(&self) {
        if self.inner.running.swap(false, Ordering::AcqRel) {
            debug!(machine = self.label(), "machine stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Dispatch an event.
    ///
    /// Returns `Ok(())` when the event was applied and also when it was
    /// ignored: machine stopped, sent from inside a dispatch on the same
    /// thread, no matching transition, or every candidate rejected by its
    /// guard. Calls from other threads block while a dispatch is in flight.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::GuardNotFound`] when a candidate names an
    /// unregistered guard; nothing has changed at that point.
    /// [`ConfigurationError::ActionNotFound`] when the winning transition
    /// names an unregistered action; the new state is already committed and
    /// is kept, but listeners are not notified.
    pub fn send(&self, event: E) -> Result<(), ConfigurationError> {
        if !self.is_running() {
            trace!(
                machine = self.label(),
                event = event.event_type(),
                "machine stopped, event dropped"
            );
            return Ok(());
        }
        let Some(_turn) = self.inner.gate.enter() else {
            trace!(
                machine = self.label(),
                event = event.event_type(),
                "re-entrant send dropped"
            );
            return Ok(());
        };
        // May have been stopped while waiting for the gate.
        if !self.is_running() {
            return Ok(());
        }

        self.dispatch(&event).inspect_err(|err| {
            warn!(machine = self.label(), event = event.event_type(), %err, "dispatch failed");
        })
    }

    fn dispatch(&self, event: &E) -> Result<(), ConfigurationError> {
        let event_type = event.event_type();
        let (current, context, props) = {
            let live = lock(&self.inner.live);
            (live.state.clone(), live.context.clone(), live.props.clone())
        };
        let args = HandlerArgs {
            context,
            event,
            props,
        };

        let mut candidates = Vec::new();
        for transition in self
            .inner
            .transitions
            .iter()
            .filter(|t| t.accepts(&current, event_type))
        {
            if let Some(name) = &transition.guard {
                let guard = self.inner.guards.get(name).ok_or_else(|| {
                    ConfigurationError::GuardNotFound { name: name.clone() }
                })?;
                if !guard.check(&args) {
                    trace!(
                        guard = name.as_str(),
                        to = transition.to.name(),
                        "guard rejected transition"
                    );
                    continue;
                }
            }
            candidates.push(transition);
        }

        // Stable: equal priorities keep table order.
        candidates.sort_by(|a, b| b.priority.cmp(&a.priority));
        let Some(winner) = candidates.first().copied() else {
            debug!(
                machine = self.label(),
                state = current.name(),
                event = event_type,
                "no eligible transition"
            );
            return Ok(());
        };

        self.commit(&current, winner, event_type);

        if let Some(name) = &winner.action {
            let action = self
                .inner
                .actions
                .get(name)
                .ok_or_else(|| ConfigurationError::ActionNotFound { name: name.clone() })?;
            let (context, props) = {
                let live = lock(&self.inner.live);
                (live.context.clone(), live.props.clone())
            };
            let update = action.run(&HandlerArgs {
                context,
                event,
                props,
            });
            if let Some(update) = update.filter(|update| !update.is_empty()) {
                let mut live = lock(&self.inner.live);
                live.context = freeze(merge(&live.context, update));
            }
        }

        self.notify();
        Ok(())
    }

    fn commit(&self, from: &S, winner: &Transition<S>, event_type: &str) {
        let mut live = lock(&self.inner.live);
        live.history.push(StateTransition {
            from: from.clone(),
            to: winner.to.clone(),
            event: event_type.to_string(),
            timestamp: Utc::now(),
        });
        live.state = winner.to.clone();
        debug!(
            machine = self.label(),
            from = from.name(),
            to = winner.to.name(),
            event = event_type,
            "transition committed"
        );
    }

    fn notify(&self) {
        let (state, context, props) = self.snapshot();
        self.inner.listeners.notify(&state, &context, &props);
    }

    fn snapshot(&self) -> (S, Snapshot, Snapshot) {
        let live = lock(&self.inner.live);
        (live.state.clone(), live.context.clone(), live.props.clone())
    }

    /// Register a listener and call it once right away with the current
    /// snapshot.
    pub fn subscribe<F>(&self, listener: F) -> Subscription<S>
    where
        F: Fn(&S, &Snapshot, &Snapshot) + Send + Sync + 'static,
    {
        self.subscribe_with(listener, SubscribeOptions::default())
    }

    /// Register a listener; with `immediate: false` it is only called on the
    /// next transition or props sync.
    pub fn subscribe_with<F>(&self, listener: F, options: SubscribeOptions) -> Subscription<S>
    where
        F: Fn(&S, &Snapshot, &Snapshot) + Send + Sync + 'static,
    {
        let id = self.inner.listeners.add(Arc::new(listener));
        if options.immediate {
            let (state, context, props) = self.snapshot();
            self.inner.listeners.notify_one(id, &state, &context, &props);
        }
        Subscription::new(id, &self.inner.listeners)
    }

    /// True when the current state is one of `states`.
    pub fn matches(&self, states: &[S]) -> bool {
        let live = lock(&self.inner.live);
        states.contains(&live.state)
    }

    /// Shallow-merge `props` over the current props and notify listeners.
    ///
    /// Works whether or not the machine is running.
    pub fn sync_props(&self, props: Data) {
        {
            let mut live = lock(&self.inner.live);
            live.props = freeze(merge(&live.props, props));
        }
        self.notify();
    }

    pub fn get_state(&self) -> S {
        lock(&self.inner.live).state.clone()
    }

    /// Frozen view of the context as of this call.
    pub fn get_context(&self) -> Snapshot {
        lock(&self.inner.live).context.clone()
    }

    /// Frozen view of the props as of this call.
    pub fn get_props(&self) -> Snapshot {
        lock(&self.inner.live).props.clone()
    }

    /// Copy of the retained history, oldest first. Bounded by the history
    /// limit the machine was built with.
    pub fn history(&self) -> StateHistory<S> {
        lock(&self.inner.live).history.clone()
    }

    pub fn history_len(&self) -> usize {
        lock(&self.inner.live).history.len()
    }

    /// Non-owning handle for actions and listeners to capture.
    pub fn downgrade(&self) -> WeakMachine<S, E> {
        WeakMachine {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn is_final(&self) -> bool {
        lock(&self.inner.live).state.is_final()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    fn label(&self) -> &str {
        self.id().unwrap_or("<anonymous>")
    }
}

/// Non-owning handle to a [`Machine`]; does not keep the instance alive.
pub struct WeakMachine<S: State, E> {
    inner: Weak<Inner<S, E>>,
}

impl<S: State, E> WeakMachine<S, E> {
    /// The machine, if any `Machine` handle to it still exists.
    pub fn upgrade(&self) -> Option<Machine<S, E>> {
        self.inner.upgrade().map(|inner| Machine { inner })
    }
}

impl<S: State, E> Clone for WeakMachine<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S: State, E> fmt::Debug for WeakMachine<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakMachine")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<S: State, E> fmt::Debug for Machine<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let live = lock(&self.inner.live);
        f.debug_struct("Machine")
            .field("id", &self.inner.id)
            .field("state", &live.state)
            .field("context", &*live.context)
            .field("props", &*live.props)
            .field("running", &self.inner.running.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}
