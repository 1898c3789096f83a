//! Guard predicates deciding whether a transition is eligible.
//!
//! Guards see the same [`HandlerArgs`] as actions but cannot change anything:
//! they only answer yes or no for the event being dispatched.

use super::snapshot::Snapshot;
use std::fmt;
use std::sync::Arc;

/// Arguments handed to guards and actions during a dispatch.
///
/// `context` and `props` are frozen snapshots of the machine's data at the
/// moment the handler is called.
#[derive(Debug)]
pub struct HandlerArgs<'a, E> {
    pub context: Snapshot,
    pub event: &'a E,
    pub props: Snapshot,
}

type Predicate<E> = dyn Fn(&HandlerArgs<'_, E>) -> bool + Send + Sync;

/// Named predicate registered on a machine and referenced by transitions.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{freeze, Guard, HandlerArgs, Message};
/// use serde_json::json;
///
/// let has_credit = Guard::<Message>::new(|args| {
///     args.context.get("credit").and_then(|v| v.as_i64()).unwrap_or(0) > 0
/// });
///
/// let event = Message::new("BUY");
/// let args = HandlerArgs {
///     context: freeze(json!({"credit": 3}).as_object().unwrap().clone()),
///     event: &event,
///     props: freeze(Default::default()),
/// };
/// assert!(has_credit.check(&args));
/// ```
pub struct Guard<E> {
    predicate: Arc<Predicate<E>>,
}

impl<E> Guard<E> {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&HandlerArgs<'_, E>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    pub fn check(&self, args: &HandlerArgs<'_, E>) -> bool {
        (self.predicate)(args)
    }
}

impl<E> Clone for Guard<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<E> fmt::Debug for Guard<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{freeze, Data, Event, Message};
    use serde_json::json;

    fn args<'a>(context: serde_json::Value, event: &'a Message) -> HandlerArgs<'a, Message> {
        HandlerArgs {
            context: freeze(context.as_object().cloned().unwrap()),
            event,
            props: freeze(Data::new()),
        }
    }

    #[test]
    fn guard_reads_context() {
        let guard = Guard::<Message>::new(|a| a.context["open"] == json!(true));
        let event = Message::new("PUSH");

        assert!(guard.check(&args(json!({"open": true}), &event)));
        assert!(!guard.check(&args(json!({"open": false}), &event)));
    }

    #[test]
    fn guard_reads_event_payload() {
        let guard = Guard::<Message>::new(|a| {
            a.event.event_type() == "PAY" && a.event.get("amount") == Some(&json!(10))
        });
        let exact = Message::new("PAY").with("amount", json!(10));
        let short = Message::new("PAY").with("amount", json!(5));

        assert!(guard.check(&args(json!({}), &exact)));
        assert!(!guard.check(&args(json!({}), &short)));
    }

    #[test]
    fn cloned_guard_shares_predicate() {
        let guard = Guard::<Message>::new(|_| true);
        let copy = guard.clone();
        let event = Message::new("ANY");

        assert_eq!(guard.check(&args(json!({}), &event)), copy.check(&args(json!({}), &event)));
    }
}
