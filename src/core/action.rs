//! Actions run after a transition has been committed.

use super::guard::HandlerArgs;
use super::snapshot::Data;
use std::fmt;
use std::sync::Arc;

type Handler<E> = dyn Fn(&HandlerArgs<'_, E>) -> Option<Data> + Send + Sync;

/// Named side-effecting handler referenced by transitions.
///
/// Returning `Some(update)` shallow-merges `update` into the context;
/// returning `None` (or an empty map) leaves the context as it was.
pub struct Action<E> {
    handler: Arc<Handler<E>>,
}

impl<E> Action<E> {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&HandlerArgs<'_, E>) -> Option<Data> + Send + Sync + 'static,
    {
        Action {
            handler: Arc::new(handler),
        }
    }

    /// Action that only performs side effects and never touches the context.
    pub fn effect<F>(effect: F) -> Self
    where
        F: Fn(&HandlerArgs<'_, E>) + Send + Sync + 'static,
    {
        Self::new(move |args| {
            effect(args);
            None
        })
    }

    pub fn run(&self, args: &HandlerArgs<'_, E>) -> Option<Data> {
        (self.handler)(args)
    }
}

impl<E> Clone for Action<E> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<E> fmt::Debug for Action<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{freeze, Message};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn action_returns_context_update() {
        let bump = Action::<Message>::new(|args| {
            let count = args.context["count"].as_i64().unwrap_or(0);
            json!({"count": count + 10}).as_object().cloned()
        });
        let event = Message::new("INC");
        let args = HandlerArgs {
            context: freeze(json!({"count": 5}).as_object().cloned().unwrap()),
            event: &event,
            props: freeze(Data::new()),
        };

        let update = bump.run(&args).unwrap();
        assert_eq!(update["count"], json!(15));
    }

    #[test]
    fn effect_action_returns_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let log = Action::<Message>::effect(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let event = Message::new("PING");
        let args = HandlerArgs {
            context: freeze(Data::new()),
            event: &event,
            props: freeze(Data::new()),
        };

        assert!(log.run(&args).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
