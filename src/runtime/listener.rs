//! Subscriber registry and notification passes.

use super::lock;
use crate::core::{Snapshot, State};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};
use tracing::error;

/// Callback receiving `(state, context, props)` after every transition and
/// every props sync.
pub type Listener<S> = Arc<dyn Fn(&S, &Snapshot, &Snapshot) + Send + Sync>;

/// Options for [`Machine::subscribe_with`](crate::runtime::Machine::subscribe_with).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Call the listener once with the current snapshot before returning.
    pub immediate: bool,
}

impl Default for SubscribeOptions {
    fn default() -> Self {
        Self { immediate: true }
    }
}

struct Entries<S> {
    next_id: u64,
    listeners: BTreeMap<u64, Listener<S>>,
}

pub(crate) struct ListenerRegistry<S> {
    entries: Mutex<Entries<S>>,
}

impl<S: State> ListenerRegistry<S> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Entries {
                next_id: 0,
                listeners: BTreeMap::new(),
            }),
        }
    }

    pub(crate) fn add(&self, listener: Listener<S>) -> u64 {
        let mut entries = lock(&self.entries);
        let id = entries.next_id;
        entries.next_id += 1;
        entries.listeners.insert(id, listener);
        id
    }

    pub(crate) fn remove(&self, id: u64) -> bool {
        lock(&self.entries).listeners.remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.entries).listeners.len()
    }

    fn contains(&self, id: u64) -> bool {
        lock(&self.entries).listeners.contains_key(&id)
    }

    /// Deliver one snapshot to every registered listener.
    ///
    /// Iterates over the listeners registered when the pass starts. A listener
    /// removed mid-pass is skipped if its turn has not come yet; listeners
    /// added mid-pass wait for the next one. Panics are reported and do not
    /// stop the pass.
    pub(crate) fn notify(&self, state: &S, context: &Snapshot, props: &Snapshot) {
        let pass: Vec<(u64, Listener<S>)> = lock(&self.entries)
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        for (id, listener) in pass {
            if self.contains(id) {
                invoke(id, &listener, state, context, props);
            }
        }
    }

    pub(crate) fn notify_one(&self, id: u64, state: &S, context: &Snapshot, props: &Snapshot) {
        let listener = lock(&self.entries).listeners.get(&id).cloned();
        if let Some(listener) = listener {
            invoke(id, &listener, state, context, props);
        }
    }
}

fn invoke<S: State>(
    id: u64,
    listener: &Listener<S>,
    state: &S,
    context: &Snapshot,
    props: &Snapshot,
) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(state, context, props)));
    if let Err(payload) = outcome {
        error!(
            listener = id,
            state = state.name(),
            reason = panic_message(&*payload),
            "listener panicked during notification"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Handle returned by `subscribe`; call [`unsubscribe`](Self::unsubscribe)
/// to stop receiving notifications.
///
/// Dropping the handle does not unsubscribe.
pub struct Subscription<S> {
    id: u64,
    registry: Weak<ListenerRegistry<S>>,
}

impl<S: State> Subscription<S> {
    pub(crate) fn new(id: u64, registry: &Arc<ListenerRegistry<S>>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// Remove the listener. Repeated calls are no-ops.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }
}

impl<S> fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{freeze, Data};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::OnceLock;

    fn empty() -> Snapshot {
        freeze(Data::new())
    }

    fn counting(counter: &Arc<AtomicUsize>) -> Listener<String> {
        let counter = Arc::clone(counter);
        Arc::new(move |_: &String, _: &Snapshot, _: &Snapshot| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn notify_reaches_every_listener() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.add(counting(&calls));
        registry.add(counting(&calls));

        registry.notify(&"a".to_string(), &empty(), &empty());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_listener_does_not_stop_the_pass() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.add(Arc::new(|_: &String, _: &Snapshot, _: &Snapshot| panic!("boom")));
        registry.add(counting(&calls));

        registry.notify(&"a".to_string(), &empty(), &empty());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_removed_mid_pass_is_skipped() {
        let registry = Arc::new(ListenerRegistry::new());
        let later_calls = Arc::new(AtomicUsize::new(0));
        let victim: Arc<OnceLock<u64>> = Arc::new(OnceLock::new());

        let remover = {
            let registry = Arc::downgrade(&registry);
            let victim = Arc::clone(&victim);
            Arc::new(move |_: &String, _: &Snapshot, _: &Snapshot| {
                if let (Some(registry), Some(id)) = (registry.upgrade(), victim.get()) {
                    registry.remove(*id);
                }
            })
        };
        registry.add(remover);
        let id = registry.add(counting(&later_calls));
        victim.set(id).unwrap();

        registry.notify(&"a".to_string(), &empty(), &empty());

        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let registry = Arc::new(ListenerRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::new(registry.add(counting(&calls)), &registry);

        assert!(subscription.is_active());
        subscription.unsubscribe();
        subscription.unsubscribe();
        assert!(!subscription.is_active());

        registry.notify(&"a".to_string(), &empty(), &empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panic_message_reads_common_payloads() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let fixed: Box<dyn Any + Send> = Box::new("fixed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(panic_message(&*owned), "owned");
        assert_eq!(panic_message(&*fixed), "fixed");
        assert_eq!(panic_message(&*other), "non-string panic payload");
    }
}
