// ── Listener registry ──
//
// Broadcast fan-out for transport events. Every registered listener sees
// every event; registrations stay until explicitly removed.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Handle returned by every `on_*` registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A set of callbacks for one event kind.
pub(crate) struct ListenerSet<T> {
    listeners: DashMap<u64, Callback<T>>,
}

impl<T> ListenerSet<T> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: DashMap::new(),
        }
    }

    pub(crate) fn add<F>(&self, id: ListenerId, listener: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.listeners.insert(id.0, Arc::new(listener));
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        self.listeners.remove(&id.0).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Invoke every listener in registration order.
    ///
    /// Callbacks are cloned out of the map first so a listener may
    /// register or remove listeners without deadlocking a shard.
    pub(crate) fn emit(&self, event: &T) {
        let mut callbacks: Vec<(u64, Callback<T>)> = self
            .listeners
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        callbacks.sort_unstable_by_key(|(id, _)| *id);

        for (_, callback) in callbacks {
            callback(event);
        }
    }
}

/// Monotonic source of [`ListenerId`]s shared by all sets of a connection.
pub(crate) struct ListenerIds(AtomicU64);

impl ListenerIds {
    pub(crate) fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    pub(crate) fn next(&self) -> ListenerId {
        ListenerId(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn every_listener_sees_every_event() {
        let ids = ListenerIds::new();
        let set: ListenerSet<u32> = ListenerSet::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = Arc::clone(&seen);
            set.add(ids.next(), move |n: &u32| {
                seen.lock().unwrap().push(format!("{tag}{n}"));
            });
        }

        set.emit(&1);
        set.emit(&2);

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec!["a1", "b1", "a2", "b2"]);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let ids = ListenerIds::new();
        let set: ListenerSet<()> = ListenerSet::new();
        let hits = Arc::new(AtomicU64::new(0));

        let id = ids.next();
        let counter = Arc::clone(&hits);
        set.add(id, move |_: &()| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        set.emit(&());
        assert!(set.remove(id));
        assert!(!set.remove(id));
        set.emit(&());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn listener_may_register_during_emit() {
        let ids = Arc::new(ListenerIds::new());
        let set: Arc<ListenerSet<()>> = Arc::new(ListenerSet::new());

        let inner_set = Arc::clone(&set);
        let inner_ids = Arc::clone(&ids);
        set.add(ids.next(), move |_: &()| {
            inner_set.add(inner_ids.next(), |_: &()| {});
        });

        set.emit(&());
        assert_eq!(set.len(), 2);
    }
}
