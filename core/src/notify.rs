//! Change notification for the document store.
//!
//! The event carries no payload: subscribers re-read the document through
//! the store, which keeps them consistent with whatever is actually
//! persisted.

use std::sync::{Arc, Mutex, PoisonError, Weak};

type Listener = Arc<dyn Fn() + Send + Sync>;

struct Inner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Process-local publish/subscribe bus with explicit unsubscribe tokens.
#[derive(Clone)]
pub struct ChangeBus {
    inner: Arc<Mutex<Inner>>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Registers a listener. Dropping the returned token unsubscribes it;
    /// the callback is never invoked after the token is gone.
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(callback)));
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Invokes every current listener. The listener list is snapshotted
    /// first so callbacks may subscribe, unsubscribe, or re-enter the store
    /// without deadlocking.
    pub fn publish(&self) {
        let listeners: Vec<Listener> = {
            let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in listeners {
            listener();
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }
}

/// Unsubscribe token returned by [`ChangeBus::subscribe`].
pub struct Subscription {
    id: u64,
    inner: Weak<Mutex<Inner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let bus = ChangeBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&count);
        let _s1 = bus.subscribe(move || {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let c2 = Arc::clone(&count);
        let _s2 = bus.subscribe(move || {
            c2.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish();
        assert_eq!(count.load(Ordering::SeqCst), 2);

        bus.publish();
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_dropped_subscription_stops_notifications() {
        let bus = ChangeBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let sub = bus.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        drop(sub);
        assert_eq!(bus.listener_count(), 0);

        bus.publish();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_publish_survives_reentrant_subscribe() {
        let bus = ChangeBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        let reentrant_bus = bus.clone();
        let c = Arc::clone(&count);
        let _sub = bus.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
            // A callback adding a listener must not deadlock the bus.
            let extra = reentrant_bus.subscribe(|| {});
            drop(extra);
        });

        bus.publish();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_outliving_bus_is_harmless() {
        let bus = ChangeBus::new();
        let sub = bus.subscribe(|| {});
        drop(bus);
        drop(sub);
    }
}
