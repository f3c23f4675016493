//! Change notification for dependent views.
//!
//! Notifications carry no payload: a notified subscriber re-queries current
//! truth through the facade instead of trusting a diff that may already be
//! stale.

use std::sync::{Arc, Mutex, MutexGuard};

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Subscriber registry. Cloning shares the same registry.
#[derive(Clone, Default)]
pub struct ChangeListeners {
    inner: Arc<Mutex<ListenerTable>>,
}

impl ChangeListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener; it stays registered until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let mut table = self.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.entries.push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: self.clone(),
        }
    }

    /// Synchronously invokes every registered listener once.
    pub fn notify(&self) {
        // Snapshot outside the lock so a listener may subscribe/unsubscribe.
        let listeners: Vec<Listener> = self
            .lock()
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        tracing::debug!(count = listeners.len(), "notifying data change listeners");
        for listener in listeners {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unsubscribe(&self, id: u64) {
        self.lock().entries.retain(|(entry_id, _)| *entry_id != id);
    }

    fn lock(&self) -> MutexGuard<'_, ListenerTable> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Keeps a listener registered; dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    listeners: ChangeListeners,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.listeners.unsubscribe(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_reaches_every_subscriber_once() {
        let listeners = ChangeListeners::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let a = {
            let count = Arc::clone(&first);
            listeners.subscribe(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        let b = {
            let count = Arc::clone(&second);
            listeners.subscribe(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        listeners.notify();
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        drop((a, b));
    }

    #[test]
    fn test_dropped_subscription_stops_notifications() {
        let listeners = ChangeListeners::new();
        let count = Arc::new(AtomicUsize::new(0));

        let subscription = {
            let count = Arc::clone(&count);
            listeners.subscribe(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        listeners.notify();
        drop(subscription);
        listeners.notify();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_listener_may_unsubscribe_another_during_notify() {
        let listeners = ChangeListeners::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let other = listeners.subscribe(|| {});
        *slot.lock().unwrap() = Some(other);

        let _dropper = {
            let slot = Arc::clone(&slot);
            listeners.subscribe(move || {
                slot.lock().unwrap().take();
            })
        };

        // Must not deadlock
        listeners.notify();
        assert_eq!(listeners.len(), 1);
    }
}
