//! Change-notification callbacks shared by the cache stores.
//!
//! A `SubscriberRegistry` holds callbacks in registration order and fires
//! them synchronously. Subscribing returns a `Subscription` guard that
//! removes the callback when dropped, so a view that goes away can never
//! leave a dangling listener behind.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Lock a mutex, recovering the data if a previous holder panicked.
/// Cache state is always left consistent between statements, so a
/// poisoned lock carries no torn writes.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Slots<E> {
    next_id: u64,
    callbacks: Vec<(u64, Callback<E>)>,
}

impl<E> Slots<E> {
    fn contains(&self, id: u64) -> bool {
        self.callbacks.iter().any(|(slot_id, _)| *slot_id == id)
    }

    fn remove(&mut self, id: u64) -> bool {
        match self.callbacks.iter().position(|(slot_id, _)| *slot_id == id) {
            Some(pos) => {
                self.callbacks.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Ordered set of change callbacks receiving `&E` on every notification.
pub struct SubscriberRegistry<E> {
    slots: Arc<Mutex<Slots<E>>>,
}

impl<E> Default for SubscriberRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SubscriberRegistry<E> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(Slots {
                next_id: 0,
                callbacks: Vec::new(),
            })),
        }
    }

    /// Register a callback. It stays registered until the returned
    /// `Subscription` is unsubscribed or dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<E>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut slots = lock(&self.slots);
        let id = slots.next_id;
        slots.next_id += 1;
        slots.callbacks.push((id, Arc::new(callback)));

        Subscription {
            id,
            slots: Arc::downgrade(&self.slots),
        }
    }

    /// Fire every registered callback in registration order.
    ///
    /// The lock is released before any callback runs, so callbacks may read
    /// or mutate the store that owns this registry, and may subscribe or
    /// unsubscribe. A callback removed mid-round is skipped.
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<(u64, Callback<E>)> = lock(&self.slots).callbacks.clone();

        for (id, callback) in snapshot {
            if lock(&self.slots).contains(id) {
                callback(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.slots).callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle to a registered callback.
///
/// Dropping the handle unsubscribes. `unsubscribe` may be called any number
/// of times, including after the registry itself is gone.
#[must_use = "dropping a Subscription immediately unsubscribes the callback"]
pub struct Subscription<E> {
    id: u64,
    slots: Weak<Mutex<Slots<E>>>,
}

impl<E> Subscription<E> {
    /// Remove the callback. Returns `true` only on the call that removed it.
    pub fn unsubscribe(&self) -> bool {
        match self.slots.upgrade() {
            Some(slots) => lock(&slots).remove(self.id),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.slots
            .upgrade()
            .map(|slots| lock(&slots).contains(self.id))
            .unwrap_or(false)
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl<E> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_fires_in_registration_order() {
        let registry: SubscriberRegistry<u32> = SubscriberRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let subs: Vec<_> = (0..3)
            .map(|i| {
                let log = Arc::clone(&log);
                registry.subscribe(move |value: &u32| log.lock().unwrap().push((i, *value)))
            })
            .collect();

        registry.notify(&7);

        assert_eq!(*log.lock().unwrap(), vec![(0, 7), (1, 7), (2, 7)]);
        assert_eq!(subs.len(), 3);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let registry: SubscriberRegistry<()> = SubscriberRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let sub = registry.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry.notify(&());
        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        registry.notify(&());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let registry: SubscriberRegistry<()> = SubscriberRegistry::new();
        {
            let _sub = registry.subscribe(|_| {});
            assert_eq!(registry.len(), 1);
        }
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_unsubscribe_after_registry_dropped() {
        let registry: SubscriberRegistry<()> = SubscriberRegistry::new();
        let sub = registry.subscribe(|_| {});
        drop(registry);

        assert!(!sub.is_active());
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn test_callback_removed_mid_round_is_skipped() {
        let registry: SubscriberRegistry<()> = SubscriberRegistry::new();
        let second_calls = Arc::new(AtomicUsize::new(0));
        let victim: Arc<Mutex<Option<Subscription<()>>>> = Arc::new(Mutex::new(None));

        let victim_handle = Arc::clone(&victim);
        let _first = registry.subscribe(move |_| {
            if let Some(sub) = victim_handle.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
        });

        let counter = Arc::clone(&second_calls);
        let second = registry.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        *victim.lock().unwrap() = Some(second);

        registry.notify(&());

        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_callback_may_subscribe_during_notify() {
        let registry: Arc<SubscriberRegistry<()>> = Arc::new(SubscriberRegistry::new());
        let spawned: Arc<Mutex<Vec<Subscription<()>>>> = Arc::new(Mutex::new(Vec::new()));

        let inner_registry = Arc::clone(&registry);
        let inner_spawned = Arc::clone(&spawned);
        let _sub = registry.subscribe(move |_| {
            let sub = inner_registry.subscribe(|_| {});
            inner_spawned.lock().unwrap().push(sub);
        });

        registry.notify(&());

        assert_eq!(registry.len(), 2);
        spawned.lock().unwrap().clear();
        assert_eq!(registry.len(), 1);
    }
}
