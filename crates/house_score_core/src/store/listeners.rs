//! Listener bookkeeping shared by store adapters.
//!
//! # Invariants
//! - Every snapshot carries the store version it was read at; versions
//!   start at 1 and grow with each committed mutation.
//! - A listener never receives a snapshot older than one it already saw,
//!   even when a callback re-enters the store and triggers a nested
//!   broadcast.

use super::SnapshotListener;
use crate::model::event::Event;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

#[derive(Clone)]
struct ListenerEntry {
    listener: SnapshotListener,
    last_version: Arc<AtomicU64>,
}

impl ListenerEntry {
    fn deliver(&self, version: u64, events: &[Event]) {
        let previous = self.last_version.fetch_max(version, Ordering::SeqCst);
        if previous < version {
            (self.listener)(events);
        }
    }
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<u64, ListenerEntry>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a listener without delivering anything.
    pub(crate) fn register(self: &Arc<Self>, listener: SnapshotListener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                ListenerEntry {
                    listener,
                    last_version: Arc::new(AtomicU64::new(0)),
                },
            );

        Subscription {
            id,
            registry: Arc::downgrade(self),
            active: true,
        }
    }

    /// Delivers the snapshot read at `version` to one subscription.
    ///
    /// Skipped when a newer snapshot already reached that listener.
    pub(crate) fn deliver(&self, subscription: &Subscription, version: u64, events: &[Event]) {
        let entry = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&subscription.id)
            .cloned();

        if let Some(entry) = entry {
            entry.deliver(version, events);
        }
    }

    /// Delivers the snapshot read at `version` to every registered listener.
    ///
    /// Entries are cloned out first so a callback may subscribe, cancel or
    /// mutate the store without deadlocking.
    pub(crate) fn broadcast(&self, version: u64, events: &[Event]) {
        let entries: Vec<ListenerEntry> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for entry in entries {
            entry.deliver(version, events);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn unregister(&self, id: u64) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}

/// Cancellation handle for a store subscription.
///
/// Dropping the handle cancels the subscription.
#[must_use = "dropping a subscription cancels it immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
    active: bool,
}

impl Subscription {
    /// Stops further delivery and releases the listener.
    pub fn cancel(mut self) {
        self.release();
    }

    pub fn is_active(&self) -> bool {
        self.active && self.registry.strong_count() > 0
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
