//! In-memory event store.
//!
//! # Responsibility
//! - Provide an injectable store for views, demos and tests.
//! - Simulate hosted-store security rules through `StoreAccess`.
//!
//! # Invariants
//! - Events keep creation order; `replace` keeps the original slot.
//! - `Denied` blocks reads and writes; `ReadOnly` blocks writes only.

use super::{EventStore, ListenerRegistry, SnapshotListener, StoreError, StoreResult, Subscription};
use crate::model::event::{Event, EventId, EventInput};
use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Access rule applied to every store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreAccess {
    #[default]
    ReadWrite,
    ReadOnly,
    Denied,
}

struct MemoryState {
    events: Vec<Event>,
    access: StoreAccess,
    version: u64,
}

impl MemoryState {
    fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            access: StoreAccess::ReadWrite,
            version: 1,
        }
    }
}

/// Ordered in-memory event collection with change notifications.
pub struct MemoryEventStore {
    state: Mutex<MemoryState>,
    listeners: Arc<ListenerRegistry>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::with_events(Vec::new())
    }

    /// Creates a store pre-populated with existing events.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            state: Mutex::new(MemoryState::new(events)),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Changes the simulated access rule for subsequent calls.
    pub fn set_access(&self, access: StoreAccess) {
        self.lock().access = access;
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn versioned_snapshot(&self) -> StoreResult<(u64, Vec<Event>)> {
        let state = self.lock();
        if state.access == StoreAccess::Denied {
            return Err(StoreError::PermissionDenied(
                "reading events is not allowed by store rules".to_string(),
            ));
        }
        Ok((state.version, state.events.clone()))
    }

    fn mutate<T>(
        &self,
        action: &'static str,
        apply: impl FnOnce(&mut Vec<Event>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let (value, version, snapshot) = {
            let mut state = self.lock();
            if state.access != StoreAccess::ReadWrite {
                warn!("event={action} module=store status=error error_code=permission_denied");
                return Err(StoreError::PermissionDenied(format!(
                    "{action} is not allowed by store rules"
                )));
            }
            let value = apply(&mut state.events)?;
            state.version += 1;
            (value, state.version, state.events.clone())
        };

        debug!(
            "event={action} module=store status=ok backend=memory version={version} events={}",
            snapshot.len()
        );
        self.listeners.broadcast(version, &snapshot);
        Ok(value)
    }
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore for MemoryEventStore {
    fn subscribe(&self, listener: SnapshotListener) -> StoreResult<Subscription> {
        let subscription = self.listeners.register(listener);
        let (version, snapshot) = self.versioned_snapshot()?;
        self.listeners.deliver(&subscription, version, &snapshot);
        Ok(subscription)
    }

    fn create(&self, input: &EventInput) -> StoreResult<EventId> {
        self.mutate("event_create", |events| {
            let id = EventId::generate();
            events.push(input.clone().into_event(id.clone()));
            Ok(id)
        })
    }

    fn replace(&self, event: &Event) -> StoreResult<()> {
        self.mutate("event_replace", |events| {
            let slot = events
                .iter_mut()
                .find(|existing| existing.id == event.id)
                .ok_or_else(|| StoreError::NotFound(event.id.clone()))?;
            *slot = event.clone();
            Ok(())
        })
    }

    fn remove(&self, id: &EventId) -> StoreResult<()> {
        self.mutate("event_remove", |events| {
            let index = events
                .iter()
                .position(|existing| &existing.id == id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            events.remove(index);
            Ok(())
        })
    }

    fn snapshot(&self) -> StoreResult<Vec<Event>> {
        self.versioned_snapshot().map(|(_, events)| events)
    }
}
