//! Live house standings projection.

use crate::feed::EventFeed;
use crate::model::event::Event;
use crate::scoring::Standings;
use crate::store::{EventStore, SnapshotListener};
use std::sync::{Arc, Mutex, PoisonError};

/// Ranked house list recomputed on every snapshot.
///
/// Clones share state, so a clone handed to a listener updates the original.
#[derive(Debug, Clone)]
pub struct StandingsProjection {
    known_houses: Arc<[String]>,
    state: Arc<Mutex<Standings>>,
}

impl StandingsProjection {
    /// Creates a projection scoring exactly `known_houses`.
    pub fn new<H: AsRef<str>>(known_houses: &[H]) -> Self {
        let known_houses: Arc<[String]> = known_houses
            .iter()
            .map(|house| house.as_ref().to_string())
            .collect();
        let initial = Standings::from_events(&[], &known_houses[..]);
        Self {
            known_houses,
            state: Arc::new(Mutex::new(initial)),
        }
    }

    pub fn known_houses(&self) -> &[String] {
        &self.known_houses
    }

    /// Recomputes standings (and ranks) from the full event set.
    pub fn refresh(&self, events: &[Event]) {
        let standings = Standings::from_events(events, &self.known_houses[..]);
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = standings;
    }

    pub fn current(&self) -> Standings {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Store listener that refreshes this projection.
    pub fn listener(&self) -> SnapshotListener {
        let projection = self.clone();
        Arc::new(move |events: &[Event]| projection.refresh(events))
    }

    /// Subscribes to `store`; drop the returned feed to detach.
    pub fn attach<S: EventStore + ?Sized>(&self, store: &S) -> EventFeed {
        EventFeed::connect(store, self.listener())
    }
}
