//! Subscribe-or-fallback wiring between a store and its consumers.
//!
//! # Responsibility
//! - Attach a listener to a store subscription.
//! - Keep views usable when the subscription cannot be established by
//!   delivering the built-in sample data instead.
//!
//! # Invariants
//! - Exactly one of `Live` or `Sample` applies for the feed lifetime.
//! - Dropping the feed releases the underlying subscription.

use crate::sample::sample_events;
use crate::store::{EventStore, SnapshotListener, Subscription};
use log::{info, warn};

/// Where a feed's snapshots come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    /// Snapshots come from a live store subscription.
    Live,
    /// The subscription failed; sample data was delivered once.
    Sample,
}

/// Owned connection between one listener and a store.
#[derive(Debug)]
pub struct EventFeed {
    mode: FeedMode,
    subscription: Option<Subscription>,
}

impl EventFeed {
    /// Subscribes `listener`, falling back to sample data on failure.
    pub fn connect<S: EventStore + ?Sized>(store: &S, listener: SnapshotListener) -> Self {
        match store.subscribe(listener.clone()) {
            Ok(subscription) => {
                info!("event=feed_connect module=feed status=ok mode=live");
                Self {
                    mode: FeedMode::Live,
                    subscription: Some(subscription),
                }
            }
            Err(err) => {
                warn!(
                    "event=feed_connect module=feed status=degraded mode=sample error={err}"
                );
                listener(&sample_events());
                Self {
                    mode: FeedMode::Sample,
                    subscription: None,
                }
            }
        }
    }

    pub fn mode(&self) -> FeedMode {
        self.mode
    }

    pub fn is_live(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    /// Stops delivery. Equivalent to dropping the feed.
    pub fn close(self) {
        if let Some(subscription) = self.subscription {
            subscription.cancel();
        }
    }
}
