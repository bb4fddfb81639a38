//! Event store gateway contracts and adapters.
//!
//! # Responsibility
//! - Define the subscribe/create/replace/remove contract over one collection
//!   of event documents.
//! - Keep adapter details (SQLite, in-memory) behind the `EventStore` trait.
//!
//! # Invariants
//! - Every successful mutation is followed by a full-snapshot broadcast to
//!   all live subscriptions.
//! - Listeners are invoked after the adapter releases its internal lock.
//! - Snapshots list events in creation order.

mod listeners;
pub mod memory;
pub mod sqlite;

use crate::db::DbError;
use crate::model::event::{Event, EventId, EventInput};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use listeners::Subscription;
pub(crate) use listeners::ListenerRegistry;
pub use memory::{MemoryEventStore, StoreAccess};
pub use sqlite::SqliteEventStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Callback receiving the full current event set.
pub type SnapshotListener = Arc<dyn Fn(&[Event]) + Send + Sync>;

/// Gateway failure surfaced to the initiating caller.
#[derive(Debug)]
pub enum StoreError {
    NotFound(EventId),
    PermissionDenied(String),
    Db(DbError),
    InvalidData(String),
}

impl StoreError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::PermissionDenied(message) => write!(f, "permission denied: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid event document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match value.sqlite_error_code() {
            Some(
                ErrorCode::ReadOnly
                | ErrorCode::PermissionDenied
                | ErrorCode::AuthorizationForStatementDenied,
            ) => Self::PermissionDenied(value.to_string()),
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Gateway over the event document collection.
pub trait EventStore {
    /// Registers a listener and immediately delivers the current snapshot.
    ///
    /// # Errors
    /// Returns an error when the collection cannot be read; callers are
    /// expected to fall back to static data rather than show an empty view.
    fn subscribe(&self, listener: SnapshotListener) -> StoreResult<Subscription>;

    /// Persists a new event and returns its store-assigned id.
    fn create(&self, input: &EventInput) -> StoreResult<EventId>;

    /// Overwrites an existing event record in full.
    fn replace(&self, event: &Event) -> StoreResult<()>;

    /// Deletes an event and its embedded winners permanently.
    fn remove(&self, id: &EventId) -> StoreResult<()>;

    /// Reads the current event set once.
    fn snapshot(&self) -> StoreResult<Vec<Event>>;
}

impl<S: EventStore + ?Sized> EventStore for &S {
    fn subscribe(&self, listener: SnapshotListener) -> StoreResult<Subscription> {
        (**self).subscribe(listener)
    }

    fn create(&self, input: &EventInput) -> StoreResult<EventId> {
        (**self).create(input)
    }

    fn replace(&self, event: &Event) -> StoreResult<()> {
        (**self).replace(event)
    }

    fn remove(&self, id: &EventId) -> StoreResult<()> {
        (**self).remove(id)
    }

    fn snapshot(&self) -> StoreResult<Vec<Event>> {
        (**self).snapshot()
    }
}

impl<S: EventStore + ?Sized> EventStore for Arc<S> {
    fn subscribe(&self, listener: SnapshotListener) -> StoreResult<Subscription> {
        (**self).subscribe(listener)
    }

    fn create(&self, input: &EventInput) -> StoreResult<EventId> {
        (**self).create(input)
    }

    fn replace(&self, event: &Event) -> StoreResult<()> {
        (**self).replace(event)
    }

    fn remove(&self, id: &EventId) -> StoreResult<()> {
        (**self).remove(id)
    }

    fn snapshot(&self) -> StoreResult<Vec<Event>> {
        (**self).snapshot()
    }
}
