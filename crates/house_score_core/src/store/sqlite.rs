//! SQLite-backed event document store.
//!
//! # Responsibility
//! - Persist each event as one JSON document row in `events`.
//! - Broadcast full snapshots after every successful mutation.
//!
//! # Invariants
//! - The `id` column is the only copy of the identifier; documents never
//!   embed it.
//! - Snapshots are ordered by `seq` (creation order).
//! - Undecodable documents fail the read instead of being skipped.
//! - A write and the snapshot reload share one transaction; if the reload
//!   fails the write is rolled back.

use super::{EventStore, ListenerRegistry, SnapshotListener, StoreError, StoreResult, Subscription};
use crate::db::{open_db, open_db_in_memory, open_db_read_only};
use crate::model::event::{Event, EventId, EventInput};
use log::{error, info};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const EVENT_SELECT_SQL: &str = "SELECT id, document FROM events ORDER BY seq ASC";

/// Event store over one SQLite connection.
pub struct SqliteEventStore {
    conn: Mutex<Connection>,
    /// Bumped under the connection lock after each committed write.
    version: AtomicU64,
    listeners: Arc<ListenerRegistry>,
}

impl SqliteEventStore {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            version: AtomicU64::new(1),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Opens an existing store whose writes all fail with `PermissionDenied`.
    pub fn open_read_only(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db_read_only(path)?))
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn versioned_snapshot(&self) -> StoreResult<(u64, Vec<Event>)> {
        let conn = self.lock();
        let events = load_events(&conn)?;
        Ok((self.version.load(Ordering::SeqCst), events))
    }

    fn commit<T>(
        &self,
        apply: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<(T, u64, Vec<Event>)> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let value = apply(&tx)?;
        let snapshot = load_events(&tx)?;
        tx.commit()?;
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        Ok((value, version, snapshot))
    }

    fn mutate<T>(
        &self,
        action: &'static str,
        apply: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        match self.commit(apply) {
            Ok((value, version, snapshot)) => {
                info!(
                    "event={action} module=store status=ok backend=sqlite version={version} events={}",
                    snapshot.len()
                );
                self.listeners.broadcast(version, &snapshot);
                Ok(value)
            }
            Err(err) => {
                error!("event={action} module=store status=error backend=sqlite error={err}");
                Err(err)
            }
        }
    }
}

impl EventStore for SqliteEventStore {
    fn subscribe(&self, listener: SnapshotListener) -> StoreResult<Subscription> {
        let subscription = self.listeners.register(listener);
        let (version, snapshot) = self.versioned_snapshot()?;
        self.listeners.deliver(&subscription, version, &snapshot);
        Ok(subscription)
    }

    fn create(&self, input: &EventInput) -> StoreResult<EventId> {
        let document = encode_document(input)?;
        self.mutate("event_create", |conn| {
            let id = EventId::generate();
            conn.execute(
                "INSERT INTO events (id, document) VALUES (?1, ?2);",
                params![id.as_str(), document],
            )?;
            Ok(id)
        })
    }

    fn replace(&self, event: &Event) -> StoreResult<()> {
        let document = encode_document(&event.to_input())?;
        self.mutate("event_replace", |conn| {
            let changed = conn.execute(
                "UPDATE events
                 SET
                    document = ?1,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?2;",
                params![document, event.id.as_str()],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(event.id.clone()));
            }
            Ok(())
        })
    }

    fn remove(&self, id: &EventId) -> StoreResult<()> {
        self.mutate("event_remove", |conn| {
            let changed = conn.execute("DELETE FROM events WHERE id = ?1;", [id.as_str()])?;
            if changed == 0 {
                return Err(StoreError::NotFound(id.clone()));
            }
            Ok(())
        })
    }

    fn snapshot(&self) -> StoreResult<Vec<Event>> {
        self.versioned_snapshot().map(|(_, events)| events)
    }
}

fn load_events(conn: &Connection) -> StoreResult<Vec<Event>> {
    let mut stmt = conn.prepare(EVENT_SELECT_SQL)?;
    let mut rows = stmt.query([])?;
    let mut events = Vec::new();

    while let Some(row) = rows.next()? {
        let id: String = row.get("id")?;
        let document: String = row.get("document")?;
        events.push(decode_document(id, &document)?);
    }

    Ok(events)
}

fn encode_document(input: &EventInput) -> StoreResult<String> {
    serde_json::to_string(input)
        .map_err(|err| StoreError::InvalidData(format!("failed to encode event: {err}")))
}

fn decode_document(id: String, document: &str) -> StoreResult<Event> {
    let input: EventInput = serde_json::from_str(document)
        .map_err(|err| StoreError::InvalidData(format!("event `{id}`: {err}")))?;
    Ok(input.into_event(EventId::new(id)))
}
