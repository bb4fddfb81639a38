use house_score_core::{
    Event, EventInput, EventStore, MemoryEventStore, SnapshotListener, SqliteEventStore,
    StoreAccess, StoreError, Winner,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn input(name: &str, winners: Vec<Winner>) -> EventInput {
    let mut input = EventInput::new(name, "2025-01-15");
    input.winners = winners;
    input
}

/// Listener recording every delivered snapshot.
fn recorder() -> (SnapshotListener, Arc<Mutex<Vec<Vec<Event>>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener: SnapshotListener = Arc::new(move |events: &[Event]| {
        sink.lock().unwrap().push(events.to_vec());
    });
    (listener, seen)
}

fn assert_store_contract(store: &dyn EventStore) {
    let (listener, seen) = recorder();
    let subscription = store.subscribe(listener).unwrap();
    assert_eq!(seen.lock().unwrap().len(), 1, "initial snapshot delivered");
    assert!(seen.lock().unwrap()[0].is_empty());

    let first = store
        .create(&input("Dance", vec![Winner::new(1, "Delany", "A", 10)]))
        .unwrap();
    let second = store.create(&input("Debate", Vec::new())).unwrap();
    assert_ne!(first, second);

    let names: Vec<String> = store
        .snapshot()
        .unwrap()
        .into_iter()
        .map(|event| event.name)
        .collect();
    assert_eq!(names, vec!["Dance", "Debate"]);

    let mut replaced = store.snapshot().unwrap()[0].clone();
    replaced.winners = vec![Winner::new(1, "Gandhi", "B", 20)];
    store.replace(&replaced).unwrap();
    let after_replace = store.snapshot().unwrap();
    assert_eq!(after_replace[0].id, first, "replace keeps creation order");
    assert_eq!(after_replace[0].winners, replaced.winners);

    store.remove(&second).unwrap();
    assert!(matches!(store.remove(&second), Err(StoreError::NotFound(id)) if id == second));

    let mut ghost = replaced.clone();
    ghost.id = second.clone();
    assert!(matches!(store.replace(&ghost), Err(StoreError::NotFound(_))));

    {
        let snapshots = seen.lock().unwrap();
        // initial + create + create + replace + remove
        assert_eq!(snapshots.len(), 5);
        let last = snapshots.last().unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].winners[0].house, "Gandhi");
    }

    subscription.cancel();
    store.create(&input("Quiz", Vec::new())).unwrap();
    assert_eq!(seen.lock().unwrap().len(), 5, "no delivery after cancel");
}

#[test]
fn memory_store_honours_gateway_contract() {
    let store = MemoryEventStore::new();
    assert_store_contract(&store);
}

#[test]
fn sqlite_store_honours_gateway_contract() {
    let store = SqliteEventStore::open_in_memory().unwrap();
    assert_store_contract(&store);
}

/// First listener writes a second event as soon as it sees the first one;
/// the second listener must end up on the newest snapshot.
fn assert_nested_write_never_leaves_listener_stale<S>(store: Arc<S>)
where
    S: EventStore + Send + Sync + 'static,
{
    let weak = Arc::downgrade(&store);
    let writer: SnapshotListener = Arc::new(move |events: &[Event]| {
        if events.len() == 1 {
            if let Some(store) = weak.upgrade() {
                store.create(&input("Debate", Vec::new())).unwrap();
            }
        }
    });
    let _writer = store.subscribe(writer).unwrap();

    let (listener, seen) = recorder();
    let _reader = store.subscribe(listener).unwrap();

    store.create(&input("Dance", Vec::new())).unwrap();

    assert_eq!(store.snapshot().unwrap().len(), 2);
    let lengths: Vec<usize> = seen.lock().unwrap().iter().map(Vec::len).collect();
    assert_eq!(lengths, vec![0, 2], "older snapshot must not arrive after a newer one");
}

#[test]
fn memory_store_delivers_nested_writes_in_order() {
    assert_nested_write_never_leaves_listener_stale(Arc::new(MemoryEventStore::new()));
}

#[test]
fn sqlite_store_delivers_nested_writes_in_order() {
    assert_nested_write_never_leaves_listener_stale(Arc::new(
        SqliteEventStore::open_in_memory().unwrap(),
    ));
}

#[test]
fn dropping_subscription_releases_listener() {
    let store = MemoryEventStore::new();
    let (listener, _seen) = recorder();
    let subscription = store.subscribe(listener).unwrap();
    assert_eq!(store.subscriber_count(), 1);
    drop(subscription);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn denied_store_rejects_subscription() {
    let store = MemoryEventStore::new();
    store.set_access(StoreAccess::Denied);
    let (listener, seen) = recorder();

    let err = store.subscribe(listener).unwrap_err();
    assert!(err.is_permission_denied());
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn read_only_memory_store_rejects_writes_but_serves_reads() {
    let store = MemoryEventStore::new();
    store.create(&input("Dance", Vec::new())).unwrap();
    store.set_access(StoreAccess::ReadOnly);

    let err = store.create(&input("Debate", Vec::new())).unwrap_err();
    assert!(err.is_permission_denied());
    assert_eq!(store.snapshot().unwrap().len(), 1);
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");

    let id = {
        let store = SqliteEventStore::open(&path).unwrap();
        store
            .create(&input("Dance", vec![Winner::new(1, "Tagore", "A", 10)]))
            .unwrap()
    };

    let store = SqliteEventStore::open(&path).unwrap();
    let events = store.snapshot().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, id);
    assert_eq!(events[0].winners[0].points, 10);
}

#[test]
fn read_only_sqlite_store_maps_writes_to_permission_denied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");
    SqliteEventStore::open(&path)
        .unwrap()
        .create(&input("Dance", Vec::new()))
        .unwrap();

    let store = SqliteEventStore::open_read_only(&path).unwrap();
    assert_eq!(store.snapshot().unwrap().len(), 1);

    let err = store.create(&input("Debate", Vec::new())).unwrap_err();
    assert!(err.is_permission_denied(), "unexpected error: {err}");
}

#[test]
fn sqlite_documents_omit_absent_fields_and_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");
    let store = SqliteEventStore::open(&path).unwrap();
    store
        .create(&input("Dance", vec![Winner::new(1, "Delany", "A", 10)]))
        .unwrap();
    drop(store);

    let conn = Connection::open(&path).unwrap();
    let document: String = conn
        .query_row("SELECT document FROM events;", [], |row| row.get(0))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&document).unwrap();
    let object = value.as_object().unwrap();

    assert!(!object.contains_key("id"));
    assert!(!object.contains_key("venue"));
    assert!(!object.contains_key("category"));
    assert!(!value["winners"][0].as_object().unwrap().contains_key("photo"));
    assert_eq!(value["winners"][0]["house"], "Delany");
}

#[test]
fn corrupt_sqlite_document_is_reported_not_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");
    drop(SqliteEventStore::open(&path).unwrap());

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO events (id, document) VALUES ('bad', '{not json');",
        [],
    )
    .unwrap();
    drop(conn);

    let store = SqliteEventStore::open(&path).unwrap();
    let err = store.snapshot().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(message) if message.contains("bad")));
}

#[test]
fn failed_reload_rolls_back_the_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");
    drop(SqliteEventStore::open(&path).unwrap());

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO events (id, document) VALUES ('bad', '{not json');",
        [],
    )
    .unwrap();
    drop(conn);

    let store = SqliteEventStore::open(&path).unwrap();
    let (listener, seen) = recorder();
    assert!(store.subscribe(listener).is_err());

    let err = store.create(&input("Dance", Vec::new())).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    drop(store);

    let conn = Connection::open(&path).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM events;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1, "the insert must not survive a failed reload");
    assert!(seen.lock().unwrap().is_empty());
}
