use cropkeeper_core::db::{open_db, open_db_in_memory};
use cropkeeper_core::{BlobStore, RepoError, SqliteBlobStore};
use rusqlite::Connection;
use serde_json::json;

#[test]
fn sqlite_store_round_trips_named_blobs() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteBlobStore::try_new(&conn).unwrap();

    assert_eq!(store.load("cropkeeper_farms"), None);

    let payload = json!([{"name": "Sunrise Valley Farm", "size": 10.5}]);
    store.save("cropkeeper_farms", &payload).unwrap();
    assert_eq!(store.load("cropkeeper_farms"), Some(payload));
}

#[test]
fn sqlite_store_save_replaces_previous_value() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteBlobStore::try_new(&conn).unwrap();

    store.save("k", &json!(1)).unwrap();
    store.save("k", &json!({"v": 2})).unwrap();
    assert_eq!(store.load("k"), Some(json!({"v": 2})));
}

#[test]
fn malformed_persisted_json_loads_as_absent() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO blobs (key, value) VALUES ('cropkeeper_farms', '{not json');",
        [],
    )
    .unwrap();

    let store = SqliteBlobStore::try_new(&conn).unwrap();
    assert_eq!(store.load("cropkeeper_farms"), None);
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteBlobStore::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_blobs_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        cropkeeper_core::db::migrations::latest_version()
    ))
    .unwrap();

    let result = SqliteBlobStore::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("blobs"))));
}

#[test]
fn on_disk_blobs_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cropkeeper.db");

    {
        let conn = open_db(&path).unwrap();
        let mut store = SqliteBlobStore::try_new(&conn).unwrap();
        store.save("darkMode", &json!("true")).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteBlobStore::try_new(&conn).unwrap();
    assert_eq!(store.load("darkMode"), Some(json!("true")));
}
