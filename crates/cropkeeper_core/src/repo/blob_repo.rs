//! Named JSON blob storage contract and implementations.
//!
//! # Responsibility
//! - Provide generic get/set of named JSON payloads in durable storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `load` returns `None` for missing keys, unavailable storage and
//!   malformed JSON; the caller must be able to start from empty state.
//! - `save` replaces the whole payload for a key atomically.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::farm::now_epoch_ms;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer error for blob storage operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(serde_json::Error),
    /// Connection has not been migrated to the expected schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Connection is at the right version but a required table is absent.
    MissingRequiredTable(&'static str),
    /// Backing storage refused the write (test adapter / degraded mode).
    SaveUnavailable,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "blob serialization failed: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::SaveUnavailable => write!(f, "blob storage is unavailable for writes"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Storage contract for named JSON blobs.
///
/// The farm store is generic over this trait so tests can substitute an
/// in-memory adapter for the durable SQLite one.
pub trait BlobStore {
    /// Loads the payload stored under `key`.
    ///
    /// Missing keys, unavailable storage and malformed JSON all yield
    /// `None`; the store must start empty rather than crash.
    fn load(&self, key: &str) -> Option<Value>;

    /// Writes the payload for `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: &Value) -> RepoResult<()>;
}

/// SQLite-backed blob store over the `blobs` key/value table.
pub struct SqliteBlobStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobStore<'conn> {
    /// Wraps a migrated connection, validating the expected schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` does not
    ///   match the latest migration known by this binary.
    /// - `MissingRequiredTable` when the `blobs` table is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version =
            conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_blobs_table: bool = conn.query_row(
            "SELECT EXISTS (
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'blobs'
             );",
            [],
            |row| row.get(0),
        )?;
        if !has_blobs_table {
            return Err(RepoError::MissingRequiredTable("blobs"));
        }

        Ok(Self { conn })
    }
}

impl BlobStore for SqliteBlobStore<'_> {
    fn load(&self, key: &str) -> Option<Value> {
        let raw = match self
            .conn
            .query_row(
                "SELECT value FROM blobs WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
        {
            Ok(raw) => raw?,
            Err(err) => {
                warn!("event=blob_load module=repo status=error key={key} error={err}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("event=blob_load module=repo status=malformed key={key} error={err}");
                None
            }
        }
    }

    fn save(&mut self, key: &str, value: &Value) -> RepoResult<()> {
        let payload = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at;",
            params![key, payload, now_epoch_ms()],
        )?;
        Ok(())
    }
}

/// In-memory blob store for tests and ephemeral sessions.
///
/// Values are kept as raw strings so tests can inject malformed payloads
/// through [`MemoryBlobStore::insert_raw`] and exercise the degraded-load
/// path. Writes can be forced to fail with [`MemoryBlobStore::fail_saves`].
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: BTreeMap<String, String>,
    fail_saves: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw payload without JSON validation.
    pub fn insert_raw(&mut self, key: impl Into<String>, raw: impl Into<String>) {
        self.entries.insert(key.into(), raw.into());
    }

    /// Raw payload currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Makes every subsequent `save` fail with `SaveUnavailable`.
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> Option<Value> {
        let raw = self.entries.get(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("event=blob_load module=repo status=malformed key={key} error={err}");
                None
            }
        }
    }

    fn save(&mut self, key: &str, value: &Value) -> RepoResult<()> {
        if self.fail_saves {
            return Err(RepoError::SaveUnavailable);
        }
        let payload = serde_json::to_string(value)?;
        self.entries.insert(key.to_string(), payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BlobStore, MemoryBlobStore, RepoError};
    use serde_json::json;

    #[test]
    fn memory_store_round_trips_values() {
        let mut store = MemoryBlobStore::new();
        store.save("k", &json!({"a": 1})).unwrap();
        assert_eq!(store.load("k"), Some(json!({"a": 1})));
    }

    #[test]
    fn memory_store_loads_missing_and_malformed_as_absent() {
        let mut store = MemoryBlobStore::new();
        assert_eq!(store.load("missing"), None);

        store.insert_raw("bad", "{not json");
        assert_eq!(store.load("bad"), None);
    }

    #[test]
    fn memory_store_can_simulate_write_failure() {
        let mut store = MemoryBlobStore::new();
        store.fail_saves(true);
        let err = store.save("k", &json!(1)).unwrap_err();
        assert!(matches!(err, RepoError::SaveUnavailable));
        assert_eq!(store.raw("k"), None);
    }
}
