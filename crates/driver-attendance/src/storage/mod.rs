//! Persistence for the attendance collection.
//!
//! The whole collection is written as one JSON array under a single key of a
//! `SQLite` key-value table. Reads and writes are all-or-nothing on that one
//! value; there is no per-record storage.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::AttendanceRecord;

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_RECORDS_KEY: &str = "attendance-records";

/// How long a write waits on another process's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Length of the random part of generated ids.
const ID_SUFFIX_LEN: usize = 11;

/// Store holding the serialized attendance collection.
#[derive(Debug)]
pub struct RecordStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Entry key the collection lives under.
    key: String,
}

impl RecordStore {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening record store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        debug!("Journal mode: {}", mode);
        migrations::initialize_schema(&conn)?;

        info!("Record store opened at {}", path.display());
        Ok(Self {
            path,
            conn,
            key: key.into(),
        })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            key: DEFAULT_RECORDS_KEY.to_string(),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the entry key the collection is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the collection, treating any failure as an empty collection.
    ///
    /// A missing entry, an unreadable store, or corrupt JSON all yield an
    /// empty `Vec`. Failures are logged, never returned.
    #[must_use]
    pub fn load(&self) -> Vec<AttendanceRecord> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                warn!("Error loading attendance records: {}", e);
                Vec::new()
            }
        }
    }

    /// Load the collection, surfacing failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be read or does not parse.
    pub fn try_load(&self) -> Result<Vec<AttendanceRecord>> {
        let Some(raw) = self.read_entry()? else {
            debug!("No stored entry under {}", self.key);
            return Ok(Vec::new());
        };

        let records: Vec<AttendanceRecord> = serde_json::from_str(&raw)?;
        debug!("Loaded {} attendance records", records.len());
        Ok(records)
    }

    /// Persist the full collection, logging and ignoring any failure.
    pub fn save(&self, records: &[AttendanceRecord]) {
        if let Err(e) = self.try_save(records) {
            warn!("Error saving attendance records: {}", e);
        }
    }

    /// Persist the full collection, surfacing failures.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn try_save(&self, records: &[AttendanceRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.write_entry(&raw)?;
        debug!("Saved {} attendance records", records.len());
        Ok(())
    }

    fn read_entry(&self) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM entries WHERE key = ?1",
                [&self.key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_entry(&self, raw: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO entries (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![self.key, raw],
        )?;
        Ok(())
    }
}

/// Generate a fresh record identifier.
///
/// A base-36 millisecond timestamp followed by a random base-36 suffix.
/// Unique enough for one location's records; not a security token.
#[must_use]
pub fn generate_id() -> String {
    let millis = u128::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let random = uuid::Uuid::new_v4().as_u128();

    let mut id = to_base36(millis);
    id.extend(to_base36(random).chars().take(ID_SUFFIX_LEN));
    id
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        // n % 36 < 36, so the index is always in bounds
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Shift, Stamp};
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn create_test_store() -> RecordStore {
        RecordStore::open_in_memory().expect("failed to create test store")
    }

    fn sample_record(id: &str, driver: &str) -> AttendanceRecord {
        let mut record = AttendanceRecord::new(
            id.to_string(),
            driver.to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Shift::Morning,
        );
        record.car_received = Some("42".to_string());
        record.check_in = Some(Stamp {
            time: Utc::now(),
            log: "ok".to_string(),
        });
        record
    }

    #[test]
    fn test_open_in_memory() {
        let store = RecordStore::open_in_memory();
        assert!(store.is_ok());
        assert_eq!(store.unwrap().key(), DEFAULT_RECORDS_KEY);
    }

    #[test]
    fn test_load_empty_store() {
        let store = create_test_store();
        assert!(store.load().is_empty());
        assert!(store.try_load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let store = create_test_store();
        let records = vec![sample_record("a1", "Alice"), sample_record("b2", "Bob")];

        store.try_save(&records).unwrap();
        assert_eq!(store.load(), records);
    }

    #[test]
    fn test_save_overwrites_previous_collection() {
        let store = create_test_store();
        store.save(&[sample_record("a1", "Alice")]);
        store.save(&[]);

        assert!(store.load().is_empty());
        let rows: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_corrupt_entry_loads_empty() {
        let store = create_test_store();
        store.write_entry("{not json").unwrap();

        assert!(store.load().is_empty());
        assert!(matches!(store.try_load(), Err(Error::Json(_))));
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let store = create_test_store();
        store
            .write_entry(r#"[{"id": "x", "driverName": "Al", "date": "2024-01-01", "shift": "noon"}]"#)
            .unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_stored_value_is_json_array() {
        let store = create_test_store();
        store.save(&[sample_record("a1", "Alice")]);

        let raw = store.read_entry().unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["driverName"], "Alice");
        assert_eq!(value[0]["carReceived"], "42");
    }

    #[test]
    fn test_load_survives_missing_table() {
        let store = create_test_store();
        store.conn.execute("DROP TABLE entries", []).unwrap();

        assert!(store.load().is_empty());
        assert!(store.try_load().unwrap_err().is_storage_error());
        // save is best-effort and must not panic
        store.save(&[sample_record("a1", "Alice")]);
    }

    #[test]
    fn test_open_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("attendance.db");
        let records = vec![sample_record("a1", "Alice")];

        {
            let store = RecordStore::open(&path, "custom-key").unwrap();
            assert_eq!(store.path(), path.as_path());
            store.save(&records);
        }

        let reopened = RecordStore::open(&path, "custom-key").unwrap();
        assert_eq!(reopened.load(), records);

        let other_key = RecordStore::open(&path, DEFAULT_RECORDS_KEY).unwrap();
        assert!(other_key.load().is_empty());
    }

    #[test]
    fn test_open_sets_busy_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attendance.db");
        let store = RecordStore::open(path, DEFAULT_RECORDS_KEY).unwrap();

        let timeout_ms: i64 = store
            .conn
            .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
            .unwrap();
        assert_eq!(timeout_ms, 5_000);
    }

    #[test]
    fn test_concurrent_handles_share_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attendance.db");
        let first = RecordStore::open(&path, DEFAULT_RECORDS_KEY).unwrap();
        let second = RecordStore::open(&path, DEFAULT_RECORDS_KEY).unwrap();

        first.try_save(&[sample_record("a1", "Alice")]).unwrap();
        second
            .try_save(&[sample_record("a1", "Alice"), sample_record("b2", "Bob")])
            .unwrap();

        assert_eq!(first.try_load().unwrap().len(), 2);
    }

    #[test]
    fn test_generate_id_unique_and_non_empty() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| !id.is_empty()));
        assert!(ids
            .iter()
            .all(|id| id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())));
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_295), "zz");
    }
}
