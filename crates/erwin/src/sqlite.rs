//! SQLite storage layer for the Erwin ride record engine.
//!
//! SQLite is the ONLY durable store. Records are JSON documents keyed by
//! (collection, ride id); a write is always a full-record replace, never a
//! partial patch.
//!
//! # Design Principles
//!
//! - SQLite is the only source of truth
//! - Every write commits to SQLite first
//! - Reopen = recover from SQLite, emit nothing
//! - No pluggable engines, no alternative backends

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::{DriverId, RideId, RideRecord};
use crate::ErwinError;

/// Name of the global collection holding every ride.
pub const GLOBAL_COLLECTION: &str = "rides";

/// Name of a driver's private collection.
pub fn driver_collection(driver: &DriverId) -> String {
    format!("driver:{}", driver.as_str())
}

/// SQLite storage for ride record copies.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens a SQLite database at the given path.
    ///
    /// Creates the database and schema if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ErwinError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Creates an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn in_memory() -> Result<Self, ErwinError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initializes the database schema.
    fn init_schema(&self) -> Result<(), ErwinError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS ride_records (
                collection TEXT NOT NULL,
                ride_id TEXT NOT NULL,
                record TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (collection, ride_id)
            );

            CREATE INDEX IF NOT EXISTS idx_ride_records_collection
                ON ride_records(collection);
            "#,
        )?;
        Ok(())
    }

    /// Returns the current Unix timestamp in milliseconds.
    pub fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_millis() as i64
    }

    /// Writes a record into a collection, replacing any existing copy.
    pub fn write(&self, collection: &str, record: &RideRecord) -> Result<(), ErwinError> {
        let json = serde_json::to_string(record)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO ride_records (collection, ride_id, record, updated_at)
             VALUES (?, ?, ?, ?)",
            params![collection, record.id.as_str(), json, Self::now_millis()],
        )?;
        Ok(())
    }

    /// Reads a record from a collection.
    pub fn read(&self, collection: &str, id: &RideId) -> Result<Option<RideRecord>, ErwinError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT record FROM ride_records WHERE collection = ? AND ride_id = ?",
                params![collection, id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Removes a record copy from a collection.
    ///
    /// Returns true if a copy existed and was removed.
    pub fn remove(&self, collection: &str, id: &RideId) -> Result<bool, ErwinError> {
        let affected = self.conn.execute(
            "DELETE FROM ride_records WHERE collection = ? AND ride_id = ?",
            params![collection, id.as_str()],
        )?;
        Ok(affected > 0)
    }

    /// Lists every record in a collection, oldest write first.
    pub fn list(&self, collection: &str) -> Result<Vec<RideRecord>, ErwinError> {
        let mut stmt = self.conn.prepare(
            "SELECT record FROM ride_records WHERE collection = ? ORDER BY updated_at, ride_id",
        )?;
        let rows = stmt.query_map(params![collection], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(serde_json::from_str(&row?)?);
        }
        Ok(records)
    }
}
