//! SQLite-backed document store.
//!
//! Both document kinds are kept as JSON text, one row per document, with the
//! columns needed for lookups (`week_ending`, `location_code`) duplicated
//! next to the body. A single connection is shared behind a mutex; every
//! public method holds it for the duration of one logical operation.

mod config;
mod submissions;

use common::model::config::ConfigLoadError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS settings (
        id          TEXT PRIMARY KEY,
        body        TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS submissions (
        id             TEXT PRIMARY KEY,
        week_ending    TEXT NOT NULL,
        location_code  TEXT NOT NULL,
        body           TEXT NOT NULL,
        updated_at     TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_submissions_week
        ON submissions (week_ending);
    CREATE INDEX IF NOT EXISTS idx_submissions_location
        ON submissions (location_code, week_ending);
";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("malformed document {id}: {source}")]
    Document {
        id: String,
        source: serde_json::Error,
    },
    #[error("cannot encode document: {0}")]
    Encode(serde_json::Error),
    #[error("stored configuration is invalid: {0}")]
    Config(#[from] ConfigLoadError),
    #[error("store connection poisoned by a panicked writer")]
    Poisoned,
}

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}
