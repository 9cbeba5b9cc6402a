//! Persistence service for the worklist.
//!
//! Two operations: load the whole state, save the whole state. Saves are
//! atomic full replaces; there is no partial-write mode. The service
//! stores opaque JSON blobs and enforces nothing beyond "`patientLists`
//! must be a keyed mapping" on save.

mod schema;
mod state;

pub use schema::*;

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Persistence-service errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Client error: the save body is structurally unusable. Any other
    /// failure is on the service side.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// The raw persisted shape, before migration and typed parsing.
///
/// Records stay as raw JSON values here; the state store migrates and
/// parses them. Missing entries default to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersistedState {
    #[serde(rename = "patientLists", default)]
    pub patient_lists: BTreeMap<String, Vec<Value>>,
    #[serde(rename = "reasonTags", default)]
    pub reason_tags: Vec<String>,
    #[serde(rename = "resultsNeededTags", default)]
    pub results_needed_tags: Vec<String>,
    #[serde(rename = "visitTypeTags", default)]
    pub visit_type_tags: Vec<String>,
}

/// The external persistence collaborator, as seen by the state store.
pub trait StateBackend {
    /// Fetch the whole persisted state. Missing or corrupt individual
    /// entries default to empty; a structurally unreadable state is an
    /// error, which the store turns into an empty-state recovery.
    fn load(&mut self) -> DbResult<PersistedState>;

    /// Replace the whole persisted state atomically. Rejects a body whose
    /// `patientLists` is absent, null, or not a keyed mapping.
    fn save(&mut self, body: &Value) -> DbResult<()>;
}

/// SQLite-backed persistence service.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl StateBackend for Database {
    fn load(&mut self) -> DbResult<PersistedState> {
        self.load_state()
    }

    fn save(&mut self, body: &Value) -> DbResult<()> {
        self.save_state(body)
    }
}

/// In-memory backend holding the last saved body. Useful for tests and for
/// embedding the engine without durable storage.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    body: Option<Value>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with an already-persisted body.
    pub fn with_body(body: Value) -> Self {
        Self { body: Some(body) }
    }

    /// The last body saved, if any.
    pub fn saved_body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl StateBackend for MemoryBackend {
    fn load(&mut self) -> DbResult<PersistedState> {
        match &self.body {
            None => Ok(PersistedState::default()),
            // A structurally unreadable body is an error, same as the
            // SQLite backend; the store falls back and flags recovery.
            Some(body) => Ok(serde_json::from_value(body.clone())?),
        }
    }

    fn save(&mut self, body: &Value) -> DbResult<()> {
        if !body.get("patientLists").map_or(false, Value::is_object) {
            return Err(DbError::InvalidPayload(
                "patientLists must be a keyed mapping".into(),
            ));
        }
        self.body = Some(body.clone());
        Ok(())
    }
}
