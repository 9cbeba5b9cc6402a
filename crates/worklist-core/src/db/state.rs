//! State blob load/save operations.

use rusqlite::params;
use serde_json::Value;
use tracing::warn;

use super::{Database, DbError, DbResult, PersistedState};

/// Settings rows holding the tag vocabularies, by name.
const TAG_SETTINGS: [&str; 3] = ["reasonTags", "resultsNeededTags", "visitTypeTags"];

impl Database {
    /// Load the whole persisted state.
    ///
    /// A blob that fails to parse degrades to an empty entry with a
    /// warning; a corrupt row never fails the whole load.
    pub fn load_state(&self) -> DbResult<PersistedState> {
        let mut state = PersistedState::default();

        let mut stmt = self
            .conn
            .prepare("SELECT dos, data FROM patient_lists ORDER BY dos")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (dos, data) = row?;
            let records = match serde_json::from_str::<Value>(&data) {
                Ok(Value::Array(records)) => records,
                Ok(_) | Err(_) => {
                    warn!(%dos, "unable to parse patient list blob, defaulting to empty");
                    Vec::new()
                }
            };
            state.patient_lists.insert(dos, records);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT name, values_json FROM settings")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (name, values_json) = row?;
            let values: Vec<String> = match serde_json::from_str(&values_json) {
                Ok(values) => values,
                Err(_) => {
                    warn!(%name, "unable to parse settings blob, defaulting to empty");
                    Vec::new()
                }
            };
            match name.as_str() {
                "reasonTags" => state.reason_tags = values,
                "resultsNeededTags" => state.results_needed_tags = values,
                "visitTypeTags" => state.visit_type_tags = values,
                _ => {}
            }
        }

        Ok(state)
    }

    /// Atomically replace the whole persisted state: every date group and
    /// every tag vocabulary, all-or-nothing.
    pub fn save_state(&mut self, body: &Value) -> DbResult<()> {
        let Some(lists) = body.get("patientLists").and_then(Value::as_object) else {
            return Err(DbError::InvalidPayload(
                "patientLists must be a keyed mapping".into(),
            ));
        };

        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM patient_lists", [])?;
        {
            let mut insert =
                tx.prepare("INSERT INTO patient_lists (dos, data) VALUES (?1, ?2)")?;
            for (dos, records) in lists {
                let data = if records.is_array() {
                    serde_json::to_string(records)?
                } else {
                    "[]".to_string()
                };
                insert.execute(params![dos, data])?;
            }
        }

        tx.execute("DELETE FROM settings", [])?;
        {
            let mut insert =
                tx.prepare("INSERT INTO settings (name, values_json) VALUES (?1, ?2)")?;
            for name in TAG_SETTINGS {
                let values = match body.get(name) {
                    Some(value) if value.is_array() => serde_json::to_string(value)?,
                    _ => "[]".to_string(),
                };
                insert.execute(params![name, values])?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}
