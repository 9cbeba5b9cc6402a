//! Root application state.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::tags::TagVocabulary;

use super::AppointmentRecord;

/// Fixed display columns, in order, ahead of any passthrough columns.
pub const FIXED_COLUMNS: [&str; 10] = [
    "Visit Type",
    "Time",
    "Patient Name",
    "Sex",
    "DOB",
    "Age",
    "Reason",
    "Results Needed",
    "Chart",
    "Extracted Summary",
];

/// Checkbox columns, always rendered last.
pub const CHECKBOX_COLUMNS: [&str; 3] = ["Printed", "Done", "Cancelled"];

/// The root of everything the application owns: every date group plus the
/// tag vocabularies. The sole unit of persistence round-trip; there is no
/// partial persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationState {
    /// Date-of-service key (ISO date string) to insertion-ordered records.
    /// Groups are created on first primary import and never automatically
    /// deleted.
    pub patient_lists: BTreeMap<String, Vec<AppointmentRecord>>,
    pub vocabulary: TagVocabulary,
}

impl ApplicationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patient_lists.is_empty()
    }

    /// Date keys for display, newest first. ISO date strings order the same
    /// way as the calendar, so plain string order suffices.
    pub fn date_keys_newest_first(&self) -> Vec<&str> {
        self.patient_lists.keys().rev().map(String::as_str).collect()
    }

    /// Superset display column order across every loaded date: fixed
    /// columns, then passthrough columns in first-seen order, then the
    /// checkbox columns. Derived on demand, never persisted.
    pub fn column_order(&self) -> Vec<String> {
        let mut columns: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
        for records in self.patient_lists.values() {
            for record in records {
                for key in record.extra.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
        }
        columns.extend(CHECKBOX_COLUMNS.iter().map(|c| c.to_string()));
        columns
    }

    /// Serialize to the persistence-service body shape: one entry per date
    /// key under `patientLists`, plus the three tag vocabularies in
    /// insertion order.
    pub fn to_body(&self) -> Value {
        let mut lists = serde_json::Map::new();
        for (dos, records) in &self.patient_lists {
            lists.insert(
                dos.clone(),
                serde_json::to_value(records).unwrap_or_else(|_| Value::Array(Vec::new())),
            );
        }
        json!({
            "patientLists": Value::Object(lists),
            "reasonTags": self.vocabulary.reason.entries(),
            "resultsNeededTags": self.vocabulary.results_needed.entries(),
            "visitTypeTags": self.vocabulary.visit_type.entries(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_keys_newest_first() {
        let mut state = ApplicationState::new();
        state.patient_lists.insert("2024-03-01".into(), Vec::new());
        state.patient_lists.insert("2024-03-15".into(), Vec::new());
        state.patient_lists.insert("2024-02-28".into(), Vec::new());

        assert_eq!(
            state.date_keys_newest_first(),
            vec!["2024-03-15", "2024-03-01", "2024-02-28"]
        );
    }

    #[test]
    fn test_column_order_superset() {
        let mut state = ApplicationState::new();
        let mut a = AppointmentRecord::blank("a".into());
        a.extra.insert("Room".into(), "1".into());
        let mut b = AppointmentRecord::blank("b".into());
        b.extra.insert("Insurance".into(), "X".into());
        b.extra.insert("Room".into(), "2".into());
        state.patient_lists.insert("2024-03-01".into(), vec![a]);
        state.patient_lists.insert("2024-03-02".into(), vec![b]);

        let columns = state.column_order();
        assert_eq!(&columns[..10], &FIXED_COLUMNS.map(String::from)[..]);
        let tail: Vec<&str> = columns[10..].iter().map(String::as_str).collect();
        assert_eq!(tail, vec!["Room", "Insurance", "Printed", "Done", "Cancelled"]);
    }

    #[test]
    fn test_to_body_shape() {
        let mut state = ApplicationState::new();
        state
            .patient_lists
            .insert("2024-03-01".into(), vec![AppointmentRecord::blank("x".into())]);
        state.vocabulary.reason.ensure("Labs");

        let body = state.to_body();
        assert!(body["patientLists"].is_object());
        assert_eq!(body["patientLists"]["2024-03-01"][0]["id"], "x");
        assert_eq!(body["reasonTags"][0], "Labs");
        assert_eq!(body["visitTypeTags"].as_array().unwrap().len(), 0);
    }
}
