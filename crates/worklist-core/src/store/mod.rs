//! State store and persistence bridge.
//!
//! The store owns the [`ApplicationState`] and is the only thing that
//! mutates it. Every mutation arrives as a discrete intent (an import, a
//! [`Command`], a placeholder conversion), is validated and formatted
//! here, and is followed by a synchronous whole-state save. A failed save
//! is reported to the caller but never rolls back memory: in-memory state
//! is authoritative for the session, and storage catches up on the next
//! successful save.

mod command;
mod migrate;

pub use command::*;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::{DbError, PersistedState, StateBackend};
use crate::format::{format_age, format_dob, format_phone, format_sex, format_time};
use crate::merge::{merge_supplemental, MergeError};
use crate::models::{AppointmentRecord, ApplicationState, AttachmentRef, RowObject};
use crate::reconcile::build_primary_records;
use crate::slots::{project_day, GridRow, TimeSlotPlaceholder};

/// Store errors. Input-format problems abort the operation with prior
/// state untouched; persistence failures leave the mutation applied.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("persistence error: {0}")]
    Backend(#[from] DbError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("no appointments loaded for {0}")]
    UnknownDateGroup(String),

    #[error("no record {record_id} under {dos}")]
    RecordNotFound { dos: String, record_id: String },

    #[error("invalid file type for {slot}; please upload {expected}")]
    InvalidAttachment {
        slot: &'static str,
        expected: &'static str,
    },

    #[error("no staged roster awaiting a date of service")]
    NothingStaged,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The state store. Generic over the persistence backend so tests can run
/// against [`MemoryBackend`](crate::db::MemoryBackend).
pub struct Store<B: StateBackend> {
    state: ApplicationState,
    backend: B,
    /// Roster rows parsed but not yet imported: the date of service
    /// arrives out of band after classification.
    staged_primary: Option<Vec<RowObject>>,
    recovered: bool,
}

impl<B: StateBackend> Store<B> {
    /// Load state from the backend. A malformed persisted payload must not
    /// crash the application: the store falls back to an empty state,
    /// discards the corrupt payload, and flags the recovery for a
    /// user-visible warning.
    pub fn open(mut backend: B) -> Self {
        let (state, recovered) = match backend.load() {
            Ok(persisted) => match state_from_persisted(persisted) {
                Ok(state) => (state, false),
                Err(e) => {
                    warn!(error = %e, "persisted state is corrupt, starting empty");
                    (ApplicationState::new(), true)
                }
            },
            Err(e) => {
                warn!(error = %e, "unable to load persisted state, starting empty");
                (ApplicationState::new(), true)
            }
        };
        Self {
            state,
            backend,
            staged_primary: None,
            recovered,
        }
    }

    /// Whether the last load had to discard a corrupt or unreadable
    /// payload. The caller owes the user a warning when this is set.
    pub fn recovered_from_corrupt_load(&self) -> bool {
        self.recovered
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    // =========================================================================
    // Imports
    // =========================================================================

    /// Stage parsed roster rows while the date of service is collected.
    pub fn stage_primary(&mut self, rows: Vec<RowObject>) {
        self.staged_primary = Some(rows);
    }

    pub fn has_staged_primary(&self) -> bool {
        self.staged_primary.is_some()
    }

    /// Discard any staged roster without importing it.
    pub fn discard_staged(&mut self) {
        self.staged_primary = None;
    }

    /// Import the staged roster under the given date of service.
    ///
    /// The staging buffer is cleared up front, so a failed import never
    /// leaves stale rows behind. An empty roster imports nothing. Returns
    /// the number of records created.
    pub fn import_staged(&mut self, dos: &str) -> StoreResult<usize> {
        let rows = self.staged_primary.take().ok_or(StoreError::NothingStaged)?;
        let records = build_primary_records(&rows, dos);
        if records.is_empty() {
            return Ok(0);
        }
        let count = records.len();
        // Re-importing a date replaces that date's list wholesale.
        self.state.patient_lists.insert(dos.to_string(), records);
        info!(dos, count, "imported primary roster");
        self.persist()?;
        Ok(count)
    }

    /// Stage and import a roster in one step.
    pub fn import_primary(&mut self, rows: Vec<RowObject>, dos: &str) -> StoreResult<usize> {
        self.stage_primary(rows);
        self.import_staged(dos)
    }

    /// Merge a supplemental demographics report into every date group.
    /// Returns the number of records updated. Rejected wholesale when a
    /// required column is missing or no primary list exists yet.
    pub fn import_supplemental(&mut self, rows: &[RowObject]) -> StoreResult<usize> {
        let updated = merge_supplemental(rows, &mut self.state.patient_lists)?;
        info!(updated, "merged supplemental report");
        self.persist()?;
        Ok(updated)
    }

    // =========================================================================
    // Interactive edits
    // =========================================================================

    /// Apply one edit command: validate, format, mutate, grow the tag
    /// vocabularies where applicable, then persist the whole state.
    pub fn apply(&mut self, command: Command) -> StoreResult<()> {
        match command {
            Command::EditField {
                dos,
                record_id,
                field,
                value,
            } => {
                let trimmed = value.trim().to_string();
                if field == "Visit Type" {
                    self.set_visit_type(&dos, &record_id, &trimmed)?;
                } else {
                    let record = self.record_mut(&dos, &record_id)?;
                    commit_field(record, &field, trimmed);
                }
            }
            Command::SetVisitType {
                dos,
                record_id,
                value,
            } => {
                self.set_visit_type(&dos, &record_id, value.trim())?;
            }
            Command::AddReason {
                dos,
                record_id,
                value,
            } => {
                let value = value.trim().to_string();
                if value.is_empty() {
                    return Ok(());
                }
                self.record_mut(&dos, &record_id)?.add_reason(&value);
                self.state.vocabulary.reason.ensure(&value);
            }
            Command::RemoveReason {
                dos,
                record_id,
                value,
            } => {
                self.record_mut(&dos, &record_id)?.remove_reason(&value);
            }
            Command::AddResult {
                dos,
                record_id,
                name,
            } => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Ok(());
                }
                self.record_mut(&dos, &record_id)?.add_result(&name);
                self.state.vocabulary.results_needed.ensure(&name);
            }
            Command::ToggleResult {
                dos,
                record_id,
                name,
            } => {
                self.record_mut(&dos, &record_id)?.toggle_result(&name);
            }
            Command::RemoveResult {
                dos,
                record_id,
                name,
            } => {
                self.record_mut(&dos, &record_id)?.remove_result(&name);
            }
            Command::SetFlag {
                dos,
                record_id,
                flag,
                value,
            } => {
                let record = self.record_mut(&dos, &record_id)?;
                match flag {
                    StatusFlag::Printed => record.is_printed = value,
                    StatusFlag::Done => record.is_done = value,
                    StatusFlag::Cancelled => record.is_cancelled = value,
                }
            }
            Command::SetAttachment {
                dos,
                record_id,
                slot,
                file_name,
                mime,
                data_url,
            } => {
                if !slot.accepts(&mime) {
                    return Err(StoreError::InvalidAttachment {
                        slot: slot_label(slot),
                        expected: slot.accepted_extensions(),
                    });
                }
                let record = self.record_mut(&dos, &record_id)?;
                *record.attachment_mut(slot) = Some(AttachmentRef {
                    name: file_name,
                    data_url,
                });
            }
            Command::ClearAttachment {
                dos,
                record_id,
                slot,
            } => {
                *self.record_mut(&dos, &record_id)?.attachment_mut(slot) = None;
            }
            Command::AddAppointment { dos } => {
                self.add_appointment(&dos)?;
                return Ok(());
            }
        }
        self.persist()
    }

    /// Append a blank manually-entered appointment. Returns its id.
    pub fn add_appointment(&mut self, dos: &str) -> StoreResult<String> {
        let records = self
            .state
            .patient_lists
            .get_mut(dos)
            .ok_or_else(|| StoreError::UnknownDateGroup(dos.to_string()))?;
        let record = AppointmentRecord::blank(format!("manual-{dos}-{}", Uuid::new_v4()));
        let id = record.id.clone();
        records.push(record);
        debug!(dos, %id, "added manual appointment");
        self.persist()?;
        Ok(id)
    }

    /// Convert an empty-slot placeholder into a real appointment, exactly
    /// once. Returns the new record id, or `None` when the name is blank
    /// or the placeholder has already been converted.
    pub fn convert_placeholder(
        &mut self,
        dos: &str,
        slot: &mut TimeSlotPlaceholder,
        name: &str,
    ) -> StoreResult<Option<String>> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let records = self
            .state
            .patient_lists
            .get_mut(dos)
            .ok_or_else(|| StoreError::UnknownDateGroup(dos.to_string()))?;
        if !slot.mark_converted() {
            return Ok(None);
        }
        let mut record = AppointmentRecord::blank(format!("{dos}-{}", Uuid::new_v4()));
        record.time = slot.time.clone();
        record.patient_name = trimmed.to_string();
        let id = record.id.clone();
        records.push(record);
        debug!(dos, %id, time = %slot.time, "converted empty slot");
        self.persist()?;
        Ok(Some(id))
    }

    // =========================================================================
    // Projections
    // =========================================================================

    /// The day grid for a date of service: real records and empty-slot
    /// placeholders, sorted by time. An unknown date projects a fully
    /// empty grid.
    pub fn project_day(&self, dos: &str) -> Vec<GridRow> {
        let records = self
            .state
            .patient_lists
            .get(dos)
            .map(Vec::as_slice)
            .unwrap_or_default();
        project_day(dos, records)
    }

    pub fn date_keys_newest_first(&self) -> Vec<&str> {
        self.state.date_keys_newest_first()
    }

    pub fn column_order(&self) -> Vec<String> {
        self.state.column_order()
    }

    /// Autocomplete sources, sorted for display.
    pub fn visit_type_suggestions(&self) -> Vec<String> {
        self.state.vocabulary.visit_type.sorted()
    }

    pub fn reason_suggestions(&self) -> Vec<String> {
        self.state.vocabulary.reason.sorted()
    }

    pub fn results_needed_suggestions(&self) -> Vec<String> {
        self.state.vocabulary.results_needed.sorted()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn set_visit_type(&mut self, dos: &str, record_id: &str, value: &str) -> StoreResult<()> {
        self.record_mut(dos, record_id)?.visit_type = value.to_string();
        self.state.vocabulary.visit_type.ensure(value);
        Ok(())
    }

    fn record_mut(&mut self, dos: &str, record_id: &str) -> StoreResult<&mut AppointmentRecord> {
        let records = self
            .state
            .patient_lists
            .get_mut(dos)
            .ok_or_else(|| StoreError::UnknownDateGroup(dos.to_string()))?;
        records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| StoreError::RecordNotFound {
                dos: dos.to_string(),
                record_id: record_id.to_string(),
            })
    }

    /// Save the whole state. On failure the mutation stays applied and the
    /// error propagates for reporting; the next successful save converges
    /// storage with memory.
    fn persist(&mut self) -> StoreResult<()> {
        let body = self.state.to_body();
        self.backend.save(&body).map_err(|e| {
            warn!(error = %e, "state save failed; in-memory state remains authoritative");
            StoreError::from(e)
        })
    }
}

/// Migrate and parse the raw persisted payload into typed state. Any
/// record that still fails to parse after migration marks the whole
/// payload corrupt.
fn state_from_persisted(persisted: PersistedState) -> serde_json::Result<ApplicationState> {
    let mut state = ApplicationState::new();
    for (dos, raw_records) in persisted.patient_lists {
        let mut records = Vec::with_capacity(raw_records.len());
        for mut raw in raw_records {
            migrate::migrate_record(&mut raw);
            records.push(serde_json::from_value::<AppointmentRecord>(raw)?);
        }
        state.patient_lists.insert(dos, records);
    }
    state.vocabulary.reason = persisted.reason_tags.into_iter().collect();
    state.vocabulary.results_needed = persisted.results_needed_tags.into_iter().collect();
    state.vocabulary.visit_type = persisted.visit_type_tags.into_iter().collect();
    Ok(state)
}

/// Commit an edited cell value onto the record, formatting the fields that
/// have canonical display forms. Unknown headers are passthrough fields.
fn commit_field(record: &mut AppointmentRecord, field: &str, value: String) {
    match field {
        "Patient Name" => record.patient_name = value,
        "Time" => record.time = format_time(&value),
        "Sex" => record.sex = format_sex(&value),
        "Age" => record.age = format_age(&value),
        "DOB" => record.dob = format_dob(&value),
        "Phone" => record.phone = format_phone(&value),
        "Account" => record.account = value,
        other => {
            record.extra.insert(other.to_string(), Value::String(value));
        }
    }
}

fn slot_label(slot: crate::models::AttachmentSlot) -> &'static str {
    match slot {
        crate::models::AttachmentSlot::Chart => "Chart",
        crate::models::AttachmentSlot::ExtractedSummary => "Extracted Summary",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbResult, MemoryBackend};
    use crate::models::AttachmentSlot;
    use serde_json::json;

    fn roster_row(name: &str, time: &str) -> RowObject {
        let mut row = RowObject::new();
        row.insert("Visit Type", "Annual");
        row.insert("Appt Time", time);
        row.insert("Patient Name", name);
        row.insert("Sex", "F");
        row.insert("Age", "45 Y");
        row
    }

    fn store_with_roster() -> Store<MemoryBackend> {
        let mut store = Store::open(MemoryBackend::new());
        store
            .import_primary(vec![roster_row("DOE, JANE", "09:00 AM")], "2024-03-01")
            .unwrap();
        store
    }

    #[test]
    fn test_open_empty_backend() {
        let store = Store::open(MemoryBackend::new());
        assert!(store.state().is_empty());
        assert!(!store.recovered_from_corrupt_load());
    }

    #[test]
    fn test_import_persists_whole_state() {
        let store = store_with_roster();
        let body = store.backend.saved_body().unwrap();
        assert_eq!(
            body["patientLists"]["2024-03-01"][0]["Patient Name"],
            "DOE, JANE"
        );
        assert_eq!(body["patientLists"]["2024-03-01"][0]["Time"], "9:00 AM");
    }

    #[test]
    fn test_staged_import_clears_buffer_and_reimport_replaces() {
        let mut store = Store::open(MemoryBackend::new());
        store.stage_primary(vec![roster_row("DOE, JANE", "09:00 AM")]);
        assert!(store.has_staged_primary());
        assert_eq!(store.import_staged("2024-03-01").unwrap(), 1);
        assert!(!store.has_staged_primary());
        assert!(matches!(
            store.import_staged("2024-03-01"),
            Err(StoreError::NothingStaged)
        ));

        // Importing the same date again replaces the list wholesale.
        store
            .import_primary(
                vec![
                    roster_row("SMITH, JOHN", "10:00 AM"),
                    roster_row("PARK, SUE", "10:20 AM"),
                ],
                "2024-03-01",
            )
            .unwrap();
        assert_eq!(store.state().patient_lists["2024-03-01"].len(), 2);
    }

    #[test]
    fn test_empty_staged_roster_is_no_op() {
        let mut store = Store::open(MemoryBackend::new());
        store.stage_primary(Vec::new());
        assert_eq!(store.import_staged("2024-03-01").unwrap(), 0);
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_supplemental_requires_primary() {
        let mut store = Store::open(MemoryBackend::new());
        let err = store.import_supplemental(&[]).unwrap_err();
        assert!(matches!(err, StoreError::Merge(MergeError::NoPrimaryData)));
    }

    #[test]
    fn test_supplemental_merge_end_to_end() {
        let mut store = store_with_roster();
        let mut row = RowObject::new();
        row.insert("Patient Name", "Doe, Jane Marie");
        row.insert("DOB", json!(29008));
        row.insert("Tel No.", "555 123 4567");
        row.insert("Acc #", json!(42));

        assert_eq!(store.import_supplemental(&[row]).unwrap(), 1);
        let record = &store.state().patient_lists["2024-03-01"][0];
        assert_eq!(record.phone, "(555) 123-4567");
        assert_eq!(record.account, "42");
        assert!(!record.dob.is_empty());
    }

    #[test]
    fn test_edit_field_formats_on_commit() {
        let mut store = store_with_roster();
        let id = store.state().patient_lists["2024-03-01"][0].id.clone();

        for (field, value) in [
            ("Time", " 08:20 AM "),
            ("Phone", "555.123.4567"),
            ("Sex", "male"),
            ("Age", "45 Y"),
        ] {
            store
                .apply(Command::EditField {
                    dos: "2024-03-01".into(),
                    record_id: id.clone(),
                    field: field.into(),
                    value: value.into(),
                })
                .unwrap();
        }

        let record = &store.state().patient_lists["2024-03-01"][0];
        assert_eq!(record.time, "8:20 AM");
        assert_eq!(record.phone, "(555) 123-4567");
        assert_eq!(record.sex, "M");
        assert_eq!(record.age, "45");
    }

    #[test]
    fn test_edit_unknown_field_becomes_passthrough() {
        let mut store = store_with_roster();
        let id = store.state().patient_lists["2024-03-01"][0].id.clone();
        store
            .apply(Command::EditField {
                dos: "2024-03-01".into(),
                record_id: id,
                field: "Room".into(),
                value: "4B".into(),
            })
            .unwrap();
        let record = &store.state().patient_lists["2024-03-01"][0];
        assert_eq!(record.extra.get("Room"), Some(&"4B".into()));
    }

    #[test]
    fn test_visit_type_and_tags_grow_vocabulary() {
        let mut store = store_with_roster();
        let id = store.state().patient_lists["2024-03-01"][0].id.clone();

        store
            .apply(Command::SetVisitType {
                dos: "2024-03-01".into(),
                record_id: id.clone(),
                value: "Recheck".into(),
            })
            .unwrap();
        store
            .apply(Command::AddReason {
                dos: "2024-03-01".into(),
                record_id: id.clone(),
                value: "Knee pain".into(),
            })
            .unwrap();
        store
            .apply(Command::AddResult {
                dos: "2024-03-01".into(),
                record_id: id,
                name: "CBC".into(),
            })
            .unwrap();

        assert_eq!(store.visit_type_suggestions(), vec!["Recheck"]);
        assert_eq!(store.reason_suggestions(), vec!["Knee pain"]);
        assert_eq!(store.results_needed_suggestions(), vec!["CBC"]);

        // Vocabulary survives removal from the record: union-only.
        let id = store.state().patient_lists["2024-03-01"][0].id.clone();
        store
            .apply(Command::RemoveReason {
                dos: "2024-03-01".into(),
                record_id: id,
                value: "Knee pain".into(),
            })
            .unwrap();
        assert!(store.state().patient_lists["2024-03-01"][0]
            .reasons
            .is_empty());
        assert_eq!(store.reason_suggestions(), vec!["Knee pain"]);
    }

    #[test]
    fn test_attachment_validation() {
        let mut store = store_with_roster();
        let id = store.state().patient_lists["2024-03-01"][0].id.clone();

        let err = store
            .apply(Command::SetAttachment {
                dos: "2024-03-01".into(),
                record_id: id.clone(),
                slot: AttachmentSlot::Chart,
                file_name: "notes.html".into(),
                mime: "text/html".into(),
                data_url: "data:text/html,x".into(),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidAttachment { .. }));
        assert!(store.state().patient_lists["2024-03-01"][0].chart.is_none());

        store
            .apply(Command::SetAttachment {
                dos: "2024-03-01".into(),
                record_id: id.clone(),
                slot: AttachmentSlot::ExtractedSummary,
                file_name: "summary.html".into(),
                mime: "text/html".into(),
                data_url: "data:text/html,x".into(),
            })
            .unwrap();
        let record = &store.state().patient_lists["2024-03-01"][0];
        assert_eq!(record.extracted_summary.as_ref().unwrap().name, "summary.html");

        store
            .apply(Command::ClearAttachment {
                dos: "2024-03-01".into(),
                record_id: id,
                slot: AttachmentSlot::ExtractedSummary,
            })
            .unwrap();
        assert!(store.state().patient_lists["2024-03-01"][0]
            .extracted_summary
            .is_none());
    }

    #[test]
    fn test_add_appointment() {
        let mut store = store_with_roster();
        let id = store.add_appointment("2024-03-01").unwrap();
        assert!(id.starts_with("manual-2024-03-01-"));
        assert_eq!(store.state().patient_lists["2024-03-01"].len(), 2);

        assert!(matches!(
            store.add_appointment("2030-01-01"),
            Err(StoreError::UnknownDateGroup(_))
        ));
    }

    #[test]
    fn test_convert_placeholder_exactly_once() {
        let mut store = store_with_roster();
        let mut slot = store
            .project_day("2024-03-01")
            .into_iter()
            .find_map(|row| match row {
                GridRow::EmptySlot(slot) => Some(slot),
                _ => None,
            })
            .unwrap();

        let first = store
            .convert_placeholder("2024-03-01", &mut slot, "NEW, PATIENT")
            .unwrap();
        assert!(first.is_some());
        // Second rapid submit: no second record.
        let second = store
            .convert_placeholder("2024-03-01", &mut slot, "NEW, PATIENT")
            .unwrap();
        assert!(second.is_none());
        assert_eq!(store.state().patient_lists["2024-03-01"].len(), 2);

        let converted = store.state().patient_lists["2024-03-01"]
            .iter()
            .find(|r| r.patient_name == "NEW, PATIENT")
            .unwrap();
        assert_eq!(converted.time, slot.time);
    }

    #[test]
    fn test_blank_name_does_not_convert() {
        let mut store = store_with_roster();
        let mut slot = store
            .project_day("2024-03-01")
            .into_iter()
            .find_map(|row| match row {
                GridRow::EmptySlot(slot) => Some(slot),
                _ => None,
            })
            .unwrap();
        assert!(store
            .convert_placeholder("2024-03-01", &mut slot, "   ")
            .unwrap()
            .is_none());
        assert!(!slot.is_converted());
    }

    #[test]
    fn test_legacy_payload_migrates_on_open() {
        let backend = MemoryBackend::with_body(json!({
            "patientLists": {
                "2023-10-27": [{
                    "id": "2023-10-27-0",
                    "Visit Type": ["Annual"],
                    "Patient Name": "DOE, JANE",
                    "Provider": "Dr. Who",
                    "Appt Time": "09:00",
                    "Results Needed": ["CBC"],
                }],
            },
            "reasonTags": ["Labs"],
        }));

        let store = Store::open(backend);
        assert!(!store.recovered_from_corrupt_load());
        let record = &store.state().patient_lists["2023-10-27"][0];
        assert_eq!(record.visit_type, "Annual");
        assert!(record.extra.get("Provider").is_none());
        assert_eq!(record.results_needed[0].name, "CBC");
        assert!(!record.results_needed[0].completed);
        assert!(store.state().vocabulary.reason.contains("Labs"));
    }

    #[test]
    fn test_corrupt_payload_falls_back_to_empty() {
        // A record that survives migration but is not a record at all.
        let backend = MemoryBackend::with_body(json!({
            "patientLists": { "2024-03-01": [["not", "a", "record"]] },
        }));
        let store = Store::open(backend);
        assert!(store.recovered_from_corrupt_load());
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_structurally_corrupt_body_flags_recovery() {
        // Corruption the backend itself rejects, before any record-level
        // parsing: same recovery contract as record-level corruption.
        let backend = MemoryBackend::with_body(json!({
            "patientLists": ["wrong", "shape"],
        }));
        let store = Store::open(backend);
        assert!(store.recovered_from_corrupt_load());
        assert!(store.state().is_empty());
    }

    /// Backend that accepts nothing, for divergence tests.
    struct FailingBackend;

    impl StateBackend for FailingBackend {
        fn load(&mut self) -> DbResult<PersistedState> {
            Ok(PersistedState::default())
        }

        fn save(&mut self, _body: &Value) -> DbResult<()> {
            Err(DbError::InvalidPayload("backend offline".into()))
        }
    }

    #[test]
    fn test_failed_save_keeps_memory_authoritative() {
        let mut store = Store::open(FailingBackend);
        let err = store.import_primary(vec![roster_row("DOE, JANE", "09:00 AM")], "2024-03-01");
        assert!(err.is_err());
        // The mutation is still applied in memory.
        assert_eq!(store.state().patient_lists["2024-03-01"].len(), 1);
    }

    #[test]
    fn test_round_trip_through_backend() {
        let mut store = store_with_roster();
        let id = store.state().patient_lists["2024-03-01"][0].id.clone();
        store
            .apply(Command::AddReason {
                dos: "2024-03-01".into(),
                record_id: id,
                value: "Labs".into(),
            })
            .unwrap();

        let body = store.backend.saved_body().unwrap().clone();
        let reopened = Store::open(MemoryBackend::with_body(body));
        assert_eq!(reopened.state(), store.state());
    }
}
