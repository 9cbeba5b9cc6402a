//! Appointment record models.
//!
//! Field names on the wire keep the legacy worksheet shape
//! (`"Visit Type"`, `"isPrinted"`, `"dataUrl"`, ...) so a state persisted
//! by an earlier deployment loads after the one-time migration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One scheduled or manually-added visit.
///
/// The identifier is stable for the lifetime of the record and is the sole
/// correlation key for in-place edits. Spreadsheet columns not claimed by
/// the fixed schema ride along in `extra`, preserving column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentRecord {
    /// Unique within its date group: `{dos}-{index}` for imported rows,
    /// `manual-{dos}-{uuid}` for manual adds, `{dos}-{uuid}` for converted
    /// placeholders.
    pub id: String,
    #[serde(rename = "Visit Type", default)]
    pub visit_type: String,
    #[serde(rename = "Patient Name", default)]
    pub patient_name: String,
    /// Canonical "H:MM AM/PM", or empty.
    #[serde(rename = "Time", default)]
    pub time: String,
    #[serde(rename = "Sex", default)]
    pub sex: String,
    #[serde(rename = "Age", default)]
    pub age: String,
    /// MM/DD/YYYY, or empty until a supplemental merge fills it in.
    #[serde(rename = "DOB", default)]
    pub dob: String,
    #[serde(rename = "Phone", default)]
    pub phone: String,
    /// Opaque account identifier from the supplemental report.
    #[serde(rename = "Account", default)]
    pub account: String,
    /// Insertion-ordered, no duplicates.
    #[serde(rename = "Reason", default)]
    pub reasons: Vec<String>,
    /// Insertion-ordered, names unique case-insensitively.
    #[serde(rename = "Results Needed", default)]
    pub results_needed: Vec<ResultItem>,
    #[serde(rename = "Chart", default)]
    pub chart: Option<AttachmentRef>,
    #[serde(rename = "Extracted Summary", default)]
    pub extracted_summary: Option<AttachmentRef>,
    #[serde(rename = "isPrinted", default)]
    pub is_printed: bool,
    #[serde(rename = "isDone", default)]
    pub is_done: bool,
    #[serde(rename = "isCancelled", default)]
    pub is_cancelled: bool,
    /// Passthrough columns from the source spreadsheet.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppointmentRecord {
    /// Create a blank record with the given identifier.
    pub fn blank(id: String) -> Self {
        Self {
            id,
            visit_type: String::new(),
            patient_name: String::new(),
            time: String::new(),
            sex: String::new(),
            age: String::new(),
            dob: String::new(),
            phone: String::new(),
            account: String::new(),
            reasons: Vec::new(),
            results_needed: Vec::new(),
            chart: None,
            extracted_summary: None,
            is_printed: false,
            is_done: false,
            is_cancelled: false,
            extra: Map::new(),
        }
    }

    /// Add a reason if not already present (exact match, insertion order).
    pub fn add_reason(&mut self, reason: &str) {
        if !self.reasons.iter().any(|r| r == reason) {
            self.reasons.push(reason.to_string());
        }
    }

    /// Remove every reason equal to `reason`.
    pub fn remove_reason(&mut self, reason: &str) {
        self.reasons.retain(|r| r != reason);
    }

    /// Add a pending result item unless a name already matches it
    /// case-insensitively. Returns whether an item was added.
    pub fn add_result(&mut self, name: &str) -> bool {
        let exists = self
            .results_needed
            .iter()
            .any(|item| item.name.eq_ignore_ascii_case(name));
        if !exists {
            self.results_needed.push(ResultItem::new(name));
        }
        !exists
    }

    /// Flip the completed flag on the named result item.
    pub fn toggle_result(&mut self, name: &str) -> bool {
        match self
            .results_needed
            .iter_mut()
            .find(|item| item.name.eq_ignore_ascii_case(name))
        {
            Some(item) => {
                item.completed = !item.completed;
                true
            }
            None => false,
        }
    }

    /// Remove the named result item (exact name match).
    pub fn remove_result(&mut self, name: &str) {
        self.results_needed.retain(|item| item.name != name);
    }

    /// Attachment slot accessor.
    pub fn attachment(&self, slot: AttachmentSlot) -> Option<&AttachmentRef> {
        match slot {
            AttachmentSlot::Chart => self.chart.as_ref(),
            AttachmentSlot::ExtractedSummary => self.extracted_summary.as_ref(),
        }
    }

    /// Mutable attachment slot accessor.
    pub fn attachment_mut(&mut self, slot: AttachmentSlot) -> &mut Option<AttachmentRef> {
        match slot {
            AttachmentSlot::Chart => &mut self.chart,
            AttachmentSlot::ExtractedSummary => &mut self.extracted_summary,
        }
    }

    /// Display emphasis for the row: cancelled wins over done wins over
    /// printed. Derived, never persisted.
    pub fn display_status(&self) -> DisplayStatus {
        if self.is_cancelled {
            DisplayStatus::Cancelled
        } else if self.is_done {
            DisplayStatus::Done
        } else if self.is_printed {
            DisplayStatus::Printed
        } else {
            DisplayStatus::Plain
        }
    }
}

/// A test or follow-up the visit still needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultItem {
    pub name: String,
    pub completed: bool,
}

impl ResultItem {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            completed: false,
        }
    }
}

/// An attached document. The data URL is an opaque blob reference; nothing
/// in the engine looks inside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttachmentRef {
    pub name: String,
    #[serde(rename = "dataUrl")]
    pub data_url: String,
}

/// The two attachment slots on a record, each with its own accepted types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentSlot {
    /// PDF only.
    Chart,
    /// PDF or HTML.
    ExtractedSummary,
}

impl AttachmentSlot {
    /// Whether this slot accepts a file of the given MIME type.
    pub fn accepts(&self, mime: &str) -> bool {
        match self {
            AttachmentSlot::Chart => mime == "application/pdf",
            AttachmentSlot::ExtractedSummary => {
                mime == "application/pdf" || mime == "text/html"
            }
        }
    }

    /// Human-readable list of accepted extensions, for rejection notices.
    pub fn accepted_extensions(&self) -> &'static str {
        match self {
            AttachmentSlot::Chart => ".pdf",
            AttachmentSlot::ExtractedSummary => ".pdf, .html",
        }
    }
}

/// Row rendering priority derived from the status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Cancelled,
    Done,
    Printed,
    Plain,
}
