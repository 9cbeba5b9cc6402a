//! Primary-roster schema reconciliation.
//!
//! Raw roster rows arrive with whatever columns the scheduling system
//! exported. Reconciliation maps the known columns into the fixed record
//! schema, discards the administrative tail, and carries everything else
//! through untouched. The transform is owned-input/owned-output: the
//! caller commits the whole result or none of it, so a failed import never
//! leaves a partial record set behind.

use tracing::debug;

use crate::format::{format_age, format_sex, format_time};
use crate::models::{AppointmentRecord, RowObject};

/// Filename marker for the primary roster export.
const ROSTER_MARKER: &str = "ovenctrs";

/// Filename markers for the supplemental demographics reports.
const REPORT_MARKERS: [&str; 2] = ["registry_report", "cwreport"];

/// Everything from this column onward in the roster is administrative.
const ADMIN_TAIL_COLUMN: &str = "Visit Sts";

/// Internal-only roster columns dropped regardless of position.
const INTERNAL_COLUMNS: [&str; 3] = ["P/R", "Provider", "Appt Time"];

/// Source columns claimed by the fixed record schema; never duplicated
/// into the passthrough set.
const CLAIMED_COLUMNS: [&str; 13] = [
    "id",
    "Visit Type",
    "Patient Name",
    "Time",
    "Sex",
    "Age",
    "DOB",
    "Phone",
    "Account",
    "Reason",
    "Results Needed",
    "Chart",
    "Extracted Summary",
];

/// How an uploaded spreadsheet should be routed, by filename substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Establishes the appointment list for one date of service; the date
    /// is supplied out of band after classification.
    PrimaryRoster,
    /// Demographic overlay matched by normalized patient identity.
    SupplementalReport,
    /// No import; the caller surfaces an "unrecognized file" notice.
    Unrecognized,
}

impl FileKind {
    /// Classify a file by name. Case-insensitive substring match.
    pub fn classify(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if lower.contains(ROSTER_MARKER) {
            FileKind::PrimaryRoster
        } else if REPORT_MARKERS.iter().any(|m| lower.contains(m)) {
            FileKind::SupplementalReport
        } else {
            FileKind::Unrecognized
        }
    }
}

/// Build the per-date record set from raw roster rows.
///
/// Columns from "Visit Sts" onward (first-row key order) plus the
/// internal-only columns are discarded. Each remaining unclaimed column
/// passes through on the record. An empty input produces an empty output;
/// the caller treats that as no import.
pub fn build_primary_records(rows: &[RowObject], dos: &str) -> Vec<AppointmentRecord> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    let keys: Vec<&str> = first.keys().collect();
    let tail_start = keys.iter().position(|k| *k == ADMIN_TAIL_COLUMN);
    let mut discard: Vec<&str> = match tail_start {
        Some(index) => keys[index..].to_vec(),
        None => Vec::new(),
    };
    discard.extend(INTERNAL_COLUMNS);
    debug!(dos, rows = rows.len(), discarded = discard.len(), "reconciling primary roster");

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let mut record = AppointmentRecord::blank(format!("{dos}-{index}"));
            record.visit_type = row.text("Visit Type");
            record.patient_name = row.text("Patient Name");
            record.time = format_time(&row.text("Appt Time"));
            record.sex = format_sex(&row.text("Sex"));
            record.age = format_age(&row.text("Age"));
            // A roster that already carries demographics fills the fixed
            // fields directly instead of passing them through.
            record.dob = row.text("DOB");
            record.phone = row.text("Phone");
            record.account = row.text("Account");

            for (key, value) in row.iter() {
                if discard.contains(&key) || CLAIMED_COLUMNS.contains(&key) {
                    continue;
                }
                record.extra.insert(key.to_string(), value.clone());
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_row() -> RowObject {
        let mut row = RowObject::new();
        row.insert("Visit Type", "Annual");
        row.insert("Appt Time", "09:00");
        row.insert("Patient Name", "DOE, JANE");
        row.insert("Sex", "F");
        row.insert("Age", "45 Y");
        row.insert("Room", "4B");
        row.insert("Visit Sts", "SCH");
        row.insert("Billing Code", "X1");
        row.insert("P/R", "P");
        row
    }

    #[test]
    fn test_classify_by_filename() {
        assert_eq!(
            FileKind::classify("OVENCTRS_2024_03.xlsx"),
            FileKind::PrimaryRoster
        );
        assert_eq!(
            FileKind::classify("registry_report-march.xlsx"),
            FileKind::SupplementalReport
        );
        assert_eq!(
            FileKind::classify("CWReport (3).xls"),
            FileKind::SupplementalReport
        );
        assert_eq!(FileKind::classify("budget.xlsx"), FileKind::Unrecognized);
    }

    #[test]
    fn test_build_primary_records() {
        let records = build_primary_records(&[roster_row()], "2024-03-01");
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.id, "2024-03-01-0");
        assert_eq!(record.visit_type, "Annual");
        assert_eq!(record.patient_name, "DOE, JANE");
        assert_eq!(record.time, "9:00");
        assert_eq!(record.sex, "F");
        assert_eq!(record.age, "45");
        assert!(record.reasons.is_empty());
        assert!(record.results_needed.is_empty());
        assert!(record.chart.is_none());
        assert!(!record.is_printed && !record.is_done && !record.is_cancelled);
    }

    #[test]
    fn test_admin_tail_and_internal_columns_discarded() {
        let records = build_primary_records(&[roster_row()], "2024-03-01");
        let record = &records[0];

        // "Visit Sts" and everything after it, plus "P/R", are gone; the
        // column before the tail survives as passthrough.
        assert_eq!(record.extra.get("Room"), Some(&"4B".into()));
        assert!(record.extra.get("Visit Sts").is_none());
        assert!(record.extra.get("Billing Code").is_none());
        assert!(record.extra.get("P/R").is_none());
        assert!(record.extra.get("Appt Time").is_none());
    }

    #[test]
    fn test_numeric_visit_type_coerced_to_string() {
        let mut row = RowObject::new();
        row.insert("Visit Type", serde_json::json!(99213));
        row.insert("Patient Name", "DOE, JANE");
        let records = build_primary_records(&[row], "2024-03-01");
        assert_eq!(records[0].visit_type, "99213");
    }

    #[test]
    fn test_empty_input_is_no_op() {
        assert!(build_primary_records(&[], "2024-03-01").is_empty());
    }

    #[test]
    fn test_ids_follow_row_order() {
        let rows = vec![roster_row(), roster_row(), roster_row()];
        let records = build_primary_records(&rows, "2024-03-02");
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2024-03-02-0", "2024-03-02-1", "2024-03-02-2"]);
    }
}
