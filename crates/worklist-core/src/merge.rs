//! Supplemental demographics merge.
//!
//! The supplemental report is joined onto existing appointment records by
//! normalized patient identity. The join is deliberately best-effort on a
//! weak key: two patients that normalize to the same key both get the last
//! row's demographics. That is documented, accepted behavior, not a defect.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::{debug, warn};

use crate::format::{format_dob_cell, format_phone};
use crate::identity::normalize_name;
use crate::models::{AppointmentRecord, RowObject};

/// Required supplemental columns, matched case-insensitively on trimmed
/// headers.
const PATIENT_NAME_COLUMN: &str = "Patient Name";
const DOB_COLUMN: &str = "DOB";
const PHONE_COLUMN: &str = "Tel No.";
const ACCOUNT_COLUMN: &str = "Acc #";

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("upload a primary list before supplemental data")]
    NoPrimaryData,

    /// All missing required columns, enumerated; no partial merge happens.
    #[error("supplemental file missing: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

pub type MergeResult<T> = Result<T, MergeError>;

/// The demographic triple overlaid onto matching records.
#[derive(Debug, Clone, PartialEq)]
struct Overlay {
    dob: String,
    phone: String,
    account: String,
}

/// Merge supplemental rows into every date group, matching by normalized
/// identity. Returns the number of records updated.
///
/// Later supplemental rows silently overwrite earlier ones for the same
/// identity, and the overlay is a full replace of DOB, phone, and account
/// on every match across every date group.
pub fn merge_supplemental(
    rows: &[RowObject],
    patient_lists: &mut BTreeMap<String, Vec<AppointmentRecord>>,
) -> MergeResult<usize> {
    if patient_lists.is_empty() {
        return Err(MergeError::NoPrimaryData);
    }

    let headers = resolve_headers(rows.first())?;
    let mut overlays: HashMap<String, Overlay> = HashMap::new();
    for row in rows {
        let key = normalize_name(&row.text(&headers.patient_name));
        if key.is_empty() {
            continue;
        }
        let dob_cell = row
            .get(&headers.dob)
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        overlays.insert(
            key,
            Overlay {
                dob: format_dob_cell(&dob_cell),
                phone: format_phone(&row.text(&headers.phone)),
                account: row.text(&headers.account),
            },
        );
    }
    debug!(identities = overlays.len(), "built supplemental overlay map");

    let mut updated = 0;
    for records in patient_lists.values_mut() {
        for record in records.iter_mut() {
            let key = normalize_name(&record.patient_name);
            if let Some(overlay) = overlays.get(&key) {
                record.dob = overlay.dob.clone();
                record.phone = overlay.phone.clone();
                record.account = overlay.account.clone();
                updated += 1;
            }
        }
    }
    if updated == 0 {
        warn!("supplemental merge matched no existing records");
    }
    Ok(updated)
}

/// The source header actually carrying each required column.
struct ResolvedHeaders {
    patient_name: String,
    dob: String,
    phone: String,
    account: String,
}

/// Find each required column among the source headers, case-insensitively
/// on trimmed names. Rejects wholesale, enumerating every missing column.
fn resolve_headers(first_row: Option<&RowObject>) -> MergeResult<ResolvedHeaders> {
    let source: Vec<&str> = first_row.map(|r| r.keys().collect()).unwrap_or_default();
    let find = |wanted: &str| {
        source
            .iter()
            .find(|h| h.trim().eq_ignore_ascii_case(wanted))
            .map(|h| h.to_string())
    };

    let mut missing = Vec::new();
    let mut resolve = |wanted: &str| {
        let found = find(wanted);
        if found.is_none() {
            missing.push(wanted.to_string());
        }
        found.unwrap_or_default()
    };

    let headers = ResolvedHeaders {
        patient_name: resolve(PATIENT_NAME_COLUMN),
        dob: resolve(DOB_COLUMN),
        phone: resolve(PHONE_COLUMN),
        account: resolve(ACCOUNT_COLUMN),
    };
    if missing.is_empty() {
        Ok(headers)
    } else {
        Err(MergeError::MissingColumns(missing))
    }
}
