//! One-time legacy shape migration, run on raw JSON at load time.
//!
//! Earlier deployments persisted records with extra fields and looser
//! shapes. Everything is normalized here, once, before the typed parse;
//! nothing downstream ever branches on shape again.

use serde_json::{json, Value};

/// Fields earlier versions persisted that the record schema no longer
/// carries. The last three are derived render flags an earlier version
/// wrote into durable state by accident.
const LEGACY_FIELDS: [&str; 5] = [
    "Provider",
    "Appt Time",
    "isDoubleBooked",
    "isEmptySlot",
    "isConverted",
];

/// Migrate one raw record in place:
///
/// - drop legacy `Provider` / `Appt Time` fields,
/// - collapse an array-valued `Visit Type` into its first element,
/// - backfill `Chart` / `Extracted Summary` to null where absent,
/// - upgrade legacy string entries of `Results Needed` to
///   `{name, completed}` objects,
/// - stringify a numeric `Account`.
pub fn migrate_record(record: &mut Value) {
    let Value::Object(map) = record else {
        return;
    };

    for field in LEGACY_FIELDS {
        map.shift_remove(field);
    }

    if let Some(visit_type) = map.get_mut("Visit Type") {
        if let Value::Array(values) = visit_type {
            *visit_type = values
                .first()
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()));
        }
    }

    for field in ["Chart", "Extracted Summary"] {
        if !map.contains_key(field) {
            map.insert(field.to_string(), Value::Null);
        }
    }

    if let Some(Value::Array(items)) = map.get_mut("Results Needed") {
        for item in items.iter_mut() {
            if let Value::String(name) = item {
                *item = json!({ "name": name, "completed": false });
            }
        }
    }

    if let Some(account) = map.get_mut("Account") {
        if let Value::Number(n) = account {
            *account = Value::String(n.to_string());
        }
    }
}
