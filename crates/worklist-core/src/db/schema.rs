//! SQLite schema definition.

/// Complete database schema for the worklist persistence service.
///
/// Storage is schema-free on purpose: one opaque JSON blob per date key,
/// one per named tag vocabulary. All validation happens at the bridge.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS patient_lists (
    dos TEXT PRIMARY KEY,
    data TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    name TEXT PRIMARY KEY,
    values_json TEXT NOT NULL
);
"#;
