//! Canonical display formatting for worksheet fields.
//!
//! Every function here is total: unrecognized input comes back unchanged
//! (or empty where the source was empty), never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Offset between the spreadsheet date-serial epoch (1899-12-30) and the
/// Unix epoch, in days.
const SERIAL_EPOCH_OFFSET_DAYS: f64 = 25569.0;

const SECONDS_PER_DAY: f64 = 86400.0;

/// Strip a single leading zero from the hour: "09:00 AM" becomes "9:00 AM".
pub fn format_time(time: &str) -> String {
    match time.strip_prefix('0') {
        Some(rest) => rest.to_string(),
        None => time.to_string(),
    }
}

/// First character, uppercased.
pub fn format_sex(sex: &str) -> String {
    sex.chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default()
}

/// Strip a trailing " Y" unit suffix: "45 Y" becomes "45".
pub fn format_age(age: &str) -> String {
    match age.strip_suffix(" Y") {
        Some(rest) => rest.to_string(),
        None => age.to_string(),
    }
}

/// Format a date-of-birth string as MM/DD/YYYY.
///
/// Tries the date shapes the source reports actually emit; anything
/// unparseable is returned unchanged.
pub fn format_dob(dob: &str) -> String {
    if dob.is_empty() {
        return String::new();
    }
    for pattern in ["%m/%d/%Y", "%m-%d-%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(dob, pattern) {
            return date.format("%m/%d/%Y").to_string();
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(dob) {
        return ts.format("%m/%d/%Y").to_string();
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(dob, "%Y-%m-%d %H:%M:%S") {
        return ts.format("%m/%d/%Y").to_string();
    }
    dob.to_string()
}

/// Format a raw date-of-birth cell as MM/DD/YYYY.
///
/// Spreadsheets hand dates over either as text or as a numeric day serial
/// counted from 1899-12-30; the serial converts through Unix-epoch
/// arithmetic in UTC.
pub fn format_dob_cell(dob: &Value) -> String {
    match dob {
        Value::Number(n) => match n.as_f64() {
            Some(serial) => format_serial_date(serial),
            None => String::new(),
        },
        Value::String(s) => format_dob(s),
        _ => String::new(),
    }
}

fn format_serial_date(serial: f64) -> String {
    let millis = ((serial - SERIAL_EPOCH_OFFSET_DAYS) * SECONDS_PER_DAY * 1000.0).round() as i64;
    match DateTime::from_timestamp_millis(millis) {
        Some(ts) => ts.format("%m/%d/%Y").to_string(),
        None => serial.to_string(),
    }
}

/// Reformat a phone number as "(NNN) NNN-NNNN" when exactly ten digits
/// remain after stripping everything else; otherwise return it unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        phone.to_string()
    }
}
