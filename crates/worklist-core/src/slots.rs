//! Slot-grid synthesis.
//!
//! A day's real appointments are sparse; the worksheet shows them against a
//! fixed grid of canonical 20-minute slots from 8:00 AM up to (excluding)
//! 3:00 PM. Unfilled slots appear as synthetic placeholders, and any time
//! string shared by more than one record marks all of them double-booked.
//! Placeholders live only in the rendered projection; they join durable
//! state only when converted into real appointments.

use crate::format::format_time;
use crate::models::AppointmentRecord;

/// Sort key for records with no parseable time: they sink to the bottom.
const UNPARSEABLE_MINUTES: u32 = 9999;

/// First canonical hour (inclusive) and last (exclusive), 24-hour clock.
const GRID_OPEN_HOUR: u32 = 8;
const GRID_CLOSE_HOUR: u32 = 15;

const GRID_MINUTES: [u32; 3] = [0, 20, 40];

/// A synthetic row for an unfilled canonical slot. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlotPlaceholder {
    /// `empty-{dos}-{time}`; only ever used as a render key.
    pub id: String,
    pub time: String,
    converted: bool,
}

impl TimeSlotPlaceholder {
    fn new(dos: &str, time: &str) -> Self {
        Self {
            id: format!("empty-{dos}-{time}"),
            time: time.to_string(),
            converted: false,
        }
    }

    /// Whether this placeholder has already been converted into a real
    /// appointment. Conversion is one-shot; see [`TimeSlotPlaceholder::mark_converted`].
    pub fn is_converted(&self) -> bool {
        self.converted
    }

    /// One-shot conversion guard: returns true the first time only. Two
    /// rapid submits against the same placeholder must not create two
    /// records.
    pub fn mark_converted(&mut self) -> bool {
        if self.converted {
            return false;
        }
        self.converted = true;
        true
    }
}

/// One row of the rendered day grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridRow {
    Appointment {
        record: AppointmentRecord,
        /// Another record shares this exact time string. Derived per
        /// projection, never persisted.
        double_booked: bool,
        /// Time fails to parse or falls off the canonical grid; shown with
        /// emphasis, never filtered.
        non_standard_time: bool,
    },
    EmptySlot(TimeSlotPlaceholder),
}

impl GridRow {
    pub fn time(&self) -> &str {
        match self {
            GridRow::Appointment { record, .. } => &record.time,
            GridRow::EmptySlot(slot) => &slot.time,
        }
    }

    pub fn is_empty_slot(&self) -> bool {
        matches!(self, GridRow::EmptySlot(_))
    }
}

/// Canonical time slots: every 20-minute boundary from 8:00 AM up to but
/// excluding 3:00 PM, rendered without a leading zero on the hour.
pub fn canonical_slots() -> Vec<String> {
    let mut slots = Vec::new();
    for hour in GRID_OPEN_HOUR..GRID_CLOSE_HOUR {
        for minute in GRID_MINUTES {
            slots.push(render_slot(hour, minute));
        }
    }
    slots
}

fn render_slot(hour24: u32, minute: u32) -> String {
    let meridiem = if hour24 < 12 { "AM" } else { "PM" };
    let hour12 = match hour24 {
        0 => 12,
        1..=12 => hour24,
        _ => hour24 - 12,
    };
    format_time(&format!("{hour12}:{minute:02} {meridiem}"))
}

/// Parse "H:MM AM/PM" (case-insensitive, optional leading zero, optional
/// space before the meridiem) into a 24-hour (hour, minute) pair.
fn parse_clock(raw: &str) -> Option<(u32, u32)> {
    let s = raw.trim();
    let colon = s.find(':')?;
    let hour: u32 = s[..colon].trim().parse().ok()?;
    let rest = &s[colon + 1..];
    let minute: u32 = rest.get(..2)?.parse().ok()?;
    let hour24 = match rest[2..].trim().to_ascii_uppercase().as_str() {
        "AM" => {
            if hour == 12 {
                0
            } else {
                hour
            }
        }
        "PM" => {
            if hour == 12 {
                12
            } else {
                hour + 12
            }
        }
        _ => return None,
    };
    Some((hour24, minute))
}

/// Minutes since midnight for sorting; unparseable or missing times sort
/// last.
pub fn time_to_minutes(time: &str) -> u32 {
    match parse_clock(time) {
        Some((hour, minute)) => hour * 60 + minute,
        None => UNPARSEABLE_MINUTES,
    }
}

/// A time is non-standard when it fails to parse at all, or lands outside
/// the canonical grid hours, or off a 20-minute boundary. Empty times are
/// not flagged; a blank cell is not an anomaly.
pub fn is_non_standard_time(time: &str) -> bool {
    if time.is_empty() {
        return false;
    }
    match parse_clock(time) {
        None => true,
        Some((hour, minute)) => {
            !(GRID_OPEN_HOUR..GRID_CLOSE_HOUR).contains(&hour)
                || !GRID_MINUTES.contains(&minute)
        }
    }
}

/// Project a day's records onto the canonical grid.
///
/// Real records are flagged for double-booking by exact time-string count,
/// placeholders fill every canonical slot with no record at that exact
/// time, and the whole sequence sorts ascending by minutes-of-day. The sort
/// is stable: rows with equal times keep their relative input order.
pub fn project_day(dos: &str, records: &[AppointmentRecord]) -> Vec<GridRow> {
    let mut rows: Vec<GridRow> = Vec::with_capacity(records.len());
    for record in records {
        let shared = records.iter().filter(|r| r.time == record.time).count();
        rows.push(GridRow::Appointment {
            double_booked: shared > 1,
            non_standard_time: is_non_standard_time(&record.time),
            record: record.clone(),
        });
    }
    for slot in canonical_slots() {
        if !records.iter().any(|r| r.time == slot) {
            rows.push(GridRow::EmptySlot(TimeSlotPlaceholder::new(dos, &slot)));
        }
    }
    rows.sort_by_key(|row| time_to_minutes(row.time()));
    rows
}
