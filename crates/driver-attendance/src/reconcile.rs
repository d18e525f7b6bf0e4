//! Merging check-in and check-out events into daily records.
//!
//! These functions are pure: they take the collection by value, return the
//! new collection, and leave persistence to the caller.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::record::{AttendanceEvent, AttendanceRecord, EventKind, Stamp};

/// Apply one event to the record collection.
///
/// Finds the record for the event's driver and date, or creates one with an
/// id from `new_id` and the event's shift. An existing record keeps its
/// original shift. The stamp matching the event kind is overwritten with
/// `now` and the event log; a check-in with a non-empty car also replaces
/// the car.
///
/// The updated record is moved to the end of the collection. Every other
/// record keeps its relative order.
#[must_use]
pub fn apply_event(
    mut records: Vec<AttendanceRecord>,
    event: &AttendanceEvent,
    now: DateTime<Utc>,
    new_id: impl FnOnce() -> String,
) -> Vec<AttendanceRecord> {
    let existing = records
        .iter()
        .position(|r| r.is_for(&event.driver_name, event.date))
        .map(|idx| records.remove(idx));

    let mut record = if let Some(record) = existing {
        if record.shift != event.shift {
            debug!(
                "Keeping shift {} for {} on {}, ignoring {}",
                record.shift, record.driver_name, record.date, event.shift
            );
        }
        record
    } else {
        let record = AttendanceRecord::new(
            new_id(),
            event.driver_name.clone(),
            event.date,
            event.shift,
        );
        info!(
            "Created record {} for {} on {}",
            record.id, record.driver_name, record.date
        );
        record
    };

    let stamp = Stamp {
        time: now,
        log: event.log.clone(),
    };
    match event.kind {
        EventKind::CheckIn => {
            record.check_in = Some(stamp);
            if let Some(car) = event.car.as_deref().filter(|c| !c.is_empty()) {
                record.car_received = Some(car.to_string());
            }
        }
        EventKind::CheckOut => record.check_out = Some(stamp),
    }

    debug!("Applied {} for {}", event.kind, record.driver_name);
    records.push(record);
    records
}

/// Overwrite the car on the record with the given id.
///
/// The value is stored as given, including an empty string. Returns `false`
/// when no record has that id; the collection is then unchanged.
pub fn update_car(records: &mut [AttendanceRecord], record_id: &str, car: &str) -> bool {
    match records.iter_mut().find(|r| r.id == record_id) {
        Some(record) => {
            record.car_received = Some(car.to_string());
            true
        }
        None => false,
    }
}
