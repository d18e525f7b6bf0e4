//! Core attendance types.
//!
//! This module defines the persisted attendance record and the check-in and
//! check-out events that are reconciled into it.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One of the four fixed shift windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    /// 7:00 AM to 4:00 PM.
    #[serde(rename = "7am-4pm")]
    Morning,
    /// 4:00 PM to 1:00 AM.
    #[serde(rename = "4pm-1am")]
    Evening,
    /// 8:00 AM to 5:00 PM.
    #[serde(rename = "8am-5pm")]
    Day,
    /// 5:00 PM to 2:00 AM.
    #[serde(rename = "5pm-2am")]
    Night,
}

impl Shift {
    /// All shifts in the order they are offered to drivers.
    pub const ALL: [Self; 4] = [Self::Morning, Self::Evening, Self::Day, Self::Night];

    /// The short window code, as persisted.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Morning => "7am-4pm",
            Self::Evening => "4pm-1am",
            Self::Day => "8am-5pm",
            Self::Night => "5pm-2am",
        }
    }

    /// Human-readable window for tables.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Morning => "7:00 AM - 4:00 PM",
            Self::Evening => "4:00 PM - 1:00 AM",
            Self::Day => "8:00 AM - 5:00 PM",
            Self::Night => "5:00 PM - 2:00 AM",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// When an event happened and what the driver wrote with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    /// When the event was saved.
    pub time: DateTime<Utc>,
    /// Free-text log entered with the event.
    pub log: String,
}

/// One driver's attendance entry for one calendar day.
///
/// At most one record exists per `(driver_name, date)` pair. Field names are
/// persisted in camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Opaque identifier, fixed at creation.
    pub id: String,

    /// Free-text driver identifier.
    pub driver_name: String,

    /// The attendance day.
    pub date: NaiveDate,

    /// Shift chosen when the record was created.
    pub shift: Shift,

    /// Car handed to the driver, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_received: Option<String>,

    /// Latest check-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<Stamp>,

    /// Latest check-out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<Stamp>,
}

impl AttendanceRecord {
    /// Create an empty record for a driver and day.
    #[must_use]
    pub fn new(id: String, driver_name: String, date: NaiveDate, shift: Shift) -> Self {
        Self {
            id,
            driver_name,
            date,
            shift,
            car_received: None,
            check_in: None,
            check_out: None,
        }
    }

    /// Whether this record belongs to the given driver and day.
    #[must_use]
    pub fn is_for(&self, driver_name: &str, date: NaiveDate) -> bool {
        self.driver_name == driver_name && self.date == date
    }

    /// Where the driver currently stands for the day.
    #[must_use]
    pub fn status(&self) -> DutyStatus {
        match (&self.check_in, &self.check_out) {
            (_, Some(_)) => DutyStatus::OffDuty,
            (Some(_), None) => DutyStatus::OnDuty,
            (None, None) => DutyStatus::Pending,
        }
    }
}

/// Derived duty state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyStatus {
    /// Neither checked in nor out.
    Pending,
    /// Checked in and not yet checked out.
    OnDuty,
    /// Checked out.
    OffDuty,
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::OnDuty => write!(f, "on duty"),
            Self::OffDuty => write!(f, "off duty"),
        }
    }
}

/// Which half of the day an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Start of the driver's day.
    CheckIn,
    /// End of the driver's day.
    CheckOut,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckIn => write!(f, "check-in"),
            Self::CheckOut => write!(f, "check-out"),
        }
    }
}

/// A check-in or check-out submitted by a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEvent {
    /// Check-in or check-out.
    pub kind: EventKind,
    /// Who the event is for.
    pub driver_name: String,
    /// The attendance day.
    pub date: NaiveDate,
    /// Shift selected with the event; only used when a new record is created.
    pub shift: Shift,
    /// Free-text log.
    pub log: String,
    /// Car number supplied with a check-in.
    pub car: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> AttendanceRecord {
        AttendanceRecord::new(
            "lqz1abc".to_string(),
            "Alice".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Shift::Morning,
        )
    }

    #[test]
    fn test_shift_codes_and_labels() {
        assert_eq!(Shift::Morning.code(), "7am-4pm");
        assert_eq!(Shift::Evening.code(), "4pm-1am");
        assert_eq!(Shift::Day.code(), "8am-5pm");
        assert_eq!(Shift::Night.code(), "5pm-2am");
        assert_eq!(Shift::Evening.label(), "4:00 PM - 1:00 AM");
        assert_eq!(Shift::Night.to_string(), "5pm-2am");
    }

    #[test]
    fn test_shift_serializes_as_code() {
        let json = serde_json::to_string(&Shift::Evening).unwrap();
        assert_eq!(json, "\"4pm-1am\"");
        let shift: Shift = serde_json::from_str("\"5pm-2am\"").unwrap();
        assert_eq!(shift, Shift::Night);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let mut record = sample_record();
        record.car_received = Some("42".to_string());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["driverName"], "Alice");
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["shift"], "7am-4pm");
        assert_eq!(json["carReceived"], "42");
        assert!(json.get("checkIn").is_none());
        assert!(json.get("checkOut").is_none());
    }

    #[test]
    fn test_record_reads_browser_format() {
        let json = r#"{
            "id": "lqz1abc0k2j",
            "driverName": "Bob",
            "date": "2024-03-05",
            "shift": "4pm-1am",
            "checkIn": {"time": "2024-03-05T16:02:11.123Z", "log": "fuel full"}
        }"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.driver_name, "Bob");
        assert_eq!(record.shift, Shift::Evening);
        assert!(record.car_received.is_none());
        assert_eq!(record.check_in.unwrap().log, "fuel full");
        assert!(record.check_out.is_none());
    }

    #[test]
    fn test_is_for() {
        let record = sample_record();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert!(record.is_for("Alice", day));
        assert!(!record.is_for("alice", day));
        assert!(!record.is_for("Alice", day.succ_opt().unwrap()));
    }

    #[test]
    fn test_status() {
        let mut record = sample_record();
        assert_eq!(record.status(), DutyStatus::Pending);

        record.check_in = Some(Stamp {
            time: Utc::now(),
            log: "ok".to_string(),
        });
        assert_eq!(record.status(), DutyStatus::OnDuty);

        record.check_out = Some(Stamp {
            time: Utc::now(),
            log: "done".to_string(),
        });
        assert_eq!(record.status(), DutyStatus::OffDuty);
        assert_eq!(record.status().to_string(), "off duty");
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::CheckIn.to_string(), "check-in");
        assert_eq!(EventKind::CheckOut.to_string(), "check-out");
    }
}
