//! Text rendering of the daily attendance table.
//!
//! Times are shown in UTC, matching the UTC attendance day.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::record::{AttendanceRecord, Stamp};
use crate::session::DailyStats;

/// Placeholder for an empty cell.
const EMPTY_CELL: &str = "-";

const HEADERS: [&str; 7] = [
    "ID", "Driver", "Shift", "Car", "Check In", "Check Out", "Status",
];

/// Clock time as shown in the table, e.g. `07:05 AM`.
#[must_use]
pub fn format_time(time: DateTime<Utc>) -> String {
    time.format("%I:%M %p").to_string()
}

fn stamp_cell(stamp: Option<&Stamp>) -> String {
    stamp.map_or_else(
        || EMPTY_CELL.to_string(),
        |s| format!("{} ({})", format_time(s.time), s.log),
    )
}

fn row(record: &AttendanceRecord) -> [String; 7] {
    [
        record.id.clone(),
        record.driver_name.clone(),
        record.shift.label().to_string(),
        record
            .car_received
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(EMPTY_CELL)
            .to_string(),
        stamp_cell(record.check_in.as_ref()),
        stamp_cell(record.check_out.as_ref()),
        record.status().to_string(),
    ]
}

/// Render records as an aligned table with a header row.
#[must_use]
pub fn format_table<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> String {
    let rows: Vec<[String; 7]> = records.into_iter().map(row).collect();
    if rows.is_empty() {
        return "No attendance records for this day.\n".to_string();
    }

    let mut widths = HEADERS.map(str::len);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = HEADERS.map(str::to_string);
    for cells in std::iter::once(&header).chain(&rows) {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

/// Render records one block per driver.
#[must_use]
pub fn format_plain<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> String {
    let mut out = String::new();
    for record in records {
        let [id, driver, shift, car, check_in, check_out, status] = row(record);
        let _ = writeln!(out, "{driver} [{status}]");
        let _ = writeln!(out, "  id:        {id}");
        let _ = writeln!(out, "  shift:     {shift}");
        let _ = writeln!(out, "  car:       {car}");
        let _ = writeln!(out, "  check in:  {check_in}");
        let _ = writeln!(out, "  check out: {check_out}");
    }
    if out.is_empty() {
        out.push_str("No attendance records for this day.\n");
    }
    out
}

/// Render the dashboard counters.
#[must_use]
pub fn format_stats(stats: &DailyStats) -> String {
    format!(
        "Total drivers:      {}\nChecked in today:   {}\nChecked out today:  {}\n",
        stats.total_drivers, stats.checked_in, stats.checked_out
    )
}
