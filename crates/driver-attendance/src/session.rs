//! Application state tying the engine, validation and store together.
//!
//! A [`Session`] owns the in-memory collection for its lifetime. It loads once
//! on open and saves after every mutation.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::admin::AdminGate;
use crate::error::{Error, Result};
use crate::reconcile;
use crate::record::{AttendanceEvent, AttendanceRecord, EventKind, Shift};
use crate::storage::{generate_id, RecordStore};
use crate::validation::validate_submission;

/// An event that has been started but not yet submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEvent {
    /// Check-in or check-out.
    pub kind: EventKind,
    /// Trimmed driver name.
    pub driver_name: String,
    /// Shift chosen when the event was started.
    pub shift: Shift,
}

/// Counters shown above the daily table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    /// Distinct drivers across every stored day.
    pub total_drivers: usize,
    /// Records on the day with a check-in.
    pub checked_in: usize,
    /// Records on the day with a check-out.
    pub checked_out: usize,
}

/// Live attendance state backed by a [`RecordStore`].
#[derive(Debug)]
pub struct Session {
    store: RecordStore,
    records: Vec<AttendanceRecord>,
    pending: Option<PendingEvent>,
    admin: AdminGate,
}

impl Session {
    /// Load the collection from `store` and start a session.
    ///
    /// Unreadable stored data starts the session empty.
    #[must_use]
    pub fn open(store: RecordStore, admin: AdminGate) -> Self {
        let records = store.load();
        debug!("Session opened with {} records", records.len());
        Self {
            store,
            records,
            pending: None,
            admin,
        }
    }

    /// Every record, in collection order.
    #[must_use]
    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    /// Records for one day, in collection order.
    pub fn records_on(&self, date: NaiveDate) -> impl Iterator<Item = &AttendanceRecord> {
        self.records.iter().filter(move |r| r.date == date)
    }

    /// The record for a driver and day, if any.
    #[must_use]
    pub fn find(&self, driver_name: &str, date: NaiveDate) -> Option<&AttendanceRecord> {
        self.records.iter().find(|r| r.is_for(driver_name, date))
    }

    /// Dashboard counters for a day.
    #[must_use]
    pub fn stats(&self, date: NaiveDate) -> DailyStats {
        let total_drivers = self
            .records
            .iter()
            .map(|r| r.driver_name.as_str())
            .collect::<HashSet<_>>()
            .len();
        let (checked_in, checked_out) =
            self.records_on(date).fold((0, 0), |(i, o), r| {
                (
                    i + usize::from(r.check_in.is_some()),
                    o + usize::from(r.check_out.is_some()),
                )
            });

        DailyStats {
            total_drivers,
            checked_in,
            checked_out,
        }
    }

    /// The event awaiting its log, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingEvent> {
        self.pending.as_ref()
    }

    /// Start a check-in for a driver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDriverName`] if the name is blank.
    pub fn begin_check_in(&mut self, driver_name: &str, shift: Shift) -> Result<()> {
        self.begin(EventKind::CheckIn, driver_name, shift)
    }

    /// Resolve the shift for a check-out.
    ///
    /// An explicit shift wins; otherwise the shift on the driver's record for
    /// `date` is reused.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShiftRequired`] if no shift was given and the driver
    /// has no record on `date`.
    pub fn check_out_shift(
        &self,
        driver_name: &str,
        date: NaiveDate,
        shift: Option<Shift>,
    ) -> Result<Shift> {
        let driver_name = driver_name.trim();
        shift
            .or_else(|| self.find(driver_name, date).map(|r| r.shift))
            .ok_or_else(|| Error::ShiftRequired {
                driver: driver_name.to_string(),
                date,
            })
    }

    /// Start a check-out for a driver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDriverName`] if the name is blank.
    pub fn begin_check_out(&mut self, driver_name: &str, shift: Shift) -> Result<()> {
        self.begin(EventKind::CheckOut, driver_name, shift)
    }

    fn begin(&mut self, kind: EventKind, driver_name: &str, shift: Shift) -> Result<()> {
        let driver_name = driver_name.trim();
        if driver_name.is_empty() {
            return Err(Error::InvalidDriverName);
        }
        debug!("Started {} for {}", kind, driver_name);
        self.pending = Some(PendingEvent {
            kind,
            driver_name: driver_name.to_string(),
            shift,
        });
        Ok(())
    }

    /// Drop the event in progress without saving anything.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Complete the pending event with its log and, for a check-in, its car.
    ///
    /// On success the event is reconciled into the collection, the collection
    /// is saved, and the updated record is returned. On failure nothing
    /// changes and the pending event stays open for correction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPendingEvent`] if nothing was started, or
    /// [`Error::Validation`] with every failing field.
    pub fn submit(
        &mut self,
        log: &str,
        car: Option<&str>,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<&AttendanceRecord> {
        let pending = self.pending.as_ref().ok_or(Error::NoPendingEvent)?;
        validate_submission(pending.kind, log, car)?;

        let event = AttendanceEvent {
            kind: pending.kind,
            driver_name: pending.driver_name.clone(),
            date,
            shift: pending.shift,
            log: log.trim().to_string(),
            car: match pending.kind {
                EventKind::CheckIn => car.map(|c| c.trim().to_string()),
                EventKind::CheckOut => None,
            },
        };
        self.pending = None;

        let records = std::mem::take(&mut self.records);
        self.records = reconcile::apply_event(records, &event, now, generate_id);
        self.store.save(&self.records);

        self.records
            .last()
            .ok_or_else(|| Error::internal("reconciled collection is empty"))
    }

    /// Overwrite the car on a record directly, bypassing the event flow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no record has `record_id`.
    pub fn update_car(&mut self, record_id: &str, car: &str) -> Result<()> {
        if !reconcile::update_car(&mut self.records, record_id, car) {
            return Err(Error::RecordNotFound {
                id: record_id.to_string(),
            });
        }
        self.store.save(&self.records);
        debug!("Updated car on record {}", record_id);
        Ok(())
    }

    /// The admin gate.
    #[must_use]
    pub fn admin(&self) -> &AdminGate {
        &self.admin
    }

    /// The admin gate, for login and confirmation steps.
    pub fn admin_mut(&mut self) -> &mut AdminGate {
        &mut self.admin
    }

    /// Wipe every record once the admin has confirmed, and persist the empty
    /// collection. The gate is locked again afterwards.
    ///
    /// Returns how many records were removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AdminState`] unless the admin requested the wipe.
    pub fn clear_all(&mut self) -> Result<usize> {
        self.admin.take_clear()?;
        let removed = self.records.len();
        self.records.clear();
        self.store.save(&self.records);
        info!("Cleared {} attendance records", removed);
        Ok(removed)
    }

    /// The store backing this session.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }
}
