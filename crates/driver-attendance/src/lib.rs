//! `driver-attendance` - Driver check-in and check-out tracking
//!
//! This library provides the attendance record model, the reconciliation of
//! check-in and check-out events into one record per driver per day, field
//! validation, and the single-blob record store behind them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod admin;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod record;
pub mod render;
pub mod session;
pub mod storage;
pub mod validation;

pub use admin::{AdminGate, GateState};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use reconcile::apply_event;
pub use record::{AttendanceEvent, AttendanceRecord, DutyStatus, EventKind, Shift, Stamp};
pub use session::{DailyStats, Session};
pub use storage::{generate_id, RecordStore};
pub use validation::{validate_car_number, validate_submission, ValidationError};
