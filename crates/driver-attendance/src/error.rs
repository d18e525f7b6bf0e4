//! Error types for driver-attendance.
//!
//! This module defines all error types used throughout the crate, providing
//! detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::SubmissionErrors;

/// The main error type for attendance operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the record store.
    #[error("failed to open record store at {path}: {source}")]
    DatabaseOpen {
        /// Path to the store file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A store query failed.
    #[error("record store query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run store migrations.
    #[error("record store migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Attendance Errors ===
    /// The submitted event form failed validation.
    #[error("{0}")]
    Validation(SubmissionErrors),

    /// The driver name was empty after trimming.
    #[error("driver name is required")]
    InvalidDriverName,

    /// A submission was made without a check-in or check-out in progress.
    #[error("no check-in or check-out in progress")]
    NoPendingEvent,

    /// A check-out named no shift and the driver has no record that day.
    #[error("shift is required: {driver} has no record on {date}")]
    ShiftRequired {
        /// Trimmed driver name.
        driver: String,
        /// The attendance day.
        date: chrono::NaiveDate,
    },

    /// No record carries the given identifier.
    #[error("no attendance record with id {id}")]
    RecordNotFound {
        /// The identifier that was looked up.
        id: String,
    },

    // === Admin Errors ===
    /// The admin password did not match.
    #[error("incorrect password")]
    AdminAuth,

    /// The admin action is not allowed in the gate's current state.
    #[error("admin action not allowed: {message}")]
    AdminState {
        /// Description of what was attempted.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for attendance operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<SubmissionErrors> for Error {
    fn from(errors: SubmissionErrors) -> Self {
        Self::Validation(errors)
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an admin state error.
    #[must_use]
    pub fn admin_state(message: impl Into<String>) -> Self {
        Self::AdminState {
            message: message.into(),
        }
    }

    /// Check if this error came from reading or writing the record store.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::DatabaseMigration { .. }
                | Self::DirectoryCreate { .. }
                | Self::Json(_)
        )
    }

    /// Check if this error is a recoverable input problem.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidDriverName)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::AdminAuth.to_string(), "incorrect password");
        assert_eq!(
            Error::NoPendingEvent.to_string(),
            "no check-in or check-out in progress"
        );
        assert_eq!(
            Error::InvalidDriverName.to_string(),
            "driver name is required"
        );
    }

    #[test]
    fn test_shift_required_display() {
        let err = Error::ShiftRequired {
            driver: "Alice".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "shift is required: Alice has no record on 2024-01-02"
        );
        assert!(!err.is_validation_error());
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_admin_state_error() {
        let err = Error::admin_state("not authenticated");
        assert_eq!(
            err.to_string(),
            "admin action not allowed: not authenticated"
        );
    }

    #[test]
    fn test_record_not_found_display() {
        let err = Error::RecordNotFound {
            id: "abc123".to_string(),
        };
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn test_validation_error_display() {
        let errors = SubmissionErrors {
            log: None,
            car: Some(ValidationError::CarNumberOutOfRange),
        };
        let err: Error = errors.into();
        assert!(err.is_validation_error());
        assert!(err
            .to_string()
            .contains("Car number must be between 1 and 1000"));
    }

    #[test]
    fn test_is_storage_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/var/lib/attendance"),
            source: io_err,
        };
        assert!(err.is_storage_error());
        assert!(!Error::AdminAuth.is_storage_error());
        assert!(!Error::InvalidDriverName.is_storage_error());
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
            assert!(err.is_storage_error());
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "admin.password must not be empty".to_string(),
        };
        assert!(err.to_string().contains("admin.password"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
