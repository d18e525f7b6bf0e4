//! Field validation for check-in and check-out submissions.
//!
//! Validation never mutates anything: a failed submission leaves the record
//! collection and the store untouched.

use std::fmt;

use thiserror::Error;

use crate::record::EventKind;

/// Lowest car number handed out.
pub const CAR_NUMBER_MIN: f64 = 1.0;

/// Highest car number handed out.
pub const CAR_NUMBER_MAX: f64 = 1000.0;

/// A single field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The car value is not a number in the allowed range.
    #[error("Car number must be between 1 and 1000")]
    CarNumberOutOfRange,

    /// A check-in was submitted without a car.
    #[error("Car number is required")]
    CarNumberRequired,

    /// The log was empty or whitespace.
    #[error("Log entry is required")]
    LogRequired,
}

/// Every field error found in one submission, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionErrors {
    /// Problem with the log field.
    pub log: Option<ValidationError>,
    /// Problem with the car field.
    pub car: Option<ValidationError>,
}

impl SubmissionErrors {
    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_none() && self.car.is_none()
    }

    /// Iterate over `(field, error)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ValidationError)> + '_ {
        [("car", self.car), ("log", self.log)]
            .into_iter()
            .filter_map(|(field, err)| err.map(|e| (field, e)))
    }
}

impl fmt::Display for SubmissionErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, err) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {err}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for SubmissionErrors {}

/// Check a car number entered at check-in.
///
/// An empty value is accepted here; whether a car is required at all is
/// decided by [`validate_submission`]. Anything else must read as a finite
/// number within `1..=1000`.
///
/// # Errors
///
/// Returns [`ValidationError::CarNumberOutOfRange`] for non-numeric or
/// out-of-range values.
pub fn validate_car_number(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }

    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && (CAR_NUMBER_MIN..=CAR_NUMBER_MAX).contains(&n) => Ok(()),
        _ => Err(ValidationError::CarNumberOutOfRange),
    }
}

/// Gate an event form before it is reconciled.
///
/// The log is required for both kinds. A check-in additionally needs a car
/// that passes [`validate_car_number`]; the car is ignored on check-out.
///
/// # Errors
///
/// Returns every failing field at once so each can be reported beside it.
pub fn validate_submission(
    kind: EventKind,
    log: &str,
    car: Option<&str>,
) -> Result<(), SubmissionErrors> {
    let mut errors = SubmissionErrors::default();

    if log.trim().is_empty() {
        errors.log = Some(ValidationError::LogRequired);
    }

    if kind == EventKind::CheckIn {
        let car = car.map_or("", str::trim);
        errors.car = if car.is_empty() {
            Some(ValidationError::CarNumberRequired)
        } else {
            validate_car_number(car).err()
        };
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_number_boundaries() {
        assert_eq!(
            validate_car_number("0"),
            Err(ValidationError::CarNumberOutOfRange)
        );
        assert_eq!(validate_car_number("1"), Ok(()));
        assert_eq!(validate_car_number("1000"), Ok(()));
        assert_eq!(
            validate_car_number("1001"),
            Err(ValidationError::CarNumberOutOfRange)
        );
    }

    #[test]
    fn test_car_number_non_numeric() {
        assert_eq!(
            validate_car_number("abc"),
            Err(ValidationError::CarNumberOutOfRange)
        );
        assert_eq!(
            validate_car_number("NaN"),
            Err(ValidationError::CarNumberOutOfRange)
        );
        assert_eq!(
            validate_car_number("inf"),
            Err(ValidationError::CarNumberOutOfRange)
        );
        assert_eq!(
            validate_car_number("-5"),
            Err(ValidationError::CarNumberOutOfRange)
        );
    }

    #[test]
    fn test_car_number_empty_is_not_an_error() {
        assert_eq!(validate_car_number(""), Ok(()));
        assert_eq!(validate_car_number("   "), Ok(()));
    }

    #[test]
    fn test_car_number_tolerates_whitespace_and_fractions() {
        assert_eq!(validate_car_number(" 42 "), Ok(()));
        assert_eq!(validate_car_number("12.5"), Ok(()));
        assert_eq!(
            validate_car_number("0.5"),
            Err(ValidationError::CarNumberOutOfRange)
        );
    }

    #[test]
    fn test_car_error_message() {
        assert_eq!(
            ValidationError::CarNumberOutOfRange.to_string(),
            "Car number must be between 1 and 1000"
        );
    }

    #[test]
    fn test_check_in_requires_log_and_car() {
        assert!(validate_submission(EventKind::CheckIn, "ok", Some("42")).is_ok());

        let errors = validate_submission(EventKind::CheckIn, "  ", Some("")).unwrap_err();
        assert_eq!(errors.log, Some(ValidationError::LogRequired));
        assert_eq!(errors.car, Some(ValidationError::CarNumberRequired));

        let errors = validate_submission(EventKind::CheckIn, "ok", None).unwrap_err();
        assert!(errors.log.is_none());
        assert_eq!(errors.car, Some(ValidationError::CarNumberRequired));
    }

    #[test]
    fn test_check_in_rejects_out_of_range_car() {
        let errors = validate_submission(EventKind::CheckIn, "ok", Some("1001")).unwrap_err();
        assert_eq!(errors.car, Some(ValidationError::CarNumberOutOfRange));
        assert!(errors.log.is_none());
    }

    #[test]
    fn test_check_out_ignores_car() {
        assert!(validate_submission(EventKind::CheckOut, "done", None).is_ok());
        assert!(validate_submission(EventKind::CheckOut, "done", Some("abc")).is_ok());

        let errors = validate_submission(EventKind::CheckOut, "\t\n", None).unwrap_err();
        assert_eq!(errors.log, Some(ValidationError::LogRequired));
        assert!(errors.car.is_none());
    }

    #[test]
    fn test_submission_errors_display() {
        let errors = SubmissionErrors {
            log: Some(ValidationError::LogRequired),
            car: Some(ValidationError::CarNumberOutOfRange),
        };
        assert_eq!(
            errors.to_string(),
            "car: Car number must be between 1 and 1000; log: Log entry is required"
        );
        assert_eq!(errors.iter().count(), 2);
        assert!(SubmissionErrors::default().is_empty());
    }
}
