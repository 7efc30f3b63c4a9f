//! Error types for the configuration model.

use thiserror::Error;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the store, the geometry engine and the export parser.
///
/// Every error rejects a single operation and leaves prior state intact.
#[derive(Debug, Error)]
pub enum Error {
    /// A field value outside its declared domain.
    #[error("{field} must be within [{min}, {max}], got {value}")]
    Range {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Non-positive or non-finite geometry reached the geometry engine.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Unknown axis or test category name.
    #[error("Unknown {kind} '{value}'")]
    UnknownName { kind: &'static str, value: String },

    /// Export text that is not a valid document.
    #[error("Malformed export document: {0}")]
    Document(#[from] serde_json::Error),
}

impl Error {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Range { .. } => "RANGE_ERROR",
            Error::InvalidGeometry(_) => "INVALID_GEOMETRY",
            Error::UnknownName { .. } => "UNKNOWN_NAME",
            Error::Document(_) => "INVALID_DOCUMENT",
        }
    }
}

/// Checks a real value against an inclusive range.
///
/// NaN never passes.
pub(crate) fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Error::Range {
            field,
            value,
            min,
            max,
        })
    }
}

/// Checks an integer value against an inclusive range and narrows it.
pub(crate) fn check_int<T>(field: &'static str, value: i64, min: i64, max: i64) -> Result<T>
where
    T: TryFrom<i64>,
{
    let out_of_range = || Error::Range {
        field,
        value: value as f64,
        min: min as f64,
        max: max as f64,
    };
    if !(min..=max).contains(&value) {
        return Err(out_of_range());
    }
    T::try_from(value).map_err(|_| out_of_range())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_range_accepts_bounds() {
        assert_eq!(check_range("wall", 1.0, 1.0, 10.0).unwrap(), 1.0);
        assert_eq!(check_range("wall", 10.0, 1.0, 10.0).unwrap(), 10.0);
    }

    #[test]
    fn check_range_rejects_outside_and_nan() {
        assert!(check_range("wall", 0.99, 1.0, 10.0).is_err());
        assert!(check_range("wall", 10.01, 1.0, 10.0).is_err());
        assert!(check_range("wall", f64::NAN, 1.0, 10.0).is_err());
    }

    #[test]
    fn check_int_narrows_valid_values() {
        let value: u8 = check_int("tests.drop", 100, 0, 100).unwrap();
        assert_eq!(value, 100);
    }

    #[test]
    fn check_int_reports_field_and_bounds() {
        let err = check_int::<u8>("tests.drop", 150, 0, 100).unwrap_err();
        assert_eq!(err.code(), "RANGE_ERROR");
        assert_eq!(err.to_string(), "tests.drop must be within [0, 100], got 150");
    }
}
