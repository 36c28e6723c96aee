//! Error taxonomy for table construction and valuation inputs

use thiserror::Error;

/// Problems with the source rows of a mortality table.
///
/// These are fatal to table construction; nothing is partially built.
#[derive(Debug, Error)]
pub enum InvalidTableError {
    #[error("mortality table has no rows")]
    Empty,

    #[error("negative age {age} in mortality table (ages must be >= 0)")]
    NegativeAge { age: i64 },

    #[error("age {age} in mortality table exceeds the largest supported age {}", u32::MAX)]
    AgeOutOfRange { age: i64 },

    #[error("duplicate age {age} in mortality table")]
    DuplicateAge { age: i64 },

    #[error("non-numeric rate {value:?} in column {column} at age {age}")]
    NonNumericRate {
        age: i64,
        column: &'static str,
        value: String,
    },

    #[error("rate {value} in column {column} at age {age} is outside [0, 1]")]
    RateOutOfRange {
        age: i64,
        column: &'static str,
        value: f64,
    },

    #[error("missing ultimate rate at age {age}")]
    MissingUltimateRate { age: i64 },

    #[error("malformed table line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("failed to read mortality table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse mortality table: {0}")]
    Csv(#[from] csv::Error),
}

/// Out-of-domain valuation inputs. Callers recover by re-prompting.
#[derive(Debug, Error)]
pub enum InvalidArgumentError {
    #[error("{field} = {value} is outside the valid range [{min}, {max}]")]
    AgeOutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{field} = {value} must be a positive whole number of years")]
    NonPositiveTerm { field: &'static str, value: u32 },

    #[error("{field} = {value} must be a finite rate greater than -1")]
    InterestRateOutOfRange { field: &'static str, value: f64 },

    #[error("{product} requires a term")]
    MissingTerm { product: &'static str },

    #[error("{product} does not take a term (got {value})")]
    UnexpectedTerm { product: &'static str, value: u32 },

    #[error("unknown product {0:?}")]
    UnknownProduct(String),

    #[error("invalid configuration {field}: {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidTable(#[from] InvalidTableError),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = InvalidArgumentError::AgeOutOfRange {
            field: "entry_age",
            value: 10,
            min: 17,
            max: 120,
        };
        assert_eq!(
            err.to_string(),
            "entry_age = 10 is outside the valid range [17, 120]"
        );

        let err = InvalidTableError::RateOutOfRange {
            age: 40,
            column: "duration_0",
            value: 1.5,
        };
        assert!(err.to_string().contains("duration_0"));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_crate_error_wraps_both_kinds() {
        let err: Error = InvalidTableError::Empty.into();
        assert!(matches!(err, Error::InvalidTable(InvalidTableError::Empty)));

        let err: Error = InvalidArgumentError::NonPositiveTerm {
            field: "term",
            value: 0,
        }
        .into();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
