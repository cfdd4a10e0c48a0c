//! Record Error Types

use thiserror::Error;

/// Reasons a raw listing cannot become a usable record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Value present but not a number
    #[error("{field} value {value:?} is not a number")]
    Unparseable { field: &'static str, value: String },

    /// Required field absent or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Value outside the plausible range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}
