//! Error types for template rendering and structured extraction.
//!
//! Compiling a template never fails. The two render paths fail in different
//! shapes for the same caller mistake (too few values): string rendering
//! reports a [`FormatError`], structured extraction reports an [`IndexError`].
//! They are kept apart so callers can tell which path failed.

use thiserror::Error;

/// Errors produced while rendering a template to a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The positional format is not a well-formed composite format string.
    #[error("malformed format string at byte {position}: {reason}")]
    Malformed {
        position: usize,
        reason: &'static str,
    },

    /// A format item references a value that was not supplied.
    #[error("format item index {index} is out of range ({supplied} values supplied)")]
    IndexOutOfRange { index: usize, supplied: usize },

    /// The format specifier does not apply to the value's type.
    #[error("format specifier '{spec}' is not valid for {value_type} values")]
    InvalidSpec {
        spec: String,
        value_type: &'static str,
    },

    /// The timestamp cannot be represented as a calendar date.
    #[error("timestamp {millis}ms is outside the supported calendar range")]
    TimestampOutOfRange { millis: i64 },
}

impl FormatError {
    pub(crate) fn malformed(position: usize, reason: &'static str) -> Self {
        FormatError::Malformed { position, reason }
    }

    pub(crate) fn invalid_spec(spec: &str, value_type: &'static str) -> Self {
        FormatError::InvalidSpec {
            spec: spec.to_string(),
            value_type,
        }
    }
}

/// A placeholder had no corresponding value during structured extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no value supplied for placeholder '{name}' at index {index} ({supplied} values supplied)")]
pub struct IndexError {
    /// Position of the placeholder in the template.
    pub index: usize,
    /// Name of the placeholder.
    pub name: String,
    /// Number of values the caller supplied.
    pub supplied: usize,
}

/// Result type for rendering operations.
pub type Result<T, E = FormatError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = FormatError::IndexOutOfRange {
            index: 2,
            supplied: 1,
        };
        assert_eq!(
            err.to_string(),
            "format item index 2 is out of range (1 values supplied)"
        );

        let err = FormatError::invalid_spec("D2", "float");
        assert_eq!(
            err.to_string(),
            "format specifier 'D2' is not valid for float values"
        );

        let err = IndexError {
            index: 1,
            name: "UserId".into(),
            supplied: 1,
        };
        assert!(err.to_string().contains("'UserId'"));
    }
}
