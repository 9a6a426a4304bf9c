//! # Error Types
//!
//! Structured error types for calc_core. These errors carry enough context
//! for a front end to show a validation message next to the offending field,
//! or for a script to branch on [`CalcError::error_code`].
//!
//! Exceeding a standard table is *not* an error. It is a regular result,
//! reported as [`Selection::ExceedsStandardRange`](crate::standards::Selection).
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_power(power_kw: f64) -> CalcResult<()> {
//!     if power_kw <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "power_kw".to_string(),
//!             value: power_kw.to_string(),
//!             reason: "Power must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for sizing operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-positive, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// No charger with the given id (or position) in the session
    #[error("Charger not found: {id}")]
    ChargerNotFound { id: String },

    /// A standard table is malformed (empty, unordered, non-positive ratings)
    #[error("Invalid standard table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },

    /// Diagram or report rendering failed; calculation results are unaffected
    #[error("Rendering failed ({renderer}): {reason}")]
    RenderFailed { renderer: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// TOML/JSON serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ChargerNotFound error
    pub fn charger_not_found(id: impl Into<String>) -> Self {
        CalcError::ChargerNotFound { id: id.into() }
    }

    /// Create an InvalidTable error
    pub fn invalid_table(table: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidTable {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create a RenderFailed error
    pub fn render_failed(renderer: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::RenderFailed {
            renderer: renderer.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// True for errors raised at the input boundary (the user can fix the value and retry)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::MissingField { .. } | CalcError::ChargerNotFound { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::ChargerNotFound { .. } => "CHARGER_NOT_FOUND",
            CalcError::InvalidTable { .. } => "INVALID_TABLE",
            CalcError::RenderFailed { .. } => "RENDER_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<toml::de::Error> for CalcError {
    fn from(err: toml::de::Error) -> Self {
        CalcError::serialization(format!("TOML: {}", err.message()))
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(format!("JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("power_kw", "-5", "Power must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::charger_not_found("3").error_code(), "CHARGER_NOT_FOUND");
        assert_eq!(CalcError::render_failed("graphviz", "not found").error_code(), "RENDER_FAILED");
    }

    #[test]
    fn test_validation_classification() {
        assert!(CalcError::invalid_input("quantity", "0", "must be at least 1").is_validation());
        assert!(!CalcError::render_failed("graphviz", "exit 1").is_validation());
        assert!(!CalcError::invalid_table("breakers", "empty").is_validation());
    }

    #[test]
    fn test_toml_error_conversion() {
        let err: CalcError = toml::from_str::<toml::Table>("key = ").unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
