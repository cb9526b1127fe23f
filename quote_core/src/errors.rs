//! # Error Types
//!
//! Structured error types for quote_core. Every failure carries enough
//! context for the caller to decide whether to show a zero state, fall back,
//! or just log it.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::errors::{QuoteError, CalcResult};
//!
//! fn validate_height(height_ft: f64) -> CalcResult<()> {
//!     if !(height_ft > 0.0) {
//!         return Err(QuoteError::InvalidInput {
//!             field: "height_ft".to_string(),
//!             value: height_ft.to_string(),
//!             reason: "Height must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for quote_core operations
pub type CalcResult<T> = Result<T, QuoteError>;

/// Structured error type for quotation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum QuoteError {
    /// An input value is invalid (non-positive, not finite, out of range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A selection is not one of the known options (e.g. unknown wall type)
    #[error("Invalid selection for '{field}': {value}")]
    InvalidSelection { field: String, value: String },

    /// An operation needs a delivery location and none has been selected
    #[error("No delivery location selected")]
    LocationRequired,

    /// The selected location's distance has not been measured yet
    #[error("Delivery distance is still being measured")]
    DistancePending,

    /// A distance provider could not produce a distance
    #[error("Distance lookup failed ({provider}): {reason}")]
    DistanceLookupFailed { provider: String, reason: String },

    /// A distance provider did not answer in time
    #[error("Distance lookup timed out ({provider}) after {timeout_ms} ms")]
    LookupTimedOut { provider: String, timeout_ms: u64 },

    /// Place search failed
    #[error("Location search failed: {reason}")]
    SearchFailed { reason: String },

    /// The export relay rejected or never received the quote summary
    #[error("Quote relay failed: {reason}")]
    RelayFailed { reason: String },

    /// Quotation document rendering failed
    #[error("Rendering failed at {stage}: {reason}")]
    RenderFailed { stage: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl QuoteError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        QuoteError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidSelection error
    pub fn invalid_selection(field: impl Into<String>, value: impl Into<String>) -> Self {
        QuoteError::InvalidSelection {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a DistanceLookupFailed error
    pub fn lookup_failed(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::DistanceLookupFailed {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Create a RenderFailed error
    pub fn render_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::RenderFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller is expected to carry on (fall back, or log and continue).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QuoteError::DistancePending
                | QuoteError::DistanceLookupFailed { .. }
                | QuoteError::LookupTimedOut { .. }
                | QuoteError::SearchFailed { .. }
                | QuoteError::RelayFailed { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::InvalidInput { .. } => "INVALID_INPUT",
            QuoteError::MissingField { .. } => "MISSING_FIELD",
            QuoteError::InvalidSelection { .. } => "INVALID_SELECTION",
            QuoteError::LocationRequired => "LOCATION_REQUIRED",
            QuoteError::DistancePending => "DISTANCE_PENDING",
            QuoteError::DistanceLookupFailed { .. } => "DISTANCE_LOOKUP_FAILED",
            QuoteError::LookupTimedOut { .. } => "LOOKUP_TIMED_OUT",
            QuoteError::SearchFailed { .. } => "SEARCH_FAILED",
            QuoteError::RelayFailed { .. } => "RELAY_FAILED",
            QuoteError::RenderFailed { .. } => "RENDER_FAILED",
            QuoteError::FileError { .. } => "FILE_ERROR",
            QuoteError::SerializationError { .. } => "SERIALIZATION_ERROR",
            QuoteError::VersionMismatch { .. } => "VERSION_MISMATCH",
            QuoteError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(e: serde_json::Error) -> Self {
        QuoteError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = QuoteError::invalid_selection("wall_type", "fence");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidSelection\""));
        let roundtrip: QuoteError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(QuoteError::missing_field("height_ft").error_code(), "MISSING_FIELD");
        assert_eq!(QuoteError::LocationRequired.error_code(), "LOCATION_REQUIRED");
        assert_eq!(QuoteError::DistancePending.error_code(), "DISTANCE_PENDING");
        assert_eq!(
            QuoteError::invalid_selection("wall_type", "x").error_code(),
            "INVALID_SELECTION"
        );
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(QuoteError::lookup_failed("osrm", "502").is_recoverable());
        assert!(QuoteError::RelayFailed { reason: "offline".into() }.is_recoverable());
        assert!(!QuoteError::missing_field("name").is_recoverable());
        assert!(QuoteError::DistancePending.is_recoverable());
    }

    #[test]
    fn test_json_error_converts_to_serialization_error() {
        let err: QuoteError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
