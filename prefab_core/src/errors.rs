//! # Error Types
//!
//! Structured error types for prefab_core. Two tiers exist:
//!
//! - [`CalcError`] is fatal. It aborts an estimation run and names the field
//!   or file that caused it.
//! - [`EstimateWarning`] is recoverable. A catalog miss or a malformed property
//!   bag drops one ledger line and is reported alongside the result.
//!
//! ## Example
//!
//! ```rust
//! use prefab_core::errors::{CalcError, CalcResult};
//!
//! fn validate_height(height_m: f64) -> CalcResult<()> {
//!     if height_m <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "height_m".to_string(),
//!             value: height_m.to_string(),
//!             reason: "Height must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for prefab_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for estimation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-finite, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material not found in the catalog
    #[error("Material not found: {material}")]
    MaterialNotFound { material: String },

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

    /// Catalog snapshot schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
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

    /// Create a MaterialNotFound error
    pub fn material_not_found(material: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material: material.into(),
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

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

/// Severity attached to a recoverable estimation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

/// What kind of recoverable problem caused a line to be dropped or altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Material, current price, or consumption rate absent from the catalog
    CatalogMiss,
    /// Application detail property bag present but not a JSON object
    MalformedPropertyBag,
    /// A later line replaced an earlier one with the same label
    DuplicateLabel,
}

impl WarningKind {
    pub fn code(&self) -> &'static str {
        match self {
            WarningKind::CatalogMiss => "CATALOG_MISS",
            WarningKind::MalformedPropertyBag => "MALFORMED_PROPERTY_BAG",
            WarningKind::DuplicateLabel => "DUPLICATE_LABEL",
        }
    }
}

/// A structured, caller-visible warning produced during one estimation run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "severity": "Warning",
///   "kind": "CatalogMiss",
///   "step": "Kitchen Floor",
///   "message": "No current price for material 'Tile'"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateWarning {
    pub severity: Severity,
    pub kind: WarningKind,
    /// Which ledger step the warning belongs to (e.g. "Wall Panels", "Kitchen Wall")
    pub step: String,
    pub message: String,
}

impl EstimateWarning {
    /// Create a CatalogMiss warning
    pub fn catalog_miss(step: impl Into<String>, message: impl Into<String>) -> Self {
        EstimateWarning {
            severity: Severity::Warning,
            kind: WarningKind::CatalogMiss,
            step: step.into(),
            message: message.into(),
        }
    }

    /// Create a MalformedPropertyBag warning
    pub fn malformed_bag(step: impl Into<String>, message: impl Into<String>) -> Self {
        EstimateWarning {
            severity: Severity::Warning,
            kind: WarningKind::MalformedPropertyBag,
            step: step.into(),
            message: message.into(),
        }
    }

    /// Create a DuplicateLabel notice. Overwriting is accepted behavior, so
    /// this is informational rather than a warning.
    pub fn duplicate_label(step: impl Into<String>, message: impl Into<String>) -> Self {
        EstimateWarning {
            severity: Severity::Info,
            kind: WarningKind::DuplicateLabel,
            step: step.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EstimateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind.code(), self.step, self.message)
    }
}
