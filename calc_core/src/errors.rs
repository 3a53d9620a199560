//! # Error Types
//!
//! Structured error types for calc_core. Every failure a caller can see
//! (bad inputs, undefined math, unknown calculator ids, registration
//! mistakes) is a variant here, so drivers can branch on it instead of
//! parsing strings.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn ratio(numerator: f64, denominator: f64) -> CalcResult<f64> {
//!     if denominator == 0.0 {
//!         return Err(CalcError::computation(
//!             "example-ratio",
//!             "denominator is zero",
//!         ));
//!     }
//!     Ok(numerator / denominator)
//! }
//!
//! assert_eq!(ratio(1.0, 0.0).unwrap_err().error_code(), "COMPUTATION_FAILED");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for catalog operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Inputs failed one or more declared constraints.
    ///
    /// `errors` holds every violated constraint in the order the validator
    /// reported them.
    #[error("Invalid inputs for '{calculator}': {}", .errors.join("; "))]
    Validation {
        calculator: String,
        errors: Vec<String>,
    },

    /// The formula hit a mathematically undefined case (zero denominator, etc.)
    #[error("Calculation failed: {calculator} - {reason}")]
    Computation { calculator: String, reason: String },

    /// No calculator is registered under the requested id
    #[error("Calculator not found: {id}")]
    CalculatorNotFound { id: String },

    /// A calculator with the same id is already registered
    #[error("Duplicate calculator id: '{id}' is already registered")]
    DuplicateCalculator { id: String },

    /// Registration attempted after the registry was frozen
    #[error("Registry is frozen: cannot register '{id}'")]
    RegistryFrozen { id: String },

    /// Descriptor metadata is unusable (empty id, etc.)
    #[error("Invalid descriptor '{id}': {reason}")]
    InvalidDescriptor { id: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create a Validation error
    pub fn validation(calculator: impl Into<String>, errors: Vec<String>) -> Self {
        CalcError::Validation {
            calculator: calculator.into(),
            errors,
        }
    }

    /// Create a Computation error
    pub fn computation(calculator: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Computation {
            calculator: calculator.into(),
            reason: reason.into(),
        }
    }

    /// Create a CalculatorNotFound error
    pub fn not_found(id: impl Into<String>) -> Self {
        CalcError::CalculatorNotFound { id: id.into() }
    }

    /// Create an InvalidDescriptor error
    pub fn invalid_descriptor(id: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidDescriptor {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Validation messages, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            CalcError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Whether the caller can fix this by changing the inputs
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::Validation { .. } | CalcError::SerializationError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::Validation { .. } => "VALIDATION_FAILED",
            CalcError::Computation { .. } => "COMPUTATION_FAILED",
            CalcError::CalculatorNotFound { .. } => "CALCULATOR_NOT_FOUND",
            CalcError::DuplicateCalculator { .. } => "DUPLICATE_CALCULATOR",
            CalcError::RegistryFrozen { .. } => "REGISTRY_FROZEN",
            CalcError::InvalidDescriptor { .. } => "INVALID_DESCRIPTOR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
