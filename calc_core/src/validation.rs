//! # Input Validation
//!
//! `ValidationResult` collects constraint violations (errors) and
//! business-rule notes (warnings) for one set of decoded inputs. Errors make
//! the inputs invalid; warnings never do.
//!
//! Every error message names the field and the violated constraint, and
//! shows the offending value:
//!
//! ```rust
//! use calc_core::validation::ValidationResult;
//!
//! let mut v = ValidationResult::new();
//! v.require_positive("loanAmount", -5.0);
//! v.require_range("interestRate", 4.5, 0.0, 30.0);
//!
//! assert!(!v.is_valid());
//! assert_eq!(v.errors(), ["'loanAmount' must be greater than 0 (got -5)"]);
//! ```

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Outcome of validating one set of inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// A failed result carrying pre-built messages (e.g. decode errors).
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            errors,
            warnings: Vec::new(),
        }
    }

    /// True when no constraint was violated.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Record a violated constraint on `field`.
    pub fn error(&mut self, field: &str, constraint: &str, value: impl Display) {
        self.errors
            .push(format!("'{field}' {constraint} (got {value})"));
    }

    /// Record an informational warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn require_finite(&mut self, field: &str, value: f64) {
        if !value.is_finite() {
            self.error(field, "must be a finite number", value);
        }
    }

    pub fn require_non_zero(&mut self, field: &str, value: f64) {
        if value == 0.0 {
            self.error(field, "must not be zero", value);
        }
    }

    pub fn require_positive(&mut self, field: &str, value: f64) {
        if value <= 0.0 {
            self.error(field, "must be greater than 0", value);
        }
    }

    pub fn require_non_negative(&mut self, field: &str, value: f64) {
        if value < 0.0 {
            self.error(field, "must not be negative", value);
        }
    }

    /// Inclusive range check.
    pub fn require_range(&mut self, field: &str, value: f64, min: f64, max: f64) {
        if value < min || value > max {
            self.error(field, &format!("must be between {min} and {max}"), value);
        }
    }

    /// Cross-field check: `value` must not exceed `limit` taken from `limit_field`.
    pub fn require_at_most(&mut self, field: &str, value: f64, limit_field: &str, limit: f64) {
        if value > limit {
            self.error(
                field,
                &format!("must not exceed '{limit_field}' ({limit})"),
                value,
            );
        }
    }

    /// Minimum number of entries in a series.
    pub fn require_min_len(&mut self, field: &str, len: usize, min: usize) {
        if len < min {
            self.error(
                field,
                &format!("must contain at least {min} values"),
                format!("{len} values"),
            );
        }
    }

    /// Warn when `value` is above `limit`; never invalidates.
    pub fn warn_above(&mut self, field: &str, value: f64, limit: f64, advice: &str) {
        if value > limit {
            self.warn(format!("'{field}' is above {limit}: {advice}"));
        }
    }

    /// Convert into a calculation gate: the warnings when valid, a
    /// [`CalcError::Validation`] carrying every error otherwise.
    pub fn into_result(self, calculator: &str) -> CalcResult<Vec<String>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(CalcError::validation(calculator, self.errors))
        }
    }
}
