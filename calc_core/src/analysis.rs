//! # Results and Analysis
//!
//! Types produced by a calculation:
//!
//! - [`Metrics`] - the numeric result plus named derived values
//! - [`Analysis`] - recommendation text and a [`RiskLevel`]
//! - [`CalculationOutput`] - the `{result, analysis}` pair the façade returns
//! - [`Calculation`] - the full record (metrics, tier, warnings)

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse qualitative risk bucket.
///
/// Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Tier for metrics where larger values mean more risk.
    ///
    /// `value > high_above` is High, `value > medium_above` is Medium,
    /// everything else Low. Boundaries belong to the lower tier.
    ///
    /// ```rust
    /// use calc_core::analysis::RiskLevel;
    ///
    /// assert_eq!(RiskLevel::ascending(80.0, 75.0, 80.0), RiskLevel::Medium);
    /// assert_eq!(RiskLevel::ascending(80.1, 75.0, 80.0), RiskLevel::High);
    /// ```
    pub fn ascending(value: f64, medium_above: f64, high_above: f64) -> Self {
        if value > high_above {
            RiskLevel::High
        } else if value > medium_above {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Tier for metrics where smaller values mean more risk.
    ///
    /// `value < high_below` is High, `value < medium_below` is Medium,
    /// everything else Low. Boundaries belong to the lower tier.
    pub fn descending(value: f64, medium_below: f64, high_below: f64) -> Self {
        if value < high_below {
            RiskLevel::High
        } else if value < medium_below {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric output of a formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// The calculator's headline number
    pub result: f64,

    /// Secondary values keyed by camelCase name (e.g. `investorOwnershipPercent`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub derived: BTreeMap<String, f64>,
}

impl Metrics {
    pub fn new(result: f64) -> Self {
        Self {
            result,
            derived: BTreeMap::new(),
        }
    }

    /// Builder-style derived value.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.derived.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.derived.get(name).copied()
    }

    /// Remove derived values that are not finite, returning their names.
    ///
    /// Derived values are optional extras; the headline `result` is left as is.
    pub fn drop_non_finite(&mut self) -> Vec<String> {
        let dropped: Vec<String> = self
            .derived
            .iter()
            .filter(|(_, v)| !v.is_finite())
            .map(|(k, _)| k.clone())
            .collect();
        for name in &dropped {
            self.derived.remove(name);
        }
        dropped
    }
}

/// Qualitative reading of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub recommendation: String,
    pub risk_level: RiskLevel,
}

impl Analysis {
    pub fn new(recommendation: impl Into<String>, risk_level: RiskLevel) -> Self {
        Self {
            recommendation: recommendation.into(),
            risk_level,
        }
    }
}

/// What `Calculator::calculate` returns: the result and the recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutput {
    pub result: f64,
    pub analysis: String,
}

/// Full record of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub calculator_id: String,
    pub metrics: Metrics,
    pub analysis: Analysis,

    /// Business-rule warnings raised during validation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Calculation {
    pub fn result(&self) -> f64 {
        self.metrics.result
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.analysis.risk_level
    }
}

impl From<Calculation> for CalculationOutput {
    fn from(calc: Calculation) -> Self {
        CalculationOutput {
            result: calc.metrics.result,
            analysis: calc.analysis.recommendation,
        }
    }
}
