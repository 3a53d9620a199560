//! # Maximum Drawdown
//!
//! Largest peak-to-trough decline over a series of portfolio values, in
//! percent of the peak. Values are scanned in order; a trough only counts
//! against a peak that came before it.
//!
//! ```text
//! drawdown(i) = (runningPeak(i) - value(i)) / runningPeak(i) * 100
//! MDD         = max over i of drawdown(i)
//! ```
//!
//! `portfolioValues` needs at least two entries, all positive. A series that
//! never declines has a drawdown of 0.
//!
//! Derived metrics: `peakValue` and `troughValue` of the worst decline.
//!
//! ## Risk
//!
//! Above 30% is High, above 10% is Medium.

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, Metrics, RiskLevel};
use crate::calculator::{CalculatorDescriptor, CalculatorExample, Category, Formula};
use crate::errors::{CalcError, CalcResult};
use crate::inputs::{FieldReader, Inputs};
use crate::registry::Registry;
use crate::validation::ValidationResult;

pub const ID: &str = "maximum-drawdown-calculator";

const MEDIUM_ABOVE: f64 = 10.0;
const HIGH_ABOVE: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaximumDrawdownInput {
    pub portfolio_values: Vec<f64>,
}

/// The worst decline found in a series.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Decline {
    percent: f64,
    peak: f64,
    trough: f64,
}

/// Single pass over `values`, tracking the running peak.
fn worst_decline(values: &[f64]) -> Option<Decline> {
    let (&first, rest) = values.split_first()?;
    let mut peak = first;
    let mut worst = Decline {
        percent: 0.0,
        peak: first,
        trough: first,
    };

    for &value in rest {
        if value > peak {
            peak = value;
            continue;
        }
        let percent = (peak - value) / peak * 100.0;
        if percent > worst.percent {
            worst = Decline {
                percent,
                peak,
                trough: value,
            };
        }
    }
    Some(worst)
}

pub struct MaximumDrawdownFormula;

impl Formula for MaximumDrawdownFormula {
    type Input = MaximumDrawdownInput;

    fn descriptor() -> CalculatorDescriptor {
        CalculatorDescriptor::new(
            ID,
            "Maximum Drawdown Calculator",
            "Largest peak-to-trough decline of a portfolio value series",
            Category::Finance,
        )
        .with_tags(&["drawdown", "risk", "portfolio", "volatility"])
        .with_example(
            CalculatorExample::new(
                "Correction and recovery",
                "Portfolio rises to 120, falls to 90, recovers to 110",
                Inputs::new().with("portfolioValues", vec![100.0, 120.0, 90.0, 110.0]),
            )
            .expecting(25.0),
        )
        .with_example(
            CalculatorExample::new(
                "Steady growth",
                "A series that never declines",
                Inputs::new().with("portfolioValues", vec![100.0, 105.0, 110.0, 118.0]),
            )
            .expecting(0.0),
        )
    }

    fn decode(fields: &mut FieldReader<'_>) -> MaximumDrawdownInput {
        MaximumDrawdownInput {
            portfolio_values: fields.series("portfolioValues"),
        }
    }

    fn validate_inputs(input: &MaximumDrawdownInput) -> ValidationResult {
        let mut v = ValidationResult::new();
        let values = &input.portfolio_values;
        v.require_min_len("portfolioValues", values.len(), 2);
        for (i, value) in values.iter().enumerate() {
            v.require_positive(&format!("portfolioValues[{i}]"), *value);
        }
        v
    }

    fn calculate_result(input: &MaximumDrawdownInput) -> CalcResult<f64> {
        worst_decline(&input.portfolio_values)
            .map(|decline| decline.percent)
            .ok_or_else(|| CalcError::computation(ID, "'portfolioValues' is empty"))
    }

    fn derive_metrics(input: &MaximumDrawdownInput, result: f64) -> Metrics {
        let metrics = Metrics::new(result);
        match worst_decline(&input.portfolio_values) {
            Some(decline) => metrics
                .with("peakValue", decline.peak)
                .with("troughValue", decline.trough),
            None => metrics,
        }
    }

    fn generate_analysis(_input: &MaximumDrawdownInput, metrics: &Metrics) -> Analysis {
        let mdd = metrics.result;
        let risk_level = RiskLevel::ascending(mdd, MEDIUM_ABOVE, HIGH_ABOVE);

        let span = match (metrics.get("peakValue"), metrics.get("troughValue")) {
            (Some(peak), Some(trough)) if mdd > 0.0 => format!(" (from {peak} down to {trough})"),
            _ => String::new(),
        };
        let recommendation = match risk_level {
            RiskLevel::Low => format!(
                "Maximum drawdown of {mdd:.2}%{span} is within a conservative range."
            ),
            RiskLevel::Medium => format!(
                "Maximum drawdown of {mdd:.2}%{span} is moderate; make sure it fits your loss tolerance."
            ),
            RiskLevel::High => format!(
                "Maximum drawdown of {mdd:.2}%{span} is severe; consider diversifying or hedging."
            ),
        };
        Analysis::new(recommendation, risk_level)
    }
}

pub fn register(registry: &Registry) -> CalcResult<()> {
    registry.register_formula::<MaximumDrawdownFormula>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Calculator, FormulaCalculator};

    fn run(values: &[f64]) -> CalcResult<crate::analysis::Calculation> {
        FormulaCalculator::<MaximumDrawdownFormula>::new()
            .evaluate(&Inputs::new().with("portfolioValues", values))
    }

    #[test]
    fn test_golden_scenario() {
        let calc = run(&[100.0, 120.0, 90.0, 110.0]).unwrap();
        assert_eq!(calc.result(), 25.0);
        assert_eq!(calc.risk_level(), RiskLevel::Medium);
        assert_eq!(calc.metrics.get("peakValue"), Some(120.0));
        assert_eq!(calc.metrics.get("troughValue"), Some(90.0));
        assert!(calc.analysis.recommendation.contains("from 120 down to 90"));
    }

    #[test]
    fn test_trough_before_peak_does_not_count() {
        let calc = run(&[100.0, 50.0, 200.0, 180.0]).unwrap();
        assert_eq!(calc.result(), 50.0);

        // 50 precedes the 200 peak, so only 200 -> 180 counts
        let calc = run(&[50.0, 200.0, 180.0]).unwrap();
        assert_eq!(calc.result(), 10.0);
        assert_eq!(calc.risk_level(), RiskLevel::Low);
    }

    #[test]
    fn test_monotonic_series_has_no_drawdown() {
        let calc = run(&[100.0, 105.0, 110.0]).unwrap();
        assert_eq!(calc.result(), 0.0);
        assert_eq!(calc.risk_level(), RiskLevel::Low);
    }

    #[test]
    fn test_severe_drawdown() {
        let calc = run(&[100.0, 60.0]).unwrap();
        assert_eq!(calc.result(), 40.0);
        assert_eq!(calc.risk_level(), RiskLevel::High);
    }

    #[test]
    fn test_validation() {
        let err = run(&[100.0]).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap(),
            ["'portfolioValues' must contain at least 2 values (got 1 values)"]
        );

        let err = run(&[100.0, 0.0, -5.0]).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap(),
            [
                "'portfolioValues[1]' must be greater than 0 (got 0)",
                "'portfolioValues[2]' must be greater than 0 (got -5)",
            ]
        );

        let err = FormulaCalculator::<MaximumDrawdownFormula>::new()
            .calculate(&Inputs::new().with("portfolioValues", 100.0))
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap(),
            ["'portfolioValues' must be a list of numbers (got number 100)"]
        );
    }
}
