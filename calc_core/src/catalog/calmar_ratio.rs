//! # Calmar Ratio
//!
//! Annualized return per unit of worst historical loss:
//!
//! ```text
//! Calmar = annualizedReturn / |maxDrawdown|
//! ```
//!
//! Both inputs are **fractions** (`0.12` for 12%). `maxDrawdown` may be given
//! as a negative or positive fraction; only its magnitude is used. A zero
//! drawdown leaves the ratio undefined and fails with a computation error.
//!
//! ## Risk
//!
//! Below 1 is High, below 3 is Medium, 3 and above is Low.

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, Metrics, RiskLevel};
use crate::calculator::{CalculatorDescriptor, CalculatorExample, Category, Formula};
use crate::errors::{CalcError, CalcResult};
use crate::inputs::{FieldReader, Inputs};
use crate::registry::Registry;
use crate::validation::ValidationResult;

pub const ID: &str = "calmar-ratio-calculator";

const MEDIUM_BELOW: f64 = 3.0;
const HIGH_BELOW: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalmarRatioInput {
    pub annualized_return: f64,
    pub max_drawdown: f64,
}

pub struct CalmarRatioFormula;

impl Formula for CalmarRatioFormula {
    type Input = CalmarRatioInput;

    fn descriptor() -> CalculatorDescriptor {
        CalculatorDescriptor::new(
            ID,
            "Calmar Ratio Calculator",
            "Risk-adjusted return: annualized return divided by maximum drawdown",
            Category::Finance,
        )
        .with_tags(&["calmar", "risk-adjusted return", "drawdown", "hedge fund"])
        .with_example(
            CalculatorExample::new(
                "Moderate fund",
                "12% annual return with a 20% maximum drawdown",
                Inputs::new()
                    .with("annualizedReturn", 0.12)
                    .with("maxDrawdown", -0.20),
            )
            .expecting(0.6),
        )
        .with_example(
            CalculatorExample::new(
                "Steady strategy",
                "15% annual return with a 4% maximum drawdown",
                Inputs::new()
                    .with("annualizedReturn", 0.15)
                    .with("maxDrawdown", -0.04),
            ),
        )
    }

    fn decode(fields: &mut FieldReader<'_>) -> CalmarRatioInput {
        CalmarRatioInput {
            annualized_return: fields.number("annualizedReturn"),
            max_drawdown: fields.number("maxDrawdown"),
        }
    }

    fn validate_inputs(input: &CalmarRatioInput) -> ValidationResult {
        let mut v = ValidationResult::new();
        v.require_range("maxDrawdown", input.max_drawdown, -1.0, 1.0);
        v.require_range("annualizedReturn", input.annualized_return, -1.0, 10.0);
        v.warn_above(
            "annualizedReturn",
            input.annualized_return,
            1.0,
            "returns are fractions, so this is more than 100% a year",
        );
        v
    }

    fn calculate_result(input: &CalmarRatioInput) -> CalcResult<f64> {
        let drawdown = input.max_drawdown.abs();
        if drawdown == 0.0 {
            return Err(CalcError::computation(
                ID,
                "'maxDrawdown' is zero, so the ratio is undefined",
            ));
        }
        Ok(input.annualized_return / drawdown)
    }

    fn generate_analysis(_input: &CalmarRatioInput, metrics: &Metrics) -> Analysis {
        let ratio = metrics.result;
        let risk_level = RiskLevel::descending(ratio, MEDIUM_BELOW, HIGH_BELOW);
        let recommendation = match risk_level {
            RiskLevel::Low => format!(
                "Calmar ratio of {ratio:.2} is excellent: returns comfortably outweigh drawdown risk."
            ),
            RiskLevel::Medium => format!(
                "Calmar ratio of {ratio:.2} is acceptable; compare with peers before committing."
            ),
            RiskLevel::High => format!(
                "Calmar ratio of {ratio:.2} is poor: returns do not compensate for drawdown risk."
            ),
        };
        Analysis::new(recommendation, risk_level)
    }
}

pub fn register(registry: &Registry) -> CalcResult<()> {
    registry.register_formula::<CalmarRatioFormula>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Calculator, FormulaCalculator};

    fn run(annualized_return: f64, max_drawdown: f64) -> CalcResult<crate::analysis::Calculation> {
        FormulaCalculator::<CalmarRatioFormula>::new().evaluate(
            &Inputs::new()
                .with("annualizedReturn", annualized_return)
                .with("maxDrawdown", max_drawdown),
        )
    }

    #[test]
    fn test_golden_scenario() {
        let calc = run(0.12, -0.20).unwrap();
        assert!((calc.result() - 0.6).abs() < 1e-12);
        assert_eq!(calc.risk_level(), RiskLevel::High);
    }

    #[test]
    fn test_drawdown_sign_is_ignored() {
        let negative = run(0.12, -0.20).unwrap();
        let positive = run(0.12, 0.20).unwrap();
        assert_eq!(negative.result(), positive.result());
    }

    #[test]
    fn test_tiers() {
        assert_eq!(run(0.10, -0.10).unwrap().risk_level(), RiskLevel::Medium);
        assert_eq!(run(0.15, -0.04).unwrap().risk_level(), RiskLevel::Low);
    }

    #[test]
    fn test_zero_drawdown_is_computation_error() {
        let err = run(0.12, 0.0).unwrap_err();
        assert_eq!(err.error_code(), "COMPUTATION_FAILED");
        assert!(err.to_string().contains("maxDrawdown"));
    }

    #[test]
    fn test_drawdown_out_of_range() {
        let err = run(0.12, -20.0).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap(),
            ["'maxDrawdown' must be between -1 and 1 (got -20)"]
        );
    }
}
