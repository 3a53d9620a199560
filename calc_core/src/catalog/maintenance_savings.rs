//! # Preventative Maintenance Savings
//!
//! Projected savings from a preventative maintenance program, using the
//! catalog's generic amount/rate/time shape:
//!
//! ```text
//! simple   : savings = amount * rate / 100 * time
//! compound : savings = amount * ((1 + rate / 100) ^ time - 1)
//! ```
//!
//! `amount` is the annual maintenance budget (currency), `rate` is the
//! expected savings rate as a **percentage** (`5` for 5%, 0 to 100), and
//! `time` is the horizon in years. Set the optional `compound` flag to
//! reinvest savings each year.
//!
//! ## Risk
//!
//! Tiered on the size of the projection: above 100,000 is High (large
//! programs need verification), above 10,000 is Medium.

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, Metrics, RiskLevel};
use crate::calculator::{CalculatorDescriptor, CalculatorExample, Category, Formula};
use crate::errors::CalcResult;
use crate::inputs::{FieldReader, Inputs};
use crate::registry::Registry;
use crate::validation::ValidationResult;

pub const ID: &str = "preventative-maintenance-savings-calculator";

const MEDIUM_ABOVE: f64 = 10_000.0;
const HIGH_ABOVE: f64 = 100_000.0;
const LARGE_AMOUNT: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSavingsInput {
    pub amount: f64,
    /// Percent, 0 to 100
    pub rate: f64,
    /// Years
    pub time: f64,
    #[serde(default)]
    pub compound: bool,
}

pub struct MaintenanceSavingsFormula;

impl Formula for MaintenanceSavingsFormula {
    type Input = MaintenanceSavingsInput;

    fn descriptor() -> CalculatorDescriptor {
        CalculatorDescriptor::new(
            ID,
            "Preventative Maintenance Savings Calculator",
            "Projected savings from investing in preventative maintenance",
            Category::Business,
        )
        .with_tags(&["maintenance", "operations", "cost savings"])
        .with_example(
            CalculatorExample::new(
                "Basic calculation",
                "Typical calculation scenario",
                Inputs::new()
                    .with("amount", 10000.0)
                    .with("rate", 5.0)
                    .with("time", 1.0),
            )
            .expecting(500.0),
        )
        .with_example(
            CalculatorExample::new(
                "Five year program",
                "Savings reinvested each year",
                Inputs::new()
                    .with("amount", 50000.0)
                    .with("rate", 8.0)
                    .with("time", 5.0)
                    .with("compound", true),
            ),
        )
    }

    fn decode(fields: &mut FieldReader<'_>) -> MaintenanceSavingsInput {
        MaintenanceSavingsInput {
            amount: fields.number("amount"),
            rate: fields.number("rate"),
            time: fields.number("time"),
            compound: fields.optional_flag("compound").unwrap_or(false),
        }
    }

    fn validate_inputs(input: &MaintenanceSavingsInput) -> ValidationResult {
        let mut v = ValidationResult::new();
        v.require_positive("amount", input.amount);
        v.require_range("rate", input.rate, 0.0, 100.0);
        v.require_positive("time", input.time);
        v.warn_above(
            "amount",
            input.amount,
            LARGE_AMOUNT,
            "large amount, consider professional advice",
        );
        v
    }

    fn calculate_result(input: &MaintenanceSavingsInput) -> CalcResult<f64> {
        let rate = input.rate / 100.0;
        if input.compound {
            Ok(input.amount * ((1.0 + rate).powf(input.time) - 1.0))
        } else {
            Ok(input.amount * input.rate / 100.0 * input.time)
        }
    }

    fn generate_analysis(input: &MaintenanceSavingsInput, metrics: &Metrics) -> Analysis {
        let savings = metrics.result;
        let risk_level = RiskLevel::ascending(savings, MEDIUM_ABOVE, HIGH_ABOVE);
        let years = input.time;

        let recommendation = match risk_level {
            RiskLevel::Low => format!(
                "Projected savings of {savings:.2} over {years} years. Modest but low-risk; proceed."
            ),
            RiskLevel::Medium => format!(
                "Projected savings of {savings:.2} over {years} years. Track actual savings against plan."
            ),
            RiskLevel::High => format!(
                "Projected savings of {savings:.2} over {years} years. Validate the savings rate with historical data before committing."
            ),
        };
        Analysis::new(recommendation, risk_level)
    }
}

pub fn register(registry: &Registry) -> CalcResult<()> {
    registry.register_formula::<MaintenanceSavingsFormula>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Calculator, FormulaCalculator};

    fn calculator() -> FormulaCalculator<MaintenanceSavingsFormula> {
        FormulaCalculator::new()
    }

    fn inputs(amount: f64, rate: f64, time: f64) -> Inputs {
        Inputs::new()
            .with("amount", amount)
            .with("rate", rate)
            .with("time", time)
    }

    #[test]
    fn test_golden_scenario() {
        let calc = calculator().evaluate(&inputs(10000.0, 5.0, 1.0)).unwrap();
        assert_eq!(calc.result(), 500.0);
        assert_eq!(calc.risk_level(), RiskLevel::Low);
    }

    #[test]
    fn test_compound_flag() {
        let simple = calculator().evaluate(&inputs(10000.0, 10.0, 2.0)).unwrap();
        assert_eq!(simple.result(), 2000.0);

        let compound = calculator()
            .evaluate(&inputs(10000.0, 10.0, 2.0).with("compound", true))
            .unwrap();
        assert!((compound.result() - 2100.0).abs() < 1e-6);
    }

    #[test]
    fn test_tiers() {
        let medium = calculator().evaluate(&inputs(100000.0, 20.0, 1.0)).unwrap();
        assert_eq!(medium.risk_level(), RiskLevel::Medium);

        let high = calculator().evaluate(&inputs(500000.0, 25.0, 2.0)).unwrap();
        assert_eq!(high.result(), 250000.0);
        assert_eq!(high.risk_level(), RiskLevel::High);
    }

    #[test]
    fn test_rate_is_a_percentage() {
        let err = calculator().calculate(&inputs(10000.0, 150.0, 1.0)).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap(),
            ["'rate' must be between 0 and 100 (got 150)"]
        );
    }

    #[test]
    fn test_large_amount_warns() {
        let check = calculator().check(&inputs(2_000_000.0, 5.0, 1.0));
        assert!(check.is_valid());
        assert_eq!(
            check.warnings(),
            ["'amount' is above 1000000: large amount, consider professional advice"]
        );
    }

    #[test]
    fn test_compound_must_be_boolean() {
        let err = calculator()
            .calculate(&inputs(10000.0, 5.0, 1.0).with("compound", "yes"))
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap(),
            ["'compound' must be a boolean (got text 'yes')"]
        );
    }
}
