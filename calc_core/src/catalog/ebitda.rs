//! # EBITDA
//!
//! Earnings before interest, taxes, depreciation and amortization:
//!
//! ```text
//! EBITDA = netIncome + interest + taxes + depreciation + amortization
//! ```
//!
//! All inputs are currency amounts. `netIncome` and `taxes` may be negative
//! (a loss, a tax benefit); the other add-backs may not. When the optional
//! `revenue` is given and positive, the EBITDA margin is reported as
//! `ebitdaMarginPercent`. A margin too large to represent is left out.
//!
//! ## Risk
//!
//! Positive EBITDA is Low, exactly zero is Medium, negative is High.

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, Metrics, RiskLevel};
use crate::calculator::{CalculatorDescriptor, CalculatorExample, Category, Formula};
use crate::errors::CalcResult;
use crate::inputs::{FieldReader, Inputs};
use crate::registry::Registry;
use crate::validation::ValidationResult;

pub const ID: &str = "ebitda-calculator";

/// Margin above which operations are considered strong, in percent.
const STRONG_MARGIN: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbitdaInput {
    pub net_income: f64,
    pub interest: f64,
    pub taxes: f64,
    pub depreciation: f64,
    pub amortization: f64,
    pub revenue: Option<f64>,
}

pub struct EbitdaFormula;

impl Formula for EbitdaFormula {
    type Input = EbitdaInput;

    fn descriptor() -> CalculatorDescriptor {
        CalculatorDescriptor::new(
            ID,
            "EBITDA Calculator",
            "Earnings before interest, taxes, depreciation and amortization",
            Category::Business,
        )
        .with_tags(&["ebitda", "profitability", "operating performance"])
        .with_example(
            CalculatorExample::new(
                "Profitable company",
                "Small business with positive net income",
                Inputs::new()
                    .with("netIncome", 100.0)
                    .with("interest", 20.0)
                    .with("taxes", 30.0)
                    .with("depreciation", 10.0)
                    .with("amortization", 5.0),
            )
            .expecting(165.0),
        )
        .with_example(
            CalculatorExample::new(
                "With revenue",
                "Mid-size company reporting revenue for the margin",
                Inputs::new()
                    .with("netIncome", 250000.0)
                    .with("interest", 40000.0)
                    .with("taxes", 60000.0)
                    .with("depreciation", 35000.0)
                    .with("amortization", 15000.0)
                    .with("revenue", 2000000.0),
            )
            .expecting(400000.0),
        )
    }

    fn decode(fields: &mut FieldReader<'_>) -> EbitdaInput {
        EbitdaInput {
            net_income: fields.number("netIncome"),
            interest: fields.number("interest"),
            taxes: fields.number("taxes"),
            depreciation: fields.number("depreciation"),
            amortization: fields.number("amortization"),
            revenue: fields.optional_number("revenue"),
        }
    }

    fn validate_inputs(input: &EbitdaInput) -> ValidationResult {
        let mut v = ValidationResult::new();
        v.require_non_negative("interest", input.interest);
        v.require_non_negative("depreciation", input.depreciation);
        v.require_non_negative("amortization", input.amortization);
        if let Some(revenue) = input.revenue {
            v.require_non_negative("revenue", revenue);
        }
        v
    }

    fn calculate_result(input: &EbitdaInput) -> CalcResult<f64> {
        Ok(input.net_income
            + input.interest
            + input.taxes
            + input.depreciation
            + input.amortization)
    }

    fn derive_metrics(input: &EbitdaInput, result: f64) -> Metrics {
        let metrics = Metrics::new(result);
        match input.revenue {
            Some(revenue) if revenue > 0.0 => {
                metrics.with("ebitdaMarginPercent", result / revenue * 100.0)
            }
            _ => metrics,
        }
    }

    fn generate_analysis(_input: &EbitdaInput, metrics: &Metrics) -> Analysis {
        let ebitda = metrics.result;
        let risk_level = if ebitda > 0.0 {
            RiskLevel::Low
        } else if ebitda == 0.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        };

        let mut recommendation = match risk_level {
            RiskLevel::Low => format!("Operations generate positive EBITDA of {ebitda:.2}."),
            RiskLevel::Medium => {
                "Operations break even before interest, taxes and non-cash charges.".to_string()
            }
            RiskLevel::High => format!(
                "Negative EBITDA of {ebitda:.2}: core operations are losing money."
            ),
        };
        if let Some(margin) = metrics.get("ebitdaMarginPercent") {
            recommendation.push_str(&format!(" EBITDA margin is {margin:.1}%"));
            recommendation.push_str(if margin >= STRONG_MARGIN {
                ", a strong operating margin."
            } else {
                "; look for cost reductions to lift the margin."
            });
        }

        Analysis::new(recommendation, risk_level)
    }
}

pub fn register(registry: &Registry) -> CalcResult<()> {
    registry.register_formula::<EbitdaFormula>()
}
