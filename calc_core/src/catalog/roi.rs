//! # Return on Investment
//!
//! ```text
//! ROI            = netProfit / investment * 100
//! annualized ROI = ((1 + ROI / 100) ^ (1 / holdingPeriodYears) - 1) * 100
//! ```
//!
//! `netProfit` and `investment` are currency amounts; `netProfit` may be
//! negative. The result is a **percentage**. When the optional
//! `holdingPeriodYears` is given, the compound annual rate is reported as
//! `annualizedRoiPercent`. A total loss (ROI of -100% or worse) has no
//! annualized rate, and neither does one that overflows (a large ROI over a
//! very short holding period).
//!
//! ## Risk
//!
//! ROI below 10% is High, below 20% is Medium.

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, Metrics, RiskLevel};
use crate::calculator::{CalculatorDescriptor, CalculatorExample, Category, Formula};
use crate::errors::CalcResult;
use crate::inputs::{FieldReader, Inputs};
use crate::registry::Registry;
use crate::validation::ValidationResult;

pub const ID: &str = "roi-calculator";

const ANNUALIZED: &str = "annualizedRoiPercent";
const MEDIUM_BELOW: f64 = 20.0;
const HIGH_BELOW: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiInput {
    pub net_profit: f64,
    pub investment: f64,
    pub holding_period_years: Option<f64>,
}

pub struct RoiFormula;

impl Formula for RoiFormula {
    type Input = RoiInput;

    fn descriptor() -> CalculatorDescriptor {
        CalculatorDescriptor::new(
            ID,
            "ROI Calculator",
            "Return on investment, optionally annualized over a holding period",
            Category::Business,
        )
        .with_tags(&["roi", "return", "investment", "profitability"])
        .with_example(
            CalculatorExample::new(
                "Equipment upgrade",
                "$25K profit on a $100K investment",
                Inputs::new()
                    .with("netProfit", 25_000.0)
                    .with("investment", 100_000.0),
            )
            .expecting(25.0),
        )
        .with_example(
            CalculatorExample::new(
                "Five year hold",
                "Doubling an investment over five years",
                Inputs::new()
                    .with("netProfit", 50_000.0)
                    .with("investment", 50_000.0)
                    .with("holdingPeriodYears", 5.0),
            )
            .expecting(100.0),
        )
    }

    fn decode(fields: &mut FieldReader<'_>) -> RoiInput {
        RoiInput {
            net_profit: fields.number("netProfit"),
            investment: fields.number("investment"),
            holding_period_years: fields.optional_number("holdingPeriodYears"),
        }
    }

    fn validate_inputs(input: &RoiInput) -> ValidationResult {
        let mut v = ValidationResult::new();
        v.require_positive("investment", input.investment);
        if let Some(years) = input.holding_period_years {
            v.require_positive("holdingPeriodYears", years);
        }
        v
    }

    fn calculate_result(input: &RoiInput) -> CalcResult<f64> {
        Ok(input.net_profit / input.investment * 100.0)
    }

    fn derive_metrics(input: &RoiInput, result: f64) -> Metrics {
        let metrics = Metrics::new(result);
        let growth = 1.0 + result / 100.0;
        match input.holding_period_years {
            Some(years) if growth > 0.0 => {
                metrics.with(ANNUALIZED, (growth.powf(1.0 / years) - 1.0) * 100.0)
            }
            _ => metrics,
        }
    }

    fn generate_analysis(_input: &RoiInput, metrics: &Metrics) -> Analysis {
        let roi = metrics.result;
        let risk_level = RiskLevel::descending(roi, MEDIUM_BELOW, HIGH_BELOW);

        let mut recommendation = match risk_level {
            RiskLevel::Low => format!("ROI of {roi:.2}% is a strong return."),
            RiskLevel::Medium => {
                format!("ROI of {roi:.2}% is reasonable; compare against alternative uses of capital.")
            }
            RiskLevel::High => {
                format!("ROI of {roi:.2}% is weak; reconsider the investment or its costs.")
            }
        };
        if let Some(annualized) = metrics.get(ANNUALIZED) {
            recommendation.push_str(&format!(" Annualized: {annualized:.2}% per year."));
        }
        Analysis::new(recommendation, risk_level)
    }
}

pub fn register(registry: &Registry) -> CalcResult<()> {
    registry.register_formula::<RoiFormula>()
}
