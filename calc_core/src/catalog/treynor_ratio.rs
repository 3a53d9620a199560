//! # Treynor Ratio
//!
//! Excess return per unit of systematic (market) risk:
//!
//! ```text
//! Treynor = (portfolioReturn - riskFreeRate) / beta
//! ```
//!
//! `portfolioReturn` and `riskFreeRate` are **percentages** (`12` for 12%),
//! so the ratio is in percentage points per unit of beta. A beta of exactly
//! zero leaves the ratio undefined and fails with a computation error.
//!
//! ## Risk
//!
//! Negative is High, below 5 is Medium.

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, Metrics, RiskLevel};
use crate::calculator::{CalculatorDescriptor, CalculatorExample, Category, Formula};
use crate::errors::{CalcError, CalcResult};
use crate::inputs::{FieldReader, Inputs};
use crate::registry::Registry;
use crate::validation::ValidationResult;

pub const ID: &str = "treynor-ratio-calculator";

const MEDIUM_BELOW: f64 = 5.0;
const HIGH_BELOW: f64 = 0.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreynorRatioInput {
    pub portfolio_return: f64,
    pub risk_free_rate: f64,
    pub beta: f64,
}

pub struct TreynorRatioFormula;

impl Formula for TreynorRatioFormula {
    type Input = TreynorRatioInput;

    fn descriptor() -> CalculatorDescriptor {
        CalculatorDescriptor::new(
            ID,
            "Treynor Ratio Calculator",
            "Portfolio excess return per unit of systematic risk (beta)",
            Category::Finance,
        )
        .with_tags(&["treynor", "beta", "risk-adjusted return", "portfolio"])
        .with_example(
            CalculatorExample::new(
                "Market-like portfolio",
                "12% return, 2% risk-free rate, beta of 1.25",
                Inputs::new()
                    .with("portfolioReturn", 12.0)
                    .with("riskFreeRate", 2.0)
                    .with("beta", 1.25),
            )
            .expecting(8.0),
        )
        .with_example(
            CalculatorExample::new(
                "Underperformer",
                "Return below the risk-free rate",
                Inputs::new()
                    .with("portfolioReturn", 1.0)
                    .with("riskFreeRate", 3.0)
                    .with("beta", 0.8),
            ),
        )
    }

    fn decode(fields: &mut FieldReader<'_>) -> TreynorRatioInput {
        TreynorRatioInput {
            portfolio_return: fields.number("portfolioReturn"),
            risk_free_rate: fields.number("riskFreeRate"),
            beta: fields.number("beta"),
        }
    }

    fn validate_inputs(input: &TreynorRatioInput) -> ValidationResult {
        let mut v = ValidationResult::new();
        v.require_range("portfolioReturn", input.portfolio_return, -100.0, 1000.0);
        v.require_range("riskFreeRate", input.risk_free_rate, -100.0, 100.0);
        v.require_range("beta", input.beta, -10.0, 10.0);
        if input.beta < 0.0 {
            v.warn("Negative beta: the portfolio moves against the market, interpret the ratio with care");
        }
        v
    }

    fn calculate_result(input: &TreynorRatioInput) -> CalcResult<f64> {
        if input.beta == 0.0 {
            return Err(CalcError::computation(
                ID,
                "'beta' is zero, so the ratio is undefined",
            ));
        }
        Ok((input.portfolio_return - input.risk_free_rate) / input.beta)
    }

    fn generate_analysis(_input: &TreynorRatioInput, metrics: &Metrics) -> Analysis {
        let ratio = metrics.result;
        let risk_level = RiskLevel::descending(ratio, MEDIUM_BELOW, HIGH_BELOW);
        let recommendation = match risk_level {
            RiskLevel::Low => format!(
                "Treynor ratio of {ratio:.2}: strong reward for the market risk taken."
            ),
            RiskLevel::Medium => format!(
                "Treynor ratio of {ratio:.2}: positive but modest reward for market risk."
            ),
            RiskLevel::High => format!(
                "Treynor ratio of {ratio:.2}: the portfolio underperforms the risk-free rate for its market risk."
            ),
        };
        Analysis::new(recommendation, risk_level)
    }
}

pub fn register(registry: &Registry) -> CalcResult<()> {
    registry.register_formula::<TreynorRatioFormula>()
}
