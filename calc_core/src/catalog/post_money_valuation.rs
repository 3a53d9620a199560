//! # Post-Money Valuation
//!
//! Company value immediately after a funding round:
//!
//! ```text
//! postMoney        = preMoneyValuation + investmentAmount
//! investorOwnership = investmentAmount / postMoney * 100
//! ```
//!
//! Both inputs are currency amounts and must be positive.
//!
//! ## Risk
//!
//! Tiered on dilution, not on the valuation itself: investor ownership above
//! 25% is High, above 10% is Medium.

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, Metrics, RiskLevel};
use crate::calculator::{CalculatorDescriptor, CalculatorExample, Category, Formula};
use crate::errors::CalcResult;
use crate::inputs::{FieldReader, Inputs};
use crate::registry::Registry;
use crate::validation::ValidationResult;

pub const ID: &str = "post-money-valuation-calculator";

const OWNERSHIP: &str = "investorOwnershipPercent";
const MEDIUM_ABOVE: f64 = 10.0;
const HIGH_ABOVE: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMoneyValuationInput {
    pub pre_money_valuation: f64,
    pub investment_amount: f64,
}

pub struct PostMoneyValuationFormula;

impl Formula for PostMoneyValuationFormula {
    type Input = PostMoneyValuationInput;

    fn descriptor() -> CalculatorDescriptor {
        CalculatorDescriptor::new(
            ID,
            "Post-Money Valuation Calculator",
            "Company valuation after an investment round and the investor's resulting stake",
            Category::Business,
        )
        .with_tags(&["valuation", "startup", "venture capital", "dilution"])
        .with_example(
            CalculatorExample::new(
                "Series A",
                "$2M raised on an $8M pre-money valuation",
                Inputs::new()
                    .with("preMoneyValuation", 8_000_000.0)
                    .with("investmentAmount", 2_000_000.0),
            )
            .expecting(10_000_000.0),
        )
        .with_example(
            CalculatorExample::new(
                "Seed round",
                "$500K raised on a $4.5M pre-money valuation",
                Inputs::new()
                    .with("preMoneyValuation", 4_500_000.0)
                    .with("investmentAmount", 500_000.0),
            )
            .expecting(5_000_000.0),
        )
    }

    fn decode(fields: &mut FieldReader<'_>) -> PostMoneyValuationInput {
        PostMoneyValuationInput {
            pre_money_valuation: fields.number("preMoneyValuation"),
            investment_amount: fields.number("investmentAmount"),
        }
    }

    fn validate_inputs(input: &PostMoneyValuationInput) -> ValidationResult {
        let mut v = ValidationResult::new();
        v.require_positive("preMoneyValuation", input.pre_money_valuation);
        v.require_positive("investmentAmount", input.investment_amount);
        if v.is_valid() && input.investment_amount > input.pre_money_valuation {
            v.warn("Investor will own more than half of the company after this round");
        }
        v
    }

    fn calculate_result(input: &PostMoneyValuationInput) -> CalcResult<f64> {
        Ok(input.pre_money_valuation + input.investment_amount)
    }

    fn derive_metrics(input: &PostMoneyValuationInput, result: f64) -> Metrics {
        Metrics::new(result).with(OWNERSHIP, input.investment_amount / result * 100.0)
    }

    fn generate_analysis(_input: &PostMoneyValuationInput, metrics: &Metrics) -> Analysis {
        let ownership = metrics.get(OWNERSHIP).unwrap_or_default();
        let risk_level = RiskLevel::ascending(ownership, MEDIUM_ABOVE, HIGH_ABOVE);
        let post_money = metrics.result;

        let recommendation = match risk_level {
            RiskLevel::Low => format!(
                "Post-money valuation of {post_money:.0} gives the investor {ownership:.1}%; dilution is minimal."
            ),
            RiskLevel::Medium => format!(
                "Post-money valuation of {post_money:.0} gives the investor {ownership:.1}%; dilution is typical for a priced round."
            ),
            RiskLevel::High => format!(
                "Post-money valuation of {post_money:.0} gives the investor {ownership:.1}%; significant founder dilution, review the terms."
            ),
        };
        Analysis::new(recommendation, risk_level)
    }
}

pub fn register(registry: &Registry) -> CalcResult<()> {
    registry.register_formula::<PostMoneyValuationFormula>()
}
