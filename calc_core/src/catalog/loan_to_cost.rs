//! # Loan-to-Cost
//!
//! Construction loan as a share of total project cost:
//!
//! ```text
//! LTC    = loanAmount / totalProjectCost * 100
//! equity = totalProjectCost - loanAmount
//! ```
//!
//! Both inputs are currency amounts. The loan may not exceed the project
//! cost. The result is a **percentage**.
//!
//! Derived metrics: `equityContribution`, `equityPercent`, and
//! `leverageRatio` (loan per unit of equity) when equity is non-zero.
//!
//! ## Risk
//!
//! LTC above 80% is High, above 75% is Medium.

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, Metrics, RiskLevel};
use crate::calculator::{CalculatorDescriptor, CalculatorExample, Category, Formula};
use crate::errors::CalcResult;
use crate::inputs::{FieldReader, Inputs};
use crate::registry::Registry;
use crate::validation::ValidationResult;

pub const ID: &str = "loan-to-cost-calculator";

const MEDIUM_ABOVE: f64 = 75.0;
const HIGH_ABOVE: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanToCostInput {
    pub loan_amount: f64,
    pub total_project_cost: f64,
}

pub struct LoanToCostFormula;

impl Formula for LoanToCostFormula {
    type Input = LoanToCostInput;

    fn descriptor() -> CalculatorDescriptor {
        CalculatorDescriptor::new(
            ID,
            "Loan-to-Cost Calculator",
            "Construction loan amount as a percentage of total project cost",
            Category::Finance,
        )
        .with_tags(&["ltc", "construction loan", "real estate", "leverage"])
        .with_example(
            CalculatorExample::new(
                "Typical construction loan",
                "$700K loan on a $1M project",
                Inputs::new()
                    .with("loanAmount", 700_000.0)
                    .with("totalProjectCost", 1_000_000.0),
            )
            .expecting(70.0),
        )
        .with_example(
            CalculatorExample::new(
                "Highly leveraged",
                "$850K loan on a $1M project",
                Inputs::new()
                    .with("loanAmount", 850_000.0)
                    .with("totalProjectCost", 1_000_000.0),
            )
            .expecting(85.0),
        )
    }

    fn decode(fields: &mut FieldReader<'_>) -> LoanToCostInput {
        LoanToCostInput {
            loan_amount: fields.number("loanAmount"),
            total_project_cost: fields.number("totalProjectCost"),
        }
    }

    fn validate_inputs(input: &LoanToCostInput) -> ValidationResult {
        let mut v = ValidationResult::new();
        v.require_positive("loanAmount", input.loan_amount);
        v.require_positive("totalProjectCost", input.total_project_cost);
        v.require_at_most(
            "loanAmount",
            input.loan_amount,
            "totalProjectCost",
            input.total_project_cost,
        );
        v
    }

    fn calculate_result(input: &LoanToCostInput) -> CalcResult<f64> {
        Ok(input.loan_amount / input.total_project_cost * 100.0)
    }

    fn derive_metrics(input: &LoanToCostInput, result: f64) -> Metrics {
        let equity = input.total_project_cost - input.loan_amount;
        let metrics = Metrics::new(result)
            .with("equityContribution", equity)
            .with("equityPercent", equity / input.total_project_cost * 100.0);
        if equity > 0.0 {
            metrics.with("leverageRatio", input.loan_amount / equity)
        } else {
            metrics
        }
    }

    fn generate_analysis(_input: &LoanToCostInput, metrics: &Metrics) -> Analysis {
        let ltc = metrics.result;
        let equity = metrics.get("equityContribution").unwrap_or_default();
        let risk_level = RiskLevel::ascending(ltc, MEDIUM_ABOVE, HIGH_ABOVE);

        let recommendation = match risk_level {
            RiskLevel::Low => format!(
                "LTC of {ltc:.1}% with {equity:.0} of equity is within typical lender limits."
            ),
            RiskLevel::Medium => format!(
                "LTC of {ltc:.1}% is at the upper end of what most lenders accept; expect tighter terms."
            ),
            RiskLevel::High => format!(
                "LTC of {ltc:.1}% exceeds common lender limits; plan for more equity or mezzanine financing."
            ),
        };
        Analysis::new(recommendation, risk_level)
    }
}

pub fn register(registry: &Registry) -> CalcResult<()> {
    registry.register_formula::<LoanToCostFormula>()
}
