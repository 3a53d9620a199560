//! # Mortgage Payment
//!
//! Monthly payment on a fixed-rate mortgage.
//!
//! ```text
//! r = interestRate / 100 / 12        (monthly rate)
//! n = loanTerm * 12                  (number of payments)
//!
//! principal_interest : M = L * r * (1 + r)^n / ((1 + r)^n - 1)
//!                      M = L / n                      when r = 0
//! interest_only      : M = L * r
//! ```
//!
//! `interestRate` is an annual **percentage** (`4.5` for 4.5%); `loanTerm` is
//! in years. `paymentType` is optional and defaults to `principal_interest`.
//!
//! Derived metrics: `totalPayments` over the full term and `totalInterest`
//! (for interest-only loans the principal is still owed at the end).
//!
//! ## Risk
//!
//! Payment above 5,000 is High, above 2,000 is Medium.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, Metrics, RiskLevel};
use crate::calculator::{CalculatorDescriptor, CalculatorExample, Category, Formula};
use crate::errors::CalcResult;
use crate::inputs::{FieldReader, Inputs};
use crate::registry::Registry;
use crate::validation::ValidationResult;

pub const ID: &str = "mortgage-payment-calculator";

const MEDIUM_ABOVE: f64 = 2_000.0;
const HIGH_ABOVE: f64 = 5_000.0;
const LONG_TERM_YEARS: f64 = 40.0;

/// How each monthly payment is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Fully amortizing
    #[default]
    PrincipalInterest,
    /// Interest only; balance due at maturity
    InterestOnly,
}

impl PaymentType {
    pub const NAMES: [&'static str; 2] = ["principal_interest", "interest_only"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::PrincipalInterest => "principal_interest",
            PaymentType::InterestOnly => "interest_only",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "principal_interest" => Ok(PaymentType::PrincipalInterest),
            "interest_only" => Ok(PaymentType::InterestOnly),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgagePaymentInput {
    pub loan_amount: f64,
    /// Annual percent
    pub interest_rate: f64,
    /// Years
    pub loan_term: f64,
    #[serde(default)]
    pub payment_type: PaymentType,
}

impl MortgagePaymentInput {
    fn monthly_rate(&self) -> f64 {
        self.interest_rate / 100.0 / 12.0
    }

    fn payment_count(&self) -> f64 {
        self.loan_term * 12.0
    }
}

pub struct MortgagePaymentFormula;

impl Formula for MortgagePaymentFormula {
    type Input = MortgagePaymentInput;

    fn descriptor() -> CalculatorDescriptor {
        CalculatorDescriptor::new(
            ID,
            "Mortgage Payment Calculator",
            "Monthly payment and total interest on a fixed-rate mortgage",
            Category::Finance,
        )
        .with_tags(&["mortgage", "loan", "amortization", "real estate"])
        .with_example(CalculatorExample::new(
            "30-year fixed",
            "$300,000 at 4.5% over 30 years",
            Inputs::new()
                .with("loanAmount", 300_000.0)
                .with("interestRate", 4.5)
                .with("loanTerm", 30.0),
        ))
        .with_example(
            CalculatorExample::new(
                "Interest-free family loan",
                "$120,000 at 0% over 10 years",
                Inputs::new()
                    .with("loanAmount", 120_000.0)
                    .with("interestRate", 0.0)
                    .with("loanTerm", 10.0),
            )
            .expecting(1_000.0),
        )
        .with_example(CalculatorExample::new(
            "Interest only",
            "$500,000 interest-only at 6%",
            Inputs::new()
                .with("loanAmount", 500_000.0)
                .with("interestRate", 6.0)
                .with("loanTerm", 10.0)
                .with("paymentType", "interest_only"),
        ))
    }

    fn decode(fields: &mut FieldReader<'_>) -> MortgagePaymentInput {
        MortgagePaymentInput {
            loan_amount: fields.number("loanAmount"),
            interest_rate: fields.number("interestRate"),
            loan_term: fields.number("loanTerm"),
            payment_type: fields
                .optional_choice("paymentType", &PaymentType::NAMES)
                .unwrap_or_default(),
        }
    }

    fn validate_inputs(input: &MortgagePaymentInput) -> ValidationResult {
        let mut v = ValidationResult::new();
        v.require_positive("loanAmount", input.loan_amount);
        v.require_range("interestRate", input.interest_rate, 0.0, 30.0);
        v.require_range("loanTerm", input.loan_term, 1.0, 50.0);
        v.warn_above(
            "loanTerm",
            input.loan_term,
            LONG_TERM_YEARS,
            "long terms greatly increase total interest",
        );
        v
    }

    fn calculate_result(input: &MortgagePaymentInput) -> CalcResult<f64> {
        let r = input.monthly_rate();
        let n = input.payment_count();
        let principal = input.loan_amount;

        let payment = match input.payment_type {
            PaymentType::InterestOnly => principal * r,
            PaymentType::PrincipalInterest => {
                if r == 0.0 {
                    principal / n
                } else {
                    // (1 + r)^n - 1 without cancellation for tiny rates
                    let growth_m1 = (n * r.ln_1p()).exp_m1();
                    principal * r * (growth_m1 + 1.0) / growth_m1
                }
            }
        };
        Ok(payment)
    }

    fn derive_metrics(input: &MortgagePaymentInput, result: f64) -> Metrics {
        let total_payments = result * input.payment_count();
        let total_interest = match input.payment_type {
            PaymentType::PrincipalInterest => total_payments - input.loan_amount,
            PaymentType::InterestOnly => total_payments,
        };
        Metrics::new(result)
            .with("totalPayments", total_payments)
            .with("totalInterest", total_interest)
    }

    fn generate_analysis(input: &MortgagePaymentInput, metrics: &Metrics) -> Analysis {
        let payment = metrics.result;
        let risk_level = RiskLevel::ascending(payment, MEDIUM_ABOVE, HIGH_ABOVE);
        let interest = metrics.get("totalInterest").unwrap_or_default();

        let mut recommendation = format!(
            "Monthly payment of {payment:.2} with {interest:.2} total interest over {} years.",
            input.loan_term
        );
        recommendation.push_str(match risk_level {
            RiskLevel::Low => " The payment is manageable for most household budgets.",
            RiskLevel::Medium => " Keep housing costs under roughly 28% of gross income.",
            RiskLevel::High => {
                " This is a large payment; confirm affordability or consider a smaller loan."
            }
        });
        if input.payment_type == PaymentType::InterestOnly {
            recommendation.push_str(" The full principal is still due at the end of the term.");
        }
        Analysis::new(recommendation, risk_level)
    }
}

pub fn register(registry: &Registry) -> CalcResult<()> {
    registry.register_formula::<MortgagePaymentFormula>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Calculator, FormulaCalculator};

    fn calculator() -> FormulaCalculator<MortgagePaymentFormula> {
        FormulaCalculator::new()
    }

    fn inputs(loan: f64, rate: f64, term: f64) -> Inputs {
        Inputs::new()
            .with("loanAmount", loan)
            .with("interestRate", rate)
            .with("loanTerm", term)
    }

    #[test]
    fn test_amortized_payment() {
        let calc = calculator().evaluate(&inputs(300_000.0, 4.5, 30.0)).unwrap();
        assert!((calc.result() - 1520.06).abs() < 0.01);
        assert_eq!(calc.risk_level(), RiskLevel::Low);

        let interest = calc.metrics.get("totalInterest").unwrap();
        assert!((interest - 247_220.13).abs() < 1.0);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let calc = calculator().evaluate(&inputs(120_000.0, 0.0, 10.0)).unwrap();
        assert_eq!(calc.result(), 1000.0);
        assert_eq!(calc.metrics.get("totalInterest"), Some(0.0));
    }

    #[test]
    fn test_tiny_rates_approach_straight_line() {
        for rate in [1e-15, 1e-12, 1e-10, 1e-8] {
            let calc = calculator().evaluate(&inputs(120_000.0, rate, 10.0)).unwrap();
            assert!(
                (calc.result() - 1000.0).abs() < 1e-6,
                "rate {rate}: payment {}",
                calc.result()
            );
        }
    }

    #[test]
    fn test_payment_rises_with_rate_near_zero() {
        let payments: Vec<f64> = [0.0, 1e-12, 1e-10, 1e-8, 1e-6, 1e-4]
            .into_iter()
            .map(|rate| calculator().evaluate(&inputs(120_000.0, rate, 10.0)).unwrap().result())
            .collect();
        for pair in payments.windows(2) {
            assert!(pair[0] <= pair[1], "{payments:?}");
        }
    }

    #[test]
    fn test_interest_only() {
        let calc = calculator()
            .evaluate(&inputs(500_000.0, 6.0, 10.0).with("paymentType", "interest_only"))
            .unwrap();
        assert!((calc.result() - 2500.0).abs() < 1e-6);
        assert_eq!(calc.risk_level(), RiskLevel::Medium);
        assert!(calc.analysis.recommendation.contains("principal is still due"));
    }

    #[test]
    fn test_high_payment_tier() {
        let calc = calculator().evaluate(&inputs(1_000_000.0, 7.0, 15.0)).unwrap();
        assert_eq!(calc.risk_level(), RiskLevel::High);
    }

    #[test]
    fn test_unknown_payment_type() {
        let err = calculator()
            .calculate(&inputs(300_000.0, 4.5, 30.0).with("paymentType", "balloon"))
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap(),
            ["'paymentType' must be one of principal_interest, interest_only (got 'balloon')"]
        );
    }

    #[test]
    fn test_validation_messages() {
        let err = calculator().calculate(&inputs(-5.0, 45.0, 0.5)).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap(),
            [
                "'loanAmount' must be greater than 0 (got -5)",
                "'interestRate' must be between 0 and 30 (got 45)",
                "'loanTerm' must be between 1 and 50 (got 0.5)",
            ]
        );
    }

    #[test]
    fn test_long_term_warns() {
        let calc = calculator().evaluate(&inputs(300_000.0, 4.5, 45.0)).unwrap();
        assert_eq!(
            calc.warnings,
            vec!["'loanTerm' is above 40: long terms greatly increase total interest".to_string()]
        );
    }
}
