//! # Built-in Calculators
//!
//! Each submodule is one calculator. Every module follows the same pattern:
//!
//! - `ID` - the registry key
//! - `*Input` - the typed input record (JSON-serializable, camelCase keys)
//! - `*Formula` - a zero-sized [`Formula`](crate::calculator::Formula)
//! - `register(&Registry)` - adds the calculator to a registry
//!
//! Rate conventions are not uniform across the catalog: some calculators take
//! fractions (`0.12`), others percentages (`5` for 5%). Each module states
//! which one it expects.
//!
//! ## Available Calculators
//!
//! - [`ebitda`] - earnings before interest, taxes, depreciation and amortization
//! - [`calmar_ratio`] - annualized return over maximum drawdown
//! - [`maximum_drawdown`] - largest peak-to-trough decline of a value series
//! - [`post_money_valuation`] - pre-money valuation plus new investment
//! - [`maintenance_savings`] - savings from a preventative maintenance program
//! - [`treynor_ratio`] - excess return per unit of systematic risk
//! - [`mortgage_payment`] - monthly payment on an amortizing loan
//! - [`loan_to_cost`] - construction loan as a share of project cost
//! - [`roi`] - return on investment

pub mod calmar_ratio;
pub mod ebitda;
pub mod loan_to_cost;
pub mod maintenance_savings;
pub mod maximum_drawdown;
pub mod mortgage_payment;
pub mod post_money_valuation;
pub mod roi;
pub mod treynor_ratio;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::errors::CalcResult;
use crate::registry::Registry;

/// Registration hooks for every built-in calculator.
const BUILTINS: [fn(&Registry) -> CalcResult<()>; 9] = [
    ebitda::register,
    calmar_ratio::register,
    maximum_drawdown::register,
    post_money_valuation::register,
    maintenance_savings::register,
    treynor_ratio::register,
    mortgage_payment::register,
    loan_to_cost::register,
    roi::register,
];

/// Register every built-in calculator into `registry`.
///
/// Fails on the first registration error (for example when `registry`
/// already holds one of the built-in ids).
pub fn register_all(registry: &Registry) -> CalcResult<()> {
    for register in BUILTINS {
        register(registry)?;
    }
    Ok(())
}

/// The process-wide catalog: every built-in calculator, frozen.
///
/// Built on first use. Tests that need to register their own calculators
/// should construct a fresh [`Registry`] instead.
///
/// ```rust
/// use calc_core::catalog;
/// use calc_core::registry::RegistryState;
///
/// let registry = catalog::builtin().unwrap();
/// assert_eq!(registry.state(), RegistryState::Frozen);
/// assert!(registry.contains("roi-calculator"));
/// ```
pub fn builtin() -> CalcResult<&'static Registry> {
    static BUILTIN: OnceCell<Registry> = OnceCell::new();

    BUILTIN.get_or_try_init(|| {
        let registry = Registry::new();
        register_all(&registry)?;
        registry.freeze();
        info!(calculators = registry.len(), "Built-in catalog ready");
        Ok(registry)
    })
}
