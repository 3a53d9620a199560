//! # Calculator Registry
//!
//! Maps calculator ids to calculators. A registry is an ordinary value:
//! drivers construct one (or use [`crate::catalog::builtin`]) and tests build
//! isolated ones.
//!
//! ## Lifecycle
//!
//! ```text
//! Empty --register--> Populated --freeze--> Frozen
//! ```
//!
//! - Duplicate ids are rejected; the first registration stays.
//! - Registration after `freeze()` is rejected.
//! - Entries are never removed.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::catalog::ebitda::EbitdaFormula;
//! use calc_core::inputs::Inputs;
//! use calc_core::registry::Registry;
//!
//! let registry = Registry::new();
//! registry.register_formula::<EbitdaFormula>().unwrap();
//!
//! let inputs = Inputs::new()
//!     .with("netIncome", 100.0)
//!     .with("interest", 20.0)
//!     .with("taxes", 30.0)
//!     .with("depreciation", 10.0)
//!     .with("amortization", 5.0);
//!
//! let output = registry.lookup("ebitda-calculator").unwrap().calculate(&inputs).unwrap();
//! assert_eq!(output.result, 165.0);
//!
//! assert!(registry.lookup("no-such-calculator").is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculator::{Calculator, CalculatorDescriptor, Category, Formula, FormulaCalculator};
use crate::errors::{CalcError, CalcResult};

/// Where a registry is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryState {
    /// Nothing registered yet
    Empty,
    /// Accepting registrations
    Populated,
    /// Read-only
    Frozen,
}

#[derive(Default)]
struct Entries {
    calculators: BTreeMap<String, Arc<dyn Calculator>>,
    frozen: bool,
}

/// Thread-safe id → calculator table.
///
/// Writers serialise on an internal lock; lookups hand out `Arc` clones so
/// calculations never run under the lock.
#[derive(Default)]
pub struct Registry {
    entries: RwLock<Entries>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a calculator under its descriptor id.
    ///
    /// # Errors
    ///
    /// - `InvalidDescriptor` when the id is empty or has surrounding whitespace
    /// - `DuplicateCalculator` when the id is taken
    /// - `RegistryFrozen` after [`Registry::freeze`]
    pub fn register(&self, calculator: Arc<dyn Calculator>) -> CalcResult<()> {
        let id = calculator.id().to_string();
        if id.is_empty() || id.trim() != id {
            return Err(CalcError::invalid_descriptor(
                id,
                "id must be non-empty with no surrounding whitespace",
            ));
        }

        let mut entries = self.entries.write();
        if entries.frozen {
            return Err(CalcError::RegistryFrozen { id });
        }
        if entries.calculators.contains_key(&id) {
            return Err(CalcError::DuplicateCalculator { id });
        }

        info!(calculator = %id, "Registered calculator");
        entries.calculators.insert(id, calculator);
        Ok(())
    }

    /// Register a [`Formula`] through the standard façade.
    pub fn register_formula<F: Formula>(&self) -> CalcResult<()> {
        self.register(Arc::new(FormulaCalculator::<F>::new()))
    }

    /// Look up a calculator by id.
    ///
    /// Unknown ids return `CalcError::CalculatorNotFound`.
    pub fn lookup(&self, id: &str) -> CalcResult<Arc<dyn Calculator>> {
        match self.get(id) {
            Some(calculator) => {
                debug!(calculator = id, "Calculator resolved");
                Ok(calculator)
            }
            None => {
                debug!(calculator = id, "Calculator not found");
                Err(CalcError::not_found(id))
            }
        }
    }

    /// Look up a calculator by id, `None` when absent.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Calculator>> {
        self.entries.read().calculators.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().calculators.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().calculators.is_empty()
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> Vec<String> {
        self.entries.read().calculators.keys().cloned().collect()
    }

    /// Descriptors of every registered calculator, sorted by id.
    pub fn descriptors(&self) -> Vec<CalculatorDescriptor> {
        self.entries
            .read()
            .calculators
            .values()
            .map(|c| c.descriptor().clone())
            .collect()
    }

    /// Calculators in one category, sorted by id.
    pub fn by_category(&self, category: Category) -> Vec<Arc<dyn Calculator>> {
        self.entries
            .read()
            .calculators
            .values()
            .filter(|c| c.descriptor().category == category)
            .cloned()
            .collect()
    }

    /// Stop accepting registrations. Idempotent.
    pub fn freeze(&self) {
        let mut entries = self.entries.write();
        if !entries.frozen {
            entries.frozen = true;
            info!(calculators = entries.calculators.len(), "Registry frozen");
        }
    }

    pub fn state(&self) -> RegistryState {
        let entries = self.entries.read();
        if entries.frozen {
            RegistryState::Frozen
        } else if entries.calculators.is_empty() {
            RegistryState::Empty
        } else {
            RegistryState::Populated
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("state", &self.state())
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analysis, Metrics, RiskLevel};
    use crate::inputs::{FieldReader, Inputs};
    use crate::validation::ValidationResult;

    struct Identity;

    impl Formula for Identity {
        type Input = f64;

        fn descriptor() -> CalculatorDescriptor {
            CalculatorDescriptor::new("identity", "Identity", "Returns x", Category::Math)
        }

        fn decode(fields: &mut FieldReader<'_>) -> f64 {
            fields.number("x")
        }

        fn validate_inputs(_input: &f64) -> ValidationResult {
            ValidationResult::new()
        }

        fn calculate_result(input: &f64) -> CalcResult<f64> {
            Ok(*input)
        }

        fn generate_analysis(_input: &f64, _metrics: &Metrics) -> Analysis {
            Analysis::new("Unchanged", RiskLevel::Low)
        }
    }

    /// Same formula under a caller-chosen id.
    struct Renamed(CalculatorDescriptor);

    impl Calculator for Renamed {
        fn descriptor(&self) -> &CalculatorDescriptor {
            &self.0
        }

        fn check(&self, inputs: &Inputs) -> ValidationResult {
            FormulaCalculator::<Identity>::new().check(inputs)
        }

        fn evaluate(&self, inputs: &Inputs) -> CalcResult<crate::analysis::Calculation> {
            FormulaCalculator::<Identity>::new().evaluate(inputs)
        }
    }

    fn renamed(id: &str) -> Arc<dyn Calculator> {
        Arc::new(Renamed(CalculatorDescriptor::new(id, id, "renamed", Category::Math)))
    }

    #[test]
    fn test_state_transitions() {
        let registry = Registry::new();
        assert_eq!(registry.state(), RegistryState::Empty);

        registry.register_formula::<Identity>().unwrap();
        assert_eq!(registry.state(), RegistryState::Populated);

        registry.freeze();
        registry.freeze();
        assert_eq!(registry.state(), RegistryState::Frozen);
    }

    #[test]
    fn test_duplicate_rejected_and_first_kept() {
        let registry = Registry::new();
        registry.register_formula::<Identity>().unwrap();

        let err = registry.register(renamed("identity")).unwrap_err();
        assert_eq!(err, CalcError::DuplicateCalculator { id: "identity".to_string() });
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("identity").unwrap().name(), "Identity");
    }

    #[test]
    fn test_frozen_rejects_registration() {
        let registry = Registry::new();
        registry.freeze();
        let err = registry.register_formula::<Identity>().unwrap_err();
        assert_eq!(err.error_code(), "REGISTRY_FROZEN");
        assert!(registry.is_empty());
        assert_eq!(registry.state(), RegistryState::Frozen);
    }

    #[test]
    fn test_invalid_ids_rejected() {
        let registry = Registry::new();
        assert_eq!(
            registry.register(renamed("")).unwrap_err().error_code(),
            "INVALID_DESCRIPTOR"
        );
        assert_eq!(
            registry.register(renamed(" padded ")).unwrap_err().error_code(),
            "INVALID_DESCRIPTOR"
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_unknown_is_typed_not_found() {
        let registry = Registry::new();
        let err = match registry.lookup("missing") {
            Ok(_) => panic!("lookup of unregistered id succeeded"),
            Err(err) => err,
        };
        assert_eq!(err, CalcError::not_found("missing"));
        assert!(registry.get("missing").is_none());
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn test_listing_is_sorted() {
        let registry = Registry::new();
        registry.register(renamed("zeta")).unwrap();
        registry.register(renamed("alpha")).unwrap();
        registry.register_formula::<Identity>().unwrap();

        assert_eq!(registry.ids(), vec!["alpha", "identity", "zeta"]);
        let ids: Vec<_> = registry.descriptors().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["alpha", "identity", "zeta"]);
        assert_eq!(registry.by_category(Category::Math).len(), 3);
        assert!(registry.by_category(Category::Legal).is_empty());
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Registry::new();
        std::thread::scope(|scope| {
            for t in 0..8 {
                let registry = &registry;
                scope.spawn(move || {
                    for i in 0..25 {
                        registry.register(renamed(&format!("calc-{t}-{i}"))).unwrap();
                    }
                });
            }
        });
        assert_eq!(registry.len(), 200);
        for id in registry.ids() {
            assert_eq!(registry.lookup(&id).unwrap().id(), id);
        }
    }

    #[test]
    fn test_concurrent_duplicate_registration_has_one_winner() {
        let registry = Registry::new();
        let successes = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.register(renamed("contended")).is_ok()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(false))
                .filter(|ok| *ok)
                .count()
        });
        assert_eq!(successes, 1);
        assert_eq!(registry.len(), 1);
    }
}
