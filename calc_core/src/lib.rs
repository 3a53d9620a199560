//! # calc_core - Calculator Catalog Engine
//!
//! `calc_core` holds a catalog of single-purpose calculators (EBITDA, Calmar
//! ratio, mortgage payment, ...) behind one uniform contract. Every calculator
//! validates its inputs before it calculates, and every input and output is
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: formulas are pure functions of their inputs
//! - **JSON-First**: all public types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Explicit Registry**: lookups go through a constructed [`Registry`],
//!   so tests can build isolated ones
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::catalog;
//! use calc_core::inputs::Inputs;
//!
//! let registry = catalog::builtin().unwrap();
//! let calmar = registry.lookup("calmar-ratio-calculator").unwrap();
//!
//! let inputs = Inputs::new()
//!     .with("annualizedReturn", 0.12)
//!     .with("maxDrawdown", -0.20);
//!
//! assert!(calmar.validate(&inputs));
//! let output = calmar.calculate(&inputs).unwrap();
//! assert!((output.result - 0.6).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`inputs`] - Untyped input records and typed field decoding
//! - [`validation`] - Validation results and shared constraint checks
//! - [`analysis`] - Metrics, risk tiers and recommendations
//! - [`calculator`] - The calculator contract and the formula adapter
//! - [`registry`] - Id to calculator lookup table
//! - [`catalog`] - Built-in calculators and the default registry
//! - [`errors`] - Structured error types

pub mod analysis;
pub mod calculator;
pub mod catalog;
pub mod errors;
pub mod inputs;
pub mod registry;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use analysis::{Analysis, Calculation, CalculationOutput, Metrics, RiskLevel};
pub use calculator::{
    Calculator, CalculatorDescriptor, CalculatorExample, Category, Formula, FormulaCalculator,
};
pub use errors::{CalcError, CalcResult};
pub use inputs::{FieldReader, InputValue, Inputs};
pub use registry::{Registry, RegistryState};
pub use validation::ValidationResult;
