//! # Calculator Façade
//!
//! Every catalog entry exposes the same contract, [`Calculator`]:
//! `id`, `name`, `description`, `calculate(inputs)` and `validate(inputs)`.
//!
//! Formula modules do not implement that trait by hand. They implement
//! [`Formula`] on a zero-sized type (decode, validate, calculate, analyse)
//! and [`FormulaCalculator`] turns any `Formula` into a `Calculator`.
//!
//! ## Pipeline
//!
//! ```text
//! Inputs --decode--> F::Input --validate_inputs--> (errors? -> CalcError::Validation)
//!        --calculate_result--> f64 --derive_metrics--> Metrics
//!        --generate_analysis--> Analysis
//! ```
//!
//! The formula is never invoked when decoding or validation fails.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::{Analysis, Calculation, CalculationOutput, Metrics};
use crate::errors::{CalcError, CalcResult};
use crate::inputs::{FieldReader, Inputs};
use crate::validation::ValidationResult;

/// Top-level catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Career,
    Construction,
    Finance,
    Health,
    Legal,
    Lifestyle,
    Math,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Business,
        Category::Career,
        Category::Construction,
        Category::Finance,
        Category::Health,
        Category::Legal,
        Category::Lifestyle,
        Category::Math,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Career => "career",
            Category::Construction => "construction",
            Category::Finance => "finance",
            Category::Health => "health",
            Category::Legal => "legal",
            Category::Lifestyle => "lifestyle",
            Category::Math => "math",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// A named, documented input set shipped with a calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorExample {
    pub name: String,
    pub description: String,
    pub inputs: Inputs,

    /// Documented result for these inputs, when the example states one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<f64>,
}

impl CalculatorExample {
    pub fn new(name: impl Into<String>, description: impl Into<String>, inputs: Inputs) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            inputs,
            expected_result: None,
        }
    }

    pub fn expecting(mut self, result: f64) -> Self {
        self.expected_result = Some(result);
        self
    }
}

/// Metadata for one calculator. `id` is the registry key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub examples: Vec<CalculatorExample>,
}

impl CalculatorDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category,
            tags: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().map(|t| t.to_string()));
        self
    }

    pub fn with_example(mut self, example: CalculatorExample) -> Self {
        self.examples.push(example);
        self
    }

    /// Find an example by name (case-insensitive).
    pub fn example(&self, name: &str) -> Option<&CalculatorExample> {
        self.examples
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

/// The per-calculator behaviour: decode, validate, calculate, analyse.
///
/// Implemented on zero-sized marker types; all functions are pure.
pub trait Formula: Send + Sync + 'static {
    /// Typed input record
    type Input;

    fn descriptor() -> CalculatorDescriptor;

    /// Pull the typed record out of raw inputs. Bad fields are recorded on
    /// the reader, which the façade turns into validation errors.
    fn decode(fields: &mut FieldReader<'_>) -> Self::Input;

    fn validate_inputs(input: &Self::Input) -> ValidationResult;

    /// Headline number. Undefined math must return `CalcError::Computation`.
    fn calculate_result(input: &Self::Input) -> CalcResult<f64>;

    /// Wrap the result with any secondary values the analysis needs.
    fn derive_metrics(_input: &Self::Input, result: f64) -> Metrics {
        Metrics::new(result)
    }

    fn generate_analysis(input: &Self::Input, metrics: &Metrics) -> Analysis;
}

/// Uniform contract every registered calculator exposes.
pub trait Calculator: Send + Sync {
    fn descriptor(&self) -> &CalculatorDescriptor;

    fn id(&self) -> &str {
        &self.descriptor().id
    }

    fn name(&self) -> &str {
        &self.descriptor().name
    }

    fn description(&self) -> &str {
        &self.descriptor().description
    }

    /// Run the validator and return every message.
    fn check(&self, inputs: &Inputs) -> ValidationResult;

    /// Validate then calculate, returning the full record.
    fn evaluate(&self, inputs: &Inputs) -> CalcResult<Calculation>;

    /// Validate then calculate, returning `{result, analysis}`.
    fn calculate(&self, inputs: &Inputs) -> CalcResult<CalculationOutput> {
        self.evaluate(inputs).map(CalculationOutput::from)
    }

    /// Equivalent to `check(inputs).is_valid()`.
    fn validate(&self, inputs: &Inputs) -> bool {
        self.check(inputs).is_valid()
    }
}

/// Adapter turning a [`Formula`] into a [`Calculator`].
pub struct FormulaCalculator<F: Formula> {
    descriptor: CalculatorDescriptor,
    _formula: PhantomData<fn() -> F>,
}

impl<F: Formula> FormulaCalculator<F> {
    pub fn new() -> Self {
        Self {
            descriptor: F::descriptor(),
            _formula: PhantomData,
        }
    }

    fn decode(&self, inputs: &Inputs) -> Result<F::Input, Vec<String>> {
        let mut reader = inputs.reader();
        let input = F::decode(&mut reader);
        reader.finish(input)
    }
}

impl<F: Formula> Default for FormulaCalculator<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Formula> fmt::Debug for FormulaCalculator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaCalculator")
            .field("id", &self.descriptor.id)
            .finish()
    }
}

impl<F: Formula> Calculator for FormulaCalculator<F> {
    fn descriptor(&self) -> &CalculatorDescriptor {
        &self.descriptor
    }

    fn check(&self, inputs: &Inputs) -> ValidationResult {
        match self.decode(inputs) {
            Ok(input) => F::validate_inputs(&input),
            Err(errors) => ValidationResult::from_errors(errors),
        }
    }

    fn evaluate(&self, inputs: &Inputs) -> CalcResult<Calculation> {
        let id = self.id();

        let input = self
            .decode(inputs)
            .map_err(|errors| CalcError::validation(id, errors))
            .and_then(|input| {
                let warnings = F::validate_inputs(&input).into_result(id)?;
                Ok((input, warnings))
            });
        let (input, warnings) = match input {
            Ok(ok) => ok,
            Err(err) => {
                debug!(
                    calculator = id,
                    errors = err.validation_errors().map_or(0, |e| e.len()),
                    "Inputs rejected"
                );
                return Err(err);
            }
        };

        let result = F::calculate_result(&input).map_err(|err| {
            warn!(calculator = id, error = %err, "Formula failed");
            err
        })?;

        if !result.is_finite() {
            warn!(calculator = id, result, "Formula produced a non-finite result");
            return Err(CalcError::computation(id, "'result' is not a finite number"));
        }

        let mut metrics = F::derive_metrics(&input, result);
        for name in metrics.drop_non_finite() {
            debug!(calculator = id, metric = %name, "Dropped non-finite derived value");
        }

        let analysis = F::generate_analysis(&input, &metrics);
        debug!(
            calculator = id,
            result = metrics.result,
            risk = %analysis.risk_level,
            "Calculation complete"
        );

        Ok(Calculation {
            calculator_id: id.to_string(),
            metrics,
            analysis,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RiskLevel;

    /// Doubles `value`; `value` must be non-negative.
    struct Doubler;

    impl Formula for Doubler {
        type Input = f64;

        fn descriptor() -> CalculatorDescriptor {
            CalculatorDescriptor::new("doubler", "Doubler", "Doubles a value", Category::Math)
                .with_tags(&["test"])
        }

        fn decode(fields: &mut FieldReader<'_>) -> f64 {
            fields.number("value")
        }

        fn validate_inputs(input: &f64) -> ValidationResult {
            let mut v = ValidationResult::new();
            v.require_non_negative("value", *input);
            v.warn_above("value", *input, 1000.0, "large value");
            v
        }

        fn calculate_result(input: &f64) -> CalcResult<f64> {
            Ok(input * 2.0)
        }

        fn generate_analysis(_input: &f64, metrics: &Metrics) -> Analysis {
            Analysis::new(
                format!("Doubled to {}", metrics.result),
                RiskLevel::ascending(metrics.result, 10.0, 100.0),
            )
        }
    }

    /// Panics if the formula ever runs; `value` must be positive.
    struct Guarded;

    impl Formula for Guarded {
        type Input = f64;

        fn descriptor() -> CalculatorDescriptor {
            CalculatorDescriptor::new("guarded", "Guarded", "Never calculates", Category::Math)
        }

        fn decode(fields: &mut FieldReader<'_>) -> f64 {
            fields.number("value")
        }

        fn validate_inputs(input: &f64) -> ValidationResult {
            let mut v = ValidationResult::new();
            v.require_positive("value", *input);
            v
        }

        fn calculate_result(_input: &f64) -> CalcResult<f64> {
            panic!("formula invoked despite invalid inputs");
        }

        fn generate_analysis(_input: &f64, _metrics: &Metrics) -> Analysis {
            panic!("analysis invoked despite invalid inputs");
        }
    }

    /// Always overflows to infinity.
    struct Overflow;

    impl Formula for Overflow {
        type Input = ();

        fn descriptor() -> CalculatorDescriptor {
            CalculatorDescriptor::new("overflow", "Overflow", "Overflows", Category::Math)
        }

        fn decode(_fields: &mut FieldReader<'_>) {}

        fn validate_inputs(_input: &()) -> ValidationResult {
            ValidationResult::new()
        }

        fn calculate_result(_input: &()) -> CalcResult<f64> {
            Ok(f64::MAX * 2.0)
        }

        fn generate_analysis(_input: &(), _metrics: &Metrics) -> Analysis {
            Analysis::new("unreachable", RiskLevel::High)
        }
    }

    #[test]
    fn test_facade_metadata() {
        let calc = FormulaCalculator::<Doubler>::new();
        assert_eq!(calc.id(), "doubler");
        assert_eq!(calc.name(), "Doubler");
        assert_eq!(calc.description(), "Doubles a value");
        assert_eq!(calc.descriptor().tags, vec!["test".to_string()]);
    }

    #[test]
    fn test_calculate_returns_result_and_recommendation() {
        let calc = FormulaCalculator::<Doubler>::new();
        let output = calc.calculate(&Inputs::new().with("value", 21.0)).unwrap();
        assert_eq!(output.result, 42.0);
        assert_eq!(output.analysis, "Doubled to 42");

        let full = calc.evaluate(&Inputs::new().with("value", 21.0)).unwrap();
        assert_eq!(full.risk_level(), RiskLevel::Medium);
        assert_eq!(full.calculator_id, "doubler");
    }

    #[test]
    fn test_invalid_inputs_never_reach_formula() {
        let calc = FormulaCalculator::<Guarded>::new();

        let negative = Inputs::new().with("value", -1.0);
        assert!(!calc.validate(&negative));
        let err = calc.calculate(&negative).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert_eq!(
            err.validation_errors().unwrap(),
            ["'value' must be greater than 0 (got -1)"]
        );

        let missing = Inputs::new();
        assert!(!calc.validate(&missing));
        let err = calc.calculate(&missing).unwrap_err();
        assert_eq!(err.validation_errors().unwrap(), ["'value' is required"]);

        let wrong_type = Inputs::new().with("value", "x");
        let err = calc.evaluate(&wrong_type).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap(),
            ["'value' must be a number (got text 'x')"]
        );
    }

    #[test]
    fn test_warnings_are_reported_not_fatal() {
        let calc = FormulaCalculator::<Doubler>::new();
        let inputs = Inputs::new().with("value", 5000.0);
        assert!(calc.validate(&inputs));
        assert_eq!(calc.check(&inputs).warnings().len(), 1);

        let full = calc.evaluate(&inputs).unwrap();
        assert_eq!(full.result(), 10000.0);
        assert_eq!(full.warnings, vec!["'value' is above 1000: large value".to_string()]);
    }

    #[test]
    fn test_non_finite_result_is_computation_error() {
        let calc = FormulaCalculator::<Overflow>::new();
        let err = calc.calculate(&Inputs::new()).unwrap_err();
        assert_eq!(
            err,
            CalcError::computation("overflow", "'result' is not a finite number")
        );
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Finance".parse::<Category>(), Ok(Category::Finance));
        assert!("astrology".parse::<Category>().is_err());
        assert_eq!(serde_json::to_string(&Category::Legal).unwrap(), "\"legal\"");
    }

    #[test]
    fn test_descriptor_example_lookup() {
        let descriptor = Doubler::descriptor().with_example(
            CalculatorExample::new("Small", "A small value", Inputs::new().with("value", 2.0))
                .expecting(4.0),
        );
        assert_eq!(descriptor.example("small").and_then(|e| e.expected_result), Some(4.0));
        assert!(descriptor.example("missing").is_none());
    }
}
