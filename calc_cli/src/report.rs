//! Text and JSON rendering for CLI output.
//!
//! JSON reports carry a `generated_at` UTC timestamp; text reports do not.

use std::fmt::Write;

use anyhow::Result;
use calc_core::{CalcError, Calculation, CalculatorDescriptor, ValidationResult};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

/// Output format for every subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    body: &'a T,
}

fn json<T: Serialize>(body: &T) -> Result<String> {
    let envelope = Envelope {
        generated_at: Utc::now(),
        body,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

#[derive(Serialize)]
struct Summary<'a> {
    id: &'a str,
    name: &'a str,
    category: calc_core::Category,
}

#[derive(Serialize)]
struct Listing<'a> {
    count: usize,
    calculators: Vec<Summary<'a>>,
}

pub fn list(descriptors: &[CalculatorDescriptor], format: Format) -> Result<String> {
    match format {
        Format::Json => json(&Listing {
            count: descriptors.len(),
            calculators: descriptors
                .iter()
                .map(|d| Summary {
                    id: &d.id,
                    name: &d.name,
                    category: d.category,
                })
                .collect(),
        }),
        Format::Text => {
            let width = descriptors.iter().map(|d| d.id.len()).max().unwrap_or(0);
            let mut out = String::new();
            for d in descriptors {
                writeln!(out, "{:<width$}  {:<12}  {}", d.id, d.category.as_str(), d.name)?;
            }
            writeln!(out, "{} calculator(s)", descriptors.len())?;
            Ok(out)
        }
    }
}

pub fn descriptor(descriptor: &CalculatorDescriptor, format: Format) -> Result<String> {
    if format == Format::Json {
        return json(descriptor);
    }

    let mut out = String::new();
    writeln!(out, "{} ({})", descriptor.name, descriptor.id)?;
    writeln!(out, "{}", descriptor.description)?;
    writeln!(out, "Category: {}", descriptor.category)?;
    if !descriptor.tags.is_empty() {
        writeln!(out, "Tags: {}", descriptor.tags.join(", "))?;
    }
    for example in &descriptor.examples {
        writeln!(out)?;
        writeln!(out, "Example '{}': {}", example.name, example.description)?;
        writeln!(out, "  inputs: {}", serde_json::to_string(&example.inputs)?)?;
        if let Some(expected) = example.expected_result {
            writeln!(out, "  expected result: {expected}")?;
        }
    }
    Ok(out)
}

pub fn calculation(calc: &Calculation, format: Format) -> Result<String> {
    if format == Format::Json {
        return json(calc);
    }

    let mut out = String::new();
    writeln!(out, "Result: {}", calc.metrics.result)?;
    writeln!(out, "Risk level: {}", calc.analysis.risk_level)?;
    writeln!(out, "Recommendation: {}", calc.analysis.recommendation)?;
    for (name, value) in &calc.metrics.derived {
        writeln!(out, "  {name}: {value}")?;
    }
    for warning in &calc.warnings {
        writeln!(out, "Warning: {warning}")?;
    }
    Ok(out)
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    calculator_id: &'a str,
    is_valid: bool,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

pub fn validation(id: &str, result: &ValidationResult, format: Format) -> Result<String> {
    if format == Format::Json {
        return json(&ValidationReport {
            calculator_id: id,
            is_valid: result.is_valid(),
            result,
        });
    }

    let mut out = String::new();
    if result.is_valid() {
        writeln!(out, "Inputs are valid for '{id}'")?;
    } else {
        writeln!(out, "Inputs are invalid for '{id}':")?;
    }
    for error in result.errors() {
        writeln!(out, "  error: {error}")?;
    }
    for warning in result.warnings() {
        writeln!(out, "  warning: {warning}")?;
    }
    Ok(out)
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    code: &'static str,
    message: String,
    error: &'a CalcError,
}

/// Render a calculator error. Text output lists each validation message on
/// its own line.
pub fn error(err: &CalcError, format: Format) -> Result<String> {
    if format == Format::Json {
        return json(&ErrorReport {
            code: err.error_code(),
            message: err.to_string(),
            error: err,
        });
    }

    let mut out = String::new();
    match err.validation_errors() {
        Some(errors) => {
            writeln!(out, "error: invalid inputs")?;
            for message in errors {
                writeln!(out, "  {message}")?;
            }
        }
        None => writeln!(out, "error: {err}")?,
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::{Analysis, Metrics, RiskLevel};

    fn sample() -> Calculation {
        Calculation {
            calculator_id: "roi-calculator".to_string(),
            metrics: Metrics::new(25.0).with("annualizedRoiPercent", 4.5),
            analysis: Analysis::new("ROI of 25.00% is a strong return.", RiskLevel::Low),
            warnings: vec!["check inputs".to_string()],
        }
    }

    #[test]
    fn test_calculation_text() {
        let text = calculation(&sample(), Format::Text).unwrap();
        assert!(text.starts_with("Result: 25\n"));
        assert!(text.contains("Risk level: Low"));
        assert!(text.contains("  annualizedRoiPercent: 4.5"));
        assert!(text.contains("Warning: check inputs"));
    }

    #[test]
    fn test_json_has_timestamp_and_body() {
        let out = calculation(&sample(), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["generated_at"].is_string());
        assert_eq!(value["calculator_id"], "roi-calculator");
        assert_eq!(value["analysis"]["risk_level"], "Low");
    }

    #[test]
    fn test_validation_json() {
        let result = ValidationResult::from_errors(vec!["'x' is required".to_string()]);
        let out = validation("demo", &result, Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["is_valid"], false);
        assert_eq!(value["errors"][0], "'x' is required");
    }

    #[test]
    fn test_error_text_lists_messages() {
        let err = CalcError::validation("demo", vec!["'a' is required".into(), "'b' is required".into()]);
        let text = error(&err, Format::Text).unwrap();
        assert_eq!(text, "error: invalid inputs\n  'a' is required\n  'b' is required\n");

        let json_out = error(&CalcError::not_found("nope"), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json_out).unwrap();
        assert_eq!(value["code"], "CALCULATOR_NOT_FOUND");
        assert_eq!(value["error"]["type"], "CalculatorNotFound");
    }

    #[test]
    fn test_list_text() {
        let descriptors = vec![CalculatorDescriptor::new(
            "roi-calculator",
            "ROI Calculator",
            "Return on investment",
            calc_core::Category::Business,
        )];
        let text = list(&descriptors, Format::Text).unwrap();
        assert!(text.contains("roi-calculator  business      ROI Calculator"));
        assert!(text.ends_with("1 calculator(s)\n"));
    }
}
