//! # Calculator Inputs
//!
//! `Inputs` is the untyped record a driver hands to a calculator: a map from
//! field names (the catalog's camelCase keys, e.g. `netIncome`) to scalar
//! values. Each formula decodes it into its own typed input struct through a
//! [`FieldReader`], which collects one message per bad field instead of
//! stopping at the first.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::inputs::Inputs;
//!
//! let inputs = Inputs::new()
//!     .with("amount", 10000.0)
//!     .with("rate", 5.0)
//!     .with("time", 1.0);
//!
//! let json = serde_json::to_string(&inputs).unwrap();
//! assert_eq!(json, r#"{"amount":10000.0,"rate":5.0,"time":1.0}"#);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;

/// A single input value.
///
/// JSON maps naturally: booleans, numbers, strings and numeric arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Series(Vec<f64>),
}

impl InputValue {
    /// Short name of the variant, used in type-mismatch messages
    pub fn kind(&self) -> &'static str {
        match self {
            InputValue::Bool(_) => "boolean",
            InputValue::Number(_) => "number",
            InputValue::Text(_) => "text",
            InputValue::Series(_) => "list of numbers",
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Bool(b) => write!(f, "{b}"),
            InputValue::Number(n) => write!(f, "{n}"),
            InputValue::Text(s) => write!(f, "'{s}'"),
            InputValue::Series(values) => write!(f, "{values:?}"),
        }
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Number(value)
    }
}

impl From<i64> for InputValue {
    fn from(value: i64) -> Self {
        InputValue::Number(value as f64)
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        InputValue::Bool(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::Text(value)
    }
}

impl From<Vec<f64>> for InputValue {
    fn from(values: Vec<f64>) -> Self {
        InputValue::Series(values)
    }
}

impl From<&[f64]> for InputValue {
    fn from(values: &[f64]) -> Self {
        InputValue::Series(values.to_vec())
    }
}

/// Named input values for one calculation.
///
/// Ordered by field name so serialized inputs (and anything derived from
/// them) are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inputs {
    fields: BTreeMap<String, InputValue>,
}

impl Inputs {
    /// Create an empty input set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<InputValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&InputValue> {
        self.fields.get(name)
    }

    /// Get a numeric field, if present and numeric.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name) {
            Some(InputValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse inputs from a JSON object.
    ///
    /// ```rust
    /// use calc_core::inputs::Inputs;
    ///
    /// let inputs = Inputs::from_json_str(r#"{"portfolioValues": [100, 120, 90]}"#).unwrap();
    /// assert_eq!(inputs.len(), 1);
    /// ```
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Start decoding these inputs into a typed record.
    pub fn reader(&self) -> FieldReader<'_> {
        FieldReader::new(self)
    }
}

impl<K: Into<String>, V: Into<InputValue>> FromIterator<(K, V)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut inputs = Inputs::new();
        for (name, value) in iter {
            inputs.insert(name, value);
        }
        inputs
    }
}

/// Decodes fields out of [`Inputs`], accumulating one error per bad field.
///
/// Accessors always return a value so a formula can build its typed input in
/// one expression; placeholders returned for bad fields are never used
/// because [`FieldReader::finish`] rejects the whole record.
#[derive(Debug)]
pub struct FieldReader<'a> {
    inputs: &'a Inputs,
    errors: Vec<String>,
}

impl<'a> FieldReader<'a> {
    pub fn new(inputs: &'a Inputs) -> Self {
        Self {
            inputs,
            errors: Vec::new(),
        }
    }

    /// Required finite number.
    pub fn number(&mut self, name: &str) -> f64 {
        match self.inputs.get(name) {
            Some(_) => self.optional_number(name).unwrap_or(0.0),
            None => {
                self.missing(name);
                0.0
            }
        }
    }

    /// Optional finite number; absent fields yield `None`.
    pub fn optional_number(&mut self, name: &str) -> Option<f64> {
        let inputs = self.inputs;
        match inputs.get(name)? {
            InputValue::Number(n) if n.is_finite() => Some(*n),
            InputValue::Number(n) => {
                self.errors
                    .push(format!("'{name}' must be a finite number (got {n})"));
                None
            }
            other => {
                self.wrong_type(name, "a number", other);
                None
            }
        }
    }

    /// Required list of finite numbers.
    pub fn series(&mut self, name: &str) -> Vec<f64> {
        let inputs = self.inputs;
        match inputs.get(name) {
            Some(InputValue::Series(values)) => {
                if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
                    self.errors.push(format!(
                        "'{name}[{pos}]' must be a finite number (got {})",
                        values[pos]
                    ));
                }
                values.clone()
            }
            Some(other) => {
                self.wrong_type(name, "a list of numbers", other);
                Vec::new()
            }
            None => {
                self.missing(name);
                Vec::new()
            }
        }
    }

    /// Optional boolean flag.
    pub fn optional_flag(&mut self, name: &str) -> Option<bool> {
        let inputs = self.inputs;
        match inputs.get(name)? {
            InputValue::Bool(b) => Some(*b),
            other => {
                self.wrong_type(name, "a boolean", other);
                None
            }
        }
    }

    /// Optional enumerated string, parsed with `FromStr`.
    ///
    /// `allowed` is only used to build the error message.
    pub fn optional_choice<T: FromStr>(&mut self, name: &str, allowed: &[&str]) -> Option<T> {
        let inputs = self.inputs;
        match inputs.get(name)? {
            InputValue::Text(s) => match s.parse::<T>() {
                Ok(value) => Some(value),
                Err(_) => {
                    self.errors.push(format!(
                        "'{name}' must be one of {} (got '{s}')",
                        allowed.join(", ")
                    ));
                    None
                }
            },
            other => {
                self.wrong_type(name, "text", other);
                None
            }
        }
    }

    /// Finish decoding: the typed record if every field decoded, otherwise
    /// the collected messages.
    pub fn finish<T>(self, value: T) -> Result<T, Vec<String>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }

    fn missing(&mut self, name: &str) {
        self.errors.push(format!("'{name}' is required"));
    }

    fn wrong_type(&mut self, name: &str, expected: &str, got: &InputValue) {
        self.errors.push(format!(
            "'{name}' must be {expected} (got {} {got})",
            got.kind()
        ));
    }
}
