use crate::error::{FormulaError, FormulaResult};
use std::collections::HashMap;

/// Caller supplied values, keyed by exact (case-sensitive) variable name.
pub type Bindings = HashMap<String, Variable>;

/// Enum to represent the value bound to a formula variable
#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    Number(f64),
    // Kept so text fields can be bound; arithmetic on them fails downstream.
    Text(String),
}

impl Variable {
    /// Helper to get a number, if this binding holds one
    pub fn as_number(&self) -> Option<f64> {
        if let Variable::Number(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Text inlined into the expression in place of a reference.
    ///
    /// Negative numbers are parenthesised so they survive being placed after
    /// an operator; text is double quoted, which no later stage accepts.
    /// A NaN or infinite number is `InvalidResult`.
    pub fn inline_text(&self) -> FormulaResult<String> {
        match self {
            Variable::Number(value) => inline_number(*value),
            Variable::Text(text) => Ok(format!("\"{}\"", text)),
        }
    }
}

/// `format_number` for caller-supplied values, which may not be finite.
pub(crate) fn inline_number(value: f64) -> FormulaResult<String> {
    if !value.is_finite() {
        return Err(FormulaError::InvalidResult);
    }
    Ok(format_number(value))
}

/// Decimal text for a number, parenthesised when negative.
pub(crate) fn format_number(value: f64) -> String {
    if value < 0.0 {
        format!("({})", value)
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

impl From<f64> for Variable {
    fn from(value: f64) -> Self {
        Variable::Number(value)
    }
}

impl From<i32> for Variable {
    fn from(value: i32) -> Self {
        Variable::Number(value as f64)
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Variable::Text(value.to_string())
    }
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Variable::Text(value)
    }
}
