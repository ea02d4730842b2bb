use crate::error::FormulaError;
use crate::functions::{Arity, Category, Function, FunctionDef, FunctionKind, FunctionRegistry};
use formula_macros::formula_fn;

pub fn register(registry: &mut FunctionRegistry) {
    let defs: [(&str, &str, &str, Arity, Function); 8] = [
        ("ROUND", "ROUND(value, decimals)", "Round to specified decimal places", ROUND_ARITY, round),
        ("CEIL", "CEIL(value)", "Round up to nearest integer", CEIL_ARITY, ceil),
        ("FLOOR", "FLOOR(value)", "Round down to nearest integer", FLOOR_ARITY, floor),
        ("ABS", "ABS(value)", "Absolute value", ABS_ARITY, abs),
        ("MAX", "MAX(value1, value2, ...)", "Maximum value", MAX_ARITY, max),
        ("MIN", "MIN(value1, value2, ...)", "Minimum value", MIN_ARITY, min),
        ("SQRT", "SQRT(value)", "Square root", SQRT_ARITY, sqrt),
        ("POW", "POW(base, exponent)", "Power calculation", POW_ARITY, pow),
    ];

    for (name, signature, description, arity, function) in defs {
        registry.register(FunctionDef {
            name,
            signature,
            description,
            category: Category::Math,
            arity,
            kind: FunctionKind::Eager(function),
        });
    }
}

/// Rounds half away from zero at `decimals` places (default 0).
#[formula_fn]
pub fn round(value: f64, decimals: Option<f64>) -> Result<f64, FormulaError> {
    let factor = 10f64.powf(decimals.unwrap_or(0.0));
    Ok((value * factor).round() / factor)
}

#[formula_fn]
pub fn ceil(value: f64) -> Result<f64, FormulaError> {
    Ok(value.ceil())
}

#[formula_fn]
pub fn floor(value: f64) -> Result<f64, FormulaError> {
    Ok(value.floor())
}

#[formula_fn]
pub fn abs(value: f64) -> Result<f64, FormulaError> {
    Ok(value.abs())
}

#[formula_fn]
pub fn max(values: Vec<f64>) -> Result<f64, FormulaError> {
    Ok(values.into_iter().fold(f64::NEG_INFINITY, f64::max))
}

#[formula_fn]
pub fn min(values: Vec<f64>) -> Result<f64, FormulaError> {
    Ok(values.into_iter().fold(f64::INFINITY, f64::min))
}

#[formula_fn]
pub fn sqrt(value: f64) -> Result<f64, FormulaError> {
    if value < 0.0 {
        return Err(FormulaError::argument(
            "SQRT",
            format!("cannot take the square root of negative value {}", value),
        ));
    }
    Ok(value.sqrt())
}

#[formula_fn]
pub fn pow(base: f64, exponent: f64) -> Result<f64, FormulaError> {
    Ok(base.powf(exponent))
}
