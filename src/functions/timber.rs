use crate::error::FormulaError;
use crate::functions::{Arity, Category, Function, FunctionDef, FunctionKind, FunctionRegistry};
use formula_macros::formula_fn;

pub fn register(registry: &mut FunctionRegistry) {
    let defs: [(&str, &str, &str, Arity, Function); 4] = [
        (
            "TRUSS_COUNT",
            "TRUSS_COUNT(span, spacing)",
            "Calculate number of trusses needed",
            TRUSS_COUNT_ARITY,
            truss_count,
        ),
        (
            "LINEAR_METERS",
            "LINEAR_METERS(pieces, length)",
            "Calculate total linear meters",
            LINEAR_METERS_ARITY,
            linear_meters,
        ),
        (
            "BOARD_FEET",
            "BOARD_FEET(pieces, width, thickness, length)",
            "Calculate board feet",
            BOARD_FEET_ARITY,
            board_feet,
        ),
        (
            "CUBIC_METERS",
            "CUBIC_METERS(pieces, width, thickness, length)",
            "Calculate cubic meters",
            CUBIC_METERS_ARITY,
            cubic_meters,
        ),
    ];

    for (name, signature, description, arity, function) in defs {
        registry.register(FunctionDef {
            name,
            signature,
            description,
            category: Category::Timber,
            arity,
            kind: FunctionKind::Eager(function),
        });
    }
}

/// Trusses for a span: one per started spacing, plus the closing one.
#[formula_fn]
pub fn truss_count(span: f64, spacing: f64) -> Result<f64, FormulaError> {
    if spacing == 0.0 {
        return Err(FormulaError::DivisionByZero);
    }
    Ok((span / spacing).ceil() + 1.0)
}

#[formula_fn]
pub fn linear_meters(pieces: f64, length: f64) -> Result<f64, FormulaError> {
    Ok(pieces * length)
}

/// Inch dimensions; 144 cubic inches per board foot.
#[formula_fn]
pub fn board_feet(pieces: f64, width: f64, thickness: f64, length: f64) -> Result<f64, FormulaError> {
    Ok(pieces * width * thickness * length / 144.0)
}

/// Millimetre dimensions in, cubic metres out.
#[formula_fn]
pub fn cubic_meters(
    pieces: f64,
    width_mm: f64,
    thickness_mm: f64,
    length_mm: f64,
) -> Result<f64, FormulaError> {
    Ok(pieces * (width_mm / 1000.0) * (thickness_mm / 1000.0) * (length_mm / 1000.0))
}
