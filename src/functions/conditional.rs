use crate::error::{FormulaError, FormulaResult};
use crate::functions::{Arity, Category, FunctionDef, FunctionKind, FunctionRegistry};
use formula_macros::formula_fn;
use log::debug;

pub const IFERROR_ARITY: Arity = Arity {
    min: 2,
    max: Some(2),
};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(FunctionDef {
        name: "IF",
        signature: "IF(condition, trueValue, falseValue)",
        description: "Conditional calculation",
        category: Category::Conditional,
        arity: IF_ARITY,
        kind: FunctionKind::Eager(if_then_else),
    });
    registry.register(FunctionDef {
        name: "IFERROR",
        signature: "IFERROR(value, errorValue)",
        description: "Return error value if calculation fails",
        category: Category::Conditional,
        arity: IFERROR_ARITY,
        kind: FunctionKind::Guarded(if_error),
    });
}

/// Any nonzero condition selects `when_true`.
#[formula_fn("IF")]
pub fn if_then_else(condition: f64, when_true: f64, when_false: f64) -> Result<f64, FormulaError> {
    Ok(if condition != 0.0 { when_true } else { when_false })
}

/// Evaluates `value`; if that fails for any formula reason, evaluates and
/// returns `errorValue` instead. The resolution budget is never swallowed.
pub fn if_error(
    args: &[&str],
    evaluate: &mut dyn FnMut(&str) -> FormulaResult<f64>,
) -> FormulaResult<f64> {
    let [value, fallback] = args else {
        return Err(FormulaError::argument(
            "IFERROR",
            format!("expected 2 argument(s), got {}", args.len()),
        ));
    };

    match evaluate(value) {
        Ok(result) => Ok(result),
        Err(err @ FormulaError::ExpressionTooComplex(_)) => Err(err),
        Err(err) => {
            debug!("IFERROR caught '{}' in '{}', using fallback", err, value);
            evaluate(fallback)
        }
    }
}
