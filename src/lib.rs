pub mod ast;
pub mod constants;
pub mod engine;
pub mod error;
pub mod functions;
pub mod substitution;
pub mod validator;
pub mod variables;

pub use constants::Constant;
pub use engine::FormulaEngine;
pub use error::{FormulaError, FormulaResult};
pub use functions::{Category, FunctionDef};
pub use variables::{Bindings, Variable};

/// Evaluates `expression` with default engine options.
pub fn evaluate(expression: &str, bindings: &Bindings) -> FormulaResult<f64> {
    FormulaEngine::default().evaluate(expression, bindings)
}

pub fn validate(expression: &str, bindings: &Bindings) -> FormulaResult<()> {
    FormulaEngine::default().validate(expression, bindings)
}

pub fn evaluate_all(expressions: &[&str], bindings: &Bindings) -> Vec<FormulaResult<f64>> {
    FormulaEngine::default().evaluate_all(expressions, bindings)
}

/// Built-in functions in picker order.
pub fn list_functions() -> &'static [FunctionDef] {
    functions::list_functions()
}

pub fn list_constants() -> &'static [Constant] {
    constants::list_constants()
}
