use thiserror::Error;

pub type FormulaResult<T> = Result<T, FormulaError>;

/// Every way an evaluation or validation can fail.
///
/// Errors are plain data: they are returned, never panicked, and their
/// `Display` output is the reason shown to the person editing the formula.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// A `{name}` reference has no binding. The validator joins every missing
    /// name into a single comma separated list.
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,

    /// Stack underflow/overflow, illegal characters, empty input.
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Formula evaluation resulted in invalid value")]
    InvalidResult,

    #[error("Function {function} error: {detail}")]
    FunctionArgument { function: String, detail: String },

    /// Function resolution hit a limit: the pass cap or the IFERROR nesting depth.
    #[error("Expression too complex: function resolution limit of {0} exceeded")]
    ExpressionTooComplex(usize),
}

impl FormulaError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        FormulaError::MalformedExpression(detail.into())
    }

    pub(crate) fn argument(function: &str, detail: impl Into<String>) -> Self {
        FormulaError::FunctionArgument {
            function: function.to_string(),
            detail: detail.into(),
        }
    }
}
