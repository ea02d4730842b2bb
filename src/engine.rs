use crate::error::{FormulaError, FormulaResult};
use crate::functions::{Resolver, DEFAULT_MAX_PASSES};
use crate::substitution::{substitute_constants, substitute_variables};
use crate::validator;
use crate::variables::Bindings;
use log::debug;
use rayon::prelude::*;

/// Evaluates formulas against caller-supplied bindings.
///
/// The engine only holds options; every call is independent, so one engine
/// can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormulaEngine {
    max_passes: usize,
}

impl FormulaEngine {
    pub fn new() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Caps how many function calls one evaluation may resolve before it
    /// fails with `ExpressionTooComplex`.
    pub fn with_max_passes(max_passes: usize) -> Self {
        Self { max_passes }
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Substitutes variables and constants, resolves function calls, then
    /// evaluates what is left as arithmetic.
    pub fn evaluate(&self, expression: &str, bindings: &Bindings) -> FormulaResult<f64> {
        if expression.trim().is_empty() {
            return Err(FormulaError::malformed("expression is empty"));
        }

        let substituted = substitute_variables(expression, bindings)?;
        let substituted = substitute_constants(&substituted);

        let mut resolver = Resolver::new(self.max_passes);
        let result = resolver.evaluate(&substituted)?;

        debug!(
            "Evaluated '{}' -> {} ({} function call(s))",
            expression,
            result,
            resolver.passes()
        );
        Ok(result)
    }

    pub fn validate(&self, expression: &str, bindings: &Bindings) -> FormulaResult<()> {
        validator::validate_with(self, expression, bindings)
    }

    /// Evaluates each expression against the same bindings in parallel.
    /// Results come back in input order; one failure never affects another.
    pub fn evaluate_all(&self, expressions: &[&str], bindings: &Bindings) -> Vec<FormulaResult<f64>> {
        expressions
            .par_iter()
            .map(|expression| self.evaluate(expression, bindings))
            .collect()
    }
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::Variable;

    fn bindings(pairs: &[(&str, Variable)]) -> Bindings {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    fn evaluate(expression: &str) -> FormulaResult<f64> {
        FormulaEngine::new().evaluate(expression, &Bindings::new())
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("2 ^ 3 ^ 2").unwrap(), 512.0);
    }

    #[test]
    fn test_rounding_functions() {
        assert_eq!(evaluate("ROUND(3.14159, 2)").unwrap(), 3.14);
        assert_eq!(evaluate("CEIL(2.1)").unwrap(), 3.0);
        assert_eq!(evaluate("FLOOR(2.9)").unwrap(), 2.0);
    }

    #[test]
    fn test_variables() {
        let engine = FormulaEngine::new();
        let vars = bindings(&[("a", 2.into()), ("b", 3.into())]);
        assert_eq!(engine.evaluate("{a} + {b}", &vars).unwrap(), 5.0);

        let vars = bindings(&[("a", 2.into())]);
        assert_eq!(
            engine.evaluate("{a} + {b}", &vars),
            Err(FormulaError::UndefinedVariable("b".to_string()))
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("10 / 0"), Err(FormulaError::DivisionByZero));
    }

    #[test]
    fn test_nested_functions() {
        // MAX(1,2,3) is 3 and MIN(4,5) is 4.
        assert_eq!(evaluate("ROUND(MAX(1,2,3) + MIN(4,5), 0)").unwrap(), 7.0);
    }

    #[test]
    fn test_conditionals() {
        assert_eq!(evaluate("IFERROR(10/0, -1)").unwrap(), -1.0);
        assert_eq!(evaluate("IF(1, 10, 20)").unwrap(), 10.0);
        assert_eq!(evaluate("IF(0, 10, 20)").unwrap(), 20.0);
        assert_eq!(evaluate("IFERROR(SQRT(-1), 0) + 1").unwrap(), 1.0);
    }

    #[test]
    fn test_constants() {
        assert_eq!(evaluate("PI").unwrap(), std::f64::consts::PI);
        assert_eq!(evaluate("100 * TIMBER_WASTAGE").unwrap(), 100.0 * 1.1);
        assert_eq!(evaluate("TRUSS_COUNT(6000, STANDARD_SPACING)").unwrap(), 11.0);
    }

    #[test]
    fn test_timber_quote_line() {
        let engine = FormulaEngine::new();
        let vars = bindings(&[
            ("roof.span", 7200.into()),
            ("roof.length", 12.into()),
        ]);
        let trusses = engine
            .evaluate("TRUSS_COUNT({roof.length} * 1000, STANDARD_SPACING)", &vars)
            .unwrap();
        assert_eq!(trusses, 21.0);

        let timber = engine
            .evaluate("ROUND(LINEAR_METERS(21, {roof.span} / 1000) * TIMBER_WASTAGE, 1)", &vars)
            .unwrap();
        assert_eq!(timber, 166.3);
    }

    #[test]
    fn test_negative_variables() {
        let engine = FormulaEngine::new();
        let vars = bindings(&[("a", (-3).into())]);
        assert_eq!(engine.evaluate("2 * {a}", &vars).unwrap(), -6.0);
        assert_eq!(engine.evaluate("{a} ^ 2", &vars).unwrap(), 9.0);
        assert_eq!(engine.evaluate("ABS({a})", &vars).unwrap(), 3.0);
    }

    #[test]
    fn test_bare_word_variables() {
        let engine = FormulaEngine::new();
        let vars = bindings(&[("width", 4.into()), ("height", 2.5.into())]);
        assert_eq!(engine.evaluate("width * height", &vars).unwrap(), 10.0);
    }

    #[test]
    fn test_variable_shadowing_function_name() {
        let engine = FormulaEngine::new();
        let vars = bindings(&[("ROUND", 3.into())]);
        assert!(matches!(
            engine.evaluate("ROUND(2.5)", &vars),
            Err(FormulaError::MalformedExpression(_))
        ));
        assert_eq!(engine.evaluate("{ROUND} + 1", &vars).unwrap(), 4.0);
    }

    #[test]
    fn test_variable_shadowing_constant() {
        let engine = FormulaEngine::new();
        let vars = bindings(&[("PI", 3.into())]);
        assert_eq!(engine.evaluate("PI * 2", &vars).unwrap(), 6.0);
    }

    #[test]
    fn test_text_binding_is_malformed() {
        let engine = FormulaEngine::new();
        let vars = bindings(&[("grade", "MGP10".into())]);
        assert!(matches!(
            engine.evaluate("{grade} * 2", &vars),
            Err(FormulaError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(
            evaluate("   "),
            Err(FormulaError::MalformedExpression("expression is empty".to_string()))
        );
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            evaluate("MEDIAN(1, 2)"),
            Err(FormulaError::UnknownFunction("MEDIAN".to_string()))
        );
    }

    #[test]
    fn test_idempotent() {
        let engine = FormulaEngine::new();
        let vars = bindings(&[("qty", 7.into()), ("rate", 12.5.into())]);
        let expression = "ROUND({qty} * {rate} * SAFETY_FACTOR, 2)";
        let first = engine.evaluate(expression, &vars);
        for _ in 0..10 {
            assert_eq!(engine.evaluate(expression, &vars), first);
        }
        assert_eq!(first.unwrap(), 105.0);
    }

    #[test]
    fn test_max_passes() {
        let engine = FormulaEngine::with_max_passes(1);
        assert_eq!(engine.evaluate("ABS(-2)", &Bindings::new()).unwrap(), 2.0);
        assert_eq!(
            engine.evaluate("ABS(ABS(-2))", &Bindings::new()),
            Err(FormulaError::ExpressionTooComplex(1))
        );
        assert_eq!(FormulaEngine::default().max_passes(), DEFAULT_MAX_PASSES);
    }

    #[test]
    fn test_evaluate_all_keeps_order_and_isolates_failures() {
        let engine = FormulaEngine::new();
        let vars = bindings(&[("n", 4.into())]);
        let results = engine.evaluate_all(&["{n} * 2", "{n} / 0", "{missing}", "SQRT({n})"], &vars);

        assert_eq!(results.len(), 4);
        assert_eq!(results[0], Ok(8.0));
        assert_eq!(results[1], Err(FormulaError::DivisionByZero));
        assert_eq!(
            results[2],
            Err(FormulaError::UndefinedVariable("missing".to_string()))
        );
        assert_eq!(results[3], Ok(2.0));
    }

    #[test]
    fn test_deep_iferror_nesting_fails_cleanly() {
        let nested = format!("{}1/0{}", "IFERROR(".repeat(2000), ", 7)".repeat(2000));
        let engine = FormulaEngine::new();
        assert!(matches!(
            engine.evaluate(&nested, &Bindings::new()),
            Err(FormulaError::ExpressionTooComplex(_))
        ));

        let results = engine.evaluate_all(&[nested.as_str(), "IFERROR(1/0, 7)"], &Bindings::new());
        assert!(matches!(results[0], Err(FormulaError::ExpressionTooComplex(_))));
        assert_eq!(results[1], Ok(7.0));
    }

    #[test]
    fn test_non_finite_binding_is_invalid_result() {
        let engine = FormulaEngine::new();
        let vars = bindings(&[("a", f64::NAN.into()), ("b", f64::INFINITY.into())]);
        assert_eq!(engine.evaluate("{a} + 1", &vars), Err(FormulaError::InvalidResult));
        assert_eq!(engine.evaluate("b * 2", &vars), Err(FormulaError::InvalidResult));
        assert_eq!(engine.evaluate("1 + 1", &vars).unwrap(), 2.0);
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FormulaEngine>();
    }
}
