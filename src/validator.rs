use crate::engine::FormulaEngine;
use crate::error::{FormulaError, FormulaResult};
use crate::substitution::referenced_variables;
use crate::variables::Bindings;
use log::debug;

/// Pre-flight check for editors. The first failing check wins:
/// emptiness, parenthesis balance of the raw text, missing references
/// (all of them, joined), then a full evaluation.
pub fn validate_with(
    engine: &FormulaEngine,
    expression: &str,
    bindings: &Bindings,
) -> FormulaResult<()> {
    if expression.trim().is_empty() {
        return Err(FormulaError::malformed("expression is empty"));
    }

    check_parentheses(expression)?;

    let missing: Vec<String> = referenced_variables(expression)
        .into_iter()
        .filter(|name| !bindings.contains_key(name))
        .collect();
    if !missing.is_empty() {
        return Err(FormulaError::UndefinedVariable(missing.join(", ")));
    }

    engine.evaluate(expression, bindings).map(|value| {
        debug!("Validated '{}' (evaluates to {})", expression, value);
    })
}

/// Running counter that may never go negative and must end at zero.
fn check_parentheses(expression: &str) -> FormulaResult<()> {
    let mut depth = 0i64;
    for ch in expression.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(FormulaError::UnbalancedParentheses);
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(FormulaError::UnbalancedParentheses);
    }
    Ok(())
}
