use crate::ast::evaluate_arithmetic;
use crate::error::{FormulaError, FormulaResult};
use crate::functions::{FunctionKind, FUNCTIONS};
use crate::variables::format_number;
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

/// The start of a call: an uppercase name followed by `(`.
static CALL_HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Z_][A-Z0-9_]*)\s*\(").unwrap());

pub const DEFAULT_MAX_PASSES: usize = 1000;

/// How deeply guarded calls may nest. Each level re-enters the resolver.
pub const MAX_GUARDED_DEPTH: usize = 64;

/// A located call; `end` is one past its closing parenthesis.
struct Call {
    name: String,
    start: usize,
    end: usize,
    arguments: String,
}

/// Replaces function calls with their numeric results until none remain.
///
/// Each pass picks one call. A guarded call (`IFERROR`) is taken leftmost
/// first so its arguments are still raw text when it runs; otherwise the
/// rightmost call head is taken, which never encloses another call. Every
/// resolved call, nested ones included, counts against `max_passes`, and
/// guarded calls may nest at most `MAX_GUARDED_DEPTH` deep.
pub struct Resolver {
    max_passes: usize,
    passes: usize,
    depth: usize,
}

impl Resolver {
    pub fn new(max_passes: usize) -> Self {
        Self {
            max_passes,
            passes: 0,
            depth: 0,
        }
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn resolve(&mut self, expression: &str) -> FormulaResult<String> {
        let mut current = expression.to_string();

        while let Some(call) = next_call(&current)? {
            self.passes += 1;
            if self.passes > self.max_passes {
                return Err(FormulaError::ExpressionTooComplex(self.max_passes));
            }

            let value = self.call(&call)?;
            current.replace_range(call.start..call.end, &format_number(value));
            trace!("Resolved {} -> {}: '{}'", call.name, value, current);
        }

        Ok(current)
    }

    /// Resolves every call, then evaluates the remaining arithmetic.
    pub fn evaluate(&mut self, expression: &str) -> FormulaResult<f64> {
        let resolved = self.resolve(expression)?;
        evaluate_arithmetic(&resolved)
    }

    fn call(&mut self, call: &Call) -> FormulaResult<f64> {
        let def = FUNCTIONS
            .get(&call.name)
            .ok_or_else(|| FormulaError::UnknownFunction(call.name.clone()))?;
        let arguments = split_arguments(&call.arguments)?;

        let value = match def.kind {
            FunctionKind::Eager(function) => {
                let values = arguments
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<FormulaResult<Vec<f64>>>()?;
                function(&values)?
            }
            FunctionKind::Guarded(function) => {
                if self.depth >= MAX_GUARDED_DEPTH {
                    return Err(FormulaError::ExpressionTooComplex(MAX_GUARDED_DEPTH));
                }
                self.depth += 1;
                let result = function(&arguments, &mut |arg: &str| self.evaluate(arg));
                self.depth -= 1;
                result?
            }
        };

        if !value.is_finite() {
            return Err(FormulaError::InvalidResult);
        }
        Ok(value)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PASSES)
    }
}

/// Resolves every function call in `expression` with the default pass cap.
pub fn resolve_functions(expression: &str) -> FormulaResult<String> {
    Resolver::default().resolve(expression)
}

fn next_call(expression: &str) -> FormulaResult<Option<Call>> {
    let heads: Vec<(usize, usize, &str)> = CALL_HEAD
        .captures_iter(expression)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let name = captures.get(1)?;
            Some((whole.start(), whole.end(), name.as_str()))
        })
        .collect();

    let guarded = heads.iter().find(|(_, _, name)| {
        matches!(
            FUNCTIONS.get(name).map(|def| def.kind),
            Some(FunctionKind::Guarded(_))
        )
    });
    let Some(&(start, open_end, name)) = guarded.or(heads.last()) else {
        return Ok(None);
    };

    // `open_end` is just past the `(` of the head.
    let close = matching_paren(expression, open_end - 1)?;
    Ok(Some(Call {
        name: name.to_string(),
        start,
        end: close + 1,
        arguments: expression[open_end..close].to_string(),
    }))
}

fn matching_paren(expression: &str, open: usize) -> FormulaResult<usize> {
    let mut depth = 0usize;
    for (offset, byte) in expression.as_bytes()[open..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + offset);
                }
            }
            _ => {}
        }
    }
    Err(FormulaError::UnbalancedParentheses)
}

/// Splits on commas that are not inside parentheses. An empty list is zero
/// arguments; an empty item is malformed.
fn split_arguments(arguments: &str) -> FormulaResult<Vec<&str>> {
    if arguments.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, byte) in arguments.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(arguments[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(arguments[start..].trim());

    if parts.iter().any(|part| part.is_empty()) {
        return Err(FormulaError::malformed(format!(
            "empty argument in '({})'",
            arguments
        )));
    }
    Ok(parts)
}
