use crate::constants::CONSTANT_PATTERNS;
use crate::error::{FormulaError, FormulaResult};
use crate::variables::{inline_number, Bindings};
use log::debug;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// `{name}` references; names may be namespaced with dots (`{roof.width}`).
static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_.]*)\}").unwrap());

/// A whole bare word, dots included, so `roof.width` is one candidate name.
static BARE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z_](?:[A-Za-z0-9_.]*[A-Za-z0-9_])?").unwrap());

/// Appends `segment` to `out`, replacing each bare word that names a numeric
/// binding. Words without one, text bindings included, are left as written.
fn push_bare_words(out: &mut String, segment: &str, bindings: &Bindings) -> FormulaResult<()> {
    let mut last = 0;
    for word in BARE_WORD.find_iter(segment) {
        let Some(value) = bindings.get(word.as_str()).and_then(|v| v.as_number()) else {
            continue;
        };
        out.push_str(&segment[last..word.start()]);
        out.push_str(&inline_number(value)?);
        last = word.end();
    }
    out.push_str(&segment[last..]);
    Ok(())
}

/// Replaces `{name}` references with their bound values, then, outside those
/// references, replaces bare words naming numeric bindings.
///
/// The bare-word pass only ever sees text the caller wrote, never text the
/// brace pass produced. The first reference without a binding fails the whole
/// call with `UndefinedVariable`; a referenced NaN or infinite number fails
/// with `InvalidResult`.
pub fn substitute_variables(expression: &str, bindings: &Bindings) -> FormulaResult<String> {
    let mut result = String::with_capacity(expression.len());
    let mut last = 0;

    for captures in REFERENCE.captures_iter(expression) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let value = bindings
            .get(name.as_str())
            .ok_or_else(|| FormulaError::UndefinedVariable(name.as_str().to_string()))?;

        push_bare_words(&mut result, &expression[last..whole.start()], bindings)?;
        result.push_str(&value.inline_text()?);
        last = whole.end();
    }
    push_bare_words(&mut result, &expression[last..], bindings)?;

    debug!("Substituted variables: '{}' -> '{}'", expression, result);
    Ok(result)
}

/// Replaces every constant name standing as a whole word.
pub fn substitute_constants(expression: &str) -> String {
    let mut result = expression.to_string();
    for (regex, value) in CONSTANT_PATTERNS.iter() {
        if regex.is_match(&result) {
            result = regex.replace_all(&result, NoExpand(value)).into_owned();
        }
    }
    result
}

/// Distinct `{name}` references, in order of first appearance.
pub fn referenced_variables(expression: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for captures in REFERENCE.captures_iter(expression) {
        if let Some(name) = captures.get(1) {
            if !names.iter().any(|seen| seen == name.as_str()) {
                names.push(name.as_str().to_string());
            }
        }
    }
    names
}
