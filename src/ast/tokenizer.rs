use crate::ast::{Operator, Token};
use crate::error::{FormulaError, FormulaResult};
use log::trace;

fn flush_number(current: &mut String, tokens: &mut Vec<Token>) -> FormulaResult<()> {
    if current.is_empty() {
        return Ok(());
    }
    let value: f64 = current
        .parse()
        .map_err(|_| FormulaError::malformed(format!("invalid number '{}'", current)))?;
    tokens.push(Token::Number(value));
    current.clear();
    Ok(())
}

/// Splits a substituted expression into numbers, operators and parentheses.
///
/// Whitespace only separates tokens. Characters outside
/// `0-9 . + - * / % ^ ( )` are rejected rather than skipped, so a leftover
/// quoted text value or identifier cannot vanish.
pub fn tokenize(expression: &str) -> FormulaResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = expression.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '0'..='9' | '.' => current.push(ch),
            c if c.is_whitespace() => flush_number(&mut current, &mut tokens)?,
            '+' | '-' | '*' | '/' | '%' | '^' => {
                flush_number(&mut current, &mut tokens)?;
                let operator = if ch == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    Operator::Power
                } else {
                    Operator::try_from(ch.to_string().as_str())?
                };
                tokens.push(Token::Operator(operator));
            }
            '(' => {
                flush_number(&mut current, &mut tokens)?;
                tokens.push(Token::LeftParen);
            }
            ')' => {
                flush_number(&mut current, &mut tokens)?;
                tokens.push(Token::RightParen);
            }
            other => {
                return Err(FormulaError::malformed(format!(
                    "unexpected character '{}'",
                    other
                )))
            }
        }
    }
    flush_number(&mut current, &mut tokens)?;

    trace!("Tokens for '{}': {:?}", expression, tokens);
    Ok(tokens)
}
