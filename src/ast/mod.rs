use crate::error::{FormulaError, FormulaResult};
use log::debug;
use std::fmt;

mod compiler;
mod executor;
mod tokenizer;

pub use compiler::Compiler;
pub use executor::Executor;
pub use tokenizer::tokenize;

/// One lexical unit of a fully substituted arithmetic expression.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    LeftParen,
    RightParen,
}

/// A postfix program step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Instruction {
    Push(f64),
    Apply(Operator),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    /// Written `^` or `**`.
    Power,
}

impl Operator {
    pub fn apply(&self, left: f64, right: f64) -> FormulaResult<f64> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Subtract => Ok(left - right),
            Operator::Multiply => Ok(left * right),
            Operator::Divide => {
                if right == 0.0 {
                    Err(FormulaError::DivisionByZero)
                } else {
                    Ok(left / right)
                }
            }
            Operator::Modulo => {
                if right == 0.0 {
                    Err(FormulaError::DivisionByZero)
                } else {
                    Ok(left % right)
                }
            }
            Operator::Power => Ok(left.powf(right)),
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide | Operator::Modulo => 2,
            Operator::Power => 3,
        }
    }

    pub fn is_right_associative(&self) -> bool {
        matches!(self, Operator::Power)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Power => "^",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<&str> for Operator {
    type Error = FormulaError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "%" => Ok(Operator::Modulo),
            "^" | "**" => Ok(Operator::Power),
            _ => Err(FormulaError::malformed(format!(
                "unknown operator '{}'",
                value
            ))),
        }
    }
}

/// Treats a `-` at the start of the expression, or directly after `(`, as
/// `0 -` so the binary-only postfix conversion can handle negation.
fn rewrite_unary_minus(tokens: Vec<Token>) -> Vec<Token> {
    let mut rewritten = Vec::with_capacity(tokens.len() + 2);
    for token in tokens {
        if token == Token::Operator(Operator::Subtract)
            && matches!(rewritten.last(), None | Some(Token::LeftParen))
        {
            rewritten.push(Token::Number(0.0));
        }
        rewritten.push(token);
    }
    rewritten
}

/// Evaluates an expression made only of numbers, operators and parentheses.
///
/// Whitespace separates tokens. Any other character, a mismatched
/// parenthesis, a zero divisor or a non-finite result is an error.
pub fn evaluate_arithmetic(expression: &str) -> FormulaResult<f64> {
    let tokens = rewrite_unary_minus(tokenize(expression)?);
    let program = Compiler::compile(&tokens)?;
    debug!("Postfix program for '{}': {:?}", expression, program);

    let result = Executor::new().execute(&program)?;
    if !result.is_finite() {
        return Err(FormulaError::InvalidResult);
    }
    Ok(result)
}
