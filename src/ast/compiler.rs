use crate::ast::{Instruction, Token};
use crate::error::{FormulaError, FormulaResult};

/// Infix to postfix conversion (shunting-yard).
pub struct Compiler;

impl Compiler {
    pub fn compile(tokens: &[Token]) -> FormulaResult<Vec<Instruction>> {
        let mut instructions = Vec::with_capacity(tokens.len());
        // Holds only operators and open parentheses.
        let mut stack: Vec<Token> = Vec::new();

        for token in tokens {
            match *token {
                Token::Number(value) => instructions.push(Instruction::Push(value)),
                Token::LeftParen => stack.push(Token::LeftParen),
                Token::RightParen => loop {
                    match stack.pop() {
                        Some(Token::Operator(operator)) => {
                            instructions.push(Instruction::Apply(operator))
                        }
                        Some(Token::LeftParen) => break,
                        _ => return Err(FormulaError::UnbalancedParentheses),
                    }
                },
                Token::Operator(incoming) => {
                    while let Some(&Token::Operator(top)) = stack.last() {
                        let pops = top.precedence() > incoming.precedence()
                            || (top.precedence() == incoming.precedence()
                                && !incoming.is_right_associative());
                        if !pops {
                            break;
                        }
                        instructions.push(Instruction::Apply(top));
                        stack.pop();
                    }
                    stack.push(Token::Operator(incoming));
                }
            }
        }

        while let Some(token) = stack.pop() {
            match token {
                Token::Operator(operator) => instructions.push(Instruction::Apply(operator)),
                _ => return Err(FormulaError::UnbalancedParentheses),
            }
        }

        Ok(instructions)
    }
}
