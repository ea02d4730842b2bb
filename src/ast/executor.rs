use crate::ast::{Instruction, Operator};
use crate::error::{FormulaError, FormulaResult};

/// Runs a postfix program on a single numeric stack.
pub struct Executor {
    stack: Vec<f64>,
}

impl Executor {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn execute(&mut self, instructions: &[Instruction]) -> FormulaResult<f64> {
        self.stack.clear();

        for instr in instructions {
            match *instr {
                Instruction::Push(value) => self.stack.push(value),
                Instruction::Apply(operator) => {
                    let right = self.pop_operand(operator)?;
                    let left = self.pop_operand(operator)?;
                    self.stack.push(operator.apply(left, right)?);
                }
            }
        }

        match self.stack.len() {
            1 => self
                .stack
                .pop()
                .ok_or_else(|| FormulaError::malformed("empty expression")),
            0 => Err(FormulaError::malformed("empty expression")),
            n => Err(FormulaError::malformed(format!(
                "{} values left without an operator",
                n
            ))),
        }
    }

    fn pop_operand(&mut self, operator: Operator) -> FormulaResult<f64> {
        self.stack.pop().ok_or_else(|| {
            FormulaError::malformed(format!("insufficient operands for '{}'", operator))
        })
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
