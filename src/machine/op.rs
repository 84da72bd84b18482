//! Primitive instructions of the target machine.

use std::fmt;

use crate::color::ColorChange;
use crate::error::SemanticError;

use super::context::Context;

/// A single primitive instruction. Each one occupies exactly one codel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// First codel of a program. Requires the canonical empty context.
    Init,
    /// Grow the previous codel block by one codel. Not a real instruction.
    Extend,
    /// Push the size of the previous codel block.
    Push,
    /// Pop the top value and discard it.
    Pop,
    /// Push a copy of the top value.
    Duplicate,
    /// Pop `b` then `a`, push `a + b`.
    Add,
    /// Pop `b` then `a`, push `a - b`.
    Subtract,
    /// Pop `b` then `a`, push `a * b`.
    Multiply,
    /// Pop `b` then `a`, push `a / b` rounded towards negative infinity.
    Divide,
    /// Pop `k` and rotate the direction pointer `k` quarter-turns clockwise.
    Pointer,
    /// Pop a value and print it as a number followed by a space.
    OutNumber,
    /// Pop a value and print it as a character.
    OutChar,
}

impl Op {
    /// Number of codels the instruction occupies.
    pub fn size(self) -> i64 {
        1
    }

    /// Lightness and hue change leading into this instruction's codel.
    pub fn color_change(self) -> ColorChange {
        match self {
            Op::Init | Op::Extend => ColorChange::new(0, 0),
            Op::Push => ColorChange::new(1, 0),
            Op::Pop => ColorChange::new(2, 0),
            Op::Add => ColorChange::new(0, 1),
            Op::Subtract => ColorChange::new(1, 1),
            Op::Multiply => ColorChange::new(2, 1),
            Op::Divide => ColorChange::new(0, 2),
            Op::Pointer => ColorChange::new(1, 3),
            Op::Duplicate => ColorChange::new(0, 4),
            Op::OutNumber => ColorChange::new(1, 5),
            Op::OutChar => ColorChange::new(2, 5),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Op::Init => "INIT",
            Op::Extend => "EXTEND",
            Op::Push => "PUSH",
            Op::Pop => "POP",
            Op::Duplicate => "DUPLICATE",
            Op::Add => "ADD",
            Op::Subtract => "SUBTRACT",
            Op::Multiply => "MULTIPLY",
            Op::Divide => "DIVIDE",
            Op::Pointer => "POINTER",
            Op::OutNumber => "OUT_NUMBER",
            Op::OutChar => "OUT_CHAR",
        }
    }

    /// Apply the instruction, returning the next context.
    ///
    /// Every instruction but `Extend` starts a fresh codel block of size 1.
    pub fn apply(self, context: &Context) -> Result<Context, SemanticError> {
        let mut next = context.clone();
        self.execute(&mut next)?;
        if self != Op::Extend {
            next.value = 1;
        }
        next.advance(self.size());
        Ok(next)
    }

    fn execute(self, context: &mut Context) -> Result<(), SemanticError> {
        let name = self.name();
        match self {
            Op::Init => {
                if *context != Context::new() {
                    return Err(SemanticError::NonEmptyContext(context.to_string()));
                }
            }
            Op::Extend => context.value += 1,
            Op::Push => {
                if context.value <= 0 {
                    return Err(SemanticError::NonPositivePush(context.value));
                }
                context.stack.push(context.value);
            }
            Op::Pop => {
                context.pop(name)?;
            }
            Op::Duplicate => {
                let top = context.pop(name)?;
                context.stack.extend([top, top]);
            }
            Op::Add => {
                let (a, b) = context.pop_pair(name)?;
                let sum = a.checked_add(b).ok_or(SemanticError::Overflow(name))?;
                context.stack.push(sum);
            }
            Op::Subtract => {
                let (a, b) = context.pop_pair(name)?;
                let difference = a.checked_sub(b).ok_or(SemanticError::Overflow(name))?;
                context.stack.push(difference);
            }
            Op::Multiply => {
                let (a, b) = context.pop_pair(name)?;
                let product = a.checked_mul(b).ok_or(SemanticError::Overflow(name))?;
                context.stack.push(product);
            }
            Op::Divide => {
                let (a, b) = context.pop_pair(name)?;
                context.stack.push(floor_div(a, b)?);
            }
            Op::Pointer => {
                let quarter_turns = context.pop(name)?;
                context.rotate(quarter_turns);
            }
            Op::OutNumber => {
                let n = context.pop(name)?;
                context.output.push_str(&format!("{} ", n));
            }
            Op::OutChar => {
                let code = context.pop(name)?;
                let c = u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(SemanticError::InvalidChar(code))?;
                context.output.push(c);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn floor_div(a: i64, b: i64) -> Result<i64, SemanticError> {
    if b == 0 {
        return Err(SemanticError::DivisionByZero);
    }
    let quotient = a.checked_div(b).ok_or(SemanticError::Overflow("DIVIDE"))?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}
