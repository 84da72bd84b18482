//! Composite instructions ("macros") built out of primitive ops.

use std::fmt;

use crate::color::ColorChange;
use crate::error::{ConstructionError, SemanticError};
use crate::numbers::NumberTree;

use super::context::Context;
use super::op::Op;

/// Setup codels of a clockwise U-turn, before its 3-codel pivot.
pub const CLOCKWISE_SETUP: i64 = 3;
/// Setup codels of an anticlockwise U-turn, before its 3-codel pivot.
pub const ANTICLOCKWISE_SETUP: i64 = 5;

/// Set the size of the previous codel block to `length`.
///
/// Expands to `length - 1` extends. The mapper treats it as one unit: it may
/// never be the last thing placed before a turn or a filler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resize {
    length: i64,
}

impl Resize {
    pub fn new(length: i64) -> Result<Self, ConstructionError> {
        if length <= 1 {
            return Err(ConstructionError::InvalidResize(length));
        }
        Ok(Self { length })
    }

    /// Resize with a length the caller already checked.
    pub(crate) fn sized(length: i64) -> Self {
        debug_assert!(length > 1);
        Self { length }
    }

    pub fn length(self) -> i64 {
        self.length
    }
}

/// Direction of a U-turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Clockwise,
    AntiClockwise,
}

/// Filler of exactly `length` codels leaving stack and direction untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoOp {
    length: i64,
}

impl NoOp {
    pub fn new(length: i64) -> Result<Self, ConstructionError> {
        if length <= 1 {
            return Err(ConstructionError::InvalidNoOp(length));
        }
        Ok(Self { length })
    }

    pub fn length(self) -> i64 {
        self.length
    }
}

/// Any instruction of a program, primitive or composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Op(Op),
    Resize(Resize),
    /// A U-turn: the direction ends up reversed, the stack is unchanged.
    UTurn(Turn),
    NoOp(NoOp),
    /// Leave a number on top of the stack.
    Number(NumberTree),
}

impl From<Op> for Instruction {
    fn from(op: Op) -> Self {
        Instruction::Op(op)
    }
}

impl Instruction {
    pub fn is_resize(&self) -> bool {
        matches!(self, Instruction::Resize(_))
    }

    /// Codels the instruction occupies.
    pub fn size(&self) -> i64 {
        match self {
            Instruction::Op(op) => op.size(),
            Instruction::Resize(resize) => resize.length - 1,
            Instruction::UTurn(Turn::Clockwise) => CLOCKWISE_SETUP + 3,
            Instruction::UTurn(Turn::AntiClockwise) => ANTICLOCKWISE_SETUP + 3,
            Instruction::NoOp(no_op) => no_op.length,
            Instruction::Number(tree) => tree.cost(),
        }
    }

    /// Direct children of a composite instruction. Empty for primitives.
    pub fn children(&self) -> Vec<Instruction> {
        match self {
            Instruction::Op(_) => Vec::new(),
            Instruction::Resize(resize) => vec![Op::Extend.into(); (resize.length - 1) as usize],
            Instruction::UTurn(turn) => {
                let mut children = Vec::with_capacity(7);
                if *turn == Turn::AntiClockwise {
                    // Three clockwise quarter-turns make one anticlockwise.
                    children.push(Instruction::Resize(Resize::sized(3)));
                }
                children.extend(
                    [
                        Op::Push,
                        Op::Duplicate,
                        Op::Duplicate,
                        Op::Pointer,
                        Op::Pop,
                        Op::Pointer,
                    ]
                    .map(Instruction::Op),
                );
                children
            }
            Instruction::NoOp(no_op) => {
                let mut children = vec![Op::Push.into()];
                if no_op.length % 2 == 1 {
                    children.push(Instruction::Resize(Resize::sized(2)));
                }
                for _ in 0..(no_op.length / 2 - 1) {
                    children.push(Op::Duplicate.into());
                    children.push(Op::Add.into());
                }
                children.push(Op::Pop.into());
                children
            }
            Instruction::Number(tree) => tree.children(),
        }
    }

    /// Primitive ops in execution order.
    pub fn expand(&self) -> Vec<Op> {
        let mut ops = Vec::new();
        self.expand_into(&mut ops);
        ops
    }

    fn expand_into(&self, ops: &mut Vec<Op>) {
        match self {
            Instruction::Op(op) => ops.push(*op),
            composite => {
                for child in composite.children() {
                    child.expand_into(ops);
                }
            }
        }
    }

    /// Units the mapper places one at a time: primitive ops and resizes.
    pub fn layout_units(&self) -> Vec<Instruction> {
        let mut units = Vec::new();
        self.layout_units_into(&mut units);
        units
    }

    fn layout_units_into(&self, units: &mut Vec<Instruction>) {
        match self {
            Instruction::Op(_) | Instruction::Resize(_) => units.push(self.clone()),
            composite => {
                for child in composite.children() {
                    child.layout_units_into(units);
                }
            }
        }
    }

    /// Precondition checked before a composite starts executing.
    pub fn check_entry(&self, context: &Context) -> Result<(), SemanticError> {
        let instruction = match self {
            Instruction::Resize(_) => "resize",
            Instruction::UTurn(_) => "U-turn",
            Instruction::NoOp(_) => "no-op",
            Instruction::Op(_) | Instruction::Number(_) => return Ok(()),
        };
        if context.value != 1 {
            return Err(SemanticError::unexpected_value(instruction, context.value));
        }
        Ok(())
    }

    /// Apply the instruction, returning the next context.
    pub fn apply(&self, context: &Context) -> Result<Context, SemanticError> {
        match self {
            Instruction::Op(op) => op.apply(context),
            composite => {
                composite.check_entry(context)?;
                let mut next = context.clone();
                for child in composite.children() {
                    next = child.apply(&next)?;
                }
                Ok(next)
            }
        }
    }

    /// Sum of the color changes of all primitive ops.
    pub fn color_change(&self) -> ColorChange {
        self.expand()
            .into_iter()
            .fold(ColorChange::default(), |acc, op| acc + op.color_change())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Op(op) => write!(f, "{}", op),
            Instruction::Resize(resize) => write!(f, "RESIZE {}", resize.length),
            Instruction::UTurn(Turn::Clockwise) => f.write_str("UTURN clockwise"),
            Instruction::UTurn(Turn::AntiClockwise) => f.write_str("UTURN anticlockwise"),
            Instruction::NoOp(no_op) => write!(f, "NOOP {}", no_op.length),
            Instruction::Number(tree) => write!(f, "NUMBER {} = {}", tree.value(), tree),
        }
    }
}
