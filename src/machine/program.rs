//! Programs: an implicit `Init` followed by a list of instructions.

use indexmap::IndexMap;
use tracing::trace;

use crate::color::ColorChange;
use crate::error::SemanticError;

use super::context::{Context, Position};
use super::instruction::Instruction;
use super::op::Op;

/// A laid-out (or not yet laid-out) program.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    body: Vec<Instruction>,
}

impl Program {
    pub fn new(body: Vec<Instruction>) -> Self {
        Self { body }
    }

    /// Instructions following the implicit `Init`.
    pub fn body(&self) -> &[Instruction] {
        &self.body
    }

    /// All instructions, starting with `Init`.
    pub fn instructions(&self) -> impl Iterator<Item = Instruction> + '_ {
        std::iter::once(Instruction::Op(Op::Init)).chain(self.body.iter().cloned())
    }

    /// Total codels, `Init` included.
    pub fn size(&self) -> i64 {
        Op::Init.size() + self.body.iter().map(Instruction::size).sum::<i64>()
    }

    /// Units for the mapper, `Init` excluded.
    pub fn layout_units(&self) -> Vec<Instruction> {
        self.body
            .iter()
            .flat_map(Instruction::layout_units)
            .collect()
    }

    /// All primitive ops, starting with `Init`.
    pub fn expanded(&self) -> Vec<Op> {
        self.instructions().flat_map(|i| i.expand()).collect()
    }

    /// Run the program from the canonical empty context.
    pub fn run(&self) -> Result<Execution, SemanticError> {
        let mut tracer = Tracer {
            context: Context::new(),
            codels: CodelMap::default(),
            color: ColorChange::default(),
        };
        for instruction in self.instructions() {
            tracer.execute(&instruction, 0)?;
        }
        Ok(Execution {
            context: tracer.context,
            codels: tracer.codels,
        })
    }
}

/// Walks instructions, recording the codel each primitive op lands on.
struct Tracer {
    context: Context,
    codels: CodelMap,
    color: ColorChange,
}

impl Tracer {
    fn execute(&mut self, instruction: &Instruction, depth: usize) -> Result<(), SemanticError> {
        match instruction {
            Instruction::Op(op) => {
                self.color += op.color_change();
                self.codels.insert(self.context.position, self.color);
                self.context = op.apply(&self.context)?;
                trace!("{:indent$}{} {}", "", op, self.context, indent = depth * 2);
            }
            composite => {
                trace!("{:indent$}{}", "", composite, indent = depth * 2);
                composite.check_entry(&self.context)?;
                for child in composite.children() {
                    self.execute(&child, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

/// Result of running a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Terminal machine state; `context.output` is the program output.
    pub context: Context,
    /// Cumulative color change of every occupied codel.
    pub codels: CodelMap,
}

/// Mapping from codel position to cumulative color change since `Init`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodelMap {
    codels: IndexMap<Position, ColorChange>,
}

impl CodelMap {
    pub fn insert(&mut self, position: Position, change: ColorChange) {
        self.codels.insert(position, change);
    }

    pub fn get(&self, position: Position) -> Option<ColorChange> {
        self.codels.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.codels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codels.is_empty()
    }

    /// Codels in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, ColorChange)> + '_ {
        self.codels
            .iter()
            .map(|(position, change)| (*position, *change))
    }

    /// The codel executed last.
    pub fn last(&self) -> Option<(Position, ColorChange)> {
        self.codels
            .last()
            .map(|(position, change)| (*position, *change))
    }

    /// Corners of the smallest rectangle holding every codel.
    pub fn extent(&self) -> Option<(Position, Position)> {
        let mut positions = self.codels.keys();
        let first = *positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| {
            (
                Position::new(min.x.min(p.x), min.y.min(p.y)),
                Position::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}
