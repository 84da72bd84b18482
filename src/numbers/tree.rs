//! Arithmetic expression trees producing a number on top of the stack.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConstructionError;
use crate::machine::{Instruction, Op, Resize};

/// Binary arithmetic operators a tree node can combine its children with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
        }
    }

    /// Apply the operator; division floors. `None` on overflow or zero divisor.
    pub fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            BinaryOperator::Add => a.checked_add(b),
            BinaryOperator::Subtract => a.checked_sub(b),
            BinaryOperator::Multiply => a.checked_mul(b),
            BinaryOperator::Divide => {
                let quotient = a.checked_div_euclid(b)?;
                Some(quotient - i64::from(b < 0 && a.rem_euclid(b) != 0))
            }
        }
    }

    fn op(self) -> Op {
        match self {
            BinaryOperator::Add => Op::Add,
            BinaryOperator::Subtract => Op::Subtract,
            BinaryOperator::Multiply => Op::Multiply,
            BinaryOperator::Divide => Op::Divide,
        }
    }
}

/// Expression tree leaving its value on top of the stack.
///
/// The cost of a tree is the number of codels it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberTree {
    /// Resize the previous block to `n`, then push it.
    Leaf(i64),
    /// Push both operands, then combine them.
    Binary {
        operator: BinaryOperator,
        left: Box<NumberTree>,
        right: Box<NumberTree>,
    },
    /// Push `base`, duplicate it `exponent - 1` times, multiply as many times.
    Power {
        base: Box<NumberTree>,
        exponent: u32,
    },
}

const LEAF_PRECEDENCE: u8 = 10;
const POWER_PRECEDENCE: u8 = 3;

impl NumberTree {
    pub fn leaf(n: i64) -> Result<Self, ConstructionError> {
        if n <= 0 {
            return Err(ConstructionError::InvalidNumber(n));
        }
        Ok(NumberTree::Leaf(n))
    }

    pub fn binary(operator: BinaryOperator, left: NumberTree, right: NumberTree) -> Self {
        NumberTree::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn power(base: NumberTree, exponent: u32) -> Result<Self, ConstructionError> {
        if exponent < 2 {
            return Err(ConstructionError::InvalidExponent(exponent));
        }
        Ok(NumberTree::Power {
            base: Box::new(base),
            exponent,
        })
    }

    /// The number the tree evaluates to, `None` if the arithmetic is invalid.
    pub fn checked_value(&self) -> Option<i64> {
        match self {
            NumberTree::Leaf(n) => Some(*n),
            NumberTree::Binary {
                operator,
                left,
                right,
            } => operator.apply(left.checked_value()?, right.checked_value()?),
            NumberTree::Power { base, exponent } => base.checked_value()?.checked_pow(*exponent),
        }
    }

    /// The number the tree evaluates to.
    ///
    /// Trees built from the constructors and the optimizer always evaluate.
    pub fn value(&self) -> i64 {
        self.checked_value().unwrap_or(0)
    }

    /// Codels needed to produce the number.
    pub fn cost(&self) -> i64 {
        match self {
            NumberTree::Leaf(n) => *n,
            NumberTree::Binary { left, right, .. } => left.cost() + right.cost() + 1,
            NumberTree::Power { base, exponent } => base.cost() + 2 * (*exponent as i64 - 1),
        }
    }

    /// Instructions of the tree, in execution order.
    pub fn children(&self) -> Vec<Instruction> {
        match self {
            NumberTree::Leaf(n) => {
                let mut children = Vec::with_capacity(2);
                if *n > 1 {
                    children.push(Instruction::Resize(Resize::sized(*n)));
                }
                children.push(Op::Push.into());
                children
            }
            NumberTree::Binary {
                operator,
                left,
                right,
            } => vec![
                Instruction::Number((**left).clone()),
                Instruction::Number((**right).clone()),
                operator.op().into(),
            ],
            NumberTree::Power { base, exponent } => {
                let repeats = (*exponent - 1) as usize;
                let mut children = vec![Instruction::Number((**base).clone())];
                children.extend(std::iter::repeat(Instruction::Op(Op::Duplicate)).take(repeats));
                children.extend(std::iter::repeat(Instruction::Op(Op::Multiply)).take(repeats));
                children
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            NumberTree::Leaf(_) => LEAF_PRECEDENCE,
            NumberTree::Binary { operator, .. } => operator.precedence(),
            NumberTree::Power { .. } => POWER_PRECEDENCE,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        if self.precedence() <= parent {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Infix rendering. An operand is parenthesized iff its precedence is lower
/// than or equal to its parent's.
impl fmt::Display for NumberTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberTree::Leaf(n) => write!(f, "{}", n),
            NumberTree::Binary {
                operator,
                left,
                right,
            } => {
                left.fmt_operand(f, operator.precedence())?;
                write!(f, " {} ", operator.symbol())?;
                right.fmt_operand(f, operator.precedence())
            }
            NumberTree::Power { base, exponent } => {
                base.fmt_operand(f, POWER_PRECEDENCE)?;
                write!(f, " ^ {}", exponent)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Context;
    use pretty_assertions::assert_eq;

    fn leaf(n: i64) -> NumberTree {
        NumberTree::leaf(n).unwrap()
    }

    fn bin(operator: BinaryOperator, left: NumberTree, right: NumberTree) -> NumberTree {
        NumberTree::binary(operator, left, right)
    }

    fn samples() -> Vec<(NumberTree, i64, &'static str, i64)> {
        use BinaryOperator::*;
        vec![
            (leaf(1), 1, "1", 1),
            (leaf(2), 2, "2", 2),
            (leaf(3), 3, "3", 3),
            (bin(Add, leaf(16), leaf(4)), 20, "16 + 4", 16 + 4 + 1),
            (bin(Subtract, leaf(16), leaf(4)), 12, "16 - 4", 16 + 4 + 1),
            (bin(Multiply, leaf(16), leaf(4)), 64, "16 * 4", 16 + 4 + 1),
            (bin(Divide, leaf(20), leaf(3)), 6, "20 / 3", 20 + 3 + 1),
            (
                NumberTree::power(leaf(3), 4).unwrap(),
                81,
                "3 ^ 4",
                3 + 2 * (4 - 1),
            ),
        ]
    }

    #[test]
    fn test_number_tree_consistency() {
        for (tree, n, _, _) in samples() {
            assert_eq!(tree.value(), n);
            let context = Context {
                value: 1,
                ..Context::new()
            };
            let next = Instruction::Number(tree.clone()).apply(&context).unwrap();
            assert_eq!(next.stack, vec![n], "{}", tree);
        }
    }

    #[test]
    fn test_number_tree_str() {
        for (tree, _, expected, _) in samples() {
            assert_eq!(tree.to_string(), expected);
        }
    }

    #[test]
    fn test_number_tree_cost() {
        for (tree, _, _, expected) in samples() {
            assert_eq!(tree.cost(), expected);
            assert_eq!(Instruction::Number(tree.clone()).size(), expected);
            assert_eq!(Instruction::Number(tree).expand().len() as i64, expected);
        }
    }

    #[test]
    fn test_parenthesization() {
        use BinaryOperator::*;
        let tree = bin(Subtract, leaf(16), bin(Subtract, leaf(4), leaf(2)));
        assert_eq!(tree.to_string(), "16 - (4 - 2)");
        let tree = bin(Subtract, bin(Subtract, leaf(16), leaf(4)), leaf(2));
        assert_eq!(tree.to_string(), "(16 - 4) - 2");
        let tree = bin(Add, bin(Multiply, leaf(3), leaf(5)), leaf(2));
        assert_eq!(tree.to_string(), "3 * 5 + 2");
        let tree = NumberTree::power(bin(Add, leaf(2), leaf(3)), 2).unwrap();
        assert_eq!(tree.to_string(), "(2 + 3) ^ 2");
    }

    #[test]
    fn test_invalid_construction() {
        assert_eq!(
            NumberTree::leaf(0).unwrap_err(),
            ConstructionError::InvalidNumber(0)
        );
        assert_eq!(
            NumberTree::power(leaf(2), 1).unwrap_err(),
            ConstructionError::InvalidExponent(1)
        );
    }

    #[test]
    fn test_divide_floors() {
        assert_eq!(BinaryOperator::Divide.apply(-7, 2), Some(-4));
        assert_eq!(BinaryOperator::Divide.apply(7, -2), Some(-4));
        assert_eq!(BinaryOperator::Divide.apply(20, 3), Some(6));
        assert_eq!(BinaryOperator::Divide.apply(1, 0), None);
    }
}
