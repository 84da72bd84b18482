//! Local-search optimizer finding cheap number trees for a range of integers.
//!
//! Every integer in `[1, max]` starts as a leaf. A sweep walks every operand
//! pair `(i, j)` valid for one operator and replaces the tree of the result
//! when the candidate built from the current trees of `i` and `j` is strictly
//! cheaper. Sweeps are applied in a configurable rotation for several rounds.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConstructionError;

use super::table::NumberTable;
use super::tree::{BinaryOperator, NumberTree};

/// One operator sweep over all valid operand pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sweep {
    Pow,
    Mul,
    Div,
    Add,
    Sub,
}

impl Sweep {
    /// Rotation applied once per round by default.
    pub const ROTATION: [Sweep; 5] = [Sweep::Pow, Sweep::Mul, Sweep::Div, Sweep::Add, Sweep::Sub];

    pub fn name(self) -> &'static str {
        match self {
            Sweep::Pow => "pow",
            Sweep::Mul => "mul",
            Sweep::Div => "div",
            Sweep::Add => "add",
            Sweep::Sub => "sub",
        }
    }
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Range and schedule of an optimization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerOptions {
    /// Largest number to optimize.
    pub limit: i64,
    /// Times the sweep rotation is applied.
    pub rounds: usize,
    pub sweeps: Vec<Sweep>,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            limit: 128,
            rounds: 2,
            sweeps: Sweep::ROTATION.to_vec(),
        }
    }
}

impl OptimizerOptions {
    /// Every sweep of the run, in order.
    pub fn schedule(&self) -> impl Iterator<Item = Sweep> + '_ {
        (0..self.rounds).flat_map(move |_| self.sweeps.iter().copied())
    }
}

/// Best trees found so far for every integer in `[1, max]`.
#[derive(Debug, Clone)]
pub struct Optimizer {
    max: i64,
    trees: Vec<NumberTree>,
    costs: Vec<i64>,
}

fn slot(n: i64) -> usize {
    (n - 1) as usize
}

impl Optimizer {
    pub fn new(max: i64) -> Result<Self, ConstructionError> {
        let trees = (1..=max)
            .map(NumberTree::leaf)
            .collect::<Result<Vec<_>, _>>()?;
        if trees.is_empty() {
            return Err(ConstructionError::InvalidNumber(max));
        }
        let costs = trees.iter().map(NumberTree::cost).collect();
        Ok(Self { max, trees, costs })
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn tree(&self, n: i64) -> Option<&NumberTree> {
        self.in_range(n).then(|| &self.trees[slot(n)])
    }

    pub fn cost(&self, n: i64) -> Option<i64> {
        self.in_range(n).then(|| self.costs[slot(n)])
    }

    /// Sum of the costs of the whole range.
    pub fn total_cost(&self) -> i64 {
        self.costs.iter().sum()
    }

    fn in_range(&self, n: i64) -> bool {
        (1..=self.max).contains(&n)
    }

    /// Run every sweep of the schedule, logging the total cost after each.
    pub fn run(&mut self, options: &OptimizerOptions) {
        info!("Round 0: cost={}", self.total_cost());
        for (round, sweep) in options.schedule().enumerate() {
            let improved = self.sweep(sweep);
            info!("Round {}: cost={}, {}", round + 1, self.total_cost(), sweep);
            debug!(round = round + 1, %sweep, improved, "sweep finished");
        }
    }

    /// Apply one sweep, returning how many trees were replaced.
    pub fn sweep(&mut self, sweep: Sweep) -> usize {
        let max = self.max;
        let mut improved = 0;
        match sweep {
            Sweep::Add => {
                for i in 2..=max - 2 {
                    for j in i..=max - i {
                        improved += usize::from(self.binary_step(BinaryOperator::Add, i, j));
                    }
                }
            }
            Sweep::Sub => {
                for i in (2..=max).rev() {
                    for j in 1..i {
                        improved += usize::from(self.binary_step(BinaryOperator::Subtract, i, j));
                    }
                }
            }
            Sweep::Mul => {
                for i in 2..=max / 2 {
                    for j in i..=max / i {
                        improved += usize::from(self.binary_step(BinaryOperator::Multiply, i, j));
                    }
                }
            }
            Sweep::Div => {
                for i in (2..=max).rev() {
                    for j in 2..i / 2 {
                        improved += usize::from(self.binary_step(BinaryOperator::Divide, i, j));
                    }
                }
            }
            Sweep::Pow => {
                let mut base = 2;
                while base * base <= max {
                    let mut exponent = 2;
                    let mut power = base * base;
                    while power <= max {
                        improved += usize::from(self.power_step(base, exponent, power));
                        exponent += 1;
                        match power.checked_mul(base) {
                            Some(next) => power = next,
                            None => break,
                        }
                    }
                    base += 1;
                }
            }
        }
        improved
    }

    fn binary_step(&mut self, operator: BinaryOperator, i: i64, j: i64) -> bool {
        let Some(target) = operator.apply(i, j) else {
            return false;
        };
        let cost = self.costs[slot(i)] + self.costs[slot(j)] + 1;
        self.offer(target, cost, |trees| {
            NumberTree::binary(operator, trees[slot(i)].clone(), trees[slot(j)].clone())
        })
    }

    fn power_step(&mut self, base: i64, exponent: u32, target: i64) -> bool {
        let cost = self.costs[slot(base)] + 2 * (i64::from(exponent) - 1);
        self.offer(target, cost, |trees| NumberTree::Power {
            base: Box::new(trees[slot(base)].clone()),
            exponent,
        })
    }

    /// Replace the tree of `target` if `cost` is strictly lower.
    ///
    /// Candidates snapshot the current trees of their operands.
    fn offer(
        &mut self,
        target: i64,
        cost: i64,
        build: impl FnOnce(&[NumberTree]) -> NumberTree,
    ) -> bool {
        if !self.in_range(target) || cost >= self.costs[slot(target)] {
            return false;
        }
        let tree = build(&self.trees);
        debug_assert_eq!(tree.value(), target);
        debug_assert_eq!(tree.cost(), cost);
        self.trees[slot(target)] = tree;
        self.costs[slot(target)] = cost;
        true
    }

    pub fn into_table(self) -> NumberTable {
        NumberTable::from_entries((1..=self.max).zip(self.trees).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{Context, Instruction};
    use pretty_assertions::assert_eq;

    /// Evaluates the infix rendering of a tree.
    struct Evaluator<'a> {
        tokens: Vec<&'a str>,
        pos: usize,
    }

    impl<'a> Evaluator<'a> {
        fn new(text: &'a str) -> Self {
            let tokens = text
                .split(' ')
                .flat_map(|word| {
                    let mut parts = Vec::new();
                    let open = word.len() - word.trim_start_matches('(').len();
                    let trimmed = word.trim_matches(|c| c == '(' || c == ')');
                    let close = word.len() - word.trim_end_matches(')').len();
                    parts.extend(std::iter::repeat("(").take(open));
                    parts.push(trimmed);
                    parts.extend(std::iter::repeat(")").take(close));
                    parts
                })
                .collect();
            Self { tokens, pos: 0 }
        }

        fn peek(&self) -> Option<&'a str> {
            self.tokens.get(self.pos).copied()
        }

        fn next(&mut self) -> &'a str {
            let token = self.tokens[self.pos];
            self.pos += 1;
            token
        }

        fn expression(&mut self) -> i64 {
            let mut value = self.term();
            while let Some(op @ ("+" | "-")) = self.peek() {
                self.next();
                let rhs = self.term();
                value = if op == "+" { value + rhs } else { value - rhs };
            }
            value
        }

        fn term(&mut self) -> i64 {
            let mut value = self.factor();
            while let Some(op @ ("*" | "/")) = self.peek() {
                self.next();
                let rhs = self.factor();
                value = if op == "*" {
                    value * rhs
                } else {
                    value.div_euclid(rhs)
                };
            }
            value
        }

        fn factor(&mut self) -> i64 {
            let base = self.atom();
            if self.peek() == Some("^") {
                self.next();
                let exponent = self.factor();
                return base.pow(exponent as u32);
            }
            base
        }

        fn atom(&mut self) -> i64 {
            match self.next() {
                "(" => {
                    let value = self.expression();
                    assert_eq!(self.next(), ")");
                    value
                }
                number => number.parse().unwrap(),
            }
        }
    }

    fn evaluate(text: &str) -> i64 {
        let mut evaluator = Evaluator::new(text);
        let value = evaluator.expression();
        assert_eq!(evaluator.peek(), None, "trailing tokens in {}", text);
        value
    }

    #[test]
    fn test_evaluator() {
        assert_eq!(evaluate("16 - (4 - 2)"), 14);
        assert_eq!(evaluate("(16 - 4) - 2"), 10);
        assert_eq!(evaluate("2 ^ 3 * 5 + 1"), 41);
        assert_eq!(evaluate("((2 + 1) ^ 2 - 1) / 2"), 4);
    }

    #[test]
    fn test_costs_never_increase() {
        let mut optimizer = Optimizer::new(150).unwrap();
        let mut previous: Vec<_> = (1..=150).map(|n| optimizer.cost(n).unwrap()).collect();
        for sweep in OptimizerOptions::default().schedule() {
            optimizer.sweep(sweep);
            let current: Vec<_> = (1..=150).map(|n| optimizer.cost(n).unwrap()).collect();
            for (n, (before, after)) in previous.iter().zip(&current).enumerate() {
                assert!(after <= before, "cost of {} rose after {}", n + 1, sweep);
            }
            previous = current;
        }
    }

    #[test]
    fn test_trees_round_trip() {
        let mut optimizer = Optimizer::new(200).unwrap();
        optimizer.run(&OptimizerOptions::default());
        for n in 1..=200 {
            let tree = optimizer.tree(n).unwrap();
            assert_eq!(tree.value(), n);
            assert_eq!(tree.cost(), optimizer.cost(n).unwrap());
            assert_eq!(evaluate(&tree.to_string()), n, "{}", tree);

            let context = Context {
                value: 1,
                ..Context::new()
            };
            let next = Instruction::Number(tree.clone()).apply(&context).unwrap();
            assert_eq!(next.stack, vec![n]);
        }
    }

    #[test]
    fn test_known_decompositions() {
        let mut optimizer = Optimizer::new(128).unwrap();
        let before = optimizer.total_cost();
        optimizer.run(&OptimizerOptions::default());
        assert!(optimizer.total_cost() < before);

        assert_eq!(optimizer.cost(1), Some(1));
        assert_eq!(optimizer.tree(4), Some(&NumberTree::Leaf(4)));
        assert_eq!(optimizer.cost(8), Some(6));
        assert_eq!(optimizer.tree(8).unwrap().to_string(), "2 ^ 3");
        assert_eq!(optimizer.cost(129), None);
    }

    #[test]
    fn test_sweep_reports_improvements() {
        let mut optimizer = Optimizer::new(16).unwrap();
        assert!(optimizer.sweep(Sweep::Pow) > 0);
        // 4 = 2 ^ 2 ties with its leaf and is kept.
        assert_eq!(optimizer.tree(4), Some(&NumberTree::Leaf(4)));
        assert_eq!(optimizer.tree(8).unwrap().to_string(), "2 ^ 3");
        assert_eq!(optimizer.tree(16).unwrap().to_string(), "4 ^ 2");
        assert_eq!(optimizer.cost(16), Some(6));
    }

    #[test]
    fn test_invalid_range() {
        assert_eq!(
            Optimizer::new(0).unwrap_err(),
            ConstructionError::InvalidNumber(0)
        );
    }

    #[test]
    fn test_schedule_from_yaml() {
        let options: OptimizerOptions =
            serde_yaml::from_str("limit: 64\nsweeps: [mul, add]\n").unwrap();
        assert_eq!(options.limit, 64);
        assert_eq!(options.rounds, 2);
        let schedule: Vec<_> = options.schedule().collect();
        assert_eq!(
            schedule,
            vec![Sweep::Mul, Sweep::Add, Sweep::Mul, Sweep::Add]
        );
    }

    #[test]
    fn test_into_table() {
        let mut optimizer = Optimizer::new(32).unwrap();
        optimizer.run(&OptimizerOptions::default());
        let table = optimizer.clone().into_table();
        assert_eq!(table.len(), 32);
        assert_eq!(&table.get(27).unwrap(), optimizer.tree(27).unwrap());
    }
}
