//! Execution context of the target machine.

use std::fmt;

use crate::error::SemanticError;

/// A codel coordinate. `x` grows eastwards, `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Move `steps` codels along `direction`.
    pub fn stepped(self, direction: Direction, steps: i64) -> Self {
        let (dx, dy) = direction.unit();
        Self::new(self.x + dx * steps, self.y + dy * steps)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction pointer, in clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    East,
    South,
    West,
    North,
}

impl Direction {
    const CLOCKWISE: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Rotate by `quarter_turns` × 90°, clockwise when positive.
    pub fn rotated(self, quarter_turns: i64) -> Self {
        let index = (self as i64 + quarter_turns.rem_euclid(4)) % 4;
        Self::CLOCKWISE[index as usize]
    }

    /// Unit step vector.
    pub fn unit(self) -> (i64, i64) {
        match self {
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
        }
    }

    fn arrow(self) -> char {
        match self {
            Direction::East => '🡺',
            Direction::South => '🡻',
            Direction::West => '🡸',
            Direction::North => '🡹',
        }
    }
}

/// Machine state between two codels.
///
/// Instructions never mutate a context they are given; they return a new one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    /// Program stack after the previous codel.
    pub stack: Vec<i64>,
    /// Size of the previous codel block, pushed by `Push`.
    pub value: i64,
    /// Position of the next codel.
    pub position: Position,
    /// Direction of the next codel.
    pub direction: Direction,
    /// Everything the program printed so far.
    pub output: String,
}

impl Context {
    /// The canonical empty context every program starts from.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `steps` codels forward along the direction pointer.
    pub fn advance(&mut self, steps: i64) {
        self.position = self.position.stepped(self.direction, steps);
    }

    /// Rotate the direction pointer by `quarter_turns` × 90° clockwise.
    pub fn rotate(&mut self, quarter_turns: i64) {
        self.direction = self.direction.rotated(quarter_turns);
    }

    pub(crate) fn pop(&mut self, op: &'static str) -> Result<i64, SemanticError> {
        self.stack
            .pop()
            .ok_or_else(|| SemanticError::stack_underflow(op, 1, 0))
    }

    /// Pop `(a, b)` where `b` was on top.
    pub(crate) fn pop_pair(&mut self, op: &'static str) -> Result<(i64, i64), SemanticError> {
        if self.stack.len() < 2 {
            return Err(SemanticError::stack_underflow(op, 2, self.stack.len()));
        }
        let b = self.pop(op)?;
        let a = self.pop(op)?;
        Ok((a, b))
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {} {} {}",
            self.stack,
            self.value,
            self.position,
            self.direction.arrow()
        )
    }
}
