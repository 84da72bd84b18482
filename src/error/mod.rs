//! Error types for all synthesis phases.

use thiserror::Error;

/// An instruction precondition was broken while executing.
///
/// Always fatal: it means instructions were composed incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("Invalid non-empty context: \"{0}\"")]
    NonEmptyContext(String),

    #[error("Invalid non-positive push value {0}")]
    NonPositivePush(i64),

    #[error("Stack underflow in {op}: needs {needed} value(s), found {found}")]
    StackUnderflow {
        op: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("Invalid character code {0}")]
    InvalidChar(i64),

    #[error("Invalid value before {instruction}: {value}")]
    UnexpectedValue {
        instruction: &'static str,
        value: i64,
    },
}

impl SemanticError {
    pub fn stack_underflow(op: &'static str, needed: usize, found: usize) -> Self {
        Self::StackUnderflow { op, needed, found }
    }

    pub fn unexpected_value(instruction: &'static str, value: i64) -> Self {
        Self::UnexpectedValue { instruction, value }
    }
}

/// The instruction stream could not be laid out on a curve.
///
/// Recoverable by retrying with a larger curve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Failed to replace all U-turns in path; put in more iterations or stretch it\n  Original path: {original}\n  Transformed path: {transformed}")]
    UnresolvedTurns {
        original: String,
        transformed: String,
    },

    #[error("Generated single forwards in path; put in more iterations or stretch it\n  Original path: {original}\n  Transformed path: {transformed}")]
    SingleForward {
        original: String,
        transformed: String,
    },

    #[error("Not enough space in path; {remaining} remaining operations\n  Original path: {original}\n  Transformed path: {transformed}")]
    NotEnoughSpace {
        remaining: usize,
        original: String,
        transformed: String,
    },

    #[error("No curve up to {max_iterations} iterations fits the program: {last}")]
    Exhausted {
        max_iterations: u32,
        last: Box<LayoutError>,
    },
}

impl LayoutError {
    pub fn unresolved_turns(original: impl Into<String>, transformed: impl Into<String>) -> Self {
        Self::UnresolvedTurns {
            original: original.into(),
            transformed: transformed.into(),
        }
    }

    pub fn single_forward(original: impl Into<String>, transformed: impl Into<String>) -> Self {
        Self::SingleForward {
            original: original.into(),
            transformed: transformed.into(),
        }
    }

    pub fn not_enough_space(
        remaining: usize,
        original: impl Into<String>,
        transformed: impl Into<String>,
    ) -> Self {
        Self::NotEnoughSpace {
            remaining,
            original: original.into(),
            transformed: transformed.into(),
        }
    }

    /// Record the curve path the tokens were read from.
    pub fn with_original(self, path: &str) -> Self {
        match self {
            Self::NotEnoughSpace {
                remaining,
                transformed,
                ..
            } => Self::not_enough_space(remaining, path, transformed),
            other => other,
        }
    }
}

/// A composite instruction was built with invalid parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("Invalid resize value {0}; must be at least 2")]
    InvalidResize(i64),

    #[error("Invalid no-op length: {0}")]
    InvalidNoOp(i64),

    #[error("Invalid non-positive number {0}")]
    InvalidNumber(i64),

    #[error("Invalid exponent {0}; must be at least 2")]
    InvalidExponent(u32),

    #[error("Invalid number tree {0}; its arithmetic fails")]
    InvalidTree(String),
}

/// Loading or saving the decomposition table failed.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode numbers: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Failed to decode numbers: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Invalid JSON numbers: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inconsistent entry {key}: tree evaluates to {value}")]
    Inconsistent { key: i64, value: i64 },
}

/// Reading the configuration file failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Rendering the codel grid failed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Can't render program; run it first")]
    EmptyProgram,

    #[error("Invalid color name: \"{0}\"")]
    InvalidColorName(String),

    #[error("Invalid codel size {0}; must be at least 1")]
    InvalidCodelSize(u32),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A unified error type for all phases.
#[derive(Debug, Error)]
pub enum HilbertPietError {
    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    #[error("Numbers table error: {0}")]
    Table(#[from] TableError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
