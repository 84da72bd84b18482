//! Laying programs out on a space-filling curve.
//!
//! # Architecture
//!
//! - `curve`: the curve path and its stretching
//! - `tokens`: turns and capacity-bearing slots of a path
//! - `mapper`: greedy packing of instructions into slots
//!
//! [`fit`] retries generate, tokenize and map with larger curves until the
//! program fits.

pub mod curve;
pub mod mapper;
pub mod tokens;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LayoutError;
use crate::machine::{Instruction, Program};

pub use curve::{generate, stretch, STRETCH_FACTOR};
pub use mapper::map_program_to_path;
pub use tokens::{format_tokens, tokenize, PathToken};

/// Curve iterations tried by [`fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub start_iterations: u32,
    pub max_iterations: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            start_iterations: 1,
            max_iterations: 4,
        }
    }
}

/// A program laid out on a curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fitted {
    pub program: Program,
    /// Curve iterations of the path the program follows.
    pub iterations: u32,
}

/// Lay `units` out on the smallest curve in the configured range.
///
/// Layout errors trigger a retry with one more iteration; the last one is
/// reported once the range is exhausted.
pub fn fit(units: &[Instruction], options: &LayoutOptions) -> Result<Fitted, LayoutError> {
    let mut last = None;
    for iterations in options.start_iterations..=options.max_iterations {
        match attempt(units, iterations) {
            Ok(program) => {
                debug!(iterations, codels = program.size(), "program fits");
                return Ok(Fitted {
                    program,
                    iterations,
                });
            }
            Err(err) => {
                debug!(iterations, "layout failed: {}", err);
                last = Some(err);
            }
        }
    }
    let last = last.unwrap_or_else(|| LayoutError::not_enough_space(units.len(), "", ""));
    Err(LayoutError::Exhausted {
        max_iterations: options.max_iterations,
        last: Box::new(last),
    })
}

fn attempt(units: &[Instruction], iterations: u32) -> Result<Program, LayoutError> {
    let path = generate(iterations);
    let tokens = tokenize(&path)?;
    map_program_to_path(units, &tokens).map_err(|err| err.with_original(&path))
}
