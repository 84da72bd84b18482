//! Hilbertpiet: synthesizes Piet programs printing a given string, with the
//! codels laid out along a Hilbert curve.
//!
//! This is the library root that exports all modules.
//!
//! # Pipeline
//!
//! - **Compilation**: every character becomes a number tree and an `OUT_CHAR`
//! - **Layout**: the instructions are packed along a stretched curve path,
//!   retrying with larger curves until they fit
//! - **Execution**: the laid-out program is run for its output and codel map,
//!   which [`render`] turns into an image

#![allow(clippy::new_without_default)]
#![allow(clippy::len_without_is_empty)]

pub mod color;
pub mod config;
pub mod error;
pub mod layout;
pub mod machine;
pub mod numbers;
pub mod render;

use tracing::{debug, info, warn};

use error::HilbertPietError;
use layout::{Fitted, LayoutOptions};
use machine::{Execution, Op, Program};
use numbers::NumberTable;

/// Whether a character is compiled: printable ASCII and ASCII whitespace.
pub fn is_printable(c: char) -> bool {
    c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Compile the printable characters of `text` into push/output pairs.
pub fn compile_text(text: &str, table: &NumberTable) -> Result<Program, HilbertPietError> {
    let mut body = Vec::new();
    let mut skipped = 0;
    for c in text.chars() {
        if !is_printable(c) {
            skipped += 1;
            continue;
        }
        body.push(table.push_number(c as i64)?);
        body.push(Op::OutChar.into());
    }
    if skipped > 0 {
        warn!("Skipping {} non-printable characters", skipped);
    }
    Ok(Program::new(body))
}

/// Result of a synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// The laid-out program.
    pub program: Program,
    /// Curve iterations the program follows.
    pub iterations: u32,
    pub execution: Execution,
}

impl Synthesis {
    /// Text printed by the program.
    pub fn output(&self) -> &str {
        &self.execution.context.output
    }
}

/// Compile `text`, lay it out on the smallest fitting curve and run it.
pub fn synthesize(
    text: &str,
    table: &NumberTable,
    options: &LayoutOptions,
) -> Result<Synthesis, HilbertPietError> {
    info!("Input length = {}", text.chars().count());

    // Compilation
    let compiled = compile_text(text, table)?;
    info!("{} codels before mapping", compiled.size());

    // Layout
    let Fitted {
        program,
        iterations,
    } = layout::fit(&compiled.layout_units(), options)?;
    info!("{} Hilbert curve iterations", iterations);
    info!("{} codels after mapping", program.size());

    // Execution
    let execution = program.run()?;
    debug!(codels = execution.codels.len(), "program run");

    Ok(Synthesis {
        program,
        iterations,
        execution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::numbers::OptimizerOptions;
    use pretty_assertions::assert_eq;

    fn table() -> NumberTable {
        NumberTable::optimized(&OptimizerOptions::default()).unwrap()
    }

    #[test]
    fn test_is_printable() {
        for c in ['a', 'Z', '0', '~', ' ', '\t', '\n', '\r', '\x0b', '\x0c'] {
            assert!(is_printable(c), "{:?}", c);
        }
        for c in ['\0', '\x7f', '\x1b', 'é', '€'] {
            assert!(!is_printable(c), "{:?}", c);
        }
    }

    #[test]
    fn test_compile_text() {
        let program = compile_text("Hi", &table()).unwrap();
        assert_eq!(program.body().len(), 4);
        assert_eq!(program.body()[1], Op::OutChar.into());
        assert_eq!(program.run().unwrap().context.output, "Hi");
    }

    #[test]
    fn test_compile_skips_non_printable() {
        let program = compile_text("H\u{e9}i\0", &NumberTable::new()).unwrap();
        assert_eq!(program.body().len(), 4);
        assert_eq!(program.run().unwrap().context.output, "Hi");
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let table = table();
        let options = LayoutOptions::default();
        let first = synthesize("Hi", &table, &options).unwrap();
        let second = synthesize("Hi", &table, &options).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.output(), "Hi");
        assert_eq!(first.execution.codels.len() as i64, first.program.size());
        assert_eq!(
            first.program.size() as usize,
            layout::generate(first.iterations).len()
        );
    }

    #[test]
    fn test_synthesize_round_trip() {
        let table = table();
        for text in ["", "a", "Hello, World!\n", "tab\tand\r\nnewlines ~{}"] {
            let synthesis = synthesize(text, &table, &LayoutOptions::default()).unwrap();
            assert_eq!(synthesis.output(), text);
            assert!(synthesis.execution.context.stack.is_empty());
        }
    }

    #[test]
    fn test_synthesize_with_leaves_only_exhausts_layout() {
        let err = synthesize("Hi", &NumberTable::new(), &LayoutOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            HilbertPietError::Layout(LayoutError::Exhausted {
                max_iterations: 4,
                ..
            })
        ));
    }
}
