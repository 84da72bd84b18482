//! The target machine: a stack-based, two-dimensional, color-encoded
//! instruction set.
//!
//! # Architecture
//!
//! - `context`: machine state (stack, block value, position, direction, output)
//! - `op`: primitive instructions, one codel each
//! - `instruction`: composite instructions (resizes, U-turns, fillers, numbers)
//! - `program`: programs, their execution and the resulting codel map
//! - `disassembler`: debug output for program inspection

pub mod context;
pub mod disassembler;
pub mod instruction;
pub mod op;
pub mod program;

pub use context::{Context, Direction, Position};
pub use disassembler::disassemble;
pub use instruction::{Instruction, NoOp, Resize, Turn, ANTICLOCKWISE_SETUP, CLOCKWISE_SETUP};
pub use op::Op;
pub use program::{CodelMap, Execution, Program};
