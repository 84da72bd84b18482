//! Number decomposition: cheapest known ways to leave an integer on the stack.
//!
//! # Architecture
//!
//! - `tree`: arithmetic expression trees and their cost model
//! - `optimizer`: sweep-based search over a bounded range
//! - `table`: the resulting lookup table and its persistence

pub mod optimizer;
pub mod table;
pub mod tree;

pub use optimizer::{Optimizer, OptimizerOptions, Sweep};
pub use table::NumberTable;
pub use tree::{BinaryOperator, NumberTree};
