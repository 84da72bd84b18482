//! Lookup table from integer to its best-known number tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConstructionError, TableError};
use crate::machine::Instruction;

use super::optimizer::{Optimizer, OptimizerOptions};
use super::tree::NumberTree;

/// Decomposition table. Numbers without an entry fall back to a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumberTable {
    trees: BTreeMap<i64, NumberTree>,
}

impl NumberTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the optimizer and collect its trees.
    pub fn optimized(options: &OptimizerOptions) -> Result<Self, ConstructionError> {
        let mut optimizer = Optimizer::new(options.limit)?;
        optimizer.run(options);
        Ok(optimizer.into_table())
    }

    /// Trees keyed by the numbers they evaluate to.
    pub(super) fn from_entries(trees: BTreeMap<i64, NumberTree>) -> Self {
        Self { trees }
    }

    /// Store a tree under the number it evaluates to.
    pub fn insert(&mut self, tree: NumberTree) -> Result<Option<NumberTree>, ConstructionError> {
        let value = tree
            .checked_value()
            .ok_or_else(|| ConstructionError::InvalidTree(tree.to_string()))?;
        if value <= 0 {
            return Err(ConstructionError::InvalidNumber(value));
        }
        Ok(self.trees.insert(value, tree))
    }

    /// Best-known tree for `n`.
    pub fn get(&self, n: i64) -> Result<NumberTree, ConstructionError> {
        match self.trees.get(&n) {
            Some(tree) => Ok(tree.clone()),
            None => NumberTree::leaf(n),
        }
    }

    /// Instruction leaving `n` on top of the stack.
    pub fn push_number(&self, n: i64) -> Result<Instruction, ConstructionError> {
        Ok(Instruction::Number(self.get(n)?))
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &NumberTree)> + '_ {
        self.trees.iter().map(|(n, tree)| (*n, tree))
    }

    /// Load a table, JSON if the extension is `.json`, MessagePack otherwise.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let bytes = fs::read(path)?;
        let table = if is_json(path) {
            serde_json::from_slice(&bytes)?
        } else {
            Self::from_bytes(&bytes)?
        };
        debug!(path = %path.display(), entries = table.len(), "numbers loaded");
        table.validated()
    }

    /// Save the table, in the format chosen by the extension.
    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        let bytes = if is_json(path) {
            serde_json::to_vec_pretty(self)?
        } else {
            self.to_bytes()?
        };
        fs::write(path, bytes)?;
        debug!(path = %path.display(), entries = self.len(), "numbers saved");
        Ok(())
    }

    /// Encode to MessagePack.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TableError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Decode from MessagePack, without validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    /// Check every tree evaluates to its key.
    fn validated(self) -> Result<Self, TableError> {
        for (&key, tree) in &self.trees {
            let value = tree.checked_value().unwrap_or(0);
            if key <= 0 || value != key {
                return Err(TableError::Inconsistent { key, value });
            }
        }
        Ok(self)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
