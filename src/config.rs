//! YAML configuration of a synthesis run.
//!
//! ```yaml
//! layout:
//!   start_iterations: 1
//!   max_iterations: 4
//! optimizer:
//!   limit: 128
//!   rounds: 2
//!   sweeps: [pow, mul, div, add, sub]
//! render:
//!   codel_size: 20
//!   initial_color: red
//! ```
//!
//! Every key is optional and falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::LayoutOptions;
use crate::numbers::OptimizerOptions;
use crate::render::RenderOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutOptions,
    pub optimizer: OptimizerOptions,
    pub render: RenderOptions,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    pub fn with_codel_size(mut self, codel_size: u32) -> Self {
        self.render.codel_size = codel_size;
        self
    }

    pub fn with_initial_color(mut self, initial_color: impl Into<String>) -> Self {
        self.render.initial_color = initial_color.into();
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.optimizer.limit = limit;
        self
    }
}
