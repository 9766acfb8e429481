//! Lowering configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Tunables for THIR construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LowerConfig {
    /// Maximum expression nesting depth before lowering gives up
    pub recursion_limit: usize,
}

impl Default for LowerConfig {
    fn default() -> Self {
        Self {
            recursion_limit: 512,
        }
    }
}

impl LowerConfig {
    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has fields of the wrong type.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse lowering config")
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lowering config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse lowering config: {}", path.display()))
    }
}
