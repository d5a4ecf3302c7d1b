//! Pipeline configuration.
//!
//! [`PipelineConfig`] can be built in code, or loaded from TOML where every
//! field is optional:
//!
//! ```toml
//! chunk_size = 3
//! max_workers = 4
//! isolation = "process"
//! structure_pattern = "SMILES"
//! name_pattern = "Molecule name"
//! ```

use serde::{Deserialize, Serialize};

use super::error::Error;

/// How chunk computations are isolated from each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Isolation {
    /// One OS process per chunk.
    #[default]
    Process,
    /// One thread per chunk inside the calling process.
    Thread,
}

/// Tunables for partitioning and column resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Target rows per chunk (`T`).
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Upper bound on concurrent workers (`W`).
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    #[serde(default)]
    pub isolation: Isolation,

    /// Case-insensitive name of the structure column.
    #[serde(default = "default_structure_pattern")]
    pub structure_pattern: String,

    /// Case-insensitive name of the unique molecule name column.
    #[serde(default = "default_name_pattern")]
    pub name_pattern: String,
}

fn default_chunk_size() -> usize {
    3
}
fn default_max_workers() -> usize {
    4
}
fn default_structure_pattern() -> String {
    "SMILES".to_string()
}
fn default_name_pattern() -> String {
    "Molecule name".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            max_workers: default_max_workers(),
            isolation: Isolation::default(),
            structure_pattern: default_structure_pattern(),
            name_pattern: default_name_pattern(),
        }
    }
}

impl PipelineConfig {
    /// Parses a TOML document and validates the result.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let config: PipelineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values no run could succeed with.
    ///
    /// A `max_workers` of 0 or 1 is accepted here; whether it is usable
    /// depends on the row count and is decided when partitioning.
    pub fn validate(&self) -> Result<(), Error> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        if self.structure_pattern.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "structure_pattern must not be empty".to_string(),
            ));
        }
        if self.name_pattern.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "name_pattern must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
