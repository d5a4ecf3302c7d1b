use std::fs;

use anyhow::{Context, Result};

use molprops::{Isolation, PipelineConfig};

use crate::cli::{self, PipelineOptions};

/// Layers CLI flags over the `--config` file (or the defaults).
pub fn build_pipeline_config(opts: &PipelineOptions) -> Result<PipelineConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            PipelineConfig::from_toml(&text)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    if let Some(n) = opts.chunk_size {
        config.chunk_size = n;
    }
    if let Some(n) = opts.max_workers {
        config.max_workers = n;
    }
    if let Some(mode) = opts.isolation {
        config.isolation = mode.into();
    }
    if let Some(name) = &opts.smiles_column {
        config.structure_pattern = name.clone();
    }
    if let Some(name) = &opts.name_column {
        config.name_pattern = name.clone();
    }

    config.validate()?;
    Ok(config)
}

impl From<cli::Isolation> for Isolation {
    fn from(mode: cli::Isolation) -> Self {
        match mode {
            cli::Isolation::Process => Isolation::Process,
            cli::Isolation::Thread => Isolation::Thread,
        }
    }
}
