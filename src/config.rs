use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

use crate::classify::Keywords;
use crate::error::VizError;

/// Seed used when neither the CLI nor the config names one.
pub const DEFAULT_SEED: u64 = 42;
/// How many ranked messages the analysis keeps.
pub const DEFAULT_HIGH_VALUE_LIMIT: usize = 25;

/// Pipeline settings. Every field has a default, so an empty or partial YAML
/// file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub seed: u64,
    pub high_value_limit: usize,
    pub keywords: Keywords,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            high_value_limit: DEFAULT_HIGH_VALUE_LIMIT,
            keywords: Keywords::default(),
        }
    }
}

impl Config {
    /// Read a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut cfg: Config = serde_yaml::from_str(&text).map_err(|source| VizError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.keywords = cfg.keywords.lowercased();
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Config from `path` if given, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}
