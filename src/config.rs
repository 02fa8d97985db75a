//! Store configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name used when no path is configured
pub const DEFAULT_SAVE_FILE: &str = "save.bin";

/// How the store finds its record and seeds mission generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Location of the save record
    pub save_path: PathBuf,
    /// Fixed seed for mission rolls (random when absent)
    pub rng_seed: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from(DEFAULT_SAVE_FILE),
            rng_seed: None,
        }
    }
}

impl StoreConfig {
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Parse from JSON; missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
