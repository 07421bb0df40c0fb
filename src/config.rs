use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boggle::lexicon::SAVE_THRESHOLD;
use crate::boggle::Difficulty;
use crate::utils::serialization::{self, JsonError};

pub const DEFAULT_LEXICON: &str = "dictionary.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load config: {0}")]
    Load(#[from] JsonError),
}

/// Session settings, read from a JSON file. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Word file the lexicon is loaded from and saved back to
    pub lexicon_path: PathBuf,
    pub difficulty: Difficulty,
    /// Net new words learned before the lexicon saves itself
    pub save_threshold: usize,
    /// Seed for mixing grids; a fresh one each run when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lexicon_path: PathBuf::from(DEFAULT_LEXICON),
            difficulty: Difficulty::default(),
            save_threshold: SAVE_THRESHOLD,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: Self = serialization::load_json(path.as_ref())?;
        info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        serialization::save_json(self, path)?;
        Ok(())
    }
}
