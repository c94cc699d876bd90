//! Configuration management

use crate::language::Language;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Detector configuration as loaded from a TOML file.
///
/// An empty `languages` list stands for the whole catalog. Feed the loaded
/// value to [`LanguageDetectorBuilder::from_config`](crate::LanguageDetectorBuilder::from_config).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Languages the detector may report; empty means all of them.
    #[serde(default)]
    pub languages: Vec<Language>,

    /// Confidence margin the winner must clear, in [0.0, 0.99].
    #[serde(default)]
    pub minimum_relative_distance: f64,

    /// Root of the `language-models/` directory tree.
    #[serde(default = "default_model_directory")]
    pub model_directory: PathBuf,
}

fn default_model_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            minimum_relative_distance: 0.0,
            model_directory: default_model_directory(),
        }
    }
}

/// Load configuration from file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DetectorConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: DetectorConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config<P: AsRef<Path>>(config: &DetectorConfig, path: P) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
