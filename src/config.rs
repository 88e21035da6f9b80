use crate::converter::Palette;
use crate::{PlayerError, Result, DEFAULT_PALETTE, DEFAULT_SCALE_FACTOR};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming an optional JSON configuration file
pub const CONFIG_ENV_VAR: &str = "CONSOLE_PLAYER_CONFIG";

/// Player configuration, built once at startup and never mutated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Characters from darkest to brightest
    pub palette: String,
    /// Divisor applied to the source video dimensions
    pub scale_factor: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.to_string(),
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

impl PlayerConfig {
    /// Load the file named by `CONSOLE_PLAYER_CONFIG`, or the defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                info!("Loading configuration from {}", Path::new(&path).display());
                Self::from_file(Path::new(&path))
            }
            None => {
                debug!("{} not set, using built-in configuration", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// Read and validate a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(PlayerError::InvalidConfig(
                "Palette must contain at least one character".to_string(),
            ));
        }
        if self.scale_factor == 0 {
            return Err(PlayerError::InvalidConfig(
                "Scale factor must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Palette described by this configuration
    pub fn palette(&self) -> Result<Palette> {
        Palette::new(&self.palette)
    }
}
