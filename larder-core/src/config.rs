//! Configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::AuthorId;

/// Default playback clock period in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 1000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LarderConfig {
    /// Directory holding one JSON document per stored recipe.
    pub data_dir: PathBuf,
    /// Catalog file to use instead of the bundled one.
    pub catalog_path: Option<PathBuf>,
    /// Milliseconds between playback countdown ticks.
    pub tick_ms: u64,
    /// Acting author for commands that write recipes.
    pub user: Option<AuthorId>,
}

impl LarderConfig {
    /// Load configuration from environment variables.
    ///
    /// All optional:
    /// - `LARDER_DATA_DIR`: Recipe directory (default: "~/.larder/recipes")
    /// - `LARDER_CATALOG_PATH`: Ingredient catalog JSON (default: bundled)
    /// - `LARDER_TICK_MS`: Playback tick period in ms (default: 1000)
    /// - `LARDER_USER`: Acting author
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`LarderConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let data_dir = non_empty("LARDER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_data_dir);

        let catalog_path = non_empty("LARDER_CATALOG_PATH").map(PathBuf::from);

        let tick_ms = match non_empty("LARDER_TICK_MS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "LARDER_TICK_MS",
                        value,
                    })
                }
            },
            None => DEFAULT_TICK_MS,
        };

        let user = non_empty("LARDER_USER").map(|u| AuthorId::new(u.trim()));

        Ok(Self {
            data_dir,
            catalog_path,
            tick_ms,
            user,
        })
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Get the default data directory: ~/.larder/recipes
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".larder").join("recipes"))
            .unwrap_or_else(|| PathBuf::from("data/recipes"))
    }
}
