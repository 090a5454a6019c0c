//! Shell configuration.
//!
//! Loaded from `knead.toml`. Missing or unreadable files fall back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "knead.toml";

/// Default log directive.
const DEFAULT_LOG_FILTER: &str = "knead=info";

/// Default prompt.
const DEFAULT_PROMPT: &str = "knead> ";

/// Shell configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Catalog file to load (None = embedded seed catalog)
    pub catalog: Option<PathBuf>,
    /// Log directive used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Prompt printed before each command
    pub prompt: String,
    /// Print the inventory after every successful craft
    pub show_inventory_after_craft: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            show_inventory_after_craft: true,
        }
    }
}

impl CliConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                info!("Loaded config from {}", path.display());
                config.validate();
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Replace blank values with defaults.
    pub fn validate(&mut self) {
        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }
        if self.prompt.is_empty() {
            self.prompt = DEFAULT_PROMPT.to_string();
        }
        if self
            .catalog
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            self.catalog = None;
        }
    }
}
