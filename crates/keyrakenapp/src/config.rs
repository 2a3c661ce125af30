//! # Configuration
//!
//! Keyraken configuration is managed by [`clapfig`], which handles layered loading
//! from TOML files and environment variables on top of the `confique` defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `KEYRAKEN__DEFAULT_LOGIC`, `KEYRAKEN__COMPACT`, `KEYRAKEN__ALWAYS_RELOCK`.
//! 2. **Config file**: `keyraken.toml` in the OS config directory (via `directories`).
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! Command line flags always win over all of the above.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `default_logic` | `AND` | Filter logic when `--logic` is not given |
//! | `compact` | `false` | Single-line JSON output |
//! | `always_relock` | `false` | Relock the collection after every command |

use crate::attributes::Logic;
use crate::error::{KeyrakenError, Result};
use clapfig::{Clapfig, SearchMode, SearchPath};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "keyraken.toml";

/// Configuration for keyraken, stored in `keyraken.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyrakenConfig {
    /// Filter logic used when `--logic` is not passed ("AND" or "OR").
    #[config(default = "AND")]
    pub default_logic: String,

    /// Print single-line JSON instead of indented JSON.
    #[config(default = false)]
    pub compact: bool,

    /// Behave as if `--relock` was passed to every command.
    #[config(default = false)]
    pub always_relock: bool,
}

impl Default for KeyrakenConfig {
    fn default() -> Self {
        Self {
            default_logic: "AND".to_string(),
            compact: false,
            always_relock: false,
        }
    }
}

impl KeyrakenConfig {
    /// Load from env and the config directory. A broken file falls back to defaults.
    pub fn load() -> Self {
        let search_paths = config_dir()
            .map(|dir| vec![SearchPath::Path(dir)])
            .unwrap_or_default();

        match Clapfig::builder::<KeyrakenConfig>()
            .app_name("keyraken")
            .file_name(CONFIG_FILE_NAME)
            .search_paths(search_paths)
            .search_mode(SearchMode::Merge)
            .load()
        {
            Ok(config) => {
                debug!(?config, "configuration loaded");
                config
            }
            Err(e) => {
                warn!("could not load configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// The configured default logic.
    pub fn logic(&self) -> Result<Logic> {
        self.default_logic.parse().map_err(|_| {
            KeyrakenError::InvalidInput(format!(
                "Invalid default_logic '{}' in configuration, expected AND or OR",
                self.default_logic
            ))
        })
    }
}

/// OS-appropriate directory holding `keyraken.toml`.
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "keyraken", "keyraken").map(|dirs| dirs.config_dir().to_path_buf())
}
