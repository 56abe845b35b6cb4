//! Configuration loading for songscout.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/songscout/config.toml` (system)
//! 2. `~/.config/songscout/config.toml` (user)
//! 3. `./songscout.toml` (local override, replaced by `--config <path>`)
//! 4. Environment variables (`SONGSCOUT_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [output]
//! pretty = true
//! path = "~/analyses/latest.json"
//! ```

pub mod loader;
pub mod settings;

pub use loader::{discover_config_files_with_override, expand_path, ConfigSources};
pub use settings::{LoggingConfig, OutputConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete songscout configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl ScoutConfig {
    /// Load configuration and report where values came from.
    ///
    /// If `config_path` is provided, it takes precedence over the local
    /// `./songscout.toml`. System and user configs still load first.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = ScoutConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            let file_config = loader::load_from_file(&path)?;
            config = loader::merge_configs(config, file_config);
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }
}
