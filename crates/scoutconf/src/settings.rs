//! Configuration sections.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log filtering for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive, e.g. "info" or "songscout=debug".
    /// Default: warn
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "warn".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// Where and how the analysis report is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print the JSON report.
    /// Default: false
    #[serde(default)]
    pub pretty: bool,

    /// Write the report here instead of stdout.
    /// Default: none
    #[serde(default)]
    pub path: Option<PathBuf>,
}
