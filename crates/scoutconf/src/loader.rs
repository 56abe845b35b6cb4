//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, LoggingConfig, OutputConfig, ScoutConfig};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files, optionally with a CLI override path.
///
/// System and user files are returned only if they exist. A CLI path is
/// always returned, so a missing file surfaces as a read error, and it
/// replaces the local `./songscout.toml`.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    // System config
    let system = PathBuf::from("/etc/songscout/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(dirs) = directories::BaseDirs::new() {
        let user = dirs.config_dir().join("songscout/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    // Local override (current directory)
    let local = PathBuf::from("songscout.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load config from a TOML file.
pub fn load_from_file(path: &Path) -> Result<ScoutConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_toml(&contents, path)
}

/// Parse config from a TOML string. Unknown keys and mistyped values are
/// ignored; malformed TOML is an error.
fn parse_toml(contents: &str, path: &Path) -> Result<ScoutConfig, ConfigError> {
    let table = contents
        .parse::<toml::Table>()
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut config = ScoutConfig::default();

    if let Some(logging) = table.get("logging").and_then(|v| v.as_table()) {
        if let Some(v) = logging.get("level").and_then(|v| v.as_str()) {
            config.logging.level = v.to_string();
        }
    }

    if let Some(output) = table.get("output").and_then(|v| v.as_table()) {
        if let Some(v) = output.get("pretty").and_then(|v| v.as_bool()) {
            config.output.pretty = v;
        }
        if let Some(v) = output.get("path").and_then(|v| v.as_str()) {
            config.output.path = Some(expand_path(v));
        }
    }

    Ok(config)
}

/// Merge two configs, with non-default `overlay` values taking precedence.
pub fn merge_configs(base: ScoutConfig, overlay: ScoutConfig) -> ScoutConfig {
    let default_logging = LoggingConfig::default();

    ScoutConfig {
        logging: LoggingConfig {
            level: if overlay.logging.level != default_logging.level {
                overlay.logging.level
            } else {
                base.logging.level
            },
        },
        output: OutputConfig {
            pretty: overlay.output.pretty || base.output.pretty,
            path: overlay.output.path.or(base.output.path),
        },
    }
}

/// Apply process environment overrides to config.
pub fn apply_env_overrides(config: &mut ScoutConfig, sources: &mut ConfigSources) {
    apply_env_overrides_from(config, sources, env::vars());
}

/// Apply overrides from an explicit set of variables.
///
/// `RUST_LOG` is applied after `SONGSCOUT_LOG_LEVEL`, so it wins when both
/// are set.
pub fn apply_env_overrides_from(
    config: &mut ScoutConfig,
    sources: &mut ConfigSources,
    vars: impl IntoIterator<Item = (String, String)>,
) {
    let vars: HashMap<String, String> = vars.into_iter().collect();

    if let Some(v) = vars.get("SONGSCOUT_LOG_LEVEL") {
        config.logging.level = v.clone();
        sources.env_overrides.push("SONGSCOUT_LOG_LEVEL".to_string());
    }
    if let Some(v) = vars.get("RUST_LOG") {
        config.logging.level = v.clone();
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    if let Some(v) = vars.get("SONGSCOUT_PRETTY") {
        config.output.pretty = parse_flag(v);
        sources.env_overrides.push("SONGSCOUT_PRETTY".to_string());
    }
    if let Some(v) = vars.get("SONGSCOUT_OUTPUT") {
        config.output.path = Some(expand_path(v));
        sources.env_overrides.push("SONGSCOUT_OUTPUT".to_string());
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        match directories::BaseDirs::new() {
            Some(dirs) => dirs.home_dir().join(stripped),
            None => PathBuf::from(path),
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // Handle $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}
