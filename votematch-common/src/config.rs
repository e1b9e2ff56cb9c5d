//! Configuration loading and data directory resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "VOTEMATCH_CONFIG";

/// Environment variable naming the static data directory
pub const DATA_DIR_ENV_VAR: &str = "VOTEMATCH_DATA_DIR";

/// Bootstrap configuration loaded from TOML file
///
/// Every field has a default, so an empty file (or no file at all) is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Directory holding taxonomy.json, conflicts.json, candidates.json and
    /// measures.json. The built-in catalog is used when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Result cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Result cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache whole-request results for the process lifetime
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cache_enabled() -> bool {
    true
}

/// Load configuration following this priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. Platform config file (`<config dir>/votematch/config.toml`)
/// 4. Compiled defaults (fallback)
///
/// An explicitly named file (tiers 1 and 2) that cannot be read is an error;
/// a missing platform file is not.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        info!("Loading config from command line: {}", path.display());
        return read_toml_config(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        info!("Loading config from {}: {}", CONFIG_ENV_VAR, path);
        return read_toml_config(Path::new(&path));
    }

    // Priority 3: Platform config file
    if let Some(path) = default_config_path() {
        if path.exists() {
            info!("Loading config from {}", path.display());
            return read_toml_config(&path);
        }
        debug!("No config file at {}", path.display());
    }

    // Priority 4: Compiled defaults
    Ok(TomlConfig::default())
}

/// Platform config file location (`~/.config/votematch/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("votematch").join("config.toml"))
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)?;
    Ok(config)
}

/// Write a TOML config file, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Resolve the static data directory
///
/// **Priority:** CLI → ENV → TOML. `None` means use the built-in catalog.
pub fn resolve_data_dir(cli_arg: Option<&Path>, config: &TomlConfig) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(DATA_DIR_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    config.data_dir.clone()
}
