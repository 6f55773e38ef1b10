//! Configuration file discovery and loading
//!
//! Files are YAML (JSON is accepted too, being valid YAML) with a top-level
//! mapping. The plugin settings either sit at the top level or under a
//! `docker:` key, which lets a release tool's shared config file carry them.

pub mod error;

pub use error::*;

use dockpost_core::RawConfig;
use std::path::{Path, PathBuf};

/// Environment variable pointing directly at a configuration file
pub const CONFIG_PATH_ENV: &str = "DOCKPOST_CONFIG";

/// Key that scopes the plugin settings inside a shared file
pub const SECTION_KEY: &str = "docker";

const CANDIDATES: [&str; 5] = [
    "dockpost.local.yaml",
    ".dockpost.local.yaml",
    "dockpost.yaml",
    ".dockpost.yaml",
    "dockpost.json",
];

/// Find the project's configuration file.
///
/// Search order:
/// 1. `DOCKPOST_CONFIG` (direct path, used if it exists)
/// 2. current directory, in the order of `CANDIDATES`
/// 3. `./.dockpost/` with the same names
/// 4. `~/.config/dockpost/dockpost.yaml`
pub fn find_config_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(
            "{} points to {}, which does not exist",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    let current_dir = std::env::current_dir()?;
    if let Some(path) = find_in_dir(&current_dir) {
        return Ok(path);
    }

    let dot_dir = current_dir.join(".dockpost");
    if dot_dir.is_dir()
        && let Some(path) = find_in_dir(&dot_dir)
    {
        return Ok(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("dockpost").join("dockpost.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Read a configuration file into the raw mapping the plugin consumes.
pub fn load_raw_config(path: &Path) -> Result<RawConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_raw_config(&content, path)?;
    tracing::debug!("Loaded {} keys from {}", config.len(), path.display());
    Ok(config)
}

/// Parse configuration text. `path` is only used in error messages.
pub fn parse_raw_config(content: &str, path: &Path) -> Result<RawConfig> {
    let value: serde_json::Value =
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let serde_json::Value::Object(mut map) = value else {
        return Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        });
    };

    match map.remove(SECTION_KEY) {
        Some(serde_json::Value::Object(section)) => Ok(section),
        Some(other) => {
            map.insert(SECTION_KEY.to_string(), other);
            Ok(map)
        }
        None => Ok(map),
    }
}
