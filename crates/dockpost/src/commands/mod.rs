pub mod info;
pub mod request;
pub mod run;
pub mod validate;

use colored::Colorize;
use dockpost_core::RawConfig;
use std::path::PathBuf;

/// Load the given configuration file, or the discovered one.
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<RawConfig> {
    let path = match path {
        Some(path) => path,
        None => dockpost_config::find_config_file()?,
    };
    let config = dockpost_config::load_raw_config(&path)?;
    println!("Configuration: {}", path.display().to_string().cyan());
    Ok(config)
}
