use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Configuration file not found. Looked in:\n\
        - current directory: dockpost.local.yaml, .dockpost.local.yaml, dockpost.yaml, .dockpost.yaml, dockpost.json\n\
        - ./.dockpost/ directory\n\
        - ~/.config/dockpost/dockpost.yaml\n\
        A path can also be given with the DOCKPOST_CONFIG environment variable"
    )]
    ConfigFileNotFound,

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path}: expected a mapping at the top level")]
    NotAMapping { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
