use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a git repository: {path}: {source}")]
    Repository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid cutoff timestamp '{0}' (expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)")]
    InvalidCutoff(String),
}

impl CoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}
