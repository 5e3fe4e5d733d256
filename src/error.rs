use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tree data in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("tree root '{0}' must be a folder")]
    RootNotFolder(String),

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("logger already initialised")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
