use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong during a run. The per-file variants are
/// logged by the updater loop and never abort the run; the rest are fatal
/// at startup or scan time.
#[derive(Debug, Error)]
pub enum RetagError {
    #[error("the specified music directory does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("tag error: {0}")]
    Tag(#[from] lofty::error::LoftyError),

    #[error("file has no tag container")]
    NoTags,

    #[error("lookup request failed: {0}")]
    Lookup(#[from] reqwest::Error),

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("logger already initialized")]
    Logger(#[from] log::SetLoggerError),
}
