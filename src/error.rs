use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the threading core.
///
/// Insertion itself never fails: a message whose parent cannot be found is
/// placed at the top level. The only failures are about the input sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThreadingError {
    #[error("cannot build a thread tree from an empty message sequence")]
    EmptySequence,
    #[error("ordered message sequence is exhausted")]
    EndOfSequence,
}

/// Errors that abort loading an input path.
///
/// Individual messages that fail to parse are not errors at this level; they
/// are logged and counted in the load report.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode message list {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to open mbox {path}: {source}")]
    Mbox {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create parser thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}
