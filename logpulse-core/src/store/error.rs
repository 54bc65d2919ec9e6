use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    #[error("store busy: {message}")]
    Busy { message: String },

    #[error("store call timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("points rejected: {message}")]
    Rejected { message: String },

    #[error("failed to encode point: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Transient errors are worth retrying; everything else fails the chunk immediately.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::Busy { .. } | Self::Timeout { .. } | Self::Io { .. }
        )
    }
}
