use std::path::{Path, PathBuf};

use thiserror::Error;

use prodcat_core::DomainError;
use prodcat_reports::ReportError;

/// Errors at the persistence / filesystem boundary.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record '{record}': {reason}")]
    Parse { record: String, reason: String },

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl InfraError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn parse(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            record: record.into(),
            reason: reason.into(),
        }
    }
}
