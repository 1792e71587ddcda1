use std::path::PathBuf;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Ways linking a binary variant can fail.
#[derive(Debug, Error)]
pub enum InstallError {
    /// No variant is shipped for this host; raised before touching the filesystem.
    #[error("Windows is not yet supported (host reported {os_type:?})")]
    UnsupportedPlatform { os_type: String },

    #[error("Failed to {action} {}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl InstallError {
    pub(crate) fn filesystem(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: anyhow::Error,
    ) -> Self {
        InstallError::Filesystem {
            action,
            path: path.into(),
            source: source.into(),
        }
    }
}
