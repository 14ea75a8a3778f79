//! Error taxonomy for feature-flow hooks.
//!
//! Only unexpected failures are errors. Expected absence (no plugin root, no
//! config file, no `plugin_version` field) is modelled with `Option` and
//! [`SessionOutcome`](crate::session::SessionOutcome) variants instead.

use std::path::PathBuf;

/// Hook errors. Every variant is caught at the guarded boundary and logged;
/// none of them ever reaches the host as a failure.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {} is not valid UTF-8", path.display())]
    NotUtf8 { path: PathBuf },

    #[error("failed to write advisory output: {0}")]
    Advisory(#[source] std::io::Error),

    #[error("invalid hook input: {0}")]
    HookInput(#[from] serde_json::Error),
}

impl HookError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HookError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for hook operations.
pub type Result<T> = std::result::Result<T, HookError>;
