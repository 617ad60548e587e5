//! Error handling types and utilities.

use anyhow::Context;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for file-loading entry points.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned by a [`ScriptReflection`](crate::script::ScriptReflection) backend.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// No script is known under this identity.
    #[error("Script not found: {identity}")]
    NotFound { identity: String },
    /// The script exists but could not be reflected.
    #[error("Invalid script '{identity}': {reason}")]
    Invalid { identity: String, reason: String },
}

impl ScriptError {
    /// The identity of the script that failed.
    pub fn identity(&self) -> &str {
        match self {
            Self::NotFound { identity } | Self::Invalid { identity, .. } => identity,
        }
    }
}

/// Error returned when loading a documentation or settings file fails.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File not found at the expected path.
    #[error("{what} not found at {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },
    /// Failed to parse the file contents.
    #[error("Failed to parse {what} at {}: {error}", path.display())]
    Parse {
        what: &'static str,
        path: PathBuf,
        error: String,
    },
}

/// Read a file to a string, mapping a missing file to [`LoadError::NotFound`].
pub(crate) fn read_file(what: &'static str, path: &std::path::Path) -> Result<String> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            what,
            path: path.to_path_buf(),
        }
        .into());
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} at {}", what, path.display()))
}
