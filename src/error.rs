use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("path '{relative}' escapes the workspace root")]
    JailViolation { relative: PathBuf },

    #[error("path '{relative}' not found in workspace")]
    NotFound { relative: PathBuf },

    #[error("workspace name '{name}' is not filesystem-safe")]
    InvalidName { name: String },

    #[error("workspace root must be a directory: {path}")]
    RootNotADirectory { path: PathBuf },

    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WorkspaceError {
    #[must_use]
    pub fn jail_violation(relative: impl Into<PathBuf>) -> Self {
        Self::JailViolation {
            relative: relative.into(),
        }
    }

    #[must_use]
    pub fn not_found(relative: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            relative: relative.into(),
        }
    }

    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Returns true when this error is the security-relevant containment
    /// rejection, which callers must report distinctly from not-found.
    #[must_use]
    pub fn is_jail_violation(&self) -> bool {
        matches!(self, Self::JailViolation { .. })
    }
}
