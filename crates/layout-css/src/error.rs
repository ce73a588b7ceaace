//! Error types.
//!
//! Only structurally fatal input stops a build ([`BuildError`]). Everything
//! else degrades to fewer rules and is reported through
//! [`Warning`](crate::Warning) instead.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain or decode one input artifact.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", display_path(.path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("no source named '{0}'")]
    NotFound(String),
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<inline>".to_string())
}

impl SourceError {
    /// Attaches a file path to a parse error produced from in-memory text.
    pub fn at(self, file: impl Into<PathBuf>) -> Self {
        match self {
            SourceError::Parse { path: None, message } => SourceError::Parse {
                path: Some(file.into()),
                message,
            },
            other => other,
        }
    }
}

/// Fatal build failure.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configuration is missing or unparseable.
    #[error("failed to load config: {0}")]
    Config(#[source] SourceError),

    /// The set of variant files could not be enumerated.
    #[error("failed to list layout sources: {0}")]
    Source(#[source] SourceError),
}
