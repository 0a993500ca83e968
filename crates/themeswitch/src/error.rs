//! Error types for setup-time operations.
//!
//! The engine itself never fails at runtime: missing configuration disables it
//! with a warning and missing attributes are no-ops. [`ThemeError`] covers the
//! fallible edges around it: loading configuration, page fixtures, and the
//! file-backed preference store.

use std::path::PathBuf;

/// Error returned by configuration, fixture, and storage loaders.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// YAML input could not be deserialized.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON input could not be deserialized.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A string did not name a theme mode.
    #[error("unknown theme mode '{0}' (expected system, light or dark)")]
    UnknownMode(String),

    /// A string did not name a variant.
    #[error("unknown variant '{0}' (expected tri-state or binary)")]
    UnknownVariant(String),

    /// A file extension is neither YAML nor JSON.
    #[error("unsupported file format for {} (expected .yaml, .yml or .json)", path.display())]
    UnsupportedFormat {
        /// Offending path
        path: PathBuf,
    },

    /// Two elements in a page fixture share an id.
    #[error("duplicate element id '{0}' in page fixture")]
    DuplicateId(String),
}

impl ThemeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThemeError::Io {
            path: path.into(),
            source,
        }
    }
}
