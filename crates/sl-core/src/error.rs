//! Unified error type for the streamlens application.
//!
//! All crates funnel their failures into [`Error`]. Outcomes a probe can
//! express through its report (timeout, empty codec lists) are never errors;
//! only conditions that prevent a probe from running at all are.

use std::fmt;

/// Unified error type covering all failure modes in streamlens.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "camera").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Configuration or request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The external analyzer tool could not be located or launched.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// A probe cycle failed before it could produce a report.
    #[error("Probe error: {0}")]
    Probe(String),
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
