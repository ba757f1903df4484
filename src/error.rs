//! Error types for the résumé renderer

use thiserror::Error;

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, validating or rendering a résumé
#[derive(Error, Debug)]
pub enum Error {
    /// A section's target region does not exist in the host document
    #[error("Mount point not found: #{0}")]
    MissingMountPoint(String),

    /// A node handle that was freed or never belonged to this document
    #[error("Invalid node handle: {0}")]
    InvalidNode(usize),

    /// The résumé record is malformed
    #[error("Invalid resume data: {0}")]
    InvalidData(String),

    /// The host document could not be used
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Failed to read the résumé record
    #[error("Failed to load resume data: {0}")]
    LoadError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A section projection failed and the render was aborted
    #[error("Section '{section}' failed: {source}")]
    SectionFailed {
        section: String,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when this error (or the error a section failure wraps) is a
    /// missing mount point.
    pub fn is_missing_mount_point(&self) -> bool {
        match self {
            Error::MissingMountPoint(_) => true,
            Error::SectionFailed { source, .. } => source.is_missing_mount_point(),
            _ => false,
        }
    }
}
