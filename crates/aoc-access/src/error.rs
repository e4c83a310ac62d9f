//! Error types for accessibility access

use aoc_model::{DocumentId, ServiceError, Unsupported};

/// Failures obtaining windows or accessible roots
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The document has no window (closed or never shown)
    #[error("no window for document {0}")]
    WindowUnavailable(DocumentId),

    /// The document cannot be projected
    #[error(transparent)]
    Unsupported(#[from] Unsupported),

    /// Reading the document failed
    #[error("document access failed: {0}")]
    Service(#[from] ServiceError),
}
