//! Capability views
//!
//! Components ask for a typed view of a document or object and receive
//! either the view or a definite [`Unsupported`] answer.

use serde::{Deserialize, Serialize};

/// Closed set of capabilities a subject may offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Exposes an accessible projection
    AccessibleProvider,
    /// Accepts text and embedded content at a cursor
    TextInsertable,
    /// Carries a typed property set
    PropertyBearing,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AccessibleProvider => "accessible-provider",
            Self::TextInsertable => "text-insertable",
            Self::PropertyBearing => "property-bearing",
        };
        f.write_str(name)
    }
}

/// A requested capability is not offered by the subject
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{subject} does not support {capability}")]
pub struct Unsupported {
    /// Requested capability
    pub capability: Capability,
    /// Description of the subject that was asked
    pub subject: String,
}
