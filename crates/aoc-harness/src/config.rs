//! Test parameters
//!
//! Parameters are plain data with defaults for the graphic-object scenario.
//! They can be loaded from TOML; missing keys keep their defaults.
//!
//! ```toml
//! debug_is_active = true
//! document_kind = "text"
//! object_service = "GraphicObject"
//! target_role = "GRAPHIC"
//! sentinel_title = "New Title"
//! ```

use aoc_access::Role;
use aoc_model::DocumentKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the relation carrying the event producer
pub const EVENT_PRODUCER: &str = "EventProducer";

/// Title written by the trigger before restoring the original
pub const DEFAULT_SENTINEL_TITLE: &str = "New Title";

/// Service name of the embedded graphic placeholder
pub const GRAPHIC_OBJECT_SERVICE: &str = "GraphicObject";

/// Parameters of one conformance run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestParameters {
    /// Dump the accessible tree while locating
    pub debug_is_active: bool,
    /// Kind of fixture document
    pub document_kind: DocumentKind,
    /// Service name of the embedded object
    pub object_service: String,
    /// Role the locator searches for
    pub target_role: Role,
    /// Value written by the trigger
    pub sentinel_title: String,
}

impl Default for TestParameters {
    fn default() -> Self {
        Self {
            debug_is_active: false,
            document_kind: DocumentKind::Text,
            object_service: GRAPHIC_OBJECT_SERVICE.to_string(),
            target_role: Role::Graphic,
            sentinel_title: DEFAULT_SENTINEL_TITLE.to_string(),
        }
    }
}

impl TestParameters {
    /// Default parameters
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle tree dumps
    #[inline]
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug_is_active = debug;
        self
    }

    /// Set the fixture document kind
    #[inline]
    #[must_use]
    pub fn with_document_kind(mut self, kind: DocumentKind) -> Self {
        self.document_kind = kind;
        self
    }

    /// Set the embedded object service name
    #[inline]
    #[must_use]
    pub fn with_object_service(mut self, service: impl Into<String>) -> Self {
        self.object_service = service.into();
        self
    }

    /// Set the role to locate
    #[inline]
    #[must_use]
    pub fn with_target_role(mut self, role: Role) -> Self {
        self.target_role = role;
        self
    }

    /// Set the sentinel title
    #[inline]
    #[must_use]
    pub fn with_sentinel_title(mut self, title: impl Into<String>) -> Self {
        self.sentinel_title = title.into();
        self
    }

    /// Parse parameters from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load parameters from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid parameter TOML
    #[error("invalid parameters: {0}")]
    Parse(#[from] toml::de::Error),
}
