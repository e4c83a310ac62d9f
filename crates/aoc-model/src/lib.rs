//! AOC Document Model
//!
//! In-memory editable documents used as conformance fixtures.
//!
//! # Core Concepts
//!
//! - [`DocumentService`]: opens documents, creates embeddable objects, closes documents
//! - [`Desktop`]: the in-memory document service
//! - [`DocumentHandle`]: handle onto one open document
//! - [`Text`] / [`TextCursor`]: the `TextInsertable` view of a text document
//! - [`EmbeddedObject`]: graphic placeholders and frames anchored in text
//! - [`PropertySet`]: typed, listenable properties with [`PropertyFault`] errors
//! - [`Capability`]: typed capability views instead of runtime type probing
//!
//! # Example
//!
//! ```rust,ignore
//! use aoc_model::{Desktop, DocumentKind, DocumentService};
//!
//! let desktop = Desktop::new();
//! let doc = desktop.create_document(DocumentKind::Text)?;
//! let graphic = desktop.create_instance(&doc, "GraphicObject")?;
//!
//! let text = doc.text()?;
//! let cursor = text.create_cursor()?;
//! text.insert_content(&cursor, graphic, true)?;
//!
//! desktop.close_document(&doc)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod capability;
mod document;
mod object;
mod property;
mod text;
mod value;

// Re-exports
pub use capability::{Capability, Unsupported};
pub use document::{
    Anchor, ContentSnapshot, Desktop, DocumentHandle, DocumentId, DocumentKind, DocumentService,
    ServiceError,
};
pub use object::{
    EmbeddedObject, ObjectId, ObjectKind, ObjectRef, DESCRIPTION, IMPLEMENTATION_NAME, NAME, TITLE,
};
pub use property::{
    ChangeListener, ListenerId, PropertyChange, PropertyFault, PropertySet, PropertyStore,
    VetoListener,
};
pub use text::{Text, TextCursor};
pub use value::{Value, ValueType};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
