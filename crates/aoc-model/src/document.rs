//! Documents and the document service
//!
//! [`DocumentHandle`] is a cheap clonable handle onto one open document.
//! [`Desktop`] is the in-memory [`DocumentService`]: it opens documents,
//! instantiates embeddable objects and closes documents again.

use crate::capability::{Capability, Unsupported};
use crate::object::{EmbeddedObject, ObjectKind, ObjectRef};
use crate::text::Text;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use ulid::Ulid;

/// Unique document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Ulid);

impl DocumentId {
    /// Generate new document ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of documents the service can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Editable text document
    #[default]
    Text,
    /// Drawing document (no text insertion point)
    Drawing,
}

impl DocumentKind {
    /// Capabilities offered by documents of this kind
    #[must_use]
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Text => &[Capability::TextInsertable, Capability::AccessibleProvider],
            Self::Drawing => &[Capability::AccessibleProvider],
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Drawing => f.write_str("drawing"),
        }
    }
}

/// Document service failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Capability not offered
    #[error(transparent)]
    Unsupported(#[from] Unsupported),

    /// No embeddable object is registered under that service name
    #[error("unknown service: {0}")]
    UnknownService(String),

    /// The document has been closed
    #[error("document {0} is disposed")]
    Disposed(DocumentId),

    /// Close requested twice
    #[error("document {0} is already closed")]
    AlreadyClosed(DocumentId),

    /// Insertion refused by document state
    #[error("insertion rejected: {0}")]
    InsertRejected(String),
}

/// An object anchored in document text
#[derive(Debug, Clone)]
pub struct Anchor {
    /// Paragraph index
    pub paragraph: usize,
    /// Character offset within the paragraph
    pub offset: usize,
    /// The anchored object
    pub object: ObjectRef,
}

/// Point-in-time copy of a document's content
#[derive(Debug, Clone, Default)]
pub struct ContentSnapshot {
    /// Paragraph texts in document order
    pub paragraphs: Vec<String>,
    /// Anchored objects ordered by position
    pub anchors: Vec<Anchor>,
}

#[derive(Debug)]
pub(crate) struct DocumentState {
    pub(crate) closed: bool,
    pub(crate) paragraphs: Vec<String>,
    pub(crate) anchors: Vec<Anchor>,
    object_numbers: HashMap<ObjectKind, u32>,
}

#[derive(Debug)]
struct DocumentInner {
    id: DocumentId,
    kind: DocumentKind,
    title: String,
    state: RwLock<DocumentState>,
}

/// Handle onto an open document
#[derive(Clone)]
pub struct DocumentHandle {
    inner: Arc<DocumentInner>,
}

impl DocumentHandle {
    fn open(kind: DocumentKind, title: String) -> Self {
        Self {
            inner: Arc::new(DocumentInner {
                id: DocumentId::new(),
                kind,
                title,
                state: RwLock::new(DocumentState {
                    closed: false,
                    paragraphs: vec![String::new()],
                    anchors: Vec::new(),
                    object_numbers: HashMap::new(),
                }),
            }),
        }
    }

    /// Document identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.inner.id
    }

    /// Document kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        self.inner.kind
    }

    /// Window title of the document
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.inner.title
    }

    /// Whether the document has been closed
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.state.read().closed
    }

    /// Whether this document offers a capability
    #[must_use]
    pub fn supports(&self, capability: Capability) -> bool {
        self.kind().capabilities().contains(&capability)
    }

    /// Request the `TextInsertable` view
    pub fn text(&self) -> Result<Text, Unsupported> {
        if self.supports(Capability::TextInsertable) {
            Ok(Text::new(self.clone()))
        } else {
            Err(Unsupported {
                capability: Capability::TextInsertable,
                subject: format!("{} document", self.kind()),
            })
        }
    }

    /// Copy the current content
    pub fn snapshot(&self) -> Result<ContentSnapshot, ServiceError> {
        let state = self.inner.state.read();
        if state.closed {
            return Err(ServiceError::Disposed(self.id()));
        }
        let mut anchors = state.anchors.clone();
        anchors.sort_by_key(|anchor| (anchor.paragraph, anchor.offset));
        Ok(ContentSnapshot {
            paragraphs: state.paragraphs.clone(),
            anchors,
        })
    }

    /// Number of embedded objects anchored in the document
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.inner.state.read().anchors.len()
    }

    pub(crate) fn read_state<T>(
        &self,
        f: impl FnOnce(&DocumentState) -> T,
    ) -> Result<T, ServiceError> {
        let state = self.inner.state.read();
        if state.closed {
            return Err(ServiceError::Disposed(self.id()));
        }
        Ok(f(&state))
    }

    pub(crate) fn write_state<T>(
        &self,
        f: impl FnOnce(&mut DocumentState) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut state = self.inner.state.write();
        if state.closed {
            return Err(ServiceError::Disposed(self.id()));
        }
        f(&mut state)
    }

    fn next_object_name(&self, kind: ObjectKind) -> Result<String, ServiceError> {
        self.write_state(|state| {
            let number = state.object_numbers.entry(kind).or_insert(0);
            *number += 1;
            Ok(format!("{}{}", kind.name_prefix(), number))
        })
    }

    fn close(&self) -> Result<(), ServiceError> {
        let anchors = {
            let mut state = self.inner.state.write();
            if state.closed {
                return Err(ServiceError::AlreadyClosed(self.id()));
            }
            state.closed = true;
            std::mem::take(&mut state.anchors)
        };
        for anchor in anchors {
            anchor.object.dispose();
        }
        Ok(())
    }
}

impl std::fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("id", &self.id())
            .field("kind", &self.kind())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Opens, populates and closes documents
pub trait DocumentService: Send + Sync {
    /// Open a new, empty document
    fn create_document(&self, kind: DocumentKind) -> Result<DocumentHandle, ServiceError>;

    /// Instantiate an embeddable object for a document by service name
    fn create_instance(
        &self,
        document: &DocumentHandle,
        service: &str,
    ) -> Result<ObjectRef, ServiceError>;

    /// Close a document, disposing everything it owns
    fn close_document(&self, document: &DocumentHandle) -> Result<(), ServiceError>;
}

impl<S: DocumentService + ?Sized> DocumentService for Arc<S> {
    fn create_document(&self, kind: DocumentKind) -> Result<DocumentHandle, ServiceError> {
        (**self).create_document(kind)
    }

    fn create_instance(
        &self,
        document: &DocumentHandle,
        service: &str,
    ) -> Result<ObjectRef, ServiceError> {
        (**self).create_instance(document, service)
    }

    fn close_document(&self, document: &DocumentHandle) -> Result<(), ServiceError> {
        (**self).close_document(document)
    }
}

/// In-memory document service
#[derive(Debug, Default)]
pub struct Desktop {
    open: RwLock<IndexMap<DocumentId, DocumentHandle>>,
    untitled: AtomicU32,
}

impl Desktop {
    /// Create a desktop with no open documents
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open documents
    #[must_use]
    pub fn open_documents(&self) -> usize {
        self.open.read().len()
    }

    /// Whether a document is currently open
    #[must_use]
    pub fn is_open(&self, id: DocumentId) -> bool {
        self.open.read().contains_key(&id)
    }
}

impl DocumentService for Desktop {
    fn create_document(&self, kind: DocumentKind) -> Result<DocumentHandle, ServiceError> {
        let number = self.untitled.fetch_add(1, Ordering::Relaxed) + 1;
        let document = DocumentHandle::open(kind, format!("Untitled {number}"));
        self.open.write().insert(document.id(), document.clone());
        tracing::debug!(document = %document.id(), %kind, "document opened");
        Ok(document)
    }

    fn create_instance(
        &self,
        document: &DocumentHandle,
        service: &str,
    ) -> Result<ObjectRef, ServiceError> {
        let kind = ObjectKind::from_service_name(service)
            .ok_or_else(|| ServiceError::UnknownService(service.to_string()))?;
        let name = document.next_object_name(kind)?;
        Ok(Arc::new(EmbeddedObject::new(kind, &name)))
    }

    fn close_document(&self, document: &DocumentHandle) -> Result<(), ServiceError> {
        document.close()?;
        self.open.write().shift_remove(&document.id());
        tracing::debug!(document = %document.id(), "document closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertySet;

    #[test]
    fn new_document_is_empty() {
        let desktop = Desktop::new();
        let doc = desktop.create_document(DocumentKind::Text).unwrap();
        let snapshot = doc.snapshot().unwrap();
        assert_eq!(snapshot.paragraphs, vec![String::new()]);
        assert!(snapshot.anchors.is_empty());
        assert_eq!(desktop.open_documents(), 1);
        assert_eq!(doc.title(), "Untitled 1");
    }

    #[test]
    fn drawing_has_no_text_view() {
        let desktop = Desktop::new();
        let doc = desktop.create_document(DocumentKind::Drawing).unwrap();
        let err = doc.text().unwrap_err();
        assert_eq!(err.capability, Capability::TextInsertable);
        assert!(doc.supports(Capability::AccessibleProvider));
    }

    #[test]
    fn unknown_service_rejected() {
        let desktop = Desktop::new();
        let doc = desktop.create_document(DocumentKind::Text).unwrap();
        let err = desktop.create_instance(&doc, "OleObject").unwrap_err();
        assert_eq!(err, ServiceError::UnknownService("OleObject".to_string()));
    }

    #[test]
    fn instances_are_numbered_per_kind() {
        let desktop = Desktop::new();
        let doc = desktop.create_document(DocumentKind::Text).unwrap();
        let first = desktop.create_instance(&doc, "GraphicObject").unwrap();
        let second = desktop.create_instance(&doc, "GraphicObject").unwrap();
        let frame = desktop.create_instance(&doc, "TextFrame").unwrap();
        assert_eq!(first.get_string("Name").unwrap(), "Graphic1");
        assert_eq!(second.get_string("Name").unwrap(), "Graphic2");
        assert_eq!(frame.get_string("Name").unwrap(), "Frame1");
    }

    #[test]
    fn close_disposes_document_and_objects() {
        let desktop = Desktop::new();
        let doc = desktop.create_document(DocumentKind::Text).unwrap();
        let object = desktop.create_instance(&doc, "GraphicObject").unwrap();
        let text = doc.text().unwrap();
        let cursor = text.create_cursor().unwrap();
        text.insert_content(&cursor, Arc::clone(&object), true).unwrap();

        desktop.close_document(&doc).unwrap();

        assert!(doc.is_disposed());
        assert!(object.is_disposed());
        assert_eq!(desktop.open_documents(), 0);
        assert_eq!(doc.snapshot().unwrap_err(), ServiceError::Disposed(doc.id()));
    }

    #[test]
    fn double_close_rejected() {
        let desktop = Desktop::new();
        let doc = desktop.create_document(DocumentKind::Text).unwrap();
        desktop.close_document(&doc).unwrap();
        assert_eq!(
            desktop.close_document(&doc).unwrap_err(),
            ServiceError::AlreadyClosed(doc.id())
        );
    }
}
