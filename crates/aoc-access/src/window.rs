//! Windows and the accessibility provider
//!
//! [`Toolkit`] is the in-memory [`AccessibilityProvider`]. It hands out one
//! window per document and projects a fresh accessible tree on every
//! [`accessible_root`](AccessibilityProvider::accessible_root) call.
//!
//! Event broadcasters are kept per embedded object, so listeners attached to
//! a node keep receiving events after the tree is projected again. Windows and
//! broadcasters of a document live until the document is released or found
//! disposed by a later lookup.

use crate::error::AccessError;
use crate::event::EventBroadcaster;
use crate::node::AccessibleNode;
use crate::projection::{document_node, object_node, translate_change, window_node};
use aoc_model::{
    Capability, DocumentHandle, DocumentId, ObjectId, ObjectRef, PropertyChange, PropertySet,
    Unsupported,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle onto a document window
#[derive(Debug, Clone)]
pub struct WindowHandle {
    id: u64,
    document: DocumentHandle,
}

impl WindowHandle {
    /// Window identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Document shown in the window
    #[inline]
    #[must_use]
    pub fn document(&self) -> &DocumentHandle {
        &self.document
    }

    /// Window title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        self.document.title()
    }
}

/// Windowing layer access to accessible trees
pub trait AccessibilityProvider: Send + Sync {
    /// Window currently showing `document`
    fn current_window(&self, document: &DocumentHandle) -> Result<WindowHandle, AccessError>;

    /// Root of a freshly projected accessible tree for `window`
    fn accessible_root(&self, window: &WindowHandle) -> Result<AccessibleNode, AccessError>;

    /// Forget the window and event broadcasters kept for `document`
    fn release(&self, document: &DocumentHandle);
}

impl<P: AccessibilityProvider + ?Sized> AccessibilityProvider for Arc<P> {
    fn current_window(&self, document: &DocumentHandle) -> Result<WindowHandle, AccessError> {
        (**self).current_window(document)
    }

    fn accessible_root(&self, window: &WindowHandle) -> Result<AccessibleNode, AccessError> {
        (**self).accessible_root(window)
    }

    fn release(&self, document: &DocumentHandle) {
        (**self).release(document);
    }
}

/// In-memory accessibility provider
#[derive(Debug, Default)]
pub struct Toolkit {
    windows: Mutex<HashMap<DocumentId, WindowHandle>>,
    broadcasters: Mutex<HashMap<DocumentId, HashMap<ObjectId, Arc<EventBroadcaster>>>>,
    next_window: AtomicU64,
}

impl Toolkit {
    /// Create a toolkit with no windows
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of windows currently held
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.windows.lock().len()
    }

    /// Number of event broadcasters currently held, across all documents
    #[must_use]
    pub fn broadcaster_count(&self) -> usize {
        self.broadcasters.lock().values().map(HashMap::len).sum()
    }

    /// Drop windows and broadcasters of documents that have been closed
    fn prune_disposed(&self) {
        let mut pruned = Vec::new();
        self.windows.lock().retain(|id, window| {
            let disposed = window.document().is_disposed();
            if disposed {
                pruned.push(*id);
            }
            !disposed
        });
        if pruned.is_empty() {
            return;
        }

        let mut broadcasters = self.broadcasters.lock();
        for id in &pruned {
            broadcasters.remove(id);
        }
        tracing::debug!(pruned = pruned.len(), "dropped windows of closed documents");
    }

    /// Broadcaster for an object, subscribing to its properties on first use
    fn broadcaster_for(&self, document: DocumentId, object: &ObjectRef) -> Arc<EventBroadcaster> {
        let mut broadcasters = self.broadcasters.lock();
        let per_document = broadcasters.entry(document).or_default();
        if let Some(existing) = per_document.get(&object.id()) {
            return Arc::clone(existing);
        }

        let broadcaster = Arc::new(EventBroadcaster::new());
        let target = Arc::downgrade(&broadcaster);
        let source = Arc::downgrade(object);
        object.add_change_listener(Arc::new(move |change: &PropertyChange| {
            let (Some(broadcaster), Some(object)) = (target.upgrade(), source.upgrade()) else {
                return;
            };
            if let Some(event) = translate_change(&object, change) {
                broadcaster.broadcast(&event);
            }
        }));
        tracing::trace!(object = %object.id(), "subscribed accessible broadcaster");

        per_document.insert(object.id(), Arc::clone(&broadcaster));
        broadcaster
    }
}

impl AccessibilityProvider for Toolkit {
    fn current_window(&self, document: &DocumentHandle) -> Result<WindowHandle, AccessError> {
        self.prune_disposed();
        if document.is_disposed() {
            return Err(AccessError::WindowUnavailable(document.id()));
        }
        if !document.supports(Capability::AccessibleProvider) {
            return Err(Unsupported {
                capability: Capability::AccessibleProvider,
                subject: format!("{} document", document.kind()),
            }
            .into());
        }

        let mut windows = self.windows.lock();
        let window = windows.entry(document.id()).or_insert_with(|| WindowHandle {
            id: self.next_window.fetch_add(1, Ordering::Relaxed) + 1,
            document: document.clone(),
        });
        Ok(window.clone())
    }

    fn accessible_root(&self, window: &WindowHandle) -> Result<AccessibleNode, AccessError> {
        let document = window.document();
        let content = match document.snapshot() {
            Ok(content) => content,
            Err(err) => {
                self.prune_disposed();
                return Err(err.into());
            }
        };
        let body = document_node(document.kind(), document.title(), &content, |object| {
            object_node(object).broadcaster(self.broadcaster_for(document.id(), object))
        });
        Ok(window_node(window.title(), body).build())
    }

    fn release(&self, document: &DocumentHandle) {
        let window = self.windows.lock().remove(&document.id());
        let broadcasters = self.broadcasters.lock().remove(&document.id());
        if window.is_some() || broadcasters.is_some() {
            tracing::debug!(document = %document.id(), "released accessible window");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AccessibleEvent, AccessibleEventKind};
    use crate::locate::find_first_by_role;
    use crate::role::Role;
    use aoc_model::{Desktop, DocumentKind, DocumentService, ServiceError, Value, TITLE};
    use parking_lot::Mutex as PlMutex;

    fn text_with_graphic(desktop: &Desktop) -> (DocumentHandle, ObjectRef) {
        let doc = desktop.create_document(DocumentKind::Text).unwrap();
        let graphic = desktop.create_instance(&doc, "GraphicObject").unwrap();
        let text = doc.text().unwrap();
        let cursor = text.create_cursor().unwrap();
        text.insert_content(&cursor, Arc::clone(&graphic), true).unwrap();
        (doc, graphic)
    }

    #[test]
    fn window_is_stable_per_document() {
        let desktop = Desktop::new();
        let toolkit = Toolkit::new();
        let (doc, _) = text_with_graphic(&desktop);
        let first = toolkit.current_window(&doc).unwrap();
        let second = toolkit.current_window(&doc).unwrap();
        assert_eq!(first.id(), second.id());
        assert_eq!(toolkit.window_count(), 1);
        assert_eq!(first.title(), doc.title());
    }

    #[test]
    fn projection_shape() {
        let desktop = Desktop::new();
        let toolkit = Toolkit::new();
        let (doc, graphic) = text_with_graphic(&desktop);
        let window = toolkit.current_window(&doc).unwrap();
        let root = toolkit.accessible_root(&window).unwrap();

        assert_eq!(root.role(), Role::Frame);
        let body = &root.children()[0].children()[0].children()[0];
        assert_eq!(body.role(), Role::DocumentText);
        assert_eq!(body.child_count(), 2);
        assert_eq!(body.children()[0].role(), Role::Paragraph);
        let node = &body.children()[1];
        assert_eq!(node.role(), Role::Graphic);
        assert_eq!(node.name(), "Graphic1");
        assert_eq!(node.source(), Some(graphic.id()));
    }

    #[test]
    fn closed_document_has_no_window() {
        let desktop = Desktop::new();
        let toolkit = Toolkit::new();
        let (doc, _) = text_with_graphic(&desktop);
        let window = toolkit.current_window(&doc).unwrap();
        desktop.close_document(&doc).unwrap();

        assert_eq!(
            toolkit.current_window(&doc).unwrap_err(),
            AccessError::WindowUnavailable(doc.id())
        );
        assert_eq!(
            toolkit.accessible_root(&window).unwrap_err(),
            AccessError::Service(ServiceError::Disposed(doc.id()))
        );
        assert_eq!(toolkit.window_count(), 0);
    }

    #[test]
    fn release_forgets_window_and_broadcasters() {
        let desktop = Desktop::new();
        let toolkit = Toolkit::new();
        let (doc, _) = text_with_graphic(&desktop);
        let window = toolkit.current_window(&doc).unwrap();
        toolkit.accessible_root(&window).unwrap();
        assert_eq!(toolkit.broadcaster_count(), 1);

        desktop.close_document(&doc).unwrap();
        toolkit.release(&doc);
        toolkit.release(&doc);

        assert_eq!(toolkit.window_count(), 0);
        assert_eq!(toolkit.broadcaster_count(), 0);
    }

    #[test]
    fn closed_documents_are_pruned_on_lookup() {
        let desktop = Desktop::new();
        let toolkit = Toolkit::new();
        for _ in 0..3 {
            let (doc, _) = text_with_graphic(&desktop);
            let window = toolkit.current_window(&doc).unwrap();
            toolkit.accessible_root(&window).unwrap();
            desktop.close_document(&doc).unwrap();
        }

        let (doc, _) = text_with_graphic(&desktop);
        let window = toolkit.current_window(&doc).unwrap();
        assert_eq!(toolkit.window_count(), 1);
        assert_eq!(toolkit.broadcaster_count(), 0);

        toolkit.accessible_root(&window).unwrap();
        assert_eq!(toolkit.broadcaster_count(), 1);
    }

    #[test]
    fn title_writes_reach_listeners_across_projections() {
        let desktop = Desktop::new();
        let toolkit = Toolkit::new();
        let (doc, graphic) = text_with_graphic(&desktop);
        let window = toolkit.current_window(&doc).unwrap();

        let first = toolkit.accessible_root(&window).unwrap();
        let node = find_first_by_role(&first, Role::Graphic).unwrap();
        let seen = Arc::new(PlMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        node.add_event_listener(Arc::new(move |event: &AccessibleEvent| {
            sink.lock().push(event.clone());
        }));

        // A second projection must not subscribe twice
        let _ = toolkit.accessible_root(&window).unwrap();
        graphic.set_property(TITLE, Value::from("Logo")).unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, AccessibleEventKind::NameChanged);
        assert_eq!(seen[0].new_value, "Logo");
        assert_eq!(graphic.properties().change_listener_count(), 1);
    }

    #[test]
    fn stale_node_keeps_old_name() {
        let desktop = Desktop::new();
        let toolkit = Toolkit::new();
        let (doc, graphic) = text_with_graphic(&desktop);
        let window = toolkit.current_window(&doc).unwrap();

        let before = find_first_by_role(&toolkit.accessible_root(&window).unwrap(), Role::Graphic)
            .unwrap();
        graphic.set_property(TITLE, Value::from("Logo")).unwrap();
        let after = find_first_by_role(&toolkit.accessible_root(&window).unwrap(), Role::Graphic)
            .unwrap();

        assert_eq!(before.name(), "Graphic1");
        assert_eq!(after.name(), "Logo");
    }
}
