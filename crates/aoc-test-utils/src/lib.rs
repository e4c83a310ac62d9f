//! Testing utilities for AOC workspace
//!
//! Shared test doubles, fixtures, and recorders.

#![allow(missing_docs)]

use aoc_access::{AccessibleEvent, AccessibleNode, NodeBuilder, Role, Toolkit};
use aoc_harness::{GraphicObjectCase, TestParameters};
use aoc_model::{
    ChangeListener, Desktop, DocumentHandle, DocumentKind, DocumentService, ListenerId, ObjectRef,
    PropertyChange, PropertyFault, PropertySet, ServiceError, Value, ValueType, VetoListener, TITLE,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Document service that counts calls and forwards them
#[derive(Debug, Default)]
pub struct RecordingService<S = Desktop> {
    inner: S,
    created: AtomicUsize,
    instances: AtomicUsize,
    closed: AtomicUsize,
}

impl<S: DocumentService> RecordingService<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            created: AtomicUsize::new(0),
            instances: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn create_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl<S: DocumentService> DocumentService for RecordingService<S> {
    fn create_document(&self, kind: DocumentKind) -> Result<DocumentHandle, ServiceError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.inner.create_document(kind)
    }

    fn create_instance(
        &self,
        document: &DocumentHandle,
        service: &str,
    ) -> Result<ObjectRef, ServiceError> {
        self.instances.fetch_add(1, Ordering::SeqCst);
        self.inner.create_instance(document, service)
    }

    fn close_document(&self, document: &DocumentHandle) -> Result<(), ServiceError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        self.inner.close_document(document)
    }
}

/// Desktop that refuses to instantiate any embedded object
#[derive(Debug, Default)]
pub struct RejectingService {
    desktop: Desktop,
}

impl RejectingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn desktop(&self) -> &Desktop {
        &self.desktop
    }
}

impl DocumentService for RejectingService {
    fn create_document(&self, kind: DocumentKind) -> Result<DocumentHandle, ServiceError> {
        self.desktop.create_document(kind)
    }

    fn create_instance(
        &self,
        _document: &DocumentHandle,
        service: &str,
    ) -> Result<ObjectRef, ServiceError> {
        Err(ServiceError::UnknownService(service.to_string()))
    }

    fn close_document(&self, document: &DocumentHandle) -> Result<(), ServiceError> {
        self.desktop.close_document(document)
    }
}

/// Property set whose writes fail with one fault
///
/// By default every write fails; [`FaultingPropertySet::after_writes`] lets a
/// number of writes through first.
#[derive(Debug)]
pub struct FaultingPropertySet {
    fault: PropertyFault,
    title: Mutex<String>,
    writes: AtomicUsize,
    allowed: usize,
}

impl FaultingPropertySet {
    pub fn new(fault: PropertyFault) -> Self {
        Self {
            fault,
            title: Mutex::new("title0".to_string()),
            writes: AtomicUsize::new(0),
            allowed: 0,
        }
    }

    /// Let the first `allowed` writes succeed before faulting
    pub fn after_writes(mut self, allowed: usize) -> Self {
        self.allowed = allowed;
        self
    }

    pub fn write_attempts(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn title(&self) -> String {
        self.title.lock().clone()
    }
}

impl PropertySet for FaultingPropertySet {
    fn property_names(&self) -> Vec<String> {
        vec![TITLE.to_string()]
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyFault> {
        if name == TITLE {
            Ok(Value::from(self.title.lock().as_str()))
        } else {
            Err(PropertyFault::UnknownProperty(name.to_string()))
        }
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), PropertyFault> {
        let attempt = self.writes.fetch_add(1, Ordering::SeqCst);
        if attempt < self.allowed {
            if let (TITLE, Value::Str(title)) = (name, value) {
                *self.title.lock() = title;
            }
            return Ok(());
        }
        Err(self.fault.clone())
    }

    fn add_change_listener(&self, _listener: ChangeListener) -> ListenerId {
        ListenerId::next()
    }

    fn remove_change_listener(&self, _id: ListenerId) -> bool {
        false
    }

    fn add_veto_listener(&self, _name: &str, _listener: VetoListener) -> ListenerId {
        ListenerId::next()
    }
}

/// One instance of every property fault kind
pub fn all_faults() -> Vec<PropertyFault> {
    vec![
        PropertyFault::UnknownProperty(TITLE.to_string()),
        PropertyFault::TypeMismatch {
            property: TITLE.to_string(),
            expected: ValueType::Str,
            found: ValueType::Int,
        },
        PropertyFault::Vetoed {
            property: TITLE.to_string(),
            reason: "locked".to_string(),
        },
        PropertyFault::WrappedFailure("backend gone".to_string()),
    ]
}

/// Records accessible events delivered to one node
pub struct EventRecorder {
    node: AccessibleNode,
    id: ListenerId,
    events: Arc<Mutex<Vec<AccessibleEvent>>>,
}

impl EventRecorder {
    pub fn attach(node: &AccessibleNode) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let id = node.add_event_listener(Arc::new(move |event: &AccessibleEvent| {
            sink.lock().push(event.clone());
        }));
        Self {
            node: node.clone(),
            id,
            events,
        }
    }

    pub fn events(&self) -> Vec<AccessibleEvent> {
        self.events.lock().clone()
    }

    pub fn detach(self) -> bool {
        self.node.remove_event_listener(self.id)
    }
}

/// Records the values written to one property
pub struct PropertyRecorder {
    values: Arc<Mutex<Vec<Value>>>,
}

impl PropertyRecorder {
    pub fn attach(target: &dyn PropertySet, property: &str) -> Self {
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        let property = property.to_string();
        target.add_change_listener(Arc::new(move |change: &PropertyChange| {
            if change.name == property {
                sink.lock().push(change.new.clone());
            }
        }));
        Self { values }
    }

    pub fn values(&self) -> Vec<Value> {
        self.values.lock().clone()
    }
}

/// Open a text document on `desktop` and insert one graphic
pub fn text_with_graphic(desktop: &Desktop) -> (DocumentHandle, ObjectRef) {
    let document = desktop.create_document(DocumentKind::Text).unwrap();
    let graphic = desktop.create_instance(&document, "GraphicObject").unwrap();
    let text = document.text().unwrap();
    let cursor = text.create_cursor().unwrap();
    text.insert_content(&cursor, Arc::clone(&graphic), true).unwrap();
    (document, graphic)
}

/// Wrap `content` in the window chrome the toolkit projects
pub fn window_tree(content: impl IntoIterator<Item = NodeBuilder>) -> AccessibleNode {
    AccessibleNode::builder(Role::Frame)
        .name("Untitled 1")
        .child(
            AccessibleNode::builder(Role::RootPane).child(
                AccessibleNode::builder(Role::ScrollPane)
                    .child(AccessibleNode::builder(Role::DocumentText).children(content)),
            ),
        )
        .build()
}

pub fn recording_case() -> GraphicObjectCase<RecordingService, Toolkit> {
    GraphicObjectCase::new(RecordingService::new(Desktop::new()), Toolkit::new())
}

pub fn recording_case_with(params: TestParameters) -> GraphicObjectCase<RecordingService, Toolkit> {
    recording_case().with_parameters(params)
}
