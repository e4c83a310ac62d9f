//! Embedded objects
//!
//! Objects are created by a [`DocumentService`](crate::DocumentService) and
//! become owned by a document once inserted into its text.

use crate::capability::Capability;
use crate::property::{
    ChangeListener, ListenerId, PropertyFault, PropertySet, PropertyStore, VetoListener,
};
use crate::value::Value;
use crate::DocumentId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ulid::Ulid;

/// Property carrying the object's title
pub const TITLE: &str = "Title";
/// Property carrying the object's name
pub const NAME: &str = "Name";
/// Property carrying the object's description
pub const DESCRIPTION: &str = "Description";
/// Read-only property carrying the implementation name
pub const IMPLEMENTATION_NAME: &str = "ImplementationName";

/// Unique embedded object identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub Ulid);

impl ObjectId {
    /// Generate new object ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of embeddable objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Graphic placeholder
    Graphic,
    /// Text frame
    TextFrame,
}

impl ObjectKind {
    /// Resolve a service name to an object kind
    ///
    /// Accepts both the short name (`GraphicObject`) and the qualified
    /// form (`aoc.text.GraphicObject`).
    #[must_use]
    pub fn from_service_name(service: &str) -> Option<Self> {
        let short = service.rsplit('.').next().unwrap_or(service);
        match short {
            "GraphicObject" => Some(Self::Graphic),
            "TextFrame" => Some(Self::TextFrame),
            _ => None,
        }
    }

    /// Prefix used for generated object names
    #[must_use]
    pub fn name_prefix(self) -> &'static str {
        match self {
            Self::Graphic => "Graphic",
            Self::TextFrame => "Frame",
        }
    }

    /// Implementation name reported by objects of this kind
    #[must_use]
    pub fn implementation_name(self) -> &'static str {
        match self {
            Self::Graphic => "aoc.text.GraphicObject",
            Self::TextFrame => "aoc.text.TextFrame",
        }
    }
}

/// Shared reference to an embedded object
pub type ObjectRef = Arc<EmbeddedObject>;

/// An object that can be anchored in document text
#[derive(Debug)]
pub struct EmbeddedObject {
    id: ObjectId,
    kind: ObjectKind,
    properties: PropertyStore,
    owner: Mutex<Option<DocumentId>>,
}

impl EmbeddedObject {
    /// Create a free-standing object with the default properties of its kind
    #[must_use]
    pub fn new(kind: ObjectKind, name: &str) -> Self {
        let properties = PropertyStore::new()
            .with(NAME, name)
            .with(TITLE, "")
            .with(DESCRIPTION, "")
            .with("Width", 1000_i64)
            .with("Height", 1000_i64)
            .with_read_only(IMPLEMENTATION_NAME, kind.implementation_name());
        Self {
            id: ObjectId::new(),
            kind,
            properties,
            owner: Mutex::new(None),
        }
    }

    /// Object identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Object kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Capabilities this object supports
    #[must_use]
    pub fn capabilities(&self) -> &'static [Capability] {
        &[Capability::PropertyBearing, Capability::AccessibleProvider]
    }

    /// The `PropertyBearing` view of this object
    #[inline]
    #[must_use]
    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    /// Document owning this object, once inserted
    #[must_use]
    pub fn owner(&self) -> Option<DocumentId> {
        *self.owner.lock()
    }

    /// Record the owning document; fails if already owned
    pub(crate) fn adopt(&self, document: DocumentId) -> Result<(), Option<DocumentId>> {
        let mut owner = self.owner.lock();
        match *owner {
            Some(existing) => Err(Some(existing)),
            None if self.properties.is_disposed() => Err(None),
            None => {
                *owner = Some(document);
                Ok(())
            }
        }
    }

    /// Detach the object when its document closes
    pub(crate) fn dispose(&self) {
        self.properties.dispose();
    }

    /// Whether the object has been disposed with its document
    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.properties.is_disposed()
    }
}

impl PropertySet for EmbeddedObject {
    fn property_names(&self) -> Vec<String> {
        self.properties.property_names()
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyFault> {
        self.properties.get_property(name)
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), PropertyFault> {
        self.properties.set_property(name, value)
    }

    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId {
        self.properties.add_change_listener(listener)
    }

    fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.properties.remove_change_listener(id)
    }

    fn add_veto_listener(&self, name: &str, listener: VetoListener) -> ListenerId {
        self.properties.add_veto_listener(name, listener)
    }
}
