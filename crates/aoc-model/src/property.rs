//! Property sets
//!
//! Provides the [`PropertySet`] contract plus [`PropertyStore`], the
//! in-memory implementation used by embedded objects.
//!
//! # Write protocol
//!
//! `set_property` runs in four steps:
//! 1. Resolve the property (unknown names, read-only entries and type
//!    mismatches are rejected up front)
//! 2. Consult veto listeners registered for that property
//! 3. Store the new value
//! 4. Notify change listeners, in registration order
//!
//! No lock is held while listeners run, so listeners may read the store.

use crate::value::{Value, ValueType};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Faults raised by property access
///
/// This is the complete set of failures a property write can produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyFault {
    /// No property with that name exists
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// Value type does not match the declared type
    #[error("type mismatch on {property}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Property name
        property: String,
        /// Declared type
        expected: ValueType,
        /// Supplied type
        found: ValueType,
    },

    /// Write rejected by a veto listener or a read-only declaration
    #[error("write to {property} vetoed: {reason}")]
    Vetoed {
        /// Property name
        property: String,
        /// Rejection reason
        reason: String,
    },

    /// Lower-level failure wrapped by the property layer
    #[error("wrapped failure: {0}")]
    WrappedFailure(String),
}

/// A committed or proposed property write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    /// Property name
    pub name: String,
    /// Value before the write
    pub old: Value,
    /// Value after the write
    pub new: Value,
}

/// Handle returned when registering a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Allocate a process-unique listener id
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Listener notified after each committed write
pub type ChangeListener = Arc<dyn Fn(&PropertyChange) + Send + Sync>;

/// Listener consulted before a write; `Err(reason)` rejects it
pub type VetoListener = Arc<dyn Fn(&PropertyChange) -> Result<(), String> + Send + Sync>;

/// Read/write access to named, typed properties
pub trait PropertySet: Send + Sync {
    /// Names of all declared properties, in declaration order
    fn property_names(&self) -> Vec<String>;

    /// Read a property
    fn get_property(&self, name: &str) -> Result<Value, PropertyFault>;

    /// Write a property
    fn set_property(&self, name: &str, value: Value) -> Result<(), PropertyFault>;

    /// Register a listener for committed writes
    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId;

    /// Unregister a change listener; returns whether it was registered
    fn remove_change_listener(&self, id: ListenerId) -> bool;

    /// Register a veto listener for one property
    fn add_veto_listener(&self, name: &str, listener: VetoListener) -> ListenerId;

    /// Read a property that must hold a string
    fn get_string(&self, name: &str) -> Result<String, PropertyFault> {
        match self.get_property(name)? {
            Value::Str(s) => Ok(s),
            other => Err(PropertyFault::TypeMismatch {
                property: name.to_string(),
                expected: ValueType::Str,
                found: other.value_type(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
struct PropertyEntry {
    value: Value,
    read_only: bool,
}

/// In-memory property set with listeners
pub struct PropertyStore {
    entries: RwLock<IndexMap<String, PropertyEntry>>,
    change_listeners: RwLock<Vec<(ListenerId, ChangeListener)>>,
    veto_listeners: RwLock<Vec<(ListenerId, String, VetoListener)>>,
    disposed: AtomicBool,
}

impl PropertyStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(IndexMap::new()),
            change_listeners: RwLock::new(Vec::new()),
            veto_listeners: RwLock::new(Vec::new()),
            disposed: AtomicBool::new(false),
        }
    }

    /// Declare a writable property with its initial value
    #[must_use]
    pub fn with(self, name: &str, value: impl Into<Value>) -> Self {
        self.declare(name, value.into(), false);
        self
    }

    /// Declare a read-only property
    #[must_use]
    pub fn with_read_only(self, name: &str, value: impl Into<Value>) -> Self {
        self.declare(name, value.into(), true);
        self
    }

    fn declare(&self, name: &str, value: Value, read_only: bool) {
        self.entries
            .write()
            .insert(name.to_string(), PropertyEntry { value, read_only });
    }

    /// Detach the store from its owner; every later access fails
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
        self.change_listeners.write().clear();
        self.veto_listeners.write().clear();
    }

    /// Whether [`dispose`](Self::dispose) has run
    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Number of registered change listeners
    #[must_use]
    pub fn change_listener_count(&self) -> usize {
        self.change_listeners.read().len()
    }

    fn check_alive(&self) -> Result<(), PropertyFault> {
        if self.is_disposed() {
            Err(PropertyFault::WrappedFailure("object is disposed".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for PropertyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyStore")
            .field("properties", &self.property_names())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl PropertySet for PropertyStore {
    fn property_names(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyFault> {
        self.check_alive()?;
        self.entries
            .read()
            .get(name)
            .map(|entry| entry.value.clone())
            .ok_or_else(|| PropertyFault::UnknownProperty(name.to_string()))
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), PropertyFault> {
        self.check_alive()?;

        let old = {
            let entries = self.entries.read();
            let entry = entries
                .get(name)
                .ok_or_else(|| PropertyFault::UnknownProperty(name.to_string()))?;
            if entry.read_only {
                return Err(PropertyFault::Vetoed {
                    property: name.to_string(),
                    reason: "property is read-only".to_string(),
                });
            }
            let expected = entry.value.value_type();
            if expected != value.value_type() {
                return Err(PropertyFault::TypeMismatch {
                    property: name.to_string(),
                    expected,
                    found: value.value_type(),
                });
            }
            entry.value.clone()
        };

        let change = PropertyChange {
            name: name.to_string(),
            old,
            new: value,
        };

        let vetoes: Vec<VetoListener> = self
            .veto_listeners
            .read()
            .iter()
            .filter(|(_, property, _)| property == name)
            .map(|(_, _, listener)| Arc::clone(listener))
            .collect();
        for veto in vetoes {
            veto(&change).map_err(|reason| PropertyFault::Vetoed {
                property: name.to_string(),
                reason,
            })?;
        }

        if let Some(entry) = self.entries.write().get_mut(name) {
            entry.value = change.new.clone();
        }
        tracing::trace!(property = name, "property written");

        let listeners: Vec<ChangeListener> = self
            .change_listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&change);
        }
        Ok(())
    }

    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId {
        let id = ListenerId::next();
        self.change_listeners.write().push((id, listener));
        id
    }

    fn remove_change_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.change_listeners.write();
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        listeners.len() != before
    }

    fn add_veto_listener(&self, name: &str, listener: VetoListener) -> ListenerId {
        let id = ListenerId::next();
        self.veto_listeners
            .write()
            .push((id, name.to_string(), listener));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn store() -> PropertyStore {
        PropertyStore::new()
            .with("Title", "")
            .with("Width", 100_i64)
            .with_read_only("ImplementationName", "test.Object")
    }

    #[test]
    fn get_and_set_roundtrip() {
        let props = store();
        props.set_property("Title", Value::from("hello")).unwrap();
        assert_eq!(props.get_string("Title").unwrap(), "hello");
    }

    #[test]
    fn unknown_property_rejected() {
        let props = store();
        let err = props.set_property("Colour", Value::from("red")).unwrap_err();
        assert_eq!(err, PropertyFault::UnknownProperty("Colour".to_string()));
        assert!(props.get_property("Colour").is_err());
    }

    #[test]
    fn type_mismatch_rejected() {
        let props = store();
        let err = props.set_property("Width", Value::from("wide")).unwrap_err();
        assert!(matches!(
            err,
            PropertyFault::TypeMismatch {
                expected: ValueType::Int,
                found: ValueType::Str,
                ..
            }
        ));
        assert_eq!(props.get_property("Width").unwrap(), Value::Int(100));
    }

    #[test]
    fn read_only_write_is_vetoed() {
        let props = store();
        let err = props
            .set_property("ImplementationName", Value::from("other"))
            .unwrap_err();
        assert!(matches!(err, PropertyFault::Vetoed { .. }));
    }

    #[test]
    fn veto_listener_blocks_write() {
        let props = store();
        props.add_veto_listener(
            "Title",
            Arc::new(|change: &PropertyChange| {
                if change.new == Value::from("forbidden") {
                    Err("not allowed".to_string())
                } else {
                    Ok(())
                }
            }),
        );

        assert!(props.set_property("Title", Value::from("fine")).is_ok());
        let err = props
            .set_property("Title", Value::from("forbidden"))
            .unwrap_err();
        assert_eq!(
            err,
            PropertyFault::Vetoed {
                property: "Title".to_string(),
                reason: "not allowed".to_string(),
            }
        );
        assert_eq!(props.get_string("Title").unwrap(), "fine");
    }

    #[test]
    fn get_string_on_int_is_type_mismatch() {
        let props = store();
        assert!(matches!(
            props.get_string("Width"),
            Err(PropertyFault::TypeMismatch { .. })
        ));
    }

    #[test]
    fn change_listeners_see_writes_in_order() {
        let props = store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        props.add_change_listener(Arc::new(move |change: &PropertyChange| {
            sink.lock().push(change.clone());
        }));

        props.set_property("Title", Value::from("a")).unwrap();
        props.set_property("Title", Value::from("")).unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].old, Value::from(""));
        assert_eq!(seen[0].new, Value::from("a"));
        assert_eq!(seen[1].old, Value::from("a"));
        assert_eq!(seen[1].new, Value::from(""));
    }

    #[test]
    fn rejected_write_does_not_notify() {
        let props = store();
        let seen = Arc::new(Mutex::new(0_usize));
        let sink = Arc::clone(&seen);
        props.add_change_listener(Arc::new(move |_: &PropertyChange| {
            *sink.lock() += 1;
        }));

        let _ = props.set_property("Width", Value::from("wide"));
        assert_eq!(*seen.lock(), 0);
    }

    #[test]
    fn remove_change_listener() {
        let props = store();
        let id = props.add_change_listener(Arc::new(|_: &PropertyChange| {}));
        assert_eq!(props.change_listener_count(), 1);
        assert!(props.remove_change_listener(id));
        assert!(!props.remove_change_listener(id));
        assert_eq!(props.change_listener_count(), 0);
    }

    #[test]
    fn listener_may_read_store() {
        let props = Arc::new(store());
        let reader = Arc::downgrade(&props);
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        props.add_change_listener(Arc::new(move |_: &PropertyChange| {
            if let Some(props) = reader.upgrade() {
                *sink.lock() = props.get_string("Title").ok();
            }
        }));

        props.set_property("Title", Value::from("read back")).unwrap();
        assert_eq!(seen.lock().as_deref(), Some("read back"));
    }

    #[test]
    fn disposed_store_wraps_failure() {
        let props = store();
        props.dispose();
        assert!(matches!(
            props.get_property("Title"),
            Err(PropertyFault::WrappedFailure(_))
        ));
        assert!(matches!(
            props.set_property("Title", Value::from("x")),
            Err(PropertyFault::WrappedFailure(_))
        ));
    }
}
