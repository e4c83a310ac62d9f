//! Accessible events and their broadcaster

use aoc_model::ListenerId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What changed on an accessible node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessibleEventKind {
    /// Accessible name changed
    NameChanged,
    /// Accessible description changed
    DescriptionChanged,
    /// Visible geometry changed
    BoundsChanged,
}

/// Notification emitted to assistive technology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibleEvent {
    /// Event kind
    pub kind: AccessibleEventKind,
    /// Value before the change
    pub old_value: String,
    /// Value after the change
    pub new_value: String,
}

/// Listener for accessible events
pub type EventListener = Arc<dyn Fn(&AccessibleEvent) + Send + Sync>;

/// Fan-out of accessible events to registered listeners
#[derive(Default)]
pub struct EventBroadcaster {
    listeners: RwLock<Vec<(ListenerId, EventListener)>>,
}

impl EventBroadcaster {
    /// Create a broadcaster with no listeners
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add_listener(&self, listener: EventListener) -> ListenerId {
        let id = ListenerId::next();
        self.listeners.write().push((id, listener));
        id
    }

    /// Unregister a listener; returns whether it was registered
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        listeners.len() != before
    }

    /// Number of registered listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Deliver an event to every listener, in registration order
    pub fn broadcast(&self, event: &AccessibleEvent) {
        let listeners: Vec<EventListener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        tracing::trace!(kind = ?event.kind, listeners = listeners.len(), "broadcasting");
        for listener in listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for EventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBroadcaster")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
