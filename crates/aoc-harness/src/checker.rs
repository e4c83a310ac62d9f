//! Event broadcaster conformance check
//!
//! Registers a listener on the node under test, fires the `EventProducer`
//! relation, then removes the listener and fires again. A conforming node
//! delivers events only while the listener is registered.

use crate::config::EVENT_PRODUCER;
use crate::environment::TestEnvironment;
use aoc_access::AccessibleEvent;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// Errors preventing the check from running
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// The environment lacks the named relation
    #[error("environment has no {0} relation")]
    MissingRelation(String),
}

/// What the check observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Events delivered while the listener was registered
    pub events_received: Vec<AccessibleEvent>,
    /// Events delivered after removal; must be zero
    pub events_after_removal: usize,
    /// Whether the node acknowledged the removal
    pub listener_removed: bool,
}

impl CheckReport {
    /// Events arrived while registered and none after removal
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.events_received.is_empty() && self.listener_removed && self.events_after_removal == 0
    }
}

/// Add/remove listener check over the `EventProducer` relation
#[derive(Debug, Clone)]
pub struct EventBroadcasterCheck {
    relation: String,
}

impl Default for EventBroadcasterCheck {
    fn default() -> Self {
        Self {
            relation: EVENT_PRODUCER.to_string(),
        }
    }
}

impl EventBroadcasterCheck {
    /// Check using the `"EventProducer"` relation
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check using another relation
    #[must_use]
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = relation.into();
        self
    }

    /// Run the check against `environment`
    pub fn run(&self, environment: &TestEnvironment) -> Result<CheckReport, CheckError> {
        let producer = environment
            .relation(&self.relation)
            .ok_or_else(|| CheckError::MissingRelation(self.relation.clone()))?;
        let node = environment.test_object();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = node.add_event_listener(Arc::new(move |event: &AccessibleEvent| {
            sink.lock().push(event.clone());
        }));

        producer.fire_event();
        let events_received = seen.lock().clone();
        tracing::info!(events = events_received.len(), "events while listening");

        let listener_removed = node.remove_event_listener(id);
        producer.fire_event();
        let events_after_removal = seen.lock().len() - events_received.len();
        if events_after_removal > 0 {
            tracing::warn!(
                events = events_after_removal,
                "events delivered after listener removal"
            );
        }

        Ok(CheckReport {
            events_received,
            events_after_removal,
            listener_removed,
        })
    }
}
