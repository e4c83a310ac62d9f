//! Test environment handed to conformance checkers

use crate::config::EVENT_PRODUCER;
use crate::trigger::EventProducer;
use aoc_access::AccessibleNode;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The located node paired with its named relations
///
/// Immutable once assembled; checkers only read it.
#[derive(Clone)]
pub struct TestEnvironment {
    object: AccessibleNode,
    relations: BTreeMap<String, Arc<dyn EventProducer>>,
}

impl TestEnvironment {
    /// Environment around `object` with no relations
    #[must_use]
    pub fn new(object: AccessibleNode) -> Self {
        Self {
            object,
            relations: BTreeMap::new(),
        }
    }

    /// Attach a named relation, replacing any previous one of that name
    #[must_use]
    pub fn with_relation(
        mut self,
        name: impl Into<String>,
        producer: Arc<dyn EventProducer>,
    ) -> Self {
        self.relations.insert(name.into(), producer);
        self
    }

    /// Node under test
    #[inline]
    #[must_use]
    pub fn test_object(&self) -> &AccessibleNode {
        &self.object
    }

    /// Relation by name
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&Arc<dyn EventProducer>> {
        self.relations.get(name)
    }

    /// The `"EventProducer"` relation
    #[must_use]
    pub fn event_producer(&self) -> Option<&Arc<dyn EventProducer>> {
        self.relation(EVENT_PRODUCER)
    }

    /// Relation names in sorted order
    pub fn relation_names(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for TestEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestEnvironment")
            .field("role", &self.object.role())
            .field("name", &self.object.name())
            .field("relations", &self.relations.keys().collect::<Vec<_>>())
            .finish()
    }
}
