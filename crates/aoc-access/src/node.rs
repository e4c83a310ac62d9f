//! Accessible nodes
//!
//! A node is a read-through view captured when the tree is projected. Its
//! role, name and children do not track later document changes; locate the
//! node again to observe them. The event broadcaster, by contrast, is shared
//! with the underlying object and stays live across projections.

use crate::event::{EventBroadcaster, EventListener};
use crate::role::Role;
use aoc_model::{ListenerId, ObjectId};
use std::sync::Arc;

#[derive(Debug)]
struct NodeInner {
    role: Role,
    name: String,
    description: String,
    implementation_name: String,
    index_in_parent: Option<usize>,
    source: Option<ObjectId>,
    children: Vec<AccessibleNode>,
    broadcaster: Arc<EventBroadcaster>,
}

/// One node of an accessible tree
#[derive(Debug, Clone)]
pub struct AccessibleNode {
    inner: Arc<NodeInner>,
}

impl AccessibleNode {
    /// Start building a node with the given role
    #[must_use]
    pub fn builder(role: Role) -> NodeBuilder {
        NodeBuilder::new(role)
    }

    /// Semantic role
    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.inner.role
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.inner.description
    }

    /// Name of the implementation backing this node
    #[inline]
    #[must_use]
    pub fn implementation_name(&self) -> &str {
        &self.inner.implementation_name
    }

    /// Position among the parent's children
    #[inline]
    #[must_use]
    pub fn index_in_parent(&self) -> Option<usize> {
        self.inner.index_in_parent
    }

    /// Embedded object this node projects, if any
    #[inline]
    #[must_use]
    pub fn source(&self) -> Option<ObjectId> {
        self.inner.source
    }

    /// Ordered children
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[AccessibleNode] {
        &self.inner.children
    }

    /// Number of children
    #[inline]
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.inner.children.len()
    }

    /// Child at `index`
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&AccessibleNode> {
        self.inner.children.get(index)
    }

    /// Register an event listener
    pub fn add_event_listener(&self, listener: EventListener) -> ListenerId {
        self.inner.broadcaster.add_listener(listener)
    }

    /// Unregister an event listener
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.inner.broadcaster.remove_listener(id)
    }

    /// Whether both handles refer to the same projected node
    #[must_use]
    pub fn ptr_eq(&self, other: &AccessibleNode) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The broadcaster events for this node flow through
    #[must_use]
    pub fn broadcaster(&self) -> &Arc<EventBroadcaster> {
        &self.inner.broadcaster
    }
}

/// Builder for [`AccessibleNode`]
#[derive(Debug)]
pub struct NodeBuilder {
    role: Role,
    name: String,
    description: String,
    implementation_name: String,
    source: Option<ObjectId>,
    children: Vec<NodeBuilder>,
    broadcaster: Option<Arc<EventBroadcaster>>,
}

impl NodeBuilder {
    fn new(role: Role) -> Self {
        Self {
            role,
            name: String::new(),
            description: String::new(),
            implementation_name: format!("aoc.access.{}", role.as_str().to_lowercase()),
            source: None,
            children: Vec::new(),
            broadcaster: None,
        }
    }

    /// Set the display name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the implementation name
    #[must_use]
    pub fn implementation_name(mut self, name: impl Into<String>) -> Self {
        self.implementation_name = name.into();
        self
    }

    /// Record the projected object
    #[must_use]
    pub fn source(mut self, source: ObjectId) -> Self {
        self.source = Some(source);
        self
    }

    /// Share an existing broadcaster instead of creating a fresh one
    #[must_use]
    pub fn broadcaster(mut self, broadcaster: Arc<EventBroadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    /// Append a child
    #[must_use]
    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = NodeBuilder>) -> Self {
        self.children.extend(children);
        self
    }

    /// Finish the tree rooted at this builder
    #[must_use]
    pub fn build(self) -> AccessibleNode {
        self.build_at(None)
    }

    fn build_at(self, index_in_parent: Option<usize>) -> AccessibleNode {
        let children = self
            .children
            .into_iter()
            .enumerate()
            .map(|(index, child)| child.build_at(Some(index)))
            .collect();
        AccessibleNode {
            inner: Arc::new(NodeInner {
                role: self.role,
                name: self.name,
                description: self.description,
                implementation_name: self.implementation_name,
                index_in_parent,
                source: self.source,
                children,
                broadcaster: self.broadcaster.unwrap_or_default(),
            }),
        }
    }
}
