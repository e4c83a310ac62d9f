//! Projection of document content onto accessible nodes
//!
//! Text documents project as
//! `FRAME > ROOT_PANE > SCROLL_PANE > DOCUMENT_TEXT > [PARAGRAPH*, <object>*]`:
//! paragraphs first, then one node per anchored object in anchor order.

use crate::event::{AccessibleEvent, AccessibleEventKind};
use crate::node::{AccessibleNode, NodeBuilder};
use crate::role::Role;
use aoc_model::{
    ContentSnapshot, DocumentKind, EmbeddedObject, ObjectKind, ObjectRef, PropertyChange,
    PropertySet, Value, DESCRIPTION, IMPLEMENTATION_NAME, NAME, TITLE,
};

/// Role an embedded object projects to
#[must_use]
pub fn role_for(kind: ObjectKind) -> Role {
    match kind {
        ObjectKind::Graphic => Role::Graphic,
        ObjectKind::TextFrame => Role::TextFrame,
    }
}

/// Accessible name of an object: its title when set, else its name
#[must_use]
pub fn accessible_name(title: &str, name: &str) -> String {
    if title.is_empty() {
        name.to_string()
    } else {
        title.to_string()
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Void => String::new(),
    }
}

/// Turn a committed property write into the accessible event it implies
///
/// Returns `None` for writes that leave the accessible surface unchanged.
#[must_use]
pub fn translate_change(
    object: &EmbeddedObject,
    change: &PropertyChange,
) -> Option<AccessibleEvent> {
    let (kind, old_value, new_value) = match change.name.as_str() {
        TITLE => {
            let name = object.get_string(NAME).unwrap_or_default();
            (
                AccessibleEventKind::NameChanged,
                accessible_name(change.old.as_str().unwrap_or_default(), &name),
                accessible_name(change.new.as_str().unwrap_or_default(), &name),
            )
        }
        NAME => {
            let title = object.get_string(TITLE).unwrap_or_default();
            (
                AccessibleEventKind::NameChanged,
                accessible_name(&title, change.old.as_str().unwrap_or_default()),
                accessible_name(&title, change.new.as_str().unwrap_or_default()),
            )
        }
        DESCRIPTION => (
            AccessibleEventKind::DescriptionChanged,
            display(&change.old),
            display(&change.new),
        ),
        "Width" | "Height" => (
            AccessibleEventKind::BoundsChanged,
            display(&change.old),
            display(&change.new),
        ),
        _ => return None,
    };
    (old_value != new_value).then_some(AccessibleEvent {
        kind,
        old_value,
        new_value,
    })
}

/// Node builder for one embedded object
pub(crate) fn object_node(object: &EmbeddedObject) -> NodeBuilder {
    let name = object.get_string(NAME).unwrap_or_default();
    let title = object.get_string(TITLE).unwrap_or_default();
    let mut node = AccessibleNode::builder(role_for(object.kind()))
        .name(accessible_name(&title, &name))
        .description(object.get_string(DESCRIPTION).unwrap_or_default())
        .source(object.id());
    if let Ok(implementation) = object.get_string(IMPLEMENTATION_NAME) {
        node = node.implementation_name(format!("{implementation}.Accessible"));
    }
    node
}

/// Project document content below the window chrome
pub(crate) fn document_node(
    kind: DocumentKind,
    title: &str,
    content: &ContentSnapshot,
    mut object: impl FnMut(&ObjectRef) -> NodeBuilder,
) -> NodeBuilder {
    let role = match kind {
        DocumentKind::Text => Role::DocumentText,
        DocumentKind::Drawing => Role::Document,
    };
    let paragraphs = content
        .paragraphs
        .iter()
        .map(|text| AccessibleNode::builder(Role::Paragraph).name(text.clone()));
    let objects: Vec<NodeBuilder> = content
        .anchors
        .iter()
        .map(|anchor| object(&anchor.object))
        .collect();
    AccessibleNode::builder(role)
        .name(title)
        .children(paragraphs)
        .children(objects)
}

/// Wrap document content in window chrome
pub(crate) fn window_node(title: &str, document: NodeBuilder) -> NodeBuilder {
    AccessibleNode::builder(Role::Frame).name(title).child(
        AccessibleNode::builder(Role::RootPane)
            .child(AccessibleNode::builder(Role::ScrollPane).child(document)),
    )
}
