//! Accessibility tree locator
//!
//! Finds the node under test by role. The tree is projected again on every
//! call; nothing is cached between lookups.

use crate::error::{HarnessError, NodeNotFoundError};
use aoc_access::dump::render_tree;
use aoc_access::{
    count_by_role, find_first_by_role, AccessibilityProvider, AccessibleNode, Role, WindowHandle,
};
use aoc_model::DocumentHandle;

/// Locates accessible nodes through an [`AccessibilityProvider`]
#[derive(Debug)]
pub struct TreeLocator<'a, P: ?Sized> {
    provider: &'a P,
    debug: bool,
}

impl<'a, P: AccessibilityProvider + ?Sized> TreeLocator<'a, P> {
    /// Locator over `provider`
    #[must_use]
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            debug: false,
        }
    }

    /// Dump the projected tree at debug level while locating
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// First node with `role` in the tree of `window`
    ///
    /// When several nodes share the role only the first one in document
    /// order is returned.
    pub fn locate(
        &self,
        window: &WindowHandle,
        role: Role,
    ) -> Result<AccessibleNode, HarnessError> {
        let root = self.provider.accessible_root(window)?;
        if self.debug {
            tracing::debug!("accessible tree:\n{}", render_tree(&root));
        }

        let node = find_first_by_role(&root, role).ok_or(NodeNotFoundError { role })?;
        let matches = count_by_role(&root, role);
        if matches > 1 {
            tracing::debug!(%role, matches, "role is not unique, using first match");
        }
        tracing::info!(implementation = node.implementation_name(), "located {role} node");
        Ok(node)
    }

    /// Resolve the current window of `document`, then [`locate`](Self::locate)
    pub fn locate_in(
        &self,
        document: &DocumentHandle,
        role: Role,
    ) -> Result<AccessibleNode, HarnessError> {
        let window = self.provider.current_window(document)?;
        self.locate(&window, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_access::Toolkit;
    use aoc_model::{Desktop, DocumentKind, DocumentService};
    use std::sync::Arc;

    #[test]
    fn empty_document_has_no_graphic() {
        let desktop = Desktop::new();
        let toolkit = Toolkit::new();
        let doc = desktop.create_document(DocumentKind::Text).unwrap();

        let err = TreeLocator::new(&toolkit)
            .locate_in(&doc, Role::Graphic)
            .unwrap_err();
        assert!(matches!(
            err,
            HarnessError::NodeNotFound(NodeNotFoundError { role: Role::Graphic })
        ));
    }

    #[test]
    fn other_role_is_not_substituted() {
        let desktop = Desktop::new();
        let toolkit = Toolkit::new();
        let doc = desktop.create_document(DocumentKind::Text).unwrap();
        let frame = desktop.create_instance(&doc, "TextFrame").unwrap();
        let text = doc.text().unwrap();
        text.insert_content(&text.create_cursor().unwrap(), frame, true)
            .unwrap();

        let locator = TreeLocator::new(&toolkit);
        assert!(locator.locate_in(&doc, Role::Graphic).unwrap_err().is_accessibility_regression());
        assert_eq!(
            locator.locate_in(&doc, Role::TextFrame).unwrap().role(),
            Role::TextFrame
        );
    }

    #[test]
    fn first_of_several_graphics() {
        let desktop = Desktop::new();
        let toolkit = Toolkit::new();
        let doc = desktop.create_document(DocumentKind::Text).unwrap();
        let text = doc.text().unwrap();
        let first = desktop.create_instance(&doc, "GraphicObject").unwrap();
        let second = desktop.create_instance(&doc, "GraphicObject").unwrap();
        let cursor = text.create_cursor().unwrap();
        text.insert_content(&cursor, Arc::clone(&first), true).unwrap();
        text.insert_content(&cursor, second, true).unwrap();

        let node = TreeLocator::new(&toolkit)
            .with_debug(true)
            .locate_in(&doc, Role::Graphic)
            .unwrap();
        assert_eq!(node.source(), Some(first.id()));
    }

    #[test]
    fn closed_document_is_access_error() {
        let desktop = Desktop::new();
        let toolkit = Toolkit::new();
        let doc = desktop.create_document(DocumentKind::Text).unwrap();
        desktop.close_document(&doc).unwrap();

        let err = TreeLocator::new(&toolkit)
            .locate_in(&doc, Role::Graphic)
            .unwrap_err();
        assert!(matches!(err, HarnessError::Access(_)));
    }
}
