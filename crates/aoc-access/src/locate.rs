//! Tree search
//!
//! Search runs over a freshly projected tree in document order: depth-first
//! pre-order, children in the order the parent exposes them.

use crate::node::AccessibleNode;
use crate::role::Role;

/// Depth-first pre-order walk over an accessible tree
#[derive(Debug)]
pub struct Preorder<'a> {
    stack: Vec<&'a AccessibleNode>,
}

impl<'a> Preorder<'a> {
    /// Walk the tree rooted at `root`, starting with `root` itself
    #[must_use]
    pub fn new(root: &'a AccessibleNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a AccessibleNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// First node with `role` in document order
#[must_use]
pub fn find_first_by_role(root: &AccessibleNode, role: Role) -> Option<AccessibleNode> {
    Preorder::new(root).find(|node| node.role() == role).cloned()
}

/// Number of nodes with `role`
#[must_use]
pub fn count_by_role(root: &AccessibleNode, role: Role) -> usize {
    Preorder::new(root).filter(|node| node.role() == role).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> AccessibleNode {
        AccessibleNode::builder(Role::Frame)
            .name("root")
            .child(
                AccessibleNode::builder(Role::Panel)
                    .name("left")
                    .child(AccessibleNode::builder(Role::Graphic).name("deep")),
            )
            .child(AccessibleNode::builder(Role::Graphic).name("shallow"))
            .build()
    }

    #[test]
    fn preorder_visits_document_order() {
        let root = sample();
        let names: Vec<&str> = Preorder::new(&root).map(AccessibleNode::name).collect();
        assert_eq!(names, vec!["root", "left", "deep", "shallow"]);
    }

    #[test]
    fn first_match_is_depth_first() {
        let root = sample();
        let found = find_first_by_role(&root, Role::Graphic).unwrap();
        assert_eq!(found.name(), "deep");
        assert_eq!(count_by_role(&root, Role::Graphic), 2);
    }

    #[test]
    fn root_itself_can_match() {
        let root = sample();
        assert_eq!(find_first_by_role(&root, Role::Frame).unwrap().name(), "root");
    }

    #[test]
    fn absent_role_yields_none() {
        let root = sample();
        assert!(find_first_by_role(&root, Role::Paragraph).is_none());
        assert_eq!(count_by_role(&root, Role::Paragraph), 0);
    }

    fn arb_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    #[derive(Debug, Clone)]
    struct Shape(Role, Vec<Shape>);

    impl Shape {
        fn into_builder(self) -> crate::node::NodeBuilder {
            AccessibleNode::builder(self.0).children(self.1.into_iter().map(Shape::into_builder))
        }
    }

    fn arb_tree() -> impl Strategy<Value = Shape> {
        let leaf = arb_role().prop_map(|role| Shape(role, Vec::new()));
        leaf.prop_recursive(4, 32, 4, |inner| {
            (arb_role(), prop::collection::vec(inner, 0..4))
                .prop_map(|(role, children)| Shape(role, children))
        })
    }

    proptest! {
        #[test]
        fn prop_first_match_has_requested_role(shape in arb_tree(), role in arb_role()) {
            let tree = shape.into_builder().build();
            match find_first_by_role(&tree, role) {
                Some(node) => {
                    prop_assert_eq!(node.role(), role);
                }
                None => {
                    prop_assert_eq!(count_by_role(&tree, role), 0);
                }
            }
        }

        #[test]
        fn prop_first_match_precedes_all_others(shape in arb_tree(), role in arb_role()) {
            let tree = shape.into_builder().build();
            let position = Preorder::new(&tree).position(|node| node.role() == role);
            if let (Some(position), Some(found)) = (position, find_first_by_role(&tree, role)) {
                let nth = Preorder::new(&tree).nth(position).unwrap();
                prop_assert!(nth.ptr_eq(&found));
            }
        }
    }
}
