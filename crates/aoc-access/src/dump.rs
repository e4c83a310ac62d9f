//! Text rendering of accessible trees for diagnostics

use crate::node::AccessibleNode;
use std::fmt::Write;

/// Render a tree, one node per line, indented by depth
#[must_use]
pub fn render_tree(root: &AccessibleNode) -> String {
    let mut out = String::new();
    let mut stack = vec![(root, 0_usize)];
    while let Some((node, depth)) = stack.pop() {
        let _ = write!(
            out,
            "{:indent$}{} \"{}\"",
            "",
            node.role(),
            node.name(),
            indent = depth * 2
        );
        if !node.description().is_empty() {
            let _ = write!(out, " ({})", node.description());
        }
        out.push('\n');
        stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
    }
    out
}
