//! AOC Accessibility Layer
//!
//! On-demand accessible trees projected from live document state.
//!
//! # Core Concepts
//!
//! - [`AccessibilityProvider`]: windowing-layer contract (window for a document,
//!   accessible root for a window)
//! - [`Toolkit`]: in-memory provider projecting [`aoc_model`] documents
//! - [`AccessibleNode`]: role, name, description and ordered children
//! - [`EventBroadcaster`]: delivers [`AccessibleEvent`]s to registered listeners
//! - [`find_first_by_role`]: document-order search over a projected tree
//!
//! Trees are never cached. Every call to
//! [`AccessibilityProvider::accessible_root`] projects the document again, so
//! nodes obtained before a mutation describe the state before it.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod dump;
mod error;
mod event;
pub mod locate;
mod node;
mod projection;
mod role;
mod window;

// Re-exports
pub use error::AccessError;
pub use event::{AccessibleEvent, AccessibleEventKind, EventBroadcaster, EventListener};
pub use locate::{count_by_role, find_first_by_role, Preorder};
pub use node::{AccessibleNode, NodeBuilder};
pub use projection::{accessible_name, role_for, translate_change};
pub use role::Role;
pub use window::{AccessibilityProvider, Toolkit, WindowHandle};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
