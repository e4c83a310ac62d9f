//! AOC Conformance Harness
//!
//! Fixture setup and event triggering for accessible object conformance
//! runs. One run opens a text document, inserts a graphic object, locates
//! its `GRAPHIC` accessible node and hands a [`TestEnvironment`] to a
//! checker. The environment carries an `"EventProducer"` relation whose
//! trigger changes the object's title and restores it.
//!
//! # Core Concepts
//!
//! - [`FixtureBuilder`]: opens the document and inserts the object
//! - [`TreeLocator`]: first node of a role in document order
//! - [`TitleRoundTrip`]: the [`EventProducer`] behind the relation
//! - [`LifecycleController`]: drives a [`TestCase`] and disposes its fixture on every exit path
//! - [`EventBroadcasterCheck`]: add/fire/remove/fire listener check
//!
//! # Example
//!
//! ```rust,ignore
//! use aoc_access::Toolkit;
//! use aoc_harness::{GraphicObjectCase, LifecycleController};
//! use aoc_model::Desktop;
//!
//! let case = GraphicObjectCase::new(Desktop::new(), Toolkit::new());
//! let mut controller = LifecycleController::new(case);
//! controller.run(|env| env.event_producer().map(|p| p.fire_event()))?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod case;
pub mod checker;
pub mod config;
pub mod environment;
pub mod error;
pub mod fixture;
pub mod lifecycle;
pub mod locator;
pub mod report;
pub mod trigger;

// Re-exports
pub use case::{GraphicObjectCase, TestCase};
pub use checker::{CheckError, CheckReport, EventBroadcasterCheck};
pub use config::{
    ConfigError, TestParameters, DEFAULT_SENTINEL_TITLE, EVENT_PRODUCER, GRAPHIC_OBJECT_SERVICE,
};
pub use environment::TestEnvironment;
pub use error::{
    FixtureCreationError, HarnessError, LifecycleError, MutationFault, NodeNotFoundError,
};
pub use fixture::{Fixture, FixtureBuilder};
pub use lifecycle::{
    allowed_transitions, validate_transition, LifecycleController, LifecycleState, StateTracker,
    Teardown,
};
pub use locator::TreeLocator;
pub use report::{run_with_check, NodeSummary, RunReport};
pub use trigger::{discard_fault, EventProducer, FnProducer, TitleRoundTrip};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
