//! Error types for the conformance harness
//!
//! Fixture and locate failures abort a run before any environment reaches
//! the checker. Property mutation faults never appear here: the trigger
//! discards them (see [`crate::trigger`]).

use aoc_access::{AccessError, Role};
use aoc_model::{DocumentKind, PropertyFault, ServiceError, Unsupported};

use crate::lifecycle::LifecycleState;

/// Fault raised by a property write inside the trigger
pub type MutationFault = PropertyFault;

/// Main harness error type
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Document or embedded object could not be constructed
    #[error("fixture creation failed: {0}")]
    FixtureCreation(#[from] FixtureCreationError),

    /// Target role absent from the accessible tree
    #[error(transparent)]
    NodeNotFound(#[from] NodeNotFoundError),

    /// Window or accessible root unavailable
    #[error("accessibility access failed: {0}")]
    Access(#[from] AccessError),

    /// Lifecycle misuse
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Closing the fixture document failed
    #[error("teardown failed: {0}")]
    Teardown(ServiceError),
}

impl HarnessError {
    /// Whether the failure points at missing accessibility support
    #[inline]
    #[must_use]
    pub fn is_accessibility_regression(&self) -> bool {
        matches!(self, Self::NodeNotFound(_))
    }

    /// Phase the run was in when the error surfaced
    #[must_use]
    pub fn phase(&self) -> &'static str {
        match self {
            Self::FixtureCreation(_) => "initialize",
            Self::NodeNotFound(_) | Self::Access(_) => "create_test_environment",
            Self::Lifecycle(_) => "lifecycle",
            Self::Teardown(_) => "cleanup",
        }
    }
}

/// Fixture construction errors
#[derive(Debug, thiserror::Error)]
pub enum FixtureCreationError {
    /// The document service refused to open a document
    #[error("could not open {kind} document: {source}")]
    OpenDocument {
        /// Requested document kind
        kind: DocumentKind,
        /// Underlying failure
        #[source]
        source: ServiceError,
    },

    /// The document has no text insertion point
    #[error("document is not insertable: {0}")]
    NotInsertable(#[from] Unsupported),

    /// The embedded object could not be instantiated
    #[error("could not create {service}: {source}")]
    CreateObject {
        /// Requested service name
        service: String,
        /// Underlying failure
        #[source]
        source: ServiceError,
    },

    /// Cursor creation or insertion was rejected
    #[error("could not insert object: {0}")]
    Insert(#[source] ServiceError),
}

/// No node with the requested role exists in the accessible tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no accessible node with role {role}")]
pub struct NodeNotFoundError {
    /// Requested role
    pub role: Role,
}

/// Lifecycle controller errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// Transition not in the lifecycle table
    #[error("illegal transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: LifecycleState,
        /// Requested state
        to: LifecycleState,
    },

    /// A controller runs its case once
    #[error("test case already ran")]
    AlreadyRun,
}
