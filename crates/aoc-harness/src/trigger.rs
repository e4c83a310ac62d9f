//! Property mutation trigger
//!
//! [`TitleRoundTrip`] writes a sentinel title and then the original title
//! back, so each call produces two property-change notifications and leaves
//! the title as it found it.
//!
//! # Fault policy
//!
//! [`TitleRoundTrip::trigger`] reports faults. [`EventProducer::fire_event`]
//! does not: every fault goes through [`discard_fault`], the one place where
//! mutation faults are dropped. A dropped fault shows up downstream as fewer
//! events than expected, never as an error.

use crate::error::MutationFault;
use aoc_model::{PropertySet, Value, TITLE};
use std::sync::Arc;

/// Operation invoked by a conformance checker to provoke events
pub trait EventProducer: Send + Sync {
    /// Provoke the events; never fails
    fn fire_event(&self);
}

/// Adapts a closure into an [`EventProducer`]
#[derive(Debug, Clone)]
pub struct FnProducer<F>(pub F);

impl<F: Fn() + Send + Sync> EventProducer for FnProducer<F> {
    fn fire_event(&self) {
        (self.0)();
    }
}

/// Drop a mutation fault after logging it
///
/// TODO: decide with checker owners whether faults should fail the
/// event-count assertion instead of shortening it.
pub fn discard_fault(fault: MutationFault) {
    tracing::warn!(%fault, "property mutation fault discarded");
}

/// Title round trip over one property set
pub struct TitleRoundTrip {
    target: Arc<dyn PropertySet>,
    sentinel: String,
}

impl TitleRoundTrip {
    /// Round trip writing the default sentinel
    #[must_use]
    pub fn new(target: Arc<dyn PropertySet>) -> Self {
        Self {
            target,
            sentinel: crate::config::DEFAULT_SENTINEL_TITLE.to_string(),
        }
    }

    /// Use a different sentinel value
    ///
    /// The sentinel must differ from the target's current title. When it does
    /// not, both writes store the value already there, listeners see no name
    /// change, and [`TitleRoundTrip::trigger`] logs a warning.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Sentinel value written first
    #[inline]
    #[must_use]
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Read the title, write the sentinel, restore the title
    ///
    /// Stops at the first fault. A fault on the restoring write leaves the
    /// sentinel in place.
    pub fn trigger(&self) -> Result<(), MutationFault> {
        let title = self.target.get_string(TITLE)?;
        if title == self.sentinel {
            tracing::warn!(
                sentinel = %self.sentinel,
                "sentinel equals the current title, no name change will be observed"
            );
        }
        self.target
            .set_property(TITLE, Value::from(self.sentinel.as_str()))?;
        self.target.set_property(TITLE, Value::Str(title))?;
        Ok(())
    }
}

impl EventProducer for TitleRoundTrip {
    fn fire_event(&self) {
        if let Err(fault) = self.trigger() {
            discard_fault(fault);
        }
    }
}

impl std::fmt::Debug for TitleRoundTrip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleRoundTrip")
            .field("sentinel", &self.sentinel)
            .finish_non_exhaustive()
    }
}
