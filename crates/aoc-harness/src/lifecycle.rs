//! Test case lifecycle
//!
//! A run moves through `Uninitialized -> FixtureReady -> EnvironmentReady ->
//! Disposed`. Aborted runs may jump to `Disposed` from either earlier state.
//! Once a fixture exists it is owned by a [`Teardown`] guard, which closes
//! the document exactly once: explicitly at the end of a successful run, or
//! from `Drop` when a later phase fails or the checker panics.

use crate::case::TestCase;
use crate::environment::TestEnvironment;
use crate::error::{HarnessError, LifecycleError};
use crate::fixture::Fixture;
use aoc_model::ServiceError;
use serde::Serialize;

/// Lifecycle state of one test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// Nothing built yet
    Uninitialized,
    /// Document open with the object inserted
    FixtureReady,
    /// Node located and environment assembled
    EnvironmentReady,
    /// Document closed; terminal
    Disposed,
}

impl LifecycleState {
    /// Whether no further transition is possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        allowed_transitions(self).is_empty()
    }
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: LifecycleState) -> Vec<LifecycleState> {
    use LifecycleState::{Disposed, EnvironmentReady, FixtureReady, Uninitialized};
    match from {
        Uninitialized => vec![FixtureReady, Disposed],
        FixtureReady => vec![EnvironmentReady, Disposed],
        EnvironmentReady => vec![Disposed],
        Disposed => vec![],
    }
}

/// Validate a single transition against the lifecycle table
pub fn validate_transition(from: LifecycleState, to: LifecycleState) -> Result<(), LifecycleError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(LifecycleError::IllegalTransition { from, to })
    }
}

/// Current state plus every state visited so far
#[derive(Debug, Clone)]
pub struct StateTracker {
    state: LifecycleState,
    history: Vec<LifecycleState>,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTracker {
    /// Tracker in `Uninitialized`
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            history: vec![LifecycleState::Uninitialized],
        }
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Visited states, oldest first
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[LifecycleState] {
        &self.history
    }

    /// Move to `to` if the table allows it
    pub fn advance(&mut self, to: LifecycleState) -> Result<(), LifecycleError> {
        validate_transition(self.state, to)?;
        tracing::debug!(from = ?self.state, to = ?to, "lifecycle transition");
        self.state = to;
        self.history.push(to);
        Ok(())
    }
}

/// Scoped owner of a live fixture
///
/// Dropping the guard without calling [`Teardown::dispose`] still closes the
/// document and moves the tracker to `Disposed`; failures on that path are
/// logged because `Drop` cannot return them.
pub struct Teardown<'a, C: TestCase + ?Sized> {
    case: &'a C,
    fixture: Fixture,
    tracker: &'a mut StateTracker,
    disposed: bool,
}

impl<'a, C: TestCase + ?Sized> Teardown<'a, C> {
    /// Take ownership of `fixture`
    pub fn new(case: &'a C, fixture: Fixture, tracker: &'a mut StateTracker) -> Self {
        Self {
            case,
            fixture,
            tracker,
            disposed: false,
        }
    }

    /// The guarded fixture
    #[inline]
    #[must_use]
    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    /// Advance the tracker while the fixture is still live
    pub fn advance(&mut self, to: LifecycleState) -> Result<(), LifecycleError> {
        self.tracker.advance(to)
    }

    /// Close the document now and report the outcome
    pub fn dispose(mut self) -> Result<(), HarnessError> {
        self.release().map_err(HarnessError::Teardown)
    }

    fn release(&mut self) -> Result<(), ServiceError> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;

        let result = self.case.cleanup(&self.fixture);
        if let Err(err) = self.tracker.advance(LifecycleState::Disposed) {
            tracing::warn!(error = %err, "tracker rejected disposal");
        }
        result
    }
}

impl<C: TestCase + ?Sized> Drop for Teardown<'_, C> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            tracing::warn!(error = %err, "fixture cleanup failed");
        }
    }
}

impl<C: TestCase + ?Sized> std::fmt::Debug for Teardown<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown")
            .field("document", &self.fixture.document().id())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

/// Drives one [`TestCase`] through its lifecycle
#[derive(Debug)]
pub struct LifecycleController<C> {
    case: C,
    tracker: StateTracker,
}

impl<C: TestCase> LifecycleController<C> {
    /// Controller for `case`, not yet run
    #[must_use]
    pub fn new(case: C) -> Self {
        Self {
            case,
            tracker: StateTracker::new(),
        }
    }

    /// Current lifecycle state
    #[inline]
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.tracker.state()
    }

    /// States visited so far, oldest first
    #[inline]
    #[must_use]
    pub fn transitions(&self) -> &[LifecycleState] {
        self.tracker.history()
    }

    /// The driven test case
    #[inline]
    #[must_use]
    pub fn case(&self) -> &C {
        &self.case
    }

    /// Build, locate, hand the environment to `check`, dispose
    ///
    /// Runs at most once per controller. The fixture is disposed on every
    /// exit path after it was built, including a panic inside `check`; the
    /// panic then continues to unwind to the caller.
    pub fn run<T>(&mut self, check: impl FnOnce(&TestEnvironment) -> T) -> Result<T, HarnessError> {
        if self.tracker.state() != LifecycleState::Uninitialized {
            return Err(LifecycleError::AlreadyRun.into());
        }

        let fixture = match self.case.initialize() {
            Ok(fixture) => fixture,
            Err(err) => {
                tracing::error!(phase = err.phase(), "run aborted: {err}");
                self.tracker.advance(LifecycleState::Disposed)?;
                return Err(err);
            }
        };
        self.tracker.advance(LifecycleState::FixtureReady)?;

        let mut teardown = Teardown::new(&self.case, fixture, &mut self.tracker);
        let environment = match self.case.create_test_environment(teardown.fixture()) {
            Ok(environment) => environment,
            Err(err) => {
                tracing::error!(phase = err.phase(), "run aborted: {err}");
                return Err(err);
            }
        };
        teardown.advance(LifecycleState::EnvironmentReady)?;

        let value = check(&environment);
        drop(environment);
        teardown.dispose()?;
        Ok(value)
    }
}
