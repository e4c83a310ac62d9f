//! Test case protocol and the graphic-object scenario

use crate::config::{TestParameters, EVENT_PRODUCER};
use crate::environment::TestEnvironment;
use crate::error::HarnessError;
use crate::fixture::{Fixture, FixtureBuilder};
use crate::locator::TreeLocator;
use crate::trigger::TitleRoundTrip;
use aoc_access::AccessibilityProvider;
use aoc_model::{DocumentService, PropertySet, ServiceError};
use std::sync::Arc;

/// The three phases every conformance case provides
///
/// [`crate::LifecycleController`] calls them in order and guarantees that
/// `cleanup` runs exactly once for every fixture `initialize` returned.
pub trait TestCase {
    /// Build the fixture
    fn initialize(&self) -> Result<Fixture, HarnessError>;

    /// Locate the node under test and assemble its environment
    fn create_test_environment(&self, fixture: &Fixture) -> Result<TestEnvironment, HarnessError>;

    /// Release the fixture
    fn cleanup(&self, fixture: &Fixture) -> Result<(), ServiceError>;
}

/// A text document with one embedded graphic, checked through its
/// `GRAPHIC` accessible node
#[derive(Debug)]
pub struct GraphicObjectCase<S, P> {
    service: S,
    provider: P,
    params: TestParameters,
}

impl<S: DocumentService, P: AccessibilityProvider> GraphicObjectCase<S, P> {
    /// Case with default parameters
    #[must_use]
    pub fn new(service: S, provider: P) -> Self {
        Self {
            service,
            provider,
            params: TestParameters::default(),
        }
    }

    /// Replace the parameters
    #[must_use]
    pub fn with_parameters(mut self, params: TestParameters) -> Self {
        self.params = params;
        self
    }

    /// Active parameters
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &TestParameters {
        &self.params
    }

    /// The document service
    #[inline]
    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The accessibility provider
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<S: DocumentService, P: AccessibilityProvider> TestCase for GraphicObjectCase<S, P> {
    fn initialize(&self) -> Result<Fixture, HarnessError> {
        Ok(FixtureBuilder::from_parameters(&self.service, &self.params).build()?)
    }

    fn create_test_environment(&self, fixture: &Fixture) -> Result<TestEnvironment, HarnessError> {
        let window = self.provider.current_window(fixture.document())?;
        let node = TreeLocator::new(&self.provider)
            .with_debug(self.params.debug_is_active)
            .locate(&window, self.params.target_role)?;

        let target: Arc<dyn PropertySet> = Arc::clone(fixture.object()) as Arc<dyn PropertySet>;
        let trigger = TitleRoundTrip::new(target).with_sentinel(self.params.sentinel_title.clone());
        Ok(TestEnvironment::new(node).with_relation(EVENT_PRODUCER, Arc::new(trigger)))
    }

    fn cleanup(&self, fixture: &Fixture) -> Result<(), ServiceError> {
        tracing::info!("dispose {} document", fixture.document().kind());
        let closed = self.service.close_document(fixture.document());
        self.provider.release(fixture.document());
        closed
    }
}
