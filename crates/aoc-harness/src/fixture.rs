//! Document fixture builder
//!
//! Opens one empty document and inserts one embedded object at the current
//! insertion point. Nothing is retried. If anything fails after the document
//! opened, the builder closes it again before reporting the error, so a
//! failed build never leaves a document behind.

use crate::config::{TestParameters, GRAPHIC_OBJECT_SERVICE};
use crate::error::FixtureCreationError;
use aoc_model::{DocumentHandle, DocumentKind, DocumentService, ObjectRef};
use std::sync::Arc;

/// A built fixture: the document and the object inserted into it
#[derive(Debug, Clone)]
pub struct Fixture {
    document: DocumentHandle,
    object: ObjectRef,
}

impl Fixture {
    /// The fixture document
    #[inline]
    #[must_use]
    pub fn document(&self) -> &DocumentHandle {
        &self.document
    }

    /// The embedded object
    #[inline]
    #[must_use]
    pub fn object(&self) -> &ObjectRef {
        &self.object
    }
}

/// Builds a [`Fixture`] through a [`DocumentService`]
#[derive(Debug)]
pub struct FixtureBuilder<'a, S: ?Sized> {
    service: &'a S,
    kind: DocumentKind,
    object_service: String,
}

impl<'a, S: DocumentService + ?Sized> FixtureBuilder<'a, S> {
    /// Builder for a text document holding one graphic object
    #[must_use]
    pub fn new(service: &'a S) -> Self {
        Self {
            service,
            kind: DocumentKind::Text,
            object_service: GRAPHIC_OBJECT_SERVICE.to_string(),
        }
    }

    /// Builder configured from test parameters
    #[must_use]
    pub fn from_parameters(service: &'a S, params: &TestParameters) -> Self {
        Self::new(service)
            .with_document_kind(params.document_kind)
            .with_object_service(params.object_service.clone())
    }

    /// Set the document kind
    #[must_use]
    pub fn with_document_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the embedded object service name
    #[must_use]
    pub fn with_object_service(mut self, service: impl Into<String>) -> Self {
        self.object_service = service.into();
        self
    }

    /// Open the document and insert the object
    pub fn build(&self) -> Result<Fixture, FixtureCreationError> {
        tracing::info!("creating a {} document", self.kind);
        let document = self
            .service
            .create_document(self.kind)
            .map_err(|source| FixtureCreationError::OpenDocument {
                kind: self.kind,
                source,
            })?;

        match self.populate(&document) {
            Ok(object) => Ok(Fixture { document, object }),
            Err(err) => {
                if let Err(close) = self.service.close_document(&document) {
                    tracing::warn!(error = %close, "closing partially built fixture failed");
                }
                Err(err)
            }
        }
    }

    fn populate(&self, document: &DocumentHandle) -> Result<ObjectRef, FixtureCreationError> {
        let text = document.text()?;
        let cursor = text.create_cursor().map_err(FixtureCreationError::Insert)?;
        let object = self
            .service
            .create_instance(document, &self.object_service)
            .map_err(|source| FixtureCreationError::CreateObject {
                service: self.object_service.clone(),
                source,
            })?;

        tracing::info!("inserting {}", self.object_service);
        text.insert_content(&cursor, Arc::clone(&object), true)
            .map_err(FixtureCreationError::Insert)?;
        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_model::{Desktop, ObjectKind, ServiceError};

    #[test]
    fn builds_text_document_with_one_graphic() {
        let desktop = Desktop::new();
        let fixture = FixtureBuilder::new(&desktop).build().unwrap();

        assert_eq!(fixture.document().kind(), DocumentKind::Text);
        assert_eq!(fixture.document().object_count(), 1);
        assert_eq!(fixture.object().kind(), ObjectKind::Graphic);
        assert_eq!(fixture.object().owner(), Some(fixture.document().id()));
        assert_eq!(desktop.open_documents(), 1);
    }

    #[test]
    fn unknown_object_service_closes_document() {
        let desktop = Desktop::new();
        let err = FixtureBuilder::new(&desktop)
            .with_object_service("OleObject")
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            FixtureCreationError::CreateObject {
                source: ServiceError::UnknownService(_),
                ..
            }
        ));
        assert_eq!(desktop.open_documents(), 0);
    }

    #[test]
    fn drawing_document_is_not_insertable() {
        let desktop = Desktop::new();
        let err = FixtureBuilder::new(&desktop)
            .with_document_kind(DocumentKind::Drawing)
            .build()
            .unwrap_err();

        assert!(matches!(err, FixtureCreationError::NotInsertable(_)));
        assert_eq!(desktop.open_documents(), 0);
    }

    #[test]
    fn from_parameters_uses_object_service() {
        let desktop = Desktop::new();
        let params = TestParameters::new().with_object_service("TextFrame");
        let fixture = FixtureBuilder::from_parameters(&desktop, &params)
            .build()
            .unwrap();
        assert_eq!(fixture.object().kind(), ObjectKind::TextFrame);
    }
}
