//! Message unmarshalling.
//!
//! The [`UnmarshallerFactory`] maps qualified root element names to
//! builders. It is populated once during bootstrap and shared read-only
//! afterwards. [`Unmarshaller`] runs the signature-wrapping guard and the
//! builder for the document's root.

mod builders;
mod guard;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{SamlError, SamlResult, ValidationError};
use crate::types::{ProtocolMessage, SAMLP_NS, SAML_NS};
use crate::xml::{XmlDocument, XmlElement};

/// Builds a typed message from a root element.
pub type BuilderFn = fn(&XmlElement) -> Result<ProtocolMessage, ValidationError>;

/// Namespace-qualified element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QName {
    namespace: String,
    local_name: String,
}

impl QName {
    fn new(namespace: &str, local_name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            local_name: local_name.to_string(),
        }
    }
}

/// Registry of builders keyed by root element name.
#[derive(Debug, Default)]
pub struct UnmarshallerFactory {
    builders: HashMap<QName, BuilderFn>,
}

impl UnmarshallerFactory {
    /// Creates an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a factory with builders for Response, Assertion,
    /// LogoutRequest and LogoutResponse.
    ///
    /// ## Errors
    ///
    /// Returns [`SamlError::Bootstrap`] if a registration conflicts.
    pub fn with_defaults() -> SamlResult<Self> {
        let mut factory = Self::new();
        factory.register(SAMLP_NS, "Response", builders::response)?;
        factory.register(SAML_NS, "Assertion", builders::assertion)?;
        factory.register(SAMLP_NS, "LogoutRequest", builders::logout_request)?;
        factory.register(SAMLP_NS, "LogoutResponse", builders::logout_response)?;
        Ok(factory)
    }

    /// Registers a builder for the given root element.
    ///
    /// ## Errors
    ///
    /// Returns [`SamlError::Bootstrap`] if a builder is already registered
    /// for the name.
    pub fn register(
        &mut self,
        namespace: &str,
        local_name: &str,
        builder: BuilderFn,
    ) -> SamlResult<()> {
        let name = QName::new(namespace, local_name);
        if self.builders.contains_key(&name) {
            return Err(SamlError::Bootstrap(format!(
                "unmarshaller for {{{namespace}}}{local_name} already registered"
            )));
        }
        tracing::debug!(namespace, local_name, "Registered SAML unmarshaller");
        self.builders.insert(name, builder);
        Ok(())
    }

    /// Returns the builder for an element, if one is registered.
    #[must_use]
    pub fn get(&self, element: &XmlElement) -> Option<BuilderFn> {
        let namespace = element.namespace.as_deref()?;
        self.builders
            .get(&QName::new(namespace, &element.local_name))
            .copied()
    }

    /// Returns the number of registered builders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// Returns true if no builder is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

/// Converts parsed documents into [`ProtocolMessage`]s.
#[derive(Debug, Clone)]
pub struct Unmarshaller {
    factory: Arc<UnmarshallerFactory>,
}

impl Unmarshaller {
    /// Creates an unmarshaller backed by `factory`.
    #[must_use]
    pub const fn new(factory: Arc<UnmarshallerFactory>) -> Self {
        Self { factory }
    }

    /// Unmarshals the document's root element.
    ///
    /// The signature-wrapping guard runs before the builder, so a wrapping
    /// shape is reported as such even when the smuggled elements are also
    /// malformed.
    ///
    /// ## Errors
    ///
    /// Returns [`SamlError::Validation`] if no builder is registered for the
    /// root, the guard rejects the tree, or the builder rejects the content.
    pub fn unmarshal(&self, doc: &XmlDocument) -> SamlResult<ProtocolMessage> {
        let root = doc.root();

        let Some(builder) = self.factory.get(root) else {
            let name = match &root.namespace {
                Some(ns) => format!("{{{ns}}}{}", root.local_name),
                None => root.local_name.clone(),
            };
            tracing::error!(element = %name, "No unmarshaller registered for the SAML message root");
            return Err(ValidationError::Unmarshalling(format!(
                "no unmarshaller registered for {name}"
            ))
            .into());
        };

        guard::check(root)?;

        let message = builder(root).map_err(|e| {
            tracing::error!(error = %e, "Failed to unmarshal SAML message");
            e
        })?;

        tracing::debug!(
            kind = message.kind(),
            id = message.id().unwrap_or_default(),
            "Unmarshalled SAML message"
        );
        Ok(message)
    }
}
