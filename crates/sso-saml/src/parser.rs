//! Inbound message pipeline.

use std::sync::Arc;

use sso_core::SsoConfig;

use crate::bootstrap::{self, Bootstrapper};
use crate::canonicalization::{detect_mode, CanonicalizationMode};
use crate::error::SamlResult;
use crate::types::ProtocolMessage;
use crate::unmarshal::Unmarshaller;
use crate::xml::{LoaderOptions, XmlDocument, XmlLoader};

/// A validated message together with the document it was built from.
///
/// Signature verification must run over [`document`](Self::document): when
/// the assertion signature uses a comment-preserving transform this is the
/// re-parsed tree with its comment nodes intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmarshalledMessage {
    message: ProtocolMessage,
    document: XmlDocument,
    canonicalization: CanonicalizationMode,
}

impl UnmarshalledMessage {
    /// Returns the typed message.
    #[must_use]
    pub const fn message(&self) -> &ProtocolMessage {
        &self.message
    }

    /// Returns the document the message was unmarshalled from.
    #[must_use]
    pub const fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// Returns the canonicalization mode detected for the message.
    #[must_use]
    pub const fn canonicalization(&self) -> CanonicalizationMode {
        self.canonicalization
    }

    /// Discards the document and returns the typed message.
    #[must_use]
    pub fn into_message(self) -> ProtocolMessage {
        self.message
    }

    /// Splits into the typed message and its document.
    #[must_use]
    pub fn into_parts(self) -> (ProtocolMessage, XmlDocument) {
        (self.message, self.document)
    }
}

/// Parses and validates inbound SAML messages.
///
/// The pipeline is: bootstrap check, parse without comments, detect the
/// canonicalization mode, re-parse with comments when the assertion
/// signature needs them, then unmarshal and run the wrapping guard.
#[derive(Debug, Clone)]
pub struct MessageParser {
    loader: XmlLoader,
    bootstrapper: Arc<Bootstrapper>,
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageParser {
    /// Creates a parser with default limits backed by the process-wide
    /// bootstrapper.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(LoaderOptions::default())
    }

    /// Creates a parser with the given loader limits.
    #[must_use]
    pub fn with_options(options: LoaderOptions) -> Self {
        Self {
            loader: XmlLoader::with_options(options),
            bootstrapper: bootstrap::global(),
        }
    }

    /// Creates a parser using the XML limits from `config`.
    #[must_use]
    pub fn with_config(config: &SsoConfig) -> Self {
        Self::with_options(config.xml.into())
    }

    /// Replaces the bootstrapper.
    #[must_use]
    pub fn with_bootstrapper(mut self, bootstrapper: Arc<Bootstrapper>) -> Self {
        self.bootstrapper = bootstrapper;
        self
    }

    /// Parses `xml` into a validated [`ProtocolMessage`] and returns it with
    /// the document it was built from.
    ///
    /// ## Errors
    ///
    /// - [`SamlError::Bootstrap`](crate::SamlError::Bootstrap) if the library cannot be initialized
    /// - [`SamlError::XmlParse`](crate::SamlError::XmlParse) if the XML is malformed or unsafe
    /// - [`SamlError::Validation`](crate::SamlError::Validation) if the message is structurally invalid
    pub fn unmarshall(&self, xml: &str) -> SamlResult<UnmarshalledMessage> {
        let factory = self.bootstrapper.bootstrap()?;

        let mut doc = self.loader.parse(xml, false)?;
        let mode = detect_mode(&doc);
        if mode == CanonicalizationMode::WithComments {
            tracing::debug!("Re-parsing SAML message with comments preserved");
            doc = self.loader.parse(xml, true)?;
        }

        let message = Unmarshaller::new(factory).unmarshal(&doc)?;
        Ok(UnmarshalledMessage {
            message,
            document: doc,
            canonicalization: mode,
        })
    }
}

/// Parses `xml` with default limits and the process-wide bootstrapper.
///
/// ## Errors
///
/// See [`MessageParser::unmarshall`].
pub fn unmarshall(xml: &str) -> SamlResult<UnmarshalledMessage> {
    MessageParser::new().unmarshall(xml)
}
