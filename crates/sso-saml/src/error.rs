//! SAML error types.
//!
//! Parse failures, structural validation failures and bootstrap failures
//! are kept apart so that callers can alert on suspected attacks
//! specifically. Every kind means "reject the message".

use thiserror::Error;

use crate::types::status_codes;

/// Result type for SAML operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML processing errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// The message is not well-formed or violates a loader limit.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// The message is well-formed but structurally invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The SAML library has not been initialized successfully.
    #[error("SAML library bootstrap failed: {0}")]
    Bootstrap(String),

    /// Base64 decoding of a bound message failed.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// A bound message is missing or not UTF-8.
    #[error("invalid binding message: {0}")]
    InvalidBinding(String),
}

/// Structural SAML violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The root element could not be mapped onto the object model.
    #[error("unmarshalling failed: {0}")]
    Unmarshalling(String),

    /// A Response element is embedded in the message.
    #[error("invalid schema for the SAML2 response: multiple responses detected ({count} embedded)")]
    DuplicateResponse {
        /// Number of embedded Response elements.
        count: usize,
    },

    /// A non-assertion message carries more than one Assertion.
    #[error("invalid schema for the SAML2 response: multiple assertions detected ({count} found)")]
    DuplicateAssertion {
        /// Number of Assertion elements found.
        count: usize,
    },

    /// An Assertion root carries a nested Assertion.
    #[error("invalid schema for the SAML2 assertion: multiple assertions detected ({count} nested)")]
    NestedAssertion {
        /// Number of nested Assertion elements.
        count: usize,
    },
}

impl ValidationError {
    /// Returns true if this error matches a known signature-wrapping shape.
    #[must_use]
    pub const fn is_wrapping_attack(&self) -> bool {
        matches!(
            self,
            Self::DuplicateResponse { .. }
                | Self::DuplicateAssertion { .. }
                | Self::NestedAssertion { .. }
        )
    }
}

impl SamlError {
    /// Returns true for malformed or unsafely structured XML.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::XmlParse(_))
    }

    /// Returns true for structural SAML violations.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if the message looks like a signature-wrapping attempt.
    #[must_use]
    pub const fn is_suspected_attack(&self) -> bool {
        match self {
            Self::Validation(err) => err.is_wrapping_attack(),
            _ => false,
        }
    }

    /// Returns the SAML status code to report for this error.
    #[must_use]
    pub const fn status_code(&self) -> &'static str {
        match self {
            Self::Bootstrap(_) => status_codes::RESPONDER,
            _ => status_codes::REQUESTER,
        }
    }
}

impl From<roxmltree::Error> for SamlError {
    fn from(err: roxmltree::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<base64::DecodeError> for SamlError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64Decode(err.to_string())
    }
}
