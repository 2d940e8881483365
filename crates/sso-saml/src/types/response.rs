//! SAML Response type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Assertion, Status};

/// SAML authentication response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Protocol version as sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Time the response was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_instant: Option<DateTime<Utc>>,

    /// Entity ID of the issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// ID of the request this response answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,

    /// URI the response was sent to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Consent URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent: Option<String>,

    /// Response status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// Plain-text assertions. The wrapping guard ensures at most one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertions: Vec<Assertion>,

    /// Number of `EncryptedAssertion` children, left undecrypted.
    #[serde(default)]
    pub encrypted_assertions: usize,

    /// Whether a `ds:Signature` element is attached to the response.
    #[serde(default)]
    pub signed: bool,
}

impl Response {
    /// Returns true if a status is present and it is success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_ref().is_some_and(Status::is_success)
    }

    /// Returns the first assertion, if any.
    #[must_use]
    pub fn first_assertion(&self) -> Option<&Assertion> {
        self.assertions.first()
    }

    /// Returns true if the response or its assertion carries a signature.
    #[must_use]
    pub fn has_signature(&self) -> bool {
        self.signed || self.assertions.iter().any(|a| a.signed)
    }
}
