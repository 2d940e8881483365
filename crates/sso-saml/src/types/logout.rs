//! SAML Logout types.
//!
//! Logout messages can be unmarshalled so that they pass through the same
//! structural checks as responses. No logout processing happens here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NameId, Status};

/// SAML Logout Request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Protocol version as sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Time the request was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_instant: Option<DateTime<Utc>>,

    /// Entity ID of the requester.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// URI the request was sent to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Principal to log out. Absent when the identifier is encrypted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_id: Option<NameId>,

    /// Session indexes to terminate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub session_indexes: Vec<String>,

    /// Logout reason URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Time at or after which the request is no longer valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_on_or_after: Option<DateTime<Utc>>,

    /// Whether a `ds:Signature` element is attached.
    #[serde(default)]
    pub signed: bool,
}

impl LogoutRequest {
    /// User-initiated logout reason.
    pub const REASON_USER: &'static str = "urn:oasis:names:tc:SAML:2.0:logout:user";

    /// Administrator-initiated logout reason.
    pub const REASON_ADMIN: &'static str = "urn:oasis:names:tc:SAML:2.0:logout:admin";

    /// Returns true if the request has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.not_on_or_after.is_some_and(|t| now >= t)
    }
}

/// SAML Logout Response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Protocol version as sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Time the response was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_instant: Option<DateTime<Utc>>,

    /// Entity ID of the responder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// ID of the logout request this answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,

    /// URI the response was sent to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Response status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// Whether a `ds:Signature` element is attached.
    #[serde(default)]
    pub signed: bool,
}

impl LogoutResponse {
    /// Returns true if a status is present and it is success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_ref().is_some_and(Status::is_success)
    }
}
