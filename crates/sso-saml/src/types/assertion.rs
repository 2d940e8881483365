//! SAML Assertion types.
//!
//! Assertions carry the statements an identity provider makes about a
//! subject. Values here are exactly what the message contained; nothing is
//! trusted until the signature has been verified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NameId;

/// SAML Assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    /// Unique identifier, referenced by the signature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Protocol version as sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Time the assertion was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_instant: Option<DateTime<Utc>>,

    /// Entity ID of the issuing identity provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// The subject of the assertion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,

    /// Validity conditions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,

    /// Authentication statements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authn_statements: Vec<AuthnStatement>,

    /// Attribute statements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_statements: Vec<AttributeStatement>,

    /// Whether a `ds:Signature` element is attached.
    #[serde(default)]
    pub signed: bool,
}

impl Assertion {
    /// Returns the subject's name ID value, if any.
    #[must_use]
    pub fn subject_name_id(&self) -> Option<&str> {
        self.subject
            .as_ref()
            .and_then(|s| s.name_id.as_ref())
            .map(|n| n.value.as_str())
    }

    /// Returns all values of the named attribute across attribute statements.
    #[must_use]
    pub fn attribute_values(&self, name: &str) -> Vec<&str> {
        self.attribute_statements
            .iter()
            .flat_map(|s| s.attributes.iter())
            .filter(|a| a.name.as_deref() == Some(name))
            .flat_map(|a| a.values.iter().map(String::as_str))
            .collect()
    }

    /// Returns true if the conditions restrict the assertion to `audience`,
    /// or impose no audience restriction at all.
    #[must_use]
    pub fn is_audience_allowed(&self, audience: &str) -> bool {
        match &self.conditions {
            Some(c) if !c.audience_restrictions.is_empty() => c
                .audience_restrictions
                .iter()
                .any(|r| r.audiences.iter().any(|a| a == audience)),
            _ => true,
        }
    }
}

/// Subject of an assertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// The name identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_id: Option<NameId>,

    /// Subject confirmations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_confirmations: Vec<SubjectConfirmation>,
}

/// Subject confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectConfirmation {
    /// The confirmation method URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Confirmation data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_confirmation_data: Option<SubjectConfirmationData>,
}

impl SubjectConfirmation {
    /// Bearer confirmation method URI.
    pub const BEARER: &'static str = "urn:oasis:names:tc:SAML:2.0:cm:bearer";

    /// Returns true for the bearer method.
    #[must_use]
    pub fn is_bearer(&self) -> bool {
        self.method.as_deref() == Some(Self::BEARER)
    }
}

/// Subject confirmation data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectConfirmationData {
    /// ID of the request this assertion answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,

    /// Time before which the subject cannot be confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,

    /// Time at or after which the subject can no longer be confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_on_or_after: Option<DateTime<Utc>>,

    /// Location the assertion may be presented to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

/// Validity conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    /// Time before which the assertion is not valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,

    /// Time at or after which the assertion is not valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_on_or_after: Option<DateTime<Utc>>,

    /// Audience restrictions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audience_restrictions: Vec<AudienceRestriction>,

    /// One-time use condition.
    #[serde(default)]
    pub one_time_use: bool,
}

/// Audience restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceRestriction {
    /// Accepted audiences.
    pub audiences: Vec<String>,
}

/// Authentication statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthnStatement {
    /// Time of authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authn_instant: Option<DateTime<Utc>>,

    /// Session index at the identity provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_index: Option<String>,

    /// Time at which the session ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_not_on_or_after: Option<DateTime<Utc>>,

    /// Authentication context class reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authn_context_class_ref: Option<String>,
}

/// Attribute statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeStatement {
    /// Attributes.
    pub attributes: Vec<Attribute>,
}

/// SAML Attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Name format URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_format: Option<String>,

    /// Human-readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    /// Attribute values.
    pub values: Vec<String>,
}
