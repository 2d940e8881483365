//! Element builders for the supported message roots.
//!
//! Builders map whatever the message carries and leave mandatory-field
//! checks to the message validators downstream. Absent attributes and
//! children become `None`. A value that is present but cannot be read, such
//! as a malformed timestamp, is an error. Unknown children are ignored.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::types::{
    Assertion, Attribute, AttributeStatement, AudienceRestriction, AuthnStatement, Conditions,
    LogoutRequest, LogoutResponse, NameId, ProtocolMessage, Response, Status, StatusCode,
    Subject, SubjectConfirmation, SubjectConfirmationData, SAMLP_NS, SAML_NS, XMLDSIG_NS,
};
use crate::xml::XmlElement;

type BuildResult<T> = Result<T, ValidationError>;

/// Builds a `samlp:Response` root.
pub(crate) fn response(el: &XmlElement) -> BuildResult<ProtocolMessage> {
    build_response(el).map(ProtocolMessage::Response)
}

/// Builds a `saml:Assertion` root.
pub(crate) fn assertion(el: &XmlElement) -> BuildResult<ProtocolMessage> {
    build_assertion(el).map(ProtocolMessage::Assertion)
}

/// Builds a `samlp:LogoutRequest` root.
pub(crate) fn logout_request(el: &XmlElement) -> BuildResult<ProtocolMessage> {
    let header = Header::read(el)?;
    Ok(ProtocolMessage::LogoutRequest(LogoutRequest {
        id: header.id,
        version: header.version,
        issue_instant: header.issue_instant,
        issuer: issuer(el),
        destination: el.attribute("Destination").map(str::to_string),
        name_id: el.child(SAML_NS, "NameID").map(build_name_id),
        session_indexes: el
            .children_named(SAMLP_NS, "SessionIndex")
            .map(|e| e.text().trim().to_string())
            .collect(),
        reason: el.attribute("Reason").map(str::to_string),
        not_on_or_after: optional_instant(el, "NotOnOrAfter")?,
        signed: is_signed(el),
    }))
}

/// Builds a `samlp:LogoutResponse` root.
pub(crate) fn logout_response(el: &XmlElement) -> BuildResult<ProtocolMessage> {
    let header = Header::read(el)?;
    Ok(ProtocolMessage::LogoutResponse(LogoutResponse {
        id: header.id,
        version: header.version,
        issue_instant: header.issue_instant,
        issuer: issuer(el),
        in_response_to: el.attribute("InResponseTo").map(str::to_string),
        destination: el.attribute("Destination").map(str::to_string),
        status: el.child(SAMLP_NS, "Status").map(build_status),
        signed: is_signed(el),
    }))
}

/// Header attributes shared by every SAML root.
struct Header {
    id: Option<String>,
    version: Option<String>,
    issue_instant: Option<DateTime<Utc>>,
}

impl Header {
    fn read(el: &XmlElement) -> BuildResult<Self> {
        Ok(Self {
            id: el.attribute("ID").map(str::to_string),
            version: el.attribute("Version").map(str::to_string),
            issue_instant: optional_instant(el, "IssueInstant")?,
        })
    }
}

fn build_response(el: &XmlElement) -> BuildResult<Response> {
    let header = Header::read(el)?;
    let assertions = el
        .children_named(SAML_NS, "Assertion")
        .map(build_assertion)
        .collect::<BuildResult<Vec<_>>>()?;

    Ok(Response {
        id: header.id,
        version: header.version,
        issue_instant: header.issue_instant,
        issuer: issuer(el),
        in_response_to: el.attribute("InResponseTo").map(str::to_string),
        destination: el.attribute("Destination").map(str::to_string),
        consent: el.attribute("Consent").map(str::to_string),
        status: el.child(SAMLP_NS, "Status").map(build_status),
        assertions,
        encrypted_assertions: el.children_named(SAML_NS, "EncryptedAssertion").count(),
        signed: is_signed(el),
    })
}

fn build_assertion(el: &XmlElement) -> BuildResult<Assertion> {
    let header = Header::read(el)?;

    Ok(Assertion {
        id: header.id,
        version: header.version,
        issue_instant: header.issue_instant,
        issuer: issuer(el),
        subject: el.child(SAML_NS, "Subject").map(build_subject).transpose()?,
        conditions: el
            .child(SAML_NS, "Conditions")
            .map(build_conditions)
            .transpose()?,
        authn_statements: el
            .children_named(SAML_NS, "AuthnStatement")
            .map(build_authn_statement)
            .collect::<BuildResult<Vec<_>>>()?,
        attribute_statements: el
            .children_named(SAML_NS, "AttributeStatement")
            .map(build_attribute_statement)
            .collect::<BuildResult<Vec<_>>>()?,
        signed: is_signed(el),
    })
}

fn build_status(status: &XmlElement) -> Status {
    Status {
        status_code: status.child(SAMLP_NS, "StatusCode").map(build_status_code),
        status_message: status
            .child(SAMLP_NS, "StatusMessage")
            .map(|m| m.text().trim().to_string()),
    }
}

fn build_status_code(el: &XmlElement) -> StatusCode {
    StatusCode {
        value: el.attribute("Value").map(str::to_string),
        status_code: el
            .child(SAMLP_NS, "StatusCode")
            .map(|nested| Box::new(build_status_code(nested))),
    }
}

fn build_name_id(el: &XmlElement) -> NameId {
    NameId {
        value: el.text().trim().to_string(),
        format: el.attribute("Format").map(str::to_string),
        name_qualifier: el.attribute("NameQualifier").map(str::to_string),
        sp_name_qualifier: el.attribute("SPNameQualifier").map(str::to_string),
    }
}

fn build_subject(el: &XmlElement) -> BuildResult<Subject> {
    let subject_confirmations = el
        .children_named(SAML_NS, "SubjectConfirmation")
        .map(|sc| -> BuildResult<SubjectConfirmation> {
            let data = sc
                .child(SAML_NS, "SubjectConfirmationData")
                .map(|d| -> BuildResult<_> {
                    Ok(SubjectConfirmationData {
                        in_response_to: d.attribute("InResponseTo").map(str::to_string),
                        not_before: optional_instant(d, "NotBefore")?,
                        not_on_or_after: optional_instant(d, "NotOnOrAfter")?,
                        recipient: d.attribute("Recipient").map(str::to_string),
                    })
                })
                .transpose()?;
            Ok(SubjectConfirmation {
                method: sc.attribute("Method").map(str::to_string),
                subject_confirmation_data: data,
            })
        })
        .collect::<BuildResult<Vec<_>>>()?;

    Ok(Subject {
        name_id: el.child(SAML_NS, "NameID").map(build_name_id),
        subject_confirmations,
    })
}

fn build_conditions(el: &XmlElement) -> BuildResult<Conditions> {
    Ok(Conditions {
        not_before: optional_instant(el, "NotBefore")?,
        not_on_or_after: optional_instant(el, "NotOnOrAfter")?,
        audience_restrictions: el
            .children_named(SAML_NS, "AudienceRestriction")
            .map(|r| AudienceRestriction {
                audiences: r
                    .children_named(SAML_NS, "Audience")
                    .map(|a| a.text().trim().to_string())
                    .collect(),
            })
            .collect(),
        one_time_use: el.child(SAML_NS, "OneTimeUse").is_some(),
    })
}

fn build_authn_statement(el: &XmlElement) -> BuildResult<AuthnStatement> {
    Ok(AuthnStatement {
        authn_instant: optional_instant(el, "AuthnInstant")?,
        session_index: el.attribute("SessionIndex").map(str::to_string),
        session_not_on_or_after: optional_instant(el, "SessionNotOnOrAfter")?,
        authn_context_class_ref: el
            .child(SAML_NS, "AuthnContext")
            .and_then(|c| c.child(SAML_NS, "AuthnContextClassRef"))
            .map(|r| r.text().trim().to_string()),
    })
}

fn build_attribute_statement(el: &XmlElement) -> BuildResult<AttributeStatement> {
    let attributes = el
        .children_named(SAML_NS, "Attribute")
        .map(|a| -> BuildResult<Attribute> {
            Ok(Attribute {
                name: a.attribute("Name").map(str::to_string),
                name_format: a.attribute("NameFormat").map(str::to_string),
                friendly_name: a.attribute("FriendlyName").map(str::to_string),
                values: a
                    .children_named(SAML_NS, "AttributeValue")
                    .map(XmlElement::text)
                    .collect(),
            })
        })
        .collect::<BuildResult<Vec<_>>>()?;

    Ok(AttributeStatement { attributes })
}

fn issuer(el: &XmlElement) -> Option<String> {
    el.child(SAML_NS, "Issuer")
        .map(|i| i.text().trim().to_string())
        .filter(|i| !i.is_empty())
}

fn is_signed(el: &XmlElement) -> bool {
    el.child(XMLDSIG_NS, "Signature").is_some()
}

fn optional_instant(el: &XmlElement, name: &str) -> BuildResult<Option<DateTime<Utc>>> {
    el.attribute(name)
        .map(|value| {
            DateTime::parse_from_rfc3339(value.trim())
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| {
                    ValidationError::Unmarshalling(format!(
                        "{}/@{name} is not a valid timestamp: {e}",
                        el.local_name
                    ))
                })
        })
        .transpose()
}
