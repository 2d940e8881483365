//! Unmarshalled protocol messages.

use serde::{Deserialize, Serialize};

use super::{Assertion, LogoutRequest, LogoutResponse, Response};

/// A typed SAML message produced by the unmarshaller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProtocolMessage {
    /// `samlp:Response`.
    Response(Response),
    /// A bare `saml:Assertion`.
    Assertion(Assertion),
    /// `samlp:LogoutRequest`.
    LogoutRequest(LogoutRequest),
    /// `samlp:LogoutResponse`.
    LogoutResponse(LogoutResponse),
}

impl ProtocolMessage {
    /// Returns the message ID, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Response(m) => m.id.as_deref(),
            Self::Assertion(m) => m.id.as_deref(),
            Self::LogoutRequest(m) => m.id.as_deref(),
            Self::LogoutResponse(m) => m.id.as_deref(),
        }
    }

    /// Returns the issuer entity ID, if present.
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        match self {
            Self::Response(m) => m.issuer.as_deref(),
            Self::Assertion(m) => m.issuer.as_deref(),
            Self::LogoutRequest(m) => m.issuer.as_deref(),
            Self::LogoutResponse(m) => m.issuer.as_deref(),
        }
    }

    /// Returns the root element's local name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Response(_) => "Response",
            Self::Assertion(_) => "Assertion",
            Self::LogoutRequest(_) => "LogoutRequest",
            Self::LogoutResponse(_) => "LogoutResponse",
        }
    }

    /// Returns true if the root is an Assertion.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }

    /// Returns the response, if this is one.
    #[must_use]
    pub const fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the assertion to verify: the root itself or the response's
    /// single assertion.
    #[must_use]
    pub fn assertion(&self) -> Option<&Assertion> {
        match self {
            Self::Assertion(a) => Some(a),
            Self::Response(r) => r.first_assertion(),
            _ => None,
        }
    }
}
