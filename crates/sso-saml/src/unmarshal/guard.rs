//! Signature-wrapping guard.
//!
//! A signature covers one element by ID. Smuggling a second Response or
//! Assertion next to or inside the signed one lets a verifier check one
//! element while the application consumes another. Such shapes are
//! rejected outright. Matching is namespace-aware, so look-alike elements
//! in foreign namespaces are not counted.

use crate::error::ValidationError;
use crate::types::{SAMLP_NS, SAML_NS};
use crate::xml::XmlElement;

/// Checks the descendants of `root` for duplicated SAML elements.
///
/// ## Errors
///
/// - [`ValidationError::DuplicateResponse`] if any Response is embedded
/// - [`ValidationError::NestedAssertion`] if an Assertion root contains an Assertion
/// - [`ValidationError::DuplicateAssertion`] if any other root contains more than one
pub(crate) fn check(root: &XmlElement) -> Result<(), ValidationError> {
    let responses = root.count_descendants(SAMLP_NS, "Response");
    if responses > 0 {
        tracing::error!(
            root = %root.local_name,
            embedded = responses,
            "Invalid schema for the SAML2 response. Multiple responses detected"
        );
        return Err(ValidationError::DuplicateResponse { count: responses });
    }

    let assertions = root.count_descendants(SAML_NS, "Assertion");
    if root.is(SAML_NS, "Assertion") {
        if assertions > 0 {
            tracing::error!(
                nested = assertions,
                "Invalid schema for the SAML2 assertion. Multiple assertions detected"
            );
            return Err(ValidationError::NestedAssertion { count: assertions });
        }
    } else if assertions > 1 {
        tracing::error!(
            root = %root.local_name,
            found = assertions,
            "Invalid schema for the SAML2 response. Multiple assertions detected"
        );
        return Err(ValidationError::DuplicateAssertion { count: assertions });
    }

    Ok(())
}
