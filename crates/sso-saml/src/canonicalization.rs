//! Canonicalization mode detection.
//!
//! When an assertion is signed with exclusive canonicalization *with
//! comments*, comment nodes are part of the signed content and the message
//! must be parsed again with comments kept. Parsing without comments in
//! that case would let `user@example.com<!---->.evil.com` verify while the
//! application reads a different subject.

use serde::{Deserialize, Serialize};

use crate::types::canonicalization_algorithms::EXCLUSIVE_C14N_WITH_COMMENTS;
use crate::xml::{XmlDocument, XmlElement};

/// How the assertion signature canonicalized its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CanonicalizationMode {
    /// Exclusive canonicalization with comments. Comments must be preserved.
    WithComments,
    /// Exclusive canonicalization. Comments are irrelevant.
    #[default]
    Exclusive,
}

impl CanonicalizationMode {
    /// Returns true if the document must be parsed with comments kept.
    #[must_use]
    pub const fn preserves_comments(self) -> bool {
        matches!(self, Self::WithComments)
    }
}

/// Detects the canonicalization mode of the assertion signature.
///
/// The first `ID` attribute of any element named `Assertion`, in document
/// order, selects the signature reference. Element names are matched by
/// local name only. A missing or blank ID yields [`CanonicalizationMode::Exclusive`].
#[must_use]
pub fn detect_mode(doc: &XmlDocument) -> CanonicalizationMode {
    let Some(assertion_id) = doc
        .elements_by_local_name("Assertion")
        .find_map(|e| e.attribute("ID"))
    else {
        return CanonicalizationMode::Exclusive;
    };

    if assertion_id.trim().is_empty() {
        return CanonicalizationMode::Exclusive;
    }

    // The reference URI is matched as a quoted literal; an ID that cannot be
    // quoted is treated like a failed lookup.
    if assertion_id.contains('\'') {
        tracing::warn!(
            assertion_id,
            "Cannot evaluate the canonicalization lookup for the assertion ID, assuming exclusive canonicalization"
        );
        return CanonicalizationMode::Exclusive;
    }

    let reference_uri = format!("#{assertion_id}");
    let found = doc
        .elements_by_local_name("Assertion")
        .any(|assertion| signs_with_comments(assertion, &reference_uri));

    if found {
        tracing::debug!(assertion_id, "Assertion signed with comment-preserving canonicalization");
        CanonicalizationMode::WithComments
    } else {
        CanonicalizationMode::Exclusive
    }
}

/// Looks for `Signature/SignedInfo/Reference[@URI]/Transforms/Transform[@Algorithm]`.
fn signs_with_comments(assertion: &XmlElement, reference_uri: &str) -> bool {
    assertion
        .children_by_local_name("Signature")
        .flat_map(|e| e.children_by_local_name("SignedInfo"))
        .flat_map(|e| e.children_by_local_name("Reference"))
        .filter(|e| e.attribute("URI") == Some(reference_uri))
        .flat_map(|e| e.children_by_local_name("Transforms"))
        .flat_map(|e| e.children_by_local_name("Transform"))
        .any(|e| e.attribute("Algorithm") == Some(EXCLUSIVE_C14N_WITH_COMMENTS))
}
