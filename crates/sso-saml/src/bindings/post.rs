//! HTTP-POST binding decoding.

use base64::Engine;

use crate::error::{SamlError, SamlResult};

/// Form parameter carrying the response.
pub const SAML_RESPONSE_PARAM: &str = "SAMLResponse";

/// A message received through the HTTP-POST binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessage {
    /// The decoded XML message.
    pub xml: String,
    /// The RelayState, if present.
    pub relay_state: Option<String>,
}

/// HTTP-POST binding decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpPostBinding;

impl HttpPostBinding {
    /// Decodes the `SAMLResponse` and `RelayState` form values.
    ///
    /// ## Errors
    ///
    /// Returns [`SamlError::InvalidBinding`] if the response parameter is
    /// missing, or any error of [`decode_post_message`].
    pub fn decode_response(
        saml_response: Option<&str>,
        relay_state: Option<&str>,
    ) -> SamlResult<PostMessage> {
        let encoded = saml_response.ok_or_else(|| {
            SamlError::InvalidBinding(format!("no {SAML_RESPONSE_PARAM} parameter"))
        })?;

        Ok(PostMessage {
            xml: decode_post_message(encoded)?,
            relay_state: relay_state.map(String::from),
        })
    }
}

/// Decodes a base64 POST-binding value into XML.
///
/// Whitespace inside the value (line breaks inserted by some identity
/// providers) is ignored.
///
/// ## Errors
///
/// Returns [`SamlError::Base64Decode`] if the value is not valid base64 and
/// [`SamlError::InvalidBinding`] if the decoded bytes are not UTF-8.
pub fn decode_post_message(encoded: &str) -> SamlResult<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(SamlError::InvalidBinding("empty message".to_string()));
    }

    let decoded = base64::engine::general_purpose::STANDARD.decode(compact)?;

    String::from_utf8(decoded)
        .map_err(|e| SamlError::InvalidBinding(format!("invalid UTF-8 in message: {e}")))
}
