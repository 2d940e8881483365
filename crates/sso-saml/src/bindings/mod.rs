//! SAML binding decoding.
//!
//! Only the inbound side of the HTTP-POST binding is provided: the
//! `SAMLResponse` form value is base64-decoded into the XML handed to
//! [`unmarshall`](crate::unmarshall).

mod post;

pub use post::{decode_post_message, HttpPostBinding, PostMessage, SAML_RESPONSE_PARAM};
