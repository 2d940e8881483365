//! SAML 2.0 message validation for the SSO authenticator.
//!
//! This crate turns an untrusted SAML message into a typed object that is
//! safe to hand to signature verification:
//!
//! - **Hardened XML loading** - No DTDs, no entity expansion, bounded size
//! - **Canonicalization detection** - Decides whether comments must survive parsing
//! - **Unmarshalling** - Maps the root element onto the SAML object model
//! - **Signature-wrapping guard** - Rejects duplicated Response/Assertion elements
//!
//! # Architecture
//!
//! - [`xml`] - Hardened loader and owned document tree
//! - [`canonicalization`] - Comment-preserving canonicalization detection
//! - [`types`] - SAML object model
//! - [`unmarshal`] - Unmarshaller factory, builders and wrapping guard
//! - [`bootstrap`] - Once-only library initialization
//! - [`bindings`] - HTTP-POST binding decoding
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```rust,ignore
//! use sso_saml::{unmarshall, ProtocolMessage};
//!
//! let unmarshalled = unmarshall(&xml)?;
//! // Verify the signature over `unmarshalled.document()`, then consume.
//! match unmarshalled.message() {
//!     ProtocolMessage::Response(response) => { /* ... */ }
//!     other => { /* ... */ }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bindings;
pub mod bootstrap;
pub mod canonicalization;
pub mod error;
mod parser;
pub mod types;
pub mod unmarshal;
pub mod xml;

pub use bootstrap::{do_bootstrap, Bootstrapper};
pub use canonicalization::{detect_mode, CanonicalizationMode};
pub use error::{SamlError, SamlResult, ValidationError};
pub use parser::{unmarshall, MessageParser, UnmarshalledMessage};
pub use types::*;
pub use unmarshal::{Unmarshaller, UnmarshallerFactory};
pub use xml::{LoaderOptions, XmlDocument, XmlElement, XmlLoader, XmlNode};
