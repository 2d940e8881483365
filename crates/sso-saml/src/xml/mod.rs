//! Hardened XML loading.
//!
//! Inbound SAML messages are parsed into an owned, namespace-aware element
//! tree. The loader never resolves external resources and refuses any
//! document type declaration, so entity expansion is impossible.

mod document;
mod loader;

pub use document::{Descendants, XmlAttribute, XmlDocument, XmlElement, XmlNode};
pub use loader::{LoaderOptions, XmlLoader};
