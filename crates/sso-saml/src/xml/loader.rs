//! Hardened XML loader.

use sso_core::XmlLimits;

use super::document::{XmlAttribute, XmlDocument, XmlElement, XmlNode};
use crate::error::{SamlError, SamlResult};

/// Limits enforced by [`XmlLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Maximum raw message size in bytes.
    pub max_message_bytes: usize,
    /// Maximum number of nodes the parser may allocate.
    pub max_nodes: u32,
    /// Maximum element nesting depth, the document element being depth 1.
    pub max_depth: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        XmlLimits::default().into()
    }
}

impl From<XmlLimits> for LoaderOptions {
    fn from(limits: XmlLimits) -> Self {
        Self {
            max_message_bytes: limits.max_message_bytes,
            max_nodes: limits.max_nodes,
            max_depth: limits.max_depth,
        }
    }
}

/// Parses untrusted XML into an [`XmlDocument`].
///
/// Document type declarations are refused outright, so neither internal
/// nor external entities can be declared. External resources are never
/// fetched and XInclude is not processed.
#[derive(Debug, Clone, Default)]
pub struct XmlLoader {
    options: LoaderOptions,
}

impl XmlLoader {
    /// Creates a loader with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader with the given limits.
    #[must_use]
    pub const fn with_options(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Returns the configured limits.
    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Parses `raw` into a document.
    ///
    /// Surrounding whitespace is trimmed first. Comment nodes are kept only
    /// when `preserve_comments` is set.
    ///
    /// ## Errors
    ///
    /// Returns [`SamlError::XmlParse`] if the input is malformed, declares a
    /// DTD, references an undeclared entity, or exceeds a configured limit.
    pub fn parse(&self, raw: &str, preserve_comments: bool) -> SamlResult<XmlDocument> {
        if raw.len() > self.options.max_message_bytes {
            return Err(SamlError::XmlParse(format!(
                "message of {} bytes exceeds the limit of {} bytes",
                raw.len(),
                self.options.max_message_bytes
            )));
        }

        let opts = roxmltree::ParsingOptions {
            allow_dtd: false,
            nodes_limit: self.options.max_nodes,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(raw.trim(), opts)?;

        let root = self.convert(doc.root_element(), preserve_comments, 1)?;
        Ok(XmlDocument::new(root, preserve_comments))
    }

    /// Parses raw bytes, which must be UTF-8.
    ///
    /// ## Errors
    ///
    /// Returns [`SamlError::XmlParse`] if the bytes are not UTF-8 or
    /// [`XmlLoader::parse`] fails.
    pub fn parse_bytes(&self, raw: &[u8], preserve_comments: bool) -> SamlResult<XmlDocument> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| SamlError::XmlParse(format!("message is not UTF-8: {e}")))?;
        self.parse(text, preserve_comments)
    }

    fn convert(
        &self,
        node: roxmltree::Node<'_, '_>,
        preserve_comments: bool,
        depth: usize,
    ) -> SamlResult<XmlElement> {
        if depth > self.options.max_depth {
            return Err(SamlError::XmlParse(format!(
                "element nesting exceeds the limit of {}",
                self.options.max_depth
            )));
        }

        let tag = node.tag_name();
        let attributes = node
            .attributes()
            .map(|a| XmlAttribute {
                namespace: a.namespace().map(str::to_string),
                local_name: a.name().to_string(),
                value: a.value().to_string(),
            })
            .collect();

        let mut children = Vec::new();
        for child in node.children() {
            if child.is_element() {
                children.push(XmlNode::Element(self.convert(
                    child,
                    preserve_comments,
                    depth + 1,
                )?));
            } else if child.is_text() {
                if let Some(text) = child.text() {
                    children.push(XmlNode::Text(text.to_string()));
                }
            } else if child.is_comment() && preserve_comments {
                children.push(XmlNode::Comment(
                    child.text().unwrap_or_default().to_string(),
                ));
            }
        }

        Ok(XmlElement {
            namespace: tag.namespace().map(str::to_string),
            local_name: tag.name().to_string(),
            attributes,
            children,
        })
    }
}
