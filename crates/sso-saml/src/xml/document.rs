//! Owned XML document tree.

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
    comments_preserved: bool,
}

impl XmlDocument {
    pub(crate) const fn new(root: XmlElement, comments_preserved: bool) -> Self {
        Self {
            root,
            comments_preserved,
        }
    }

    /// Returns the document element.
    #[must_use]
    pub const fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Returns true if comment nodes were kept while parsing.
    #[must_use]
    pub const fn comments_preserved(&self) -> bool {
        self.comments_preserved
    }

    /// Iterates over all elements in document order, root included.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        std::iter::once(&self.root).chain(self.root.descendants())
    }

    /// Iterates over elements with the given local name, in any namespace.
    pub fn elements_by_local_name<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |e| e.local_name == local_name)
    }
}

/// A single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Namespace URI, if the attribute is prefixed.
    pub namespace: Option<String>,
    /// Local name.
    pub local_name: String,
    /// Attribute value with entities and character references resolved.
    pub value: String,
}

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// A child element.
    Element(XmlElement),
    /// Character data.
    Text(String),
    /// A comment. Only present in documents parsed with comments preserved.
    Comment(String),
}

/// An element with its namespace-qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Namespace URI, if any.
    pub namespace: Option<String>,
    /// Local name.
    pub local_name: String,
    /// Attributes in document order.
    pub attributes: Vec<XmlAttribute>,
    /// Child nodes in document order.
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Returns true if this element has the given namespace and local name.
    #[must_use]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }

    /// Returns the value of an unqualified attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.local_name == name)
            .map(|a| a.value.as_str())
    }

    /// Returns the value of a namespaced attribute.
    #[must_use]
    pub fn attribute_ns(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.local_name == name)
            .map(|a| a.value.as_str())
    }

    /// Iterates over the direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Returns the first direct child with the given qualified name.
    #[must_use]
    pub fn child(&self, namespace: &str, local_name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.is(namespace, local_name))
    }

    /// Iterates over direct children with the given qualified name.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.child_elements()
            .filter(move |e| e.is(namespace, local_name))
    }

    /// Iterates over direct children with the given local name, in any namespace.
    pub fn children_by_local_name<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.child_elements()
            .filter(move |e| e.local_name == local_name)
    }

    /// Concatenates the direct text children, skipping comments.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns true if any direct child is a comment.
    #[must_use]
    pub fn has_comments(&self) -> bool {
        self.children
            .iter()
            .any(|node| matches!(node, XmlNode::Comment(_)))
    }

    /// Iterates over all descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Counts descendant elements with the given qualified name.
    #[must_use]
    pub fn count_descendants(&self, namespace: &str, local_name: &str) -> usize {
        self.descendants()
            .filter(|e| e.is(namespace, local_name))
            .count()
    }
}

/// Pre-order iterator over descendant elements.
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, XmlNode>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(XmlNode::Element(e)) => {
                    self.stack.push(e.children.iter());
                    return Some(e);
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
