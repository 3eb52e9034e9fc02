//! Render tree
//!
//! The output of a component render. Mount points store the last rendered
//! tree; hosts read it back as text or markup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A node in a rendered component tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Renders nothing
    #[default]
    Empty,
    /// Text content
    Text {
        /// The text
        value: String,
    },
    /// Tagged element with attributes and children
    Element {
        /// Element tag
        tag: String,
        /// Attributes, ordered by name
        #[serde(default)]
        attributes: BTreeMap<String, String>,
        /// Child nodes
        #[serde(default)]
        children: Vec<Node>,
    },
    /// Children without a wrapping element
    Fragment {
        /// Child nodes
        children: Vec<Node>,
    },
}

impl Node {
    /// Text node
    pub fn text<S: Into<String>>(value: S) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Element node without attributes or children
    pub fn element<S: Into<String>>(tag: S) -> Self {
        Self::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Fragment node
    pub fn fragment(children: Vec<Node>) -> Self {
        Self::Fragment { children }
    }

    /// Set an attribute (no-op on non-element nodes)
    pub fn with_attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        if let Self::Element { attributes, .. } = &mut self {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    /// Append a child (wraps non-container nodes in a fragment)
    pub fn with_child(self, child: Node) -> Self {
        match self {
            Self::Element {
                tag,
                attributes,
                mut children,
            } => {
                children.push(child);
                Self::Element {
                    tag,
                    attributes,
                    children,
                }
            }
            Self::Fragment { mut children } => {
                children.push(child);
                Self::Fragment { children }
            }
            Self::Empty => child,
            other => Self::Fragment {
                children: vec![other, child],
            },
        }
    }

    /// Append several children
    pub fn with_children<I: IntoIterator<Item = Node>>(self, children: I) -> Self {
        children.into_iter().fold(self, Self::with_child)
    }

    /// True for [`Node::Empty`] and containers holding only empty nodes
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text { .. } | Self::Element { .. } => false,
            Self::Fragment { children } => children.iter().all(Self::is_empty),
        }
    }

    /// Concatenated text of the whole subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Empty => {}
            Self::Text { value } => out.push_str(value),
            Self::Element { children, .. } | Self::Fragment { children } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text { value } => f.write_str(&escape(value)),
            Self::Element {
                tag,
                attributes,
                children,
            } => {
                write!(f, "<{tag}")?;
                for (key, value) in attributes {
                    write!(f, " {key}=\"{}\"", escape(value))?;
                }
                f.write_str(">")?;
                for child in children {
                    write!(f, "{child}")?;
                }
                write!(f, "</{tag}>")
            }
            Self::Fragment { children } => {
                for child in children {
                    write!(f, "{child}")?;
                }
                Ok(())
            }
        }
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
