//! Owned markup tree model: parsing, serialization and measurement.
//!
//! The tree is parsed once from source text and afterwards only carved
//! structurally; nothing in the crate re-parses intermediate output. All
//! size comparisons use the byte length of the rendered markup, so the
//! length helpers here must stay in lockstep with the serializers.

use crate::error::Result;

/// Tag used to wrap source text so documents with multiple top-level
/// nodes parse as a single tree.
const SYNTHETIC_ROOT: &str = "fragmentize-root";

/// A single node in the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A tagged element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// Attributes in document order; names are unique per the parser contract.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// The root container: an ordered list of top-level nodes.
///
/// The document itself has no tag and no attributes; it never needs to be
/// closed, so it contributes nothing to any closing-tag cost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTree {
    pub children: Vec<Node>,
}

impl Element {
    /// Render the opening tag, attributes included.
    #[must_use]
    pub fn opening_tag(&self) -> String {
        let mut out = String::with_capacity(self.opening_tag_len());
        self.opening_tag_into(&mut out);
        out
    }

    fn opening_tag_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_attr_into(out, value);
            out.push('"');
        }
        out.push('>');
    }

    /// Render the closing tag.
    #[must_use]
    pub fn closing_tag(&self) -> String {
        format!("</{}>", self.tag)
    }

    /// Byte length of the opening tag without rendering it.
    #[must_use]
    pub fn opening_tag_len(&self) -> usize {
        let attrs: usize = self
            .attributes
            .iter()
            .map(|(name, value)| name.len() + escaped_attr_len(value) + 4)
            .sum();
        self.tag.len() + attrs + 2
    }

    /// Byte length of the closing tag.
    #[must_use]
    pub fn closing_tag_len(&self) -> usize {
        self.tag.len() + 3
    }

    /// Whether the element wraps exactly one text run and nothing else.
    #[must_use]
    pub fn has_single_text_child(&self) -> bool {
        matches!(self.children.as_slice(), [Node::Text(_)])
    }
}

impl Node {
    /// Byte length of this node's rendered markup.
    #[must_use]
    pub fn serialized_len(&self) -> usize {
        match self {
            Node::Text(text) => escaped_text_len(text),
            Node::Element(el) => {
                let inner: usize = el.children.iter().map(Node::serialized_len).sum();
                el.opening_tag_len() + inner + el.closing_tag_len()
            }
        }
    }

    /// Render this node as markup.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.serialized_len());
        self.serialize_into(&mut out);
        out
    }

    /// Append this node's rendered markup to `out`.
    pub fn serialize_into(&self, out: &mut String) {
        match self {
            Node::Text(text) => escape_text_into(out, text),
            Node::Element(el) => {
                el.opening_tag_into(out);
                for child in &el.children {
                    child.serialize_into(out);
                }
                out.push_str(&el.closing_tag());
            }
        }
    }

    /// Concatenated text runs of this subtree, unescaped.
    pub fn text_content_into(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                for child in &el.children {
                    child.text_content_into(out);
                }
            }
        }
    }
}

impl DocumentTree {
    /// Parse markup text into an owned tree.
    ///
    /// The input is wrapped in a synthetic root so documents with several
    /// top-level nodes (common for messages, e.g. `<p>..</p><p>..</p>`)
    /// parse as one tree. Comments and processing instructions are dropped.
    ///
    /// # Examples
    /// ```
    /// use fragmentize::DocumentTree;
    ///
    /// let tree = DocumentTree::parse("<p>one</p><p>two</p>");
    /// assert!(tree.is_ok());
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        let wrapped = format!("<{SYNTHETIC_ROOT}>{source}</{SYNTHETIC_ROOT}>");
        let doc = roxmltree::Document::parse(&wrapped)?;
        Ok(Self {
            children: convert_children(doc.root_element()),
        })
    }

    /// Byte length of the whole document's rendered markup.
    #[must_use]
    pub fn serialized_len(&self) -> usize {
        self.children.iter().map(Node::serialized_len).sum()
    }

    /// Render the whole document as markup.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.serialized_len());
        for child in &self.children {
            child.serialize_into(&mut out);
        }
        out
    }

    /// Concatenated text runs of the whole document, unescaped.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.text_content_into(&mut out);
        }
        out
    }
}

fn convert_children(node: roxmltree::Node<'_, '_>) -> Vec<Node> {
    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(Node::Element(Element {
                tag: child.tag_name().name().to_string(),
                attributes: child
                    .attributes()
                    .map(|a| (a.name().to_string(), a.value().to_string()))
                    .collect(),
                children: convert_children(child),
            }));
        } else if child.is_text() {
            children.push(Node::Text(child.text().unwrap_or_default().to_string()));
        }
    }
    children
}

// The parser unescapes entities; rendering must re-escape them or the
// emitted fragments would not parse back. Length helpers mirror this.

fn escape_text_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escaped_text_len(text: &str) -> usize {
    text.chars()
        .map(|ch| match ch {
            '&' => 5,
            '<' | '>' => 4,
            _ => ch.len_utf8(),
        })
        .sum()
}

fn escape_attr_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn escaped_attr_len(value: &str) -> usize {
    value
        .chars()
        .map(|ch| match ch {
            '&' => 5,
            '"' => 6,
            '<' | '>' => 4,
            _ => ch.len_utf8(),
        })
        .sum()
}
