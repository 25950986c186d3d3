//! Registry of splittable block tags.

use std::collections::HashSet;

use crate::config::DEFAULT_BLOCK_TAGS;
use crate::tree::{Element, Node};

/// Allow-list of element tags the splitter may open up to find a finer cut.
///
/// # Examples
/// ```
/// use fragmentize::BlockTagRegistry;
///
/// let registry = BlockTagRegistry::default();
/// assert!(registry.contains("div"));
/// assert!(!registry.contains("a"));
/// ```
#[derive(Debug, Clone)]
pub struct BlockTagRegistry {
    tags: HashSet<String>,
}

impl BlockTagRegistry {
    /// Create a registry with no tags registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tags: HashSet::new(),
        }
    }

    /// Register a tag as splittable.
    pub fn register(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    /// Whether a tag is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether the splitter may descend into this node.
    ///
    /// Text is never splittable. An element is splittable when its tag is
    /// registered and it does not wrap exactly one text run: such an element
    /// has no internal structure to cut at, so it is kept whole and handed
    /// to the oversized-unit fallback if it cannot fit.
    #[must_use]
    pub fn can_split(&self, node: &Node) -> bool {
        match node {
            Node::Element(el) => self.can_split_element(el),
            Node::Text(_) => false,
        }
    }

    /// Element form of [`Self::can_split`].
    #[must_use]
    pub fn can_split_element(&self, el: &Element) -> bool {
        self.contains(&el.tag) && !el.has_single_text_child()
    }
}

impl Default for BlockTagRegistry {
    fn default() -> Self {
        DEFAULT_BLOCK_TAGS.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for BlockTagRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}
