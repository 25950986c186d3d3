//! Public types of the splitting system.

use super::registry::BlockTagRegistry;
use crate::config::DEFAULT_MAX_LEN;

/// One emitted chunk of split output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Rendered markup of this fragment.
    pub markup: String,
    pub kind: FragmentKind,
}

/// How a fragment was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Independently valid markup: every tag opened in the fragment is
    /// closed within it.
    WellFormed,
    /// Hard byte cut from the oversized-unit fallback; tag balance is not
    /// guaranteed.
    RawCut,
}

impl Fragment {
    pub(crate) fn well_formed(markup: String) -> Self {
        Self {
            markup,
            kind: FragmentKind::WellFormed,
        }
    }

    pub(crate) fn raw_cut(markup: String) -> Self {
        Self {
            markup,
            kind: FragmentKind::RawCut,
        }
    }

    /// Byte length of the fragment markup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markup.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }

    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.kind == FragmentKind::WellFormed
    }
}

/// Options controlling a split run.
///
/// # Examples
/// ```
/// use fragmentize::{BlockTagRegistry, SplitOptions};
///
/// let options = SplitOptions::new(1024)
///     .with_block_tags(["div", "section"].into_iter().collect::<BlockTagRegistry>());
/// assert_eq!(options.max_len, 1024);
/// ```
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Maximum fragment length in bytes.
    pub max_len: usize,
    /// Tags the splitter may descend into.
    pub block_tags: BlockTagRegistry,
}

impl SplitOptions {
    /// Options with the given budget and the default block-tag registry.
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            block_tags: BlockTagRegistry::default(),
        }
    }

    /// Replace the block-tag registry.
    #[must_use]
    pub fn with_block_tags(mut self, block_tags: BlockTagRegistry) -> Self {
        self.block_tags = block_tags;
        self
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LEN)
    }
}
