//! Lazy fragment sequencing over a working tree.
//!
//! Each `next()` call produces at most one fragment: either a rebalanced
//! well-formed prefix (the working tree shrinks by exactly that prefix) or
//! one raw chunk of an oversized non-splittable unit. The stream owns the
//! working tree exclusively and is forward-only; splitting the same source
//! again requires re-parsing it.

use std::collections::VecDeque;

use tracing::warn;

use super::engine::{Descent, SplitEngine};
use super::types::{Fragment, SplitOptions};
use crate::error::{FragmentizeError, Result};
use crate::tree::DocumentTree;

/// Split a parsed document into length-bounded fragments.
///
/// The budget is validated up front: it must cover the deepest reachable
/// closing-tag chain plus at least one byte of content, otherwise no cut
/// could ever fit and the run is rejected as [`FragmentizeError::InvalidBudget`].
///
/// # Examples
/// ```
/// use fragmentize::{split, DocumentTree, SplitOptions};
///
/// let tree = DocumentTree::parse("<div><p>AAAA</p><p>BBBB</p></div>")?;
/// let fragments: Vec<_> = split(tree, SplitOptions::new(25))?.collect();
///
/// assert_eq!(fragments.len(), 2);
/// assert_eq!(fragments[0].markup, "<div><p>AAAA</p></div>");
/// assert_eq!(fragments[1].markup, "<div><p>BBBB</p></div>");
/// # Ok::<(), fragmentize::FragmentizeError>(())
/// ```
pub fn split(tree: DocumentTree, options: SplitOptions) -> Result<FragmentStream> {
    let SplitOptions {
        max_len,
        block_tags,
    } = options;
    let engine = SplitEngine::new(block_tags);
    let required = engine.min_budget(&tree);
    if max_len < required {
        return Err(FragmentizeError::InvalidBudget { max_len, required });
    }
    Ok(FragmentStream {
        engine,
        max_len,
        state: State::Scanning(tree),
    })
}

/// Parse markup text and split it. See [`split`].
pub fn split_markup(source: &str, options: SplitOptions) -> Result<FragmentStream> {
    split(DocumentTree::parse(source)?, options)
}

/// Lazy, forward-only stream of fragments.
pub struct FragmentStream {
    engine: SplitEngine,
    max_len: usize,
    state: State,
}

enum State {
    /// Looking for the next cut in the working tree.
    Scanning(DocumentTree),
    /// Draining raw chunks of an oversized unit before resuming the scan.
    Draining {
        chunks: VecDeque<String>,
        rest: DocumentTree,
    },
    Done,
}

/// Next state after handing out a chunk or removing a unit: drain what is
/// queued, then scan whatever markup remains.
fn resume(chunks: VecDeque<String>, rest: DocumentTree) -> State {
    if !chunks.is_empty() {
        State::Draining { chunks, rest }
    } else if rest.children.is_empty() {
        State::Done
    } else {
        State::Scanning(rest)
    }
}

impl Iterator for FragmentStream {
    type Item = Fragment;

    fn next(&mut self) -> Option<Fragment> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::Scanning(tree) => match self.engine.find_cut(&tree, self.max_len) {
                    Descent::Fits => {
                        return Some(Fragment::well_formed(tree.serialize()));
                    }
                    Descent::Halt(cut) => {
                        if let Some(rebalanced) = self.engine.rebalance(&tree, cut, self.max_len) {
                            let residual = SplitEngine::carve_residual(tree, &rebalanced);
                            self.state = State::Scanning(residual);
                            return Some(Fragment::well_formed(rebalanced.fragment));
                        }

                        // No viable cut: the first unit in document order is
                        // itself oversized. Emit it as raw byte cuts and
                        // drop it from the working tree.
                        let mut rest = tree;
                        let Some(unit) = self.engine.remove_blocking_unit(&mut rest) else {
                            debug_assert!(false, "rebalance failed on an empty tree");
                            return None;
                        };
                        let raw = unit.serialize();
                        warn!(
                            unit_len = raw.len(),
                            max_len = self.max_len,
                            "non-splittable unit exceeds the budget; emitting raw cuts"
                        );
                        let mut chunks = chunk_raw(&raw, self.max_len);
                        match chunks.pop_front() {
                            Some(first) => {
                                self.state = resume(chunks, rest);
                                return Some(Fragment::raw_cut(first));
                            }
                            None => self.state = resume(chunks, rest),
                        }
                    }
                },
                State::Draining { mut chunks, rest } => match chunks.pop_front() {
                    Some(chunk) => {
                        self.state = resume(chunks, rest);
                        return Some(Fragment::raw_cut(chunk));
                    }
                    None => self.state = resume(chunks, rest),
                },
                State::Done => return None,
            }
        }
    }
}

/// Cut raw markup into budget-sized pieces, never inside a UTF-8 scalar.
fn chunk_raw(raw: &str, max_len: usize) -> VecDeque<String> {
    let mut chunks = VecDeque::new();
    let mut rest = raw;
    while rest.len() > max_len {
        let mut at = max_len;
        while !rest.is_char_boundary(at) {
            at -= 1;
        }
        if at == 0 {
            // Budget smaller than the first scalar; overshoot by one scalar
            // rather than loop forever.
            at = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (head, tail) = rest.split_at(at);
        chunks.push_back(head.to_string());
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push_back(rest.to_string());
    }
    chunks
}
