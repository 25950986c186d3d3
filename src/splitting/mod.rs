//! Length-bounded document splitting.
//!
//! The splitting system turns a parsed [`crate::tree::DocumentTree`] into an
//! ordered sequence of fragments, each within a byte budget and each
//! independently well-formed: tags truncated mid-subtree are closed at the
//! end of one fragment and reopened at the start of the next.

mod engine;
mod registry;
mod sequencer;
mod types;

pub use engine::SplitEngine;
pub use registry::BlockTagRegistry;
pub use sequencer::{split, split_markup, FragmentStream};
pub use types::{Fragment, FragmentKind, SplitOptions};
