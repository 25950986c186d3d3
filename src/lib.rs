//! Fragmentize - split HTML messages into length-bounded, well-formed fragments.
//!
//! Given a markup document, the crate produces an ordered sequence of
//! fragments, each no longer than a caller-specified byte budget and each
//! independently valid markup: tags truncated mid-subtree are closed at the
//! end of one fragment and reopened at the start of the next, so reading the
//! fragments in order round-trips the document's content.
//!
//! # Architecture
//!
//! - [`tree`] - owned markup tree: parsing, serialization, measurement
//! - [`splitting`] - block-tag registry, split engine, fragment stream
//! - [`config`] - defaults and block-tag validation
//! - [`cli`] - command-line interface
//! - [`error`] - error types
//!
//! # Example
//!
//! ```
//! use fragmentize::{split_markup, SplitOptions};
//!
//! let source = "<div><p>AAAA</p><p>BBBB</p></div>";
//! let fragments: Vec<_> = split_markup(source, SplitOptions::new(25))?.collect();
//!
//! assert_eq!(fragments.len(), 2);
//! assert_eq!(fragments[0].markup, "<div><p>AAAA</p></div>");
//! assert_eq!(fragments[1].markup, "<div><p>BBBB</p></div>");
//! # Ok::<(), fragmentize::FragmentizeError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod splitting;
pub mod tree;

pub use error::{FragmentizeError, Result};
pub use splitting::{
    split, split_markup, BlockTagRegistry, Fragment, FragmentKind, FragmentStream, SplitEngine,
    SplitOptions,
};
pub use tree::{DocumentTree, Element, Node};
