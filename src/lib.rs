//! # Tapetree
//!
//! **Parallel JSON document tree construction** from a simdjson-style
//! structural tape. Tapetree consumes the flat 64-bit token tape a scanner
//! produces, splits it across worker threads, lets every worker build a
//! *partial* tree that may begin or end mid-structure, and stitches the
//! partials into one coherent document backed by an arena allocator.
//!
//! ## Key Features
//!
//! - **Parallel tree assembly** - the tape is partitioned at safe
//!   boundaries; workers build independently and a sequential merge erases
//!   the seams
//! - **Arena-backed nodes** - one contiguous slab, per-worker bump
//!   allocation, free regions and a free-list for post-parse mutation, an
//!   overflow heap past capacity
//! - **Virtual placeholders** - a close whose open lives in an earlier
//!   partition is represented in-tree and erased during the merge
//! - **Document mutation** - append elements, grow containers, find by
//!   key, remove, deep-clone, all against the same arena
//! - **Serializer** - write the tree back out; the output re-tokenizes to
//!   an equivalent tape
//! - **Built-in scanner** - a scalar tokenizer emits the fixed tape format,
//!   so text goes in and a document comes out with no external pieces
//!
//! ## Quick Start
//!
//! ```no_run
//! use tapetree::{parse_str, ParseOptions};
//!
//! # fn main() -> anyhow::Result<()> {
//! let doc = parse_str(r#"{"a":1,"b":[true,null]}"#, ParseOptions::default().threads(4))?;
//!
//! // the document root holds the top-level object
//! let object = doc.arena().node(doc.root()).children()[0];
//! assert!(doc.arena().find(object, "a").is_some());
//! println!("{}", doc.to_json());
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Tape
//!
//! The canonical input: `tape[0]` is a root slot carrying the total slot
//! count, openers carry their matching-close index and a saturated child
//! count, strings and keys point into a length-prefixed byte buffer, and
//! numbers take two slots. See [`tape`] for the full layout. Any producer
//! of this format can feed [`parse_tape`] directly.
//!
//! ### Partial trees and virtual nodes
//!
//! A worker's slice may close containers it never saw open. Each such
//! close wraps the content built so far in a *virtual* container of the
//! matching kind. The merge walks the leading virtual chain of each
//! partial against the open frontier of the accumulated tree, re-links
//! children in tape order, and recycles the wrappers — a finished document
//! contains none.
//!
//! ### Arena
//!
//! All nodes live in a [`NodeArena`] and are addressed by [`NodeRef`].
//! During the build every worker bumps within a disjoint sub-slab; after
//! the barrier the unused suffixes are published as free regions that
//! later mutations draw from. See [`arena`].
//!
//! ## Errors
//!
//! Every failure aborts the parse: scanner rejections, a malformed root
//! slot, a builder finishing mid-token, more closes than opens
//! (`OverClose`), containers left open (`UnderClose`), and
//! kind-contradicting tree edits. See [`ParseError`].

pub mod arena;
mod builder;
pub mod error;
mod merge;
pub mod node;
pub mod node_ref;
pub mod partition;
pub mod runner;
pub mod serializer;
pub mod tape;
pub mod testing;
pub mod tokenizer;
mod tree;
pub mod value;

pub use arena::{FreeRegion, NodeArena};
pub use error::ParseError;
pub use node::{Node, NodeKind};
pub use node_ref::NodeRef;
pub use partition::find_cuts;
pub use runner::{Document, ParseOptions, parse, parse_bytes, parse_scalar, parse_str, parse_tape};
pub use serializer::{serialize, to_string};
pub use tape::{Tape, TapeKind};
pub use tokenizer::tokenize;
pub use value::{Scalar, Value};
