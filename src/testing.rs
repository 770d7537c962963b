//! Testing utilities for document trees.
//!
//! This module provides the assertion and inspection helpers the crate's
//! own test suite is written with, and that embedders can reuse:
//!
//! - **Structural equality**: compare two trees node by node, in order
//! - **Invariant walks**: parent-link consistency, virtual-node absence,
//!   live-node counting for arena bookkeeping checks
//! - **Fixtures**: a small set of JSON documents exercising every scalar
//!   kind, nesting, and escape handling
//!
//! # Quick Start
//!
//! ```no_run
//! use tapetree::{parse_str, ParseOptions};
//! use tapetree::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let a = parse_str("[1,2,3]", ParseOptions::default().threads(1))?;
//! let b = parse_str("[1,2,3]", ParseOptions::default().threads(4))?;
//! assert_documents_equal(&a, &b);
//! # Ok(())
//! # }
//! ```

use crate::arena::NodeArena;
use crate::node_ref::NodeRef;
use crate::runner::Document;

/// Panic with context unless the two documents are structurally equal:
/// same kinds, same values (bitwise for integers and booleans), same child
/// order throughout.
pub fn assert_documents_equal(a: &Document, b: &Document) {
    assert!(
        trees_equal(a.arena(), a.root(), b.arena(), b.root()),
        "documents differ:\n  left: {}\n right: {}",
        a.to_json(),
        b.to_json()
    );
}

/// Structural equality of two subtrees.
pub fn trees_equal(
    arena_a: &NodeArena,
    a: NodeRef,
    arena_b: &NodeArena,
    b: NodeRef,
) -> bool {
    let na = arena_a.node(a);
    let nb = arena_b.node(b);
    if na.kind() != nb.kind() || na.value() != nb.value() {
        return false;
    }
    if na.child_count() != nb.child_count() {
        return false;
    }
    na.children()
        .iter()
        .zip(nb.children())
        .all(|(&ca, &cb)| trees_equal(arena_a, ca, arena_b, cb))
}

/// Number of nodes in the subtree, the root included.
pub fn live_node_count(arena: &NodeArena, root: NodeRef) -> usize {
    1 + arena
        .node(root)
        .children()
        .iter()
        .map(|&c| live_node_count(arena, c))
        .sum::<usize>()
}

/// Every non-root node's parent must be the container whose child list
/// references it, exactly once.
pub fn assert_parent_links(arena: &NodeArena, root: NodeRef) {
    for &c in arena.node(root).children() {
        let occurrences = arena
            .node(root)
            .children()
            .iter()
            .filter(|&&x| x == c)
            .count();
        assert_eq!(occurrences, 1, "child {c:?} referenced more than once");
        assert_eq!(
            arena.node(c).parent(),
            Some(root),
            "child {c:?} has a stale parent link"
        );
        assert_parent_links(arena, c);
    }
}

/// A finished document must contain no virtual placeholders.
pub fn assert_no_virtuals(arena: &NodeArena, root: NodeRef) {
    assert!(
        !arena.node(root).kind().is_virtual(),
        "virtual node survived the merge: {root:?}"
    );
    for &c in arena.node(root).children() {
        assert_no_virtuals(arena, c);
    }
}

/// The arena must account for every slab cell: live nodes, free-listed
/// cells, and free-region cells partition the slab.
pub fn assert_arena_accounted(doc: &Document) {
    let arena = doc.arena();
    let live = live_node_count(arena, doc.root());
    let free = arena.free_list_len() + arena.free_region_cells();
    assert_eq!(
        live + free,
        arena.slab_len(),
        "arena bookkeeping leak: {live} live + {free} free != {} cells",
        arena.slab_len()
    );
    assert_eq!(
        arena.heap_len(),
        arena.heap_free_len(),
        "a fresh parse should leave no live heap nodes"
    );
}

/// JSON documents covering every scalar kind, nesting shapes, escapes, and
/// pathological-but-valid inputs.
pub fn fixture_documents() -> Vec<&'static str> {
    vec![
        "{}",
        "[]",
        "null",
        "42",
        "[1,2,3]",
        r#"{"a":1,"b":[true,null]}"#,
        "[[[[42]]]]",
        r#"{"k":"a\"b\n"}"#,
        r#"{"a":{"b":{"c":{"d":[1,2,{"e":null}]}}}}"#,
        r#"[{"x":1},{"x":2},{"x":3},{"x":4},{"x":5},{"x":6},{"x":7},{"x":8}]"#,
        r#"{"big":18446744073709551615,"neg":-9223372036854775808,"pi":3.141592,"exp":1.5e10}"#,
        r#"{"unicode":"éП😀","slash":"\/","tab":"\t"}"#,
        r#"[true,false,null,"",0,-1,0.5,[],{},{"nested":[{"deep":true}]}]"#,
        r#"{"s1":"alpha","s2":"beta","s3":"gamma","s4":"delta","s5":"epsilon","s6":"zeta","s7":"eta","s8":"theta"}"#,
    ]
}
