//! Stitching one partial tree into the running accumulator.
//!
//! The merge walks two spines in lock-step. On the partial's side it starts
//! at the deepest leading virtual wrapper (the earliest content of the
//! slice) and ascends toward the synthetic root; on the accumulator's side
//! it starts at the open frontier and ascends toward the staging root. At
//! each level every real child of the partial is re-linked into the
//! accumulator in emitted order — containers wholesale, Item (key, value)
//! runs as-is — while virtual wrappers are skipped (their content was
//! already linked one level deeper) and their cells recycled.
//!
//! If the partial's spine outlives the accumulator's, the document closes
//! containers it never opened: [`ParseError::OverClose`]. If the
//! accumulator's spine outlives the partial's, it simply stays open for the
//! next partial. The caller's tracked frontier for the partial is rewritten
//! to its merged location whenever the walk crosses it.

use crate::arena::NodeArena;
use crate::error::ParseError;
use crate::node_ref::NodeRef;

/// How the two spines were exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MergeDepth {
    /// Both spines ended together.
    Balanced,
    /// The accumulator still has open containers; later partials continue
    /// to flow into them.
    LeftOpen,
}

/// Drain `partial_root`'s tree into the accumulator at `into`.
///
/// `tracked` is the caller's frontier for this partial; when the walk
/// passes the node it names, it is rewritten to the merged location so
/// subsequent merges land correctly. `at_tape_index` is the slice start,
/// used only for error reporting.
pub(crate) fn merge_partial(
    arena: &mut NodeArena,
    into: NodeRef,
    partial_root: NodeRef,
    mut tracked: Option<&mut NodeRef>,
    at_tape_index: usize,
) -> Result<MergeDepth, ParseError> {
    // descend the leading virtual chain to the slice's earliest content
    let mut from = partial_root;
    loop {
        match arena.node(from).children.first().copied() {
            Some(first) if arena.node(first).kind.is_virtual() => from = first,
            _ => break,
        }
    }

    let mut src = from;
    let mut dst = into;
    loop {
        if let Some(t) = tracked.as_mut() {
            if **t == src {
                **t = dst;
            }
        }

        let children = std::mem::take(&mut arena.node_mut(src).children);
        let mut i = 0;
        while i < children.len() {
            let child = children[i];
            let kind = arena.node(child).kind;
            if kind.is_virtual() {
                // its content was linked one level deeper; recycle the cell
                arena.free(child);
                i += 1;
            } else if kind.is_item() && arena.node(child).value.is_key {
                let value = *children
                    .get(i + 1)
                    .ok_or_else(|| ParseError::structural("key item without a value sibling"))?;
                arena.link(dst, child);
                arena.link(dst, value);
                i += 2;
            } else {
                arena.link(dst, child);
                i += 1;
            }
        }

        let src_parent = arena.node(src).parent;
        let dst_parent = arena.node(dst).parent;
        match (src_parent, dst_parent) {
            (Some(s), Some(d)) => {
                src = s;
                dst = d;
            }
            (Some(_), None) => {
                return Err(ParseError::OverClose {
                    tape_index: at_tape_index,
                });
            }
            (None, Some(_)) => return Ok(MergeDepth::LeftOpen),
            (None, None) => return Ok(MergeDepth::Balanced),
        }
    }
}
