//! Single-threaded construction of one partial tree from one tape slice.
//!
//! A worker owns a disjoint sub-slab of the arena (its *body*, mapping 1:1
//! onto its tape slice, plus one dedicated root cell) and interprets its
//! slice with three pieces of state:
//!
//! - a container stack whose position 0 is the worker's synthetic root,
//! - a pending-values buffer of tape indices for scalars and keys not yet
//!   committed to the current container,
//! - a pending-key slot, set only when a key's value turns out to be a
//!   container, so the key rides on the child about to open instead of
//!   becoming an Item.
//!
//! A close with no opener in this slice wraps everything built so far in a
//! fresh virtual container of the matching kind; the merge phase later
//! drains and erases these wrappers. The worker reports its synthetic root,
//! its frontier (the deepest still-open container), and how many body cells
//! it consumed — the untouched suffix becomes a free region.

use crate::error::ParseError;
use crate::node::{Node, NodeKind};
use crate::node_ref::NodeRef;
use crate::tape::{Tape, TapeKind};
use std::ops::Range;

/// A worker's private view of the arena during the parallel build: a bump
/// allocator over its body slice plus its dedicated root cell.
pub(crate) struct WorkerSlab<'a> {
    base: usize,
    cells: &'a mut [Node],
    used: usize,
    root_ref: NodeRef,
    root: &'a mut Node,
}

impl<'a> WorkerSlab<'a> {
    pub(crate) fn new(
        base: usize,
        cells: &'a mut [Node],
        root_ref: NodeRef,
        root: &'a mut Node,
    ) -> Self {
        Self {
            base,
            cells,
            used: 0,
            root_ref,
            root,
        }
    }

    fn alloc(&mut self) -> NodeRef {
        let r = NodeRef::slab(self.base + self.used);
        self.cells[self.used] = Node::default();
        self.used += 1;
        r
    }

    fn node_mut(&mut self, r: NodeRef) -> &mut Node {
        if r == self.root_ref {
            &mut *self.root
        } else {
            &mut self.cells[r.index() - self.base]
        }
    }

    fn link(&mut self, parent: NodeRef, child: NodeRef) {
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }
}

/// What one worker hands back across the barrier.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PartialOutcome {
    /// The worker's synthetic root.
    pub root: NodeRef,
    /// Deepest still-open container; the next partial's contents flow here.
    pub frontier: NodeRef,
    /// Body cells consumed; the suffix becomes a free region.
    pub used: usize,
}

/// Interpret `tape[range]` into a partial tree inside `slab`.
pub(crate) fn build_partial(
    tape: &Tape,
    range: Range<usize>,
    slab: &mut WorkerSlab<'_>,
) -> Result<PartialOutcome, ParseError> {
    let root = slab.root_ref;
    let mut nested: Vec<NodeRef> = vec![root];
    let mut depth = 0usize;
    let mut pending: Vec<usize> = Vec::new();
    let mut pending_key: Option<usize> = None;

    let mut i = range.start;
    while i < range.end {
        let kind = tape
            .kind(i)
            .ok_or(ParseError::SyntaxStateMismatch { tape_index: i })?;
        match kind {
            TapeKind::StartObject | TapeKind::StartArray => {
                flush_pending(tape, slab, nested[depth], &mut pending)?;
                let child = slab.alloc();
                {
                    let n = slab.node_mut(child);
                    n.kind = if kind == TapeKind::StartObject {
                        NodeKind::Object
                    } else {
                        NodeKind::Array
                    };
                    if let Some(key_slot) = pending_key.take() {
                        n.value = tape.decode(key_slot);
                    }
                }
                slab.link(nested[depth], child);
                let hint = tape.count_hint(i);
                let slots = if kind == TapeKind::StartObject {
                    2 * hint
                } else {
                    hint
                };
                slab.node_mut(child).children.reserve(slots);
                depth += 1;
                if nested.len() == depth {
                    nested.push(child);
                } else {
                    nested[depth] = child;
                }
                i += 1;
            }
            TapeKind::EndObject | TapeKind::EndArray => {
                flush_pending(tape, slab, nested[depth], &mut pending)?;
                if depth == 0 {
                    // close without an opener in this slice: wrap what we
                    // have in a virtual container of the matching kind
                    let wrapper = slab.alloc();
                    slab.node_mut(wrapper).kind = if kind == TapeKind::EndObject {
                        NodeKind::VirtualObject
                    } else {
                        NodeKind::VirtualArray
                    };
                    let moved = std::mem::take(&mut slab.node_mut(root).children);
                    for &c in &moved {
                        slab.node_mut(c).parent = Some(wrapper);
                    }
                    slab.node_mut(wrapper).children = moved;
                    slab.node_mut(wrapper).parent = Some(root);
                    slab.node_mut(root).children.push(wrapper);
                    let opener = tape.matching_open(i);
                    let hint = tape.count_hint(opener);
                    let slots = if kind == TapeKind::EndObject {
                        2 * hint
                    } else {
                        hint
                    };
                    slab.node_mut(root).children.reserve(slots);
                } else {
                    depth -= 1;
                }
                i += 1;
            }
            TapeKind::Key => {
                // a key whose value is a container rides on that container
                let next = tape.kind(i + 1);
                if matches!(next, Some(k) if k.is_open()) {
                    pending_key = Some(i);
                } else {
                    pending.push(i);
                }
                i += 1;
            }
            TapeKind::Int64 | TapeKind::Uint64 | TapeKind::Double => {
                pending.push(i);
                i += 2;
            }
            TapeKind::String | TapeKind::True | TapeKind::False | TapeKind::Null => {
                pending.push(i);
                i += 1;
            }
            TapeKind::Root => {
                return Err(ParseError::SyntaxStateMismatch { tape_index: i });
            }
        }
    }

    flush_pending(tape, slab, nested[depth], &mut pending)?;
    if pending_key.is_some() {
        // a stashed key whose container never opened inside this slice
        return Err(ParseError::SyntaxStateMismatch {
            tape_index: range.end,
        });
    }

    Ok(PartialOutcome {
        root,
        frontier: nested[depth],
        used: slab.used,
    })
}

/// Commit the pending run into `target`: (key, value) Item pairs when the
/// run starts with a key, single value Items otherwise.
fn flush_pending(
    tape: &Tape,
    slab: &mut WorkerSlab<'_>,
    target: NodeRef,
    pending: &mut Vec<usize>,
) -> Result<(), ParseError> {
    if pending.is_empty() {
        return Ok(());
    }
    let paired = tape.kind(pending[0]) == Some(TapeKind::Key);
    if paired {
        if pending.len() % 2 != 0 {
            return Err(ParseError::structural("key item without a value sibling"));
        }
        for pair in pending.chunks(2) {
            if tape.kind(pair[0]) != Some(TapeKind::Key) {
                return Err(ParseError::structural(
                    "value without a preceding key in an object",
                ));
            }
            let key = slab.alloc();
            {
                let n = slab.node_mut(key);
                n.kind = NodeKind::Item;
                n.value = tape.decode(pair[0]);
            }
            let value = slab.alloc();
            {
                let n = slab.node_mut(value);
                n.kind = NodeKind::Item;
                n.value = tape.decode(pair[1]);
            }
            slab.link(target, key);
            slab.link(target, value);
        }
    } else {
        for &slot in pending.iter() {
            if tape.kind(slot) == Some(TapeKind::Key) {
                return Err(ParseError::structural("key at an array position"));
            }
            let item = slab.alloc();
            {
                let n = slab.node_mut(item);
                n.kind = NodeKind::Item;
                n.value = tape.decode(slot);
            }
            slab.link(target, item);
        }
    }
    pending.clear();
    Ok(())
}
