//! The node arena: a contiguous slab, a free-region list, a LIFO free-list,
//! and an overflow heap.
//!
//! All nodes of a document live here and are addressed by [`NodeRef`].
//! Allocation is first-fit with a fixed priority:
//!
//! 1. pop the free-list (threaded through node cells via their successor
//!    field),
//! 2. take the first cell of the first free region with cells remaining,
//! 3. fall back to the overflow heap.
//!
//! During the parallel build the slab is pre-sliced: every worker bumps
//! within a disjoint sub-slab and needs no synchronization (see
//! [`builder`](crate::builder)). Once the build publishes each worker's
//! unused suffix as a free region, the arena is single-writer; user
//! mutations after the parse draw from the regions, then the free-list,
//! then the heap.
//!
//! The heap recycles slots through a free-slot stack rather than swapping
//! with the last entry: remove-by-index stays O(1) and `NodeRef`s into the
//! heap stay stable, which a pointer-based pool gets for free but an
//! index-based one must provide itself.

use crate::node::Node;
use crate::node_ref::NodeRef;

/// A span of never-allocated slab cells, `{start, len}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeRegion {
    pub start: usize,
    pub len: usize,
}

/// Owner of every node cell in a document.
#[derive(Debug, Default)]
pub struct NodeArena {
    slab: Vec<Node>,
    regions: Vec<FreeRegion>,
    free_head: Option<NodeRef>,
    heap: Vec<Node>,
    heap_free: Vec<u32>,
}

impl NodeArena {
    /// An arena whose slab holds `cells` default-initialized cells and no
    /// free regions yet.
    pub fn with_capacity(cells: usize) -> Self {
        Self {
            slab: vec![Node::default(); cells],
            ..Self::default()
        }
    }

    pub fn node(&self, r: NodeRef) -> &Node {
        if r.is_heap() {
            &self.heap[r.index()]
        } else {
            &self.slab[r.index()]
        }
    }

    pub fn node_mut(&mut self, r: NodeRef) -> &mut Node {
        if r.is_heap() {
            &mut self.heap[r.index()]
        } else {
            &mut self.slab[r.index()]
        }
    }

    /// Allocate one cell; the cell comes back initialized with kind
    /// `Sentinel` and no payload.
    pub fn alloc(&mut self) -> NodeRef {
        if let Some(r) = self.free_head {
            self.free_head = self.slab[r.index()].next_free.take();
            self.slab[r.index()] = Node::default();
            return r;
        }
        for region in &mut self.regions {
            if region.len > 0 {
                let idx = region.start;
                region.start += 1;
                region.len -= 1;
                self.slab[idx] = Node::default();
                return NodeRef::slab(idx);
            }
        }
        if let Some(idx) = self.heap_free.pop() {
            self.heap[idx as usize] = Node::default();
            return NodeRef::heap(idx as usize);
        }
        self.heap.push(Node::default());
        NodeRef::heap(self.heap.len() - 1)
    }

    /// Return one cell to the pool. The cell's value and child list are
    /// dropped; references held elsewhere to `r` become dangling and must
    /// not be used again.
    pub fn free(&mut self, r: NodeRef) {
        if r.is_heap() {
            self.heap[r.index()] = Node::default();
            self.heap_free.push(r.index() as u32);
        } else {
            self.slab[r.index()] = Node {
                next_free: self.free_head,
                ..Node::default()
            };
            self.free_head = Some(r);
        }
    }

    /// Free `r` and every node reachable below it.
    pub fn free_subtree(&mut self, r: NodeRef) {
        let children = std::mem::take(&mut self.node_mut(r).children);
        for c in children {
            self.free_subtree(c);
        }
        self.free(r);
    }

    /// Publish `[start, start + len)` as a free region.
    pub fn add_block(&mut self, start: usize, len: usize) {
        if len > 0 {
            self.regions.push(FreeRegion { start, len });
        }
    }

    /// Release every live node and the backing slab.
    pub fn clear(&mut self) {
        self.slab.clear();
        self.slab.shrink_to_fit();
        self.regions.clear();
        self.free_head = None;
        self.heap.clear();
        self.heap_free.clear();
    }

    pub fn free_regions(&self) -> &[FreeRegion] {
        &self.regions
    }

    /// Total cells still available across the free regions.
    pub fn free_region_cells(&self) -> usize {
        self.regions.iter().map(|b| b.len).sum()
    }

    /// Length of the free-list, by walking it.
    pub fn free_list_len(&self) -> usize {
        let mut n = 0;
        let mut cur = self.free_head;
        while let Some(r) = cur {
            n += 1;
            cur = self.slab[r.index()].next_free;
        }
        n
    }

    pub fn slab_len(&self) -> usize {
        self.slab.len()
    }

    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    pub fn heap_free_len(&self) -> usize {
        self.heap_free.len()
    }

    /// Attach `child` at the end of `parent`'s child list and point its
    /// back-reference at `parent`.
    pub(crate) fn link(&mut self, parent: NodeRef, child: NodeRef) {
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    /// The raw slab, for pre-slicing ahead of a parallel build.
    pub(crate) fn slab_mut(&mut self) -> &mut [Node] {
        &mut self.slab
    }
}
