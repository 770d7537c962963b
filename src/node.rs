//! Document tree nodes and their kinds.
//!
//! This module defines:
//! - [`NodeKind`]: the seven node roles a cell can take. `Object`/`Array` are
//!   real containers, `Item` is a scalar leaf, `Root` is the document anchor,
//!   and the `Virtual*` variants stand in for a container whose opening
//!   marker fell into an earlier tape partition. `Sentinel` is the kind of a
//!   freshly allocated cell and of the synthetic per-worker parse roots.
//! - [`Node`]: one arena cell — a kind, one tagged [`Value`], the ordered
//!   child list, and a non-owning parent back-reference.
//!
//! # Notes
//! * Children are owned by their parent's child vector; `parent` is only a
//!   back-reference and never outlives the referent.
//! * Virtual nodes exist only between a partial build and the merge that
//!   erases them; a finished document contains none.
//! * A keyed container (an object or array sitting behind an object key)
//!   carries that key in its own `value` with `is_key` set, occupying a
//!   single child slot of its parent.

use crate::node_ref::NodeRef;
use crate::value::Value;

/// The role a node plays in the document tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Object,
    Array,
    /// Close-without-open placeholder for an object, erased during merge.
    VirtualObject,
    /// Close-without-open placeholder for an array, erased during merge.
    VirtualArray,
    /// Scalar leaf (a key or a plain value).
    Item,
    /// Document anchor; holds at most one child.
    Root,
    /// Freshly allocated cell, also the synthetic root of a partial build.
    #[default]
    Sentinel,
}

impl NodeKind {
    pub fn is_object_like(self) -> bool {
        matches!(self, NodeKind::Object | NodeKind::VirtualObject)
    }

    /// Roots and sentinels accept unkeyed children, like arrays do.
    pub fn is_array_like(self) -> bool {
        matches!(
            self,
            NodeKind::Array | NodeKind::VirtualArray | NodeKind::Root | NodeKind::Sentinel
        )
    }

    pub fn is_container(self) -> bool {
        self != NodeKind::Item
    }

    pub fn is_item(self) -> bool {
        self == NodeKind::Item
    }

    pub fn is_virtual(self) -> bool {
        matches!(self, NodeKind::VirtualObject | NodeKind::VirtualArray)
    }

    pub fn is_root(self) -> bool {
        self == NodeKind::Root
    }
}

/// One cell of the document tree.
#[derive(Clone, Debug, Default)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) value: Value,
    pub(crate) children: Vec<NodeRef>,
    pub(crate) parent: Option<NodeRef>,
    /// Successor link while the cell sits on the arena free-list.
    pub(crate) next_free: Option<NodeRef>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
