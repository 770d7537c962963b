//! Document tree operations.
//!
//! These are the user-facing mutations and queries over a parsed (or empty)
//! document: appending scalar elements, growing new containers, key lookup,
//! child removal, deep cloning, and a structural self-check. They all
//! operate on a [`NodeArena`] plus a [`NodeRef`], so post-parse edits draw
//! cells from the regions the parallel build left free.
//!
//! Kind rules: an object takes its elements as (key Item, value Item)
//! pairs; an array forbids keys; the root accepts at most one child. A
//! mutation that contradicts the container kind fails with
//! [`ParseError::StructuralInvalidBoundary`].

use crate::arena::NodeArena;
use crate::error::ParseError;
use crate::node::{Node, NodeKind};
use crate::node_ref::NodeRef;
use crate::value::{Scalar, Value};

impl NodeArena {
    /// Append one `name: value` element to an object.
    pub fn add_object_element(
        &mut self,
        target: NodeRef,
        name: &str,
        value: Scalar,
    ) -> Result<(), ParseError> {
        self.check_keyed_insert(target)?;
        let key = self.alloc();
        {
            let n = self.node_mut(key);
            n.kind = NodeKind::Item;
            n.value = Value::key(name);
        }
        let item = self.alloc();
        {
            let n = self.node_mut(item);
            n.kind = NodeKind::Item;
            n.value = Value::new(value);
        }
        self.link(target, key);
        self.link(target, item);
        Ok(())
    }

    /// Append one unkeyed element to an array.
    pub fn add_array_element(&mut self, target: NodeRef, value: Scalar) -> Result<(), ParseError> {
        self.check_unkeyed_insert(target)?;
        let item = self.alloc();
        {
            let n = self.node_mut(item);
            n.kind = NodeKind::Item;
            n.value = Value::new(value);
        }
        self.link(target, item);
        Ok(())
    }

    /// Grow a new object or array under `target` and return it.
    ///
    /// `kind` must be [`NodeKind::Object`] or [`NodeKind::Array`]. An
    /// object-like target demands a key; an array-like target forbids one.
    pub fn add_container(
        &mut self,
        target: NodeRef,
        kind: NodeKind,
        key: Option<&str>,
    ) -> Result<NodeRef, ParseError> {
        if !matches!(kind, NodeKind::Object | NodeKind::Array) {
            return Err(ParseError::structural("add_container takes Object or Array"));
        }
        let target_kind = self.node(target).kind;
        if !target_kind.is_container() {
            return Err(ParseError::structural("cannot add children to an item"));
        }
        if target_kind.is_object_like() && key.is_none() {
            return Err(ParseError::structural("object children need a key"));
        }
        if target_kind.is_array_like() && key.is_some() {
            return Err(ParseError::structural("array children cannot carry a key"));
        }
        if target_kind == NodeKind::Root && self.node(target).child_count() >= 1 {
            return Err(ParseError::structural("root already holds its single child"));
        }
        let child = self.alloc();
        {
            let n = self.node_mut(child);
            n.kind = kind;
            if let Some(name) = key {
                n.value = Value::key(name);
            }
        }
        self.link(target, child);
        Ok(child)
    }

    /// Linear scan for a child whose key bytes equal `name`.
    ///
    /// Returns the matching key node: the key Item of a scalar pair, or the
    /// keyed container itself.
    pub fn find(&self, target: NodeRef, name: &str) -> Option<NodeRef> {
        self.node(target)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).value.is_key_named(name))
    }

    /// Pre-size `target`'s child list for `n` elements (`2n` slots when the
    /// container is object-like).
    pub fn reserve(&mut self, target: NodeRef, n: usize) {
        let slots = if self.node(target).kind.is_object_like() {
            2 * n
        } else {
            n
        };
        self.node_mut(target).children.reserve(slots);
    }

    /// Free the child at `idx` (and everything below it) and erase the slot.
    pub fn remove_at(&mut self, target: NodeRef, idx: usize) {
        let child = self.node_mut(target).children.remove(idx);
        self.free_subtree(child);
    }

    /// Deep-copy the subtree at `r`. The copy is detached: its parent is
    /// `None` until the caller links it somewhere.
    pub fn clone_subtree(&mut self, r: NodeRef) -> NodeRef {
        let template = Node {
            kind: self.node(r).kind,
            value: self.node(r).value.clone(),
            ..Node::default()
        };
        let copy = self.alloc();
        *self.node_mut(copy) = template;
        let children = self.node(r).children.clone();
        for c in children {
            let child_copy = self.clone_subtree(c);
            self.link(copy, child_copy);
        }
        self.node_mut(copy).parent = None;
        copy
    }

    /// Walk the subtree and verify the container invariants: within an
    /// object, every key Item is followed by its value and every unkeyed
    /// child directly follows a key Item; within an array, no child
    /// carries a key.
    pub fn structural_check(&self, r: NodeRef) -> Result<(), ParseError> {
        let node = self.node(r);
        if node.kind.is_object_like() {
            for (i, &c) in node.children.iter().enumerate() {
                let child = self.node(c);
                if child.value.is_key {
                    if child.kind.is_item() && !self.value_follows(node, i) {
                        return Err(ParseError::structural("key item without a value sibling"));
                    }
                } else if !self.preceded_by_key_item(node, i) {
                    return Err(ParseError::structural(
                        "value without a preceding key in an object",
                    ));
                }
            }
        } else if node.kind.is_array_like() {
            for &c in &node.children {
                if self.node(c).value.is_key {
                    return Err(ParseError::structural("key at an array position"));
                }
            }
        }
        for &c in &node.children {
            if self.node(c).kind.is_container() {
                self.structural_check(c)?;
            }
        }
        Ok(())
    }

    fn value_follows(&self, node: &Node, i: usize) -> bool {
        node.children
            .get(i + 1)
            .is_some_and(|&v| !self.node(v).value.is_key)
    }

    fn preceded_by_key_item(&self, node: &Node, i: usize) -> bool {
        i > 0
            && node.children.get(i - 1).is_some_and(|&k| {
                let prev = self.node(k);
                prev.value.is_key && prev.kind.is_item()
            })
    }

    fn check_keyed_insert(&self, target: NodeRef) -> Result<(), ParseError> {
        let kind = self.node(target).kind;
        if kind.is_item() {
            return Err(ParseError::structural("cannot add children to an item"));
        }
        if matches!(kind, NodeKind::Array | NodeKind::VirtualArray) {
            return Err(ParseError::structural("keyed element added to an array"));
        }
        if kind == NodeKind::Root && self.node(target).child_count() >= 1 {
            return Err(ParseError::structural("root already holds its single child"));
        }
        Ok(())
    }

    fn check_unkeyed_insert(&self, target: NodeRef) -> Result<(), ParseError> {
        let kind = self.node(target).kind;
        if kind.is_item() {
            return Err(ParseError::structural("cannot add children to an item"));
        }
        if kind.is_object_like() {
            return Err(ParseError::structural("unkeyed element added to an object"));
        }
        if kind == NodeKind::Root && self.node(target).child_count() >= 1 {
            return Err(ParseError::structural("root already holds its single child"));
        }
        Ok(())
    }
}
