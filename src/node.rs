//! Node storage for the tree.
//!
//! Nodes are kept in a slot arena and addressed by index instead of by
//! pointer. Each slot carries a generation counter which is bumped whenever
//! the slot's contents stop being the element a cursor was created for, which
//! is what allows cursors to be checked for staleness.

use core::fmt;

use allocator_api2::alloc::Allocator;
use allocator_api2::vec::Vec;
use nonmax::NonMaxU32;

use crate::Error;

/// Index of a node in a [`NodePool`].
///
/// The maximum `u32` is reserved so that `Option<NodeRef>` is the same size as
/// a `u32`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeRef(NonMaxU32);

impl NodeRef {
    #[inline]
    fn new(index: usize) -> Option<Self> {
        let index = u32::try_from(index).ok()?;
        NonMaxU32::new(index).map(Self)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0.get() as usize
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node reference paired with the generation of its slot at the time the
/// reference was taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeHandle {
    pub(crate) node: NodeRef,
    pub(crate) generation: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Structural links of a node.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Links {
    pub(crate) parent: Option<NodeRef>,
    pub(crate) left: Option<NodeRef>,
    pub(crate) right: Option<NodeRef>,
    pub(crate) color: Color,
}

impl Links {
    /// Links for a freshly inserted node: red, detached.
    #[inline]
    fn new_red() -> Self {
        Self {
            parent: None,
            left: None,
            right: None,
            color: Color::Red,
        }
    }
}

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) links: Links,
}

enum SlotState<K, V> {
    Occupied(Node<K, V>),
    /// Holds the next entry of the free list.
    Vacant(Option<NodeRef>),
}

struct Slot<K, V> {
    generation: u32,
    state: SlotState<K, V>,
}

/// Arena holding every node of a tree.
///
/// Freed slots are threaded onto a free list and reused by later
/// allocations. Memory is only returned to the allocator when the pool is
/// dropped.
pub(crate) struct NodePool<K, V, A: Allocator> {
    slots: Vec<Slot<K, V>, A>,
    free_head: Option<NodeRef>,
}

impl<K: Clone, V: Clone> Clone for Node<K, V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            links: self.links,
        }
    }
}

impl<K: Clone, V: Clone> Clone for SlotState<K, V> {
    fn clone(&self) -> Self {
        match self {
            SlotState::Occupied(node) => SlotState::Occupied(node.clone()),
            SlotState::Vacant(next) => SlotState::Vacant(*next),
        }
    }
}

impl<K: Clone, V: Clone, A: Allocator + Clone> Clone for NodePool<K, V, A> {
    /// Copies every slot, including free ones, so node references and
    /// generations carry over to the clone unchanged.
    fn clone(&self) -> Self {
        let mut slots = Vec::with_capacity_in(self.slots.len(), self.allocator().clone());
        slots.extend(self.slots.iter().map(|slot| Slot {
            generation: slot.generation,
            state: slot.state.clone(),
        }));
        Self {
            slots,
            free_head: self.free_head,
        }
    }
}

impl<K, V, A: Allocator> NodePool<K, V, A> {
    #[inline]
    pub(crate) fn new_in(alloc: A) -> Self {
        Self {
            slots: Vec::new_in(alloc),
            free_head: None,
        }
    }

    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        self.slots.allocator()
    }

    /// Allocates a new red, unlinked node holding `key` and `value`.
    ///
    /// On failure the key and value are handed back to the caller along with
    /// the error.
    pub(crate) fn try_alloc(&mut self, key: K, value: V) -> Result<NodeRef, (Error, K, V)> {
        let node = Node {
            key,
            value,
            links: Links::new_red(),
        };

        if let Some(free) = self.free_head {
            let slot = &mut self.slots[free.index()];
            let SlotState::Vacant(next) = slot.state else {
                unreachable!("free list entry {free:?} is occupied");
            };
            self.free_head = next;
            slot.state = SlotState::Occupied(node);
            return Ok(free);
        }

        let Some(node_ref) = NodeRef::new(self.slots.len()) else {
            return Err((Error::CapacityOverflow, node.key, node.value));
        };
        if self.slots.len() == self.slots.capacity() {
            if self.slots.try_reserve(1).is_err() {
                return Err((Error::AllocError, node.key, node.value));
            }
            log::trace!("node pool grew to {} slots", self.slots.capacity());
        }
        self.slots.push(Slot {
            generation: 0,
            state: SlotState::Occupied(node),
        });
        Ok(node_ref)
    }

    /// Releases a node and returns its contents.
    ///
    /// The slot's generation is bumped so that outstanding handles to it are
    /// detected as stale.
    pub(crate) fn free(&mut self, node: NodeRef) -> Node<K, V> {
        let slot = &mut self.slots[node.index()];
        let state = core::mem::replace(&mut slot.state, SlotState::Vacant(self.free_head));
        let SlotState::Occupied(contents) = state else {
            unreachable!("double free of node {node:?}");
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free_head = Some(node);
        contents
    }

    /// Invalidates outstanding handles to `node` without freeing it.
    ///
    /// Used when a node keeps its position in the tree but takes over the
    /// contents of another node.
    #[inline]
    pub(crate) fn retag(&mut self, node: NodeRef) {
        let slot = &mut self.slots[node.index()];
        slot.generation = slot.generation.wrapping_add(1);
    }

    #[inline]
    pub(crate) fn handle(&self, node: NodeRef) -> NodeHandle {
        NodeHandle {
            node,
            generation: self.slots[node.index()].generation,
        }
    }

    /// Checks that `handle` still refers to a live node with the same
    /// contents it was taken for.
    #[inline]
    pub(crate) fn resolve(&self, handle: NodeHandle) -> Option<NodeRef> {
        let slot = self.slots.get(handle.node.index())?;
        match slot.state {
            SlotState::Occupied(_) if slot.generation == handle.generation => Some(handle.node),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn get(&self, node: NodeRef) -> &Node<K, V> {
        match &self.slots[node.index()].state {
            SlotState::Occupied(contents) => contents,
            SlotState::Vacant(_) => unreachable!("dangling reference to node {node:?}"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, node: NodeRef) -> &mut Node<K, V> {
        match &mut self.slots[node.index()].state {
            SlotState::Occupied(contents) => contents,
            SlotState::Vacant(_) => unreachable!("dangling reference to node {node:?}"),
        }
    }

    /// Returns mutable references to two distinct nodes.
    pub(crate) fn get_pair_mut(
        &mut self,
        a: NodeRef,
        b: NodeRef,
    ) -> (&mut Node<K, V>, &mut Node<K, V>) {
        assert_ne!(a, b, "get_pair_mut called with the same node twice");
        let (low, high, swapped) = if a.index() < b.index() {
            (a, b, false)
        } else {
            (b, a, true)
        };
        let (head, tail) = self.slots.split_at_mut(high.index());
        let first = match &mut head[low.index()].state {
            SlotState::Occupied(contents) => contents,
            SlotState::Vacant(_) => unreachable!("dangling reference to node {low:?}"),
        };
        let second = match &mut tail[0].state {
            SlotState::Occupied(contents) => contents,
            SlotState::Vacant(_) => unreachable!("dangling reference to node {high:?}"),
        };
        if swapped {
            (second, first)
        } else {
            (first, second)
        }
    }

    #[inline]
    pub(crate) fn links(&self, node: NodeRef) -> &Links {
        &self.get(node).links
    }

    #[inline]
    pub(crate) fn links_mut(&mut self, node: NodeRef) -> &mut Links {
        &mut self.get_mut(node).links
    }

    #[inline]
    pub(crate) fn color(&self, node: NodeRef) -> Color {
        self.links(node).color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, node: NodeRef, color: Color) {
        self.links_mut(node).color = color;
    }

    /// Returns `true` if `node` is present and red. Absent children count as
    /// black leaves.
    #[inline]
    pub(crate) fn is_red(&self, node: Option<NodeRef>) -> bool {
        node.is_some_and(|node| self.color(node) == Color::Red)
    }

    /// Number of slots ever allocated, live or free.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
