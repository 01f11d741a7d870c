//! Link manipulation and rotation primitives shared by insertion and removal.

use core::fmt;

use allocator_api2::alloc::Allocator;

use crate::RBTree;
use crate::node::{NodePool, NodeRef};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

impl Side {
    #[inline]
    pub(crate) fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl<K, V, A: Allocator> NodePool<K, V, A> {
    #[inline]
    pub(crate) fn child(&self, node: NodeRef, side: Side) -> Option<NodeRef> {
        let links = self.links(node);
        match side {
            Side::Left => links.left,
            Side::Right => links.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, node: NodeRef, side: Side, child: Option<NodeRef>) {
        let links = self.links_mut(node);
        match side {
            Side::Left => links.left = child,
            Side::Right => links.right = child,
        }
    }

    #[inline]
    pub(crate) fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        self.links(node).parent
    }

    /// Returns which child of `parent` the node `node` is.
    #[inline]
    pub(crate) fn side_of(&self, node: NodeRef, parent: NodeRef) -> Side {
        if self.links(parent).left == Some(node) {
            Side::Left
        } else {
            debug_assert_eq!(
                self.links(parent).right,
                Some(node),
                "{node:?} is not a child of {parent:?}"
            );
            Side::Right
        }
    }

    /// Returns the left-most node of the sub-tree rooted at `node`.
    #[inline]
    pub(crate) fn find_minimum(&self, mut node: NodeRef) -> NodeRef {
        while let Some(left) = self.links(node).left {
            node = left;
        }
        node
    }

    /// Returns the right-most node of the sub-tree rooted at `node`.
    #[inline]
    pub(crate) fn find_maximum(&self, mut node: NodeRef) -> NodeRef {
        while let Some(right) = self.links(node).right {
            node = right;
        }
        node
    }
}

impl<K, V, C, A: Allocator> RBTree<K, V, C, A> {
    /// Makes `new` take the place of `old` under `parent`, or at the root if
    /// `parent` is `None`. `new`'s own parent link is not touched.
    #[inline]
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<NodeRef>,
        old: NodeRef,
        new: Option<NodeRef>,
    ) {
        match parent {
            Some(parent) => {
                let side = self.pool.side_of(old, parent);
                self.pool.set_child(parent, side, new);
            }
            None => self.root = new,
        }
    }

    /// Rotates the sub-tree rooted at `node` so that `node` moves down to its
    /// `side`, and returns the new sub-tree root.
    ///
    /// The child on the opposite side takes `node`'s place; its inner subtree
    /// is reattached to `node`. All three affected parent links and the root
    /// reference are updated.
    pub(crate) fn rotate(&mut self, node: NodeRef, side: Side) -> NodeRef {
        let Some(pivot) = self.pool.child(node, side.opposite()) else {
            unreachable!("rotating {node:?} to the {side} without a {} child", side.opposite());
        };
        let parent = self.pool.parent(node);

        // Move the pivot's inner subtree over to `node`.
        let inner = self.pool.child(pivot, side);
        self.pool.set_child(node, side.opposite(), inner);
        if let Some(inner) = inner {
            self.pool.links_mut(inner).parent = Some(node);
        }

        // Put the pivot where `node` used to be.
        self.replace_child(parent, node, Some(pivot));
        self.pool.links_mut(pivot).parent = parent;

        // Hang `node` below the pivot.
        self.pool.set_child(pivot, side, Some(node));
        self.pool.links_mut(node).parent = Some(pivot);

        pivot
    }

    #[cfg(test)]
    pub(crate) fn rotate_left(&mut self, node: NodeRef) -> NodeRef {
        self.rotate(node, Side::Left)
    }

    #[cfg(test)]
    pub(crate) fn rotate_right(&mut self, node: NodeRef) -> NodeRef {
        self.rotate(node, Side::Right)
    }
}
