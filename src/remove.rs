//! Removal: splicing a node out of the tree and resolving the black-height
//! deficit this may leave behind.

use allocator_api2::alloc::Allocator;

use crate::node::{Color, Node, NodeRef};
use crate::rotate::Side;
use crate::{Comparator, Cursor, Error, RBTree};

impl<K, V, C, A: Allocator> RBTree<K, V, C, A> {
    /// Removes the element at `cursor` from the map and runs the destructor
    /// hook on it.
    ///
    /// Returns a cursor to the element that followed the erased one, or the
    /// end cursor if it was the last element.
    ///
    /// All cursors to the erased element become stale. When the erased
    /// element had two children, its neighbour in key order takes over its
    /// node, so cursors to that neighbour become stale as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndCursor`] if `cursor` is at the end of the tree and
    /// [`Error::StaleCursor`] if its element is no longer in the tree.
    pub fn erase(&mut self, cursor: Cursor) -> Result<Cursor, Error> {
        let node = self.resolve(&cursor)?;
        let next = self.pool.successor(node);
        let node = self.unlink(node);
        self.destroy(node);
        // The successor never takes over the erased node's slot, so taking its
        // handle after the removal is fine.
        Ok(self.cursor_at(next, Side::Right))
    }

    /// Removes the first element from the map and returns it.
    ///
    /// Ownership passes to the caller, so the destructor hook is not run.
    #[inline]
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let node = self.unlink(self.first?);
        Some((node.key, node.value))
    }

    /// Removes the last element from the map and returns it.
    ///
    /// Ownership passes to the caller, so the destructor hook is not run.
    #[inline]
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let node = self.unlink(self.last?);
        Some((node.key, node.value))
    }

    /// Clears the map, removing all elements.
    ///
    /// The destructor hook runs once for every element. No rebalancing is
    /// done since the whole structure is discarded; the pool keeps its memory
    /// for reuse.
    pub fn clear(&mut self) {
        let count = self.len;

        // Post-order walk using the parent links: descend to a leaf, detach
        // and release it, then continue from its parent.
        let mut tree = self.root.take();
        while let Some(curr) = tree {
            let links = *self.pool.links(curr);
            if let Some(child) = links.left.or(links.right) {
                tree = Some(child);
                continue;
            }
            if let Some(parent) = links.parent {
                let side = self.pool.side_of(curr, parent);
                self.pool.set_child(parent, side, None);
            }
            let node = self.pool.free(curr);
            self.destroy(node);
            tree = links.parent;
        }

        self.len = 0;
        self.refresh_extremes();
        self.debug_check();
        log::trace!("cleared {count} nodes");
    }

    /// Unlinks `node` from the tree and returns the contents of the logical
    /// element that was removed.
    ///
    /// If `node` has two children, the node physically spliced out is the
    /// maximum of its left subtree. That node's element is moved into `node`'s
    /// slot, and the element of `node` is returned.
    pub(crate) fn unlink(&mut self, node: NodeRef) -> Node<K, V> {
        let links = *self.pool.links(node);

        // `y` is the node that is physically removed from its position.
        let y = match (links.left, links.right) {
            (Some(left), Some(_)) => self.pool.find_maximum(left),
            _ => node,
        };
        let y_links = *self.pool.links(y);
        let x = y_links.left.or(y_links.right);
        let parent = y_links.parent;
        let side = parent.map(|parent| self.pool.side_of(y, parent));

        // Splice `y` out by attaching its only child in its place.
        self.replace_child(parent, y, x);
        if let Some(x) = x {
            self.pool.links_mut(x).parent = parent;
        }

        if y != node {
            // `node` keeps its position and takes over the element of `y`. The
            // element that was logically removed ends up in `y`'s slot.
            let (target, replacement) = self.pool.get_pair_mut(node, y);
            core::mem::swap(&mut target.key, &mut replacement.key);
            core::mem::swap(&mut target.value, &mut replacement.value);
            self.pool.retag(node);
        }

        // Removing a black node leaves a black-height deficit at the position
        // it was removed from.
        if y_links.color == Color::Black {
            match (parent, side) {
                (Some(parent), Some(side)) => self.balance_after_remove(x, parent, side),
                _ => {
                    if let Some(x) = x {
                        self.pool.set_color(x, Color::Black);
                    }
                }
            }
        }

        let removed = self.pool.free(y);
        self.len -= 1;
        self.refresh_extremes();
        self.debug_check();
        removed
    }

    /// Resolves a black-height deficit ("double black") at the position
    /// `side` of `parent`, currently occupied by `x` (possibly empty).
    fn balance_after_remove(
        &mut self,
        mut x: Option<NodeRef>,
        mut parent: NodeRef,
        mut side: Side,
    ) {
        loop {
            // A red node at the deficit position absorbs it by turning black.
            if self.pool.is_red(x) {
                break;
            }

            // The other side of `parent` owes one more black node than the
            // deficit position, so it can't be empty.
            let mut sibling = self.sibling(parent, side);

            if self.pool.color(sibling) == Color::Red {
                self.pool.set_color(sibling, Color::Black);
                self.pool.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.sibling(parent, side);
            }

            let near = self.pool.child(sibling, side);
            let far = self.pool.child(sibling, side.opposite());

            if !self.pool.is_red(near) && !self.pool.is_red(far) {
                // Move the deficit one level up.
                self.pool.set_color(sibling, Color::Red);
                x = Some(parent);
                match self.pool.parent(parent) {
                    Some(grandparent) => {
                        side = self.pool.side_of(parent, grandparent);
                        parent = grandparent;
                        continue;
                    }
                    // The deficit reached the root, where it vanishes.
                    None => break,
                }
            }

            if !self.pool.is_red(far) {
                // Only the near child is red: rotate it into the far position.
                if let Some(near) = near {
                    self.pool.set_color(near, Color::Black);
                }
                self.pool.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.sibling(parent, side);
            }

            // The far child is red: one rotation at the parent adds a black
            // node on the deficit side while keeping the other side intact.
            let parent_color = self.pool.color(parent);
            self.pool.set_color(sibling, parent_color);
            self.pool.set_color(parent, Color::Black);
            if let Some(far) = self.pool.child(sibling, side.opposite()) {
                self.pool.set_color(far, Color::Black);
            }
            self.rotate(parent, side);
            x = self.root;
            break;
        }

        if let Some(x) = x {
            self.pool.set_color(x, Color::Black);
        }
    }

    /// Returns the child of `parent` on the opposite `side`.
    #[inline]
    fn sibling(&self, parent: NodeRef, side: Side) -> NodeRef {
        match self.pool.child(parent, side.opposite()) {
            Some(sibling) => sibling,
            None => unreachable!(
                "black-height violation: {parent:?} has no {} child",
                side.opposite()
            ),
        }
    }
}

impl<K, V, C: Comparator<K>, A: Allocator> RBTree<K, V, C, A> {
    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// Ownership of the value passes to the caller, so the destructor hook is
    /// not run. Use [`RBTree::erase`] with [`RBTree::find`] to remove an
    /// element through the hook.
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_key, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    ///
    /// The destructor hook is not run.
    #[inline]
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let node = self.search(key)?;
        let node = self.unlink(node);
        Some((node.key, node.value))
    }
}
