//! Insertion: binary search descent followed by red-black fixup.

use core::cmp::Ordering;

use allocator_api2::alloc::Allocator;

use crate::node::{Color, NodeRef};
use crate::rotate::Side;
use crate::{Comparator, Error, RBTree};

impl<K, V, C: Comparator<K>, A: Allocator> RBTree<K, V, C, A> {
    /// Inserts a key-value pair into the map.
    ///
    /// Returns `true` if the pair was inserted. If the map already contains an
    /// equal key, the map is left untouched, the new pair is dropped and
    /// `false` is returned.
    ///
    /// # Panics
    ///
    /// Panics if the node pool cannot grow. Use [`RBTree::try_insert`] to
    /// handle that case.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> bool {
        match self.try_insert(key, value) {
            Ok(inserted) => inserted,
            Err(err) => panic!("failed to insert into RBTree: {err}"),
        }
    }

    /// Inserts `key` with a default value.
    ///
    /// Returns `false` and leaves the map untouched if the key is already
    /// present.
    #[inline]
    pub fn insert_default(&mut self, key: K) -> bool
    where
        V: Default,
    {
        self.insert(key, V::default())
    }

    /// Inserts a key-value pair into the map, reporting allocation failure
    /// instead of panicking.
    ///
    /// Returns `Ok(false)` if an equal key is already present, in which case
    /// the map is unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<bool, Error> {
        // Find the attachment point before allocating so that rejected
        // duplicates never touch the pool.
        let mut parent = None;
        let mut side = Side::Left;
        let mut tree = self.root;
        while let Some(curr) = tree {
            let node = self.pool.get(curr);
            side = match self.comparator.compare(&key, &node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    log::debug!("insert rejected: key already present (len = {})", self.len);
                    return Ok(false);
                }
            };
            parent = Some(curr);
            tree = self.pool.child(curr, side);
        }

        let node = self.pool.try_alloc(key, value).map_err(|(err, _key, _value)| err)?;
        self.pool.links_mut(node).parent = parent;
        match parent {
            Some(parent) => self.pool.set_child(parent, side, Some(node)),
            None => self.root = Some(node),
        }

        self.balance_after_insert(node);
        self.len += 1;
        self.refresh_extremes();
        self.debug_check();
        Ok(true)
    }

    /// Restores the red-black invariants after attaching the red node `node`.
    fn balance_after_insert(&mut self, mut node: NodeRef) {
        loop {
            let Some(parent) = self.pool.parent(node) else {
                // The violation was pushed all the way up: recolor the root.
                self.pool.set_color(node, Color::Black);
                return;
            };
            if self.pool.color(parent) == Color::Black {
                return;
            }

            // The parent is red so it can't be the root, which is black.
            let Some(grandparent) = self.pool.parent(parent) else {
                unreachable!("red node {parent:?} at the root");
            };
            let parent_side = self.pool.side_of(parent, grandparent);
            let uncle = self.pool.child(grandparent, parent_side.opposite());

            if self.pool.is_red(uncle) {
                // Red uncle: push the blackness down from the grandparent and
                // continue from there.
                self.pool.set_color(parent, Color::Black);
                if let Some(uncle) = uncle {
                    self.pool.set_color(uncle, Color::Black);
                }
                self.pool.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            // Black uncle: a single rotation fixes the outer cases (left-left,
            // right-right). The inner cases (left-right, right-left) are first
            // turned into an outer case by rotating at the parent.
            let mut top = parent;
            if self.pool.side_of(node, parent) != parent_side {
                top = self.rotate(parent, parent_side);
            }
            self.rotate(grandparent, parent_side.opposite());
            self.pool.set_color(top, Color::Black);
            self.pool.set_color(grandparent, Color::Red);
            return;
        }
    }
}
