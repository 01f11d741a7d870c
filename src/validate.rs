//! Full structural check of a tree, used by tests and the fuzzer.

use core::cmp::Ordering;

use allocator_api2::alloc::Allocator;

use crate::node::{Color, NodeRef};
use crate::rotate::Side;
use crate::{Comparator, RBTree};

impl<K, V, C: Comparator<K>, A: Allocator> RBTree<K, V, C, A> {
    /// Asserts that the tree satisfies all of its structural invariants:
    ///
    /// - keys are strictly increasing in order under the comparator,
    /// - the root is black,
    /// - no red node has a red child,
    /// - every path from a node down to an empty child position passes
    ///   through the same number of black nodes,
    /// - parent and child links agree,
    /// - the cached first and last nodes and the length are accurate.
    ///
    /// This walks the whole tree and is meant for tests and debugging.
    ///
    /// # Panics
    ///
    /// Panics if any invariant is violated.
    #[track_caller]
    pub fn assert_valid(&self) {
        let Some(root) = self.root else {
            assert_eq!(self.len, 0, "empty tree with non-zero length");
            assert_eq!(self.first, None, "empty tree with a first node");
            assert_eq!(self.last, None, "empty tree with a last node");
            return;
        };

        let root_links = self.pool.links(root);
        assert_eq!(root_links.parent, None, "root {root:?} has a parent");
        assert_eq!(root_links.color, Color::Black, "root {root:?} is red");

        let mut count = 0;
        self.assert_valid_inner(root, &mut count);
        assert_eq!(count, self.len, "length doesn't match the number of nodes");

        assert_eq!(self.first, Some(self.pool.find_minimum(root)), "stale first node");
        assert_eq!(self.last, Some(self.pool.find_maximum(root)), "stale last node");

        // Ordering: the in-order sequence must be strictly increasing, which
        // also rules out duplicate keys.
        let mut prev: Option<NodeRef> = None;
        let mut curr = self.first;
        let mut seen = 0;
        while let Some(node) = curr {
            if let Some(prev) = prev {
                let order = self
                    .comparator
                    .compare(&self.pool.get(prev).key, &self.pool.get(node).key);
                assert_eq!(
                    order,
                    Ordering::Less,
                    "ordering violation between {prev:?} and {node:?}"
                );
            }
            seen += 1;
            prev = Some(node);
            curr = self.pool.successor(node);
        }
        assert_eq!(seen, self.len, "in-order walk doesn't visit every node");
        assert_eq!(prev, self.last, "in-order walk doesn't end at the last node");
    }

    /// Checks the sub-tree rooted at `node` and returns its black height,
    /// counting the empty child positions as one black level.
    #[track_caller]
    fn assert_valid_inner(&self, node: NodeRef, count: &mut usize) -> usize {
        *count += 1;
        assert!(*count <= self.len, "cycle or unaccounted node at {node:?}");

        let color = self.pool.color(node);
        let mut heights = [1; 2];
        for (height, side) in heights.iter_mut().zip([Side::Left, Side::Right]) {
            let Some(child) = self.pool.child(node, side) else {
                continue;
            };
            assert_ne!(child, node, "{node:?} is its own {side} child");
            assert_eq!(
                self.pool.parent(child),
                Some(node),
                "{side} child {child:?} of {node:?} has the wrong parent"
            );
            if color == Color::Red {
                assert_eq!(
                    self.pool.color(child),
                    Color::Black,
                    "red node {node:?} has a red {side} child"
                );
            }
            *height = self.assert_valid_inner(child, count);
        }

        assert_eq!(
            heights[0], heights[1],
            "black height mismatch below {node:?}"
        );
        heights[0] + usize::from(color == Color::Black)
    }
}
