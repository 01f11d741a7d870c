//! This crate provides [`RBTree`], an ordered map based on a red-black tree
//! whose keys are sorted by a caller-supplied [`Comparator`].
//!
//! Besides the usual map operations the tree exposes a cursor protocol in the
//! style of C++ iterators: [`Cursor`]s are small `Copy` positions that do not
//! borrow the tree, so they can be kept across mutations and passed back to
//! [`RBTree::erase`]. Every use of a cursor is checked: once the element it
//! points to has been removed, the cursor reports [`Error::StaleCursor`]
//! instead of reading a reused node.
//!
//! ```
//! use rb_tree::RBTree;
//!
//! let mut tree = RBTree::new();
//! for key in [5, 3, 8, 1, 4] {
//!     assert!(tree.insert(key, key * 10));
//! }
//! // Duplicate keys are rejected and leave the tree untouched.
//! assert!(!tree.insert(3, 0));
//!
//! let mut cursor = tree.find(&4);
//! assert_eq!(tree.value(&cursor), Ok(&40));
//! tree.next(&mut cursor).unwrap();
//! assert_eq!(tree.key(&cursor), Ok(&5));
//!
//! let cursor = tree.erase(cursor).unwrap();
//! assert_eq!(tree.key(&cursor), Ok(&8));
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [1, 3, 4, 8]);
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

use alloc::boxed::Box;
use core::fmt;

use allocator_api2::alloc::{Allocator, Global};
use node::{Node, NodePool, NodeRef};

mod cmp;
mod cursor;
#[cfg(feature = "dot")]
mod dot;
mod error;
mod insert;
mod iter;
mod node;
mod remove;
mod rotate;
mod validate;

pub use cmp::*;
pub use cursor::Cursor;
#[cfg(feature = "dot")]
pub use dot::Dot;
pub use error::Error;
pub use iter::*;

/// Hook invoked on an element right before the tree releases it.
struct Destructor<K, V>(Box<dyn FnMut(&mut K, &mut V) + Send>);

impl<K, V> Destructor<K, V> {
    #[inline]
    fn call(&mut self, key: &mut K, value: &mut V) {
        (self.0)(key, value)
    }
}

// SAFETY: The hook can only be reached through `&mut Destructor`, so sharing
// a `&Destructor` between threads gives no access to it.
unsafe impl<K, V> Sync for Destructor<K, V> {}

/// An ordered map based on a [red-black tree].
///
/// This is similar to the standard library's `BTreeMap` but differs in several
/// ways:
/// - Keys are ordered by a [`Comparator`] chosen at construction instead of
///   requiring `K: Ord`. [`RBTree::new`] uses the [`Ord`] order through
///   [`Natural`].
/// - Inserting a key that is already present is rejected: the existing entry
///   is kept and [`RBTree::insert`] returns `false`.
/// - A destructor hook can be registered with [`RBTree::set_destructor`]. It
///   runs exactly once for every element the tree discards through
///   [`RBTree::erase`], [`RBTree::clear`], [`RBTree::free`] or `Drop`.
/// - [`Cursor`]s allow C++-style bidirectional traversal and erasure by
///   position. They are checked against the tree on every use.
/// - Nodes are stored in an arena allocated with `A`, so a tree with `n`
///   elements performs `O(log n)` allocations rather than `n`.
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RBTree<K, V, C = Natural, A: Allocator = Global> {
    pool: NodePool<K, V, A>,
    root: Option<NodeRef>,
    len: usize,
    /// Left-most node, `None` iff the tree is empty.
    first: Option<NodeRef>,
    /// Right-most node, `None` iff the tree is empty.
    last: Option<NodeRef>,
    comparator: C,
    destructor: Option<Destructor<K, V>>,
}

impl<K, V> RBTree<K, V, Natural, Global> {
    /// Creates a new, empty [`RBTree`] ordered by the keys' [`Ord`]
    /// implementation.
    ///
    /// Does not allocate until the first insertion.
    #[inline]
    pub fn new() -> Self {
        Self::with_comparator_in(Natural, Global)
    }
}

impl<K, V, C> RBTree<K, V, C, Global> {
    /// Creates a new, empty [`RBTree`] ordered by `comparator`.
    #[inline]
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_in(comparator, Global)
    }
}

impl<K, V, A: Allocator> RBTree<K, V, Natural, A> {
    /// Creates a new, empty [`RBTree`] with the given allocator, ordered by
    /// the keys' [`Ord`] implementation.
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        Self::with_comparator_in(Natural, alloc)
    }
}

impl<K, V, C, A: Allocator> RBTree<K, V, C, A> {
    /// Creates a new, empty [`RBTree`] ordered by `comparator` with the given
    /// allocator.
    #[inline]
    pub fn with_comparator_in(comparator: C, alloc: A) -> Self {
        Self {
            pool: NodePool::new_in(alloc),
            root: None,
            len: 0,
            first: None,
            last: None,
            comparator,
            destructor: None,
        }
    }

    /// Returns a reference to the comparator ordering the keys.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Registers a hook which is called with every element the tree discards,
    /// right before the element is dropped.
    ///
    /// The hook runs exactly once per element removed by [`RBTree::erase`],
    /// [`RBTree::clear`], [`RBTree::free`] or when the tree is dropped. It is
    /// not called for elements whose ownership is handed back to the caller
    /// ([`RBTree::remove`], [`RBTree::pop_first`], [`RBTree::pop_last`] and
    /// the owning iterator).
    ///
    /// Registering a new hook replaces the previous one. The hook doesn't need
    /// to be `Sync`: it is only ever called through `&mut self`.
    pub fn set_destructor<F>(&mut self, destructor: F)
    where
        F: FnMut(&mut K, &mut V) + Send + 'static,
    {
        self.destructor = Some(Destructor(Box::new(destructor)));
    }

    /// Removes the destructor hook, if any.
    #[inline]
    pub fn clear_destructor(&mut self) {
        self.destructor = None;
    }

    /// Returns the number of elements in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the first key-value pair in the map.
    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first.map(|node| {
            let node = self.pool.get(node);
            (&node.key, &node.value)
        })
    }

    /// Returns the last key-value pair in the map.
    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last.map(|node| {
            let node = self.pool.get(node);
            (&node.key, &node.value)
        })
    }

    /// Clears the map and releases it.
    ///
    /// This is equivalent to dropping the tree; it exists to make the point
    /// where the destructor hook runs on the remaining elements explicit.
    #[inline]
    pub fn free(mut self) {
        self.clear();
    }

    /// Recomputes the cached left-most and right-most nodes.
    ///
    /// Called at the end of every structural mutation.
    #[inline]
    fn refresh_extremes(&mut self) {
        self.first = self.root.map(|root| self.pool.find_minimum(root));
        self.last = self.root.map(|root| self.pool.find_maximum(root));
    }

    /// Runs the destructor hook on an element that was unlinked from the tree
    /// and drops it.
    #[inline]
    fn destroy(&mut self, node: Node<K, V>) {
        let Node {
            mut key, mut value, ..
        } = node;
        if let Some(destructor) = &mut self.destructor {
            destructor.call(&mut key, &mut value);
        }
    }
}

impl<K, V, C: Comparator<K>, A: Allocator> RBTree<K, V, C, A> {
    /// Returns the node holding `key`, if any.
    #[inline]
    fn search(&self, key: &K) -> Option<NodeRef> {
        let mut tree = self.root;
        while let Some(curr) = tree {
            let node = self.pool.get(curr);
            match self.comparator.compare(key, &node.key) {
                core::cmp::Ordering::Equal => return Some(curr),
                core::cmp::Ordering::Less => tree = node.links.left,
                core::cmp::Ordering::Greater => tree = node.links.right,
            }
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.search(key).map(|node| &self.pool.get(node).value)
    }

    /// Returns the stored key and a reference to the value corresponding to
    /// the key.
    #[inline]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.search(key).map(|node| {
            let node = self.pool.get(node);
            (&node.key, &node.value)
        })
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = self.search(key)?;
        Some(&mut self.pool.get_mut(node).value)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }
}

cfg_if::cfg_if! {
    if #[cfg(debug_assertions)] {
        impl<K, V, C, A: Allocator> RBTree<K, V, C, A> {
            /// Cheap structural checks run after every mutation in debug
            /// builds. [`RBTree::assert_valid`] performs the full check.
            fn debug_check(&self) {
                debug_assert_eq!(self.root.is_none(), self.len == 0);
                debug_assert_eq!(self.first.is_none(), self.len == 0);
                debug_assert_eq!(self.last.is_none(), self.len == 0);
                if let Some(root) = self.root {
                    let links = self.pool.links(root);
                    debug_assert_eq!(links.parent, None, "root has a parent");
                    debug_assert_eq!(links.color, node::Color::Black, "root is red");
                }
                if let Some(first) = self.first {
                    debug_assert_eq!(self.pool.links(first).left, None);
                }
                if let Some(last) = self.last {
                    debug_assert_eq!(self.pool.links(last).right, None);
                }
            }
        }
    } else {
        impl<K, V, C, A: Allocator> RBTree<K, V, C, A> {
            #[inline(always)]
            fn debug_check(&self) {}
        }
    }
}

impl<K, V, C, A: Allocator> Drop for RBTree<K, V, C, A> {
    #[inline]
    fn drop(&mut self) {
        // Run the destructor hook on the remaining elements. The pool releases
        // its memory when it is dropped afterwards.
        self.clear();
    }
}

impl<K, V, C: Default, A: Default + Allocator> Default for RBTree<K, V, C, A> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator_in(C::default(), A::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for RBTree<K, V, C> {
    #[inline]
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tree = RBTree::with_comparator(C::default());
        tree.extend(iter);
        tree
    }
}

impl<K, V, C: Comparator<K>, A: Allocator> Extend<(K, V)> for RBTree<K, V, C, A> {
    /// Inserts every pair of the iterator. Pairs whose key is already present
    /// are discarded.
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        iter.into_iter().for_each(|(k, v)| {
            self.insert(k, v);
        });
    }
}

impl<'a, K: Clone, V: Clone, C: Comparator<K>, A: Allocator> Extend<(&'a K, &'a V)>
    for RBTree<K, V, C, A>
{
    #[inline]
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        iter.into_iter().for_each(|(k, v)| {
            self.insert(k.clone(), v.clone());
        });
    }
}

impl<K: Clone, V: Clone, C: Clone, A: Allocator + Clone> Clone for RBTree<K, V, C, A> {
    /// Clones the map node by node, preserving its exact shape.
    ///
    /// The destructor hook is not cloned.
    #[inline]
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            root: self.root,
            len: self.len,
            first: self.first,
            last: self.last,
            comparator: self.comparator.clone(),
            destructor: None,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C, A: Allocator> fmt::Debug for RBTree<K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
