use core::iter::FusedIterator;

use allocator_api2::alloc::{Allocator, Global};

use crate::node::NodeRef;
use crate::{Natural, RBTree};

/// An iterator over the entries of an [`RBTree`], in key order.
pub struct Iter<'a, K, V, C = Natural, A: Allocator = Global> {
    /// Next node yielded from the front.
    head: Option<NodeRef>,
    /// Next node yielded from the back.
    tail: Option<NodeRef>,
    /// Number of elements between `head` and `tail` inclusive. The two ends
    /// have met once this reaches zero.
    remaining: usize,
    tree: &'a RBTree<K, V, C, A>,
}

impl<'a, K, V, C, A: Allocator> Iterator for Iter<'a, K, V, C, A> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.head?;
        self.remaining -= 1;
        self.head = self.tree.pool.successor(node);
        let node = self.tree.pool.get(node);
        Some((&node.key, &node.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, C, A: Allocator> DoubleEndedIterator for Iter<'a, K, V, C, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.tail?;
        self.remaining -= 1;
        self.tail = self.tree.pool.predecessor(node);
        let node = self.tree.pool.get(node);
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V, C, A: Allocator> ExactSizeIterator for Iter<'a, K, V, C, A> {}

impl<'a, K, V, C, A: Allocator> FusedIterator for Iter<'a, K, V, C, A> {}

impl<'a, K, V, C, A: Allocator> Clone for Iter<'a, K, V, C, A> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            tail: self.tail,
            remaining: self.remaining,
            tree: self.tree,
        }
    }
}

/// An owning iterator over the entries of an [`RBTree`], in key order.
///
/// Yielded elements are handed to the caller, so the destructor hook does not
/// run on them. Elements left over when the iterator is dropped are released
/// by the tree and do go through the hook.
pub struct IntoIter<K, V, C = Natural, A: Allocator = Global> {
    tree: RBTree<K, V, C, A>,
}

impl<K, V, C, A: Allocator> Iterator for IntoIter<K, V, C, A> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.tree.pop_first()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<K, V, C, A: Allocator> DoubleEndedIterator for IntoIter<K, V, C, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree.pop_last()
    }
}

impl<K, V, C, A: Allocator> ExactSizeIterator for IntoIter<K, V, C, A> {}

impl<K, V, C, A: Allocator> FusedIterator for IntoIter<K, V, C, A> {}

/// An iterator over the keys of an [`RBTree`].
pub struct Keys<'a, K, V, C = Natural, A: Allocator = Global> {
    iter: Iter<'a, K, V, C, A>,
}

impl<'a, K, V, C, A: Allocator> Iterator for Keys<'a, K, V, C, A> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _value)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V, C, A: Allocator> DoubleEndedIterator for Keys<'a, K, V, C, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(key, _value)| key)
    }
}

impl<'a, K, V, C, A: Allocator> ExactSizeIterator for Keys<'a, K, V, C, A> {}

impl<'a, K, V, C, A: Allocator> FusedIterator for Keys<'a, K, V, C, A> {}

impl<'a, K, V, C, A: Allocator> Clone for Keys<'a, K, V, C, A> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

/// An iterator over the values of an [`RBTree`], in key order.
pub struct Values<'a, K, V, C = Natural, A: Allocator = Global> {
    iter: Iter<'a, K, V, C, A>,
}

impl<'a, K, V, C, A: Allocator> Iterator for Values<'a, K, V, C, A> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_key, value)| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V, C, A: Allocator> DoubleEndedIterator for Values<'a, K, V, C, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(_key, value)| value)
    }
}

impl<'a, K, V, C, A: Allocator> ExactSizeIterator for Values<'a, K, V, C, A> {}

impl<'a, K, V, C, A: Allocator> FusedIterator for Values<'a, K, V, C, A> {}

impl<'a, K, V, C, A: Allocator> Clone for Values<'a, K, V, C, A> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<K, V, C, A: Allocator> RBTree<K, V, C, A> {
    /// Gets an iterator over the entries of the map, sorted by key.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V, C, A> {
        Iter {
            head: self.first,
            tail: self.last,
            remaining: self.len,
            tree: self,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V, C, A> {
        Keys { iter: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    #[inline]
    pub fn values(&self) -> Values<'_, K, V, C, A> {
        Values { iter: self.iter() }
    }
}

impl<'a, K, V, C, A: Allocator> IntoIterator for &'a RBTree<K, V, C, A> {
    type Item = (&'a K, &'a V);

    type IntoIter = Iter<'a, K, V, C, A>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C, A: Allocator> IntoIterator for RBTree<K, V, C, A> {
    type Item = (K, V);

    type IntoIter = IntoIter<K, V, C, A>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { tree: self }
    }
}
