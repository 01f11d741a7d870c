//! Cursor type for bidirectional traversal and positional erasure.
//!
//! This module contains the in-order stepping protocol shared by cursors and
//! iterators. Stepping uses only the node links: no recursion and no stack of
//! ancestors is needed.

use allocator_api2::alloc::Allocator;

use crate::node::{NodeHandle, NodePool, NodeRef};
use crate::rotate::Side;
use crate::{Comparator, Error, RBTree};

impl<K, V, A: Allocator> NodePool<K, V, A> {
    /// Returns the in-order successor of `node`.
    ///
    /// If `node` has a right subtree the successor is its left-most node.
    /// Otherwise climb while the node we came from is the right child of its
    /// parent; the first ancestor reached through a left edge is the
    /// successor.
    pub(crate) fn successor(&self, node: NodeRef) -> Option<NodeRef> {
        if let Some(right) = self.links(node).right {
            return Some(self.find_minimum(right));
        }
        let mut from = node;
        while let Some(parent) = self.parent(from) {
            if self.links(parent).right != Some(from) {
                return Some(parent);
            }
            from = parent;
        }
        None
    }

    /// Returns the in-order predecessor of `node`. Mirror of
    /// [`NodePool::successor`].
    pub(crate) fn predecessor(&self, node: NodeRef) -> Option<NodeRef> {
        if let Some(left) = self.links(node).left {
            return Some(self.find_maximum(left));
        }
        let mut from = node;
        while let Some(parent) = self.parent(from) {
            if self.links(parent).left != Some(from) {
                return Some(parent);
            }
            from = parent;
        }
        None
    }
}

/// A position in an [`RBTree`].
///
/// A cursor either points to an element, is past the last element, or is
/// before the first element. Cursors are plain `Copy` values which do not
/// borrow the tree; all operations on them go through the tree, which checks
/// that the element the cursor points to is still present. Using a cursor
/// whose element has been removed returns [`Error::StaleCursor`].
///
/// The two end positions are not tied to any element, so they stay valid
/// across insertions and removals. Stepping back from past the end always
/// moves onto the current last element:
///
/// ```
/// use rb_tree::RBTree;
///
/// let mut tree: RBTree<_, _> = [(1, 'a'), (2, 'b')].into_iter().collect();
/// let mut cursor = tree.end();
/// tree.insert(3, 'c');
/// tree.prev(&mut cursor).unwrap();
/// assert_eq!(tree.key(&cursor), Ok(&3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    position: Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Position {
    At(NodeHandle),
    /// Past the last element.
    End,
    /// Before the first element.
    REnd,
}

impl Cursor {
    /// Returns `true` if the cursor is past either end of the tree and does
    /// not point to an element.
    #[inline]
    pub fn is_end(&self) -> bool {
        !matches!(self.position, Position::At(_))
    }
}

impl<K, V, C, A: Allocator> RBTree<K, V, C, A> {
    /// Builds a cursor pointing to `node`. If there is no node, the cursor is
    /// placed past the end of the tree on the given side.
    #[inline]
    pub(crate) fn cursor_at(&self, node: Option<NodeRef>, past: Side) -> Cursor {
        let position = match (node, past) {
            (Some(node), _) => Position::At(self.pool.handle(node)),
            (None, Side::Right) => Position::End,
            (None, Side::Left) => Position::REnd,
        };
        Cursor { position }
    }

    /// Returns the node `cursor` points to after checking that it is still in
    /// the tree.
    #[inline]
    pub(crate) fn resolve(&self, cursor: &Cursor) -> Result<NodeRef, Error> {
        let Position::At(handle) = cursor.position else {
            return Err(Error::EndCursor);
        };
        self.pool.resolve(handle).ok_or_else(|| {
            log::debug!("rejected stale cursor to node {:?}", handle.node);
            Error::StaleCursor
        })
    }

    /// Returns a cursor pointing at the first element of the tree, or the end
    /// cursor if the tree is empty.
    #[inline]
    pub fn begin(&self) -> Cursor {
        self.cursor_at(self.first, Side::Right)
    }

    /// Returns the cursor past the last element of the tree.
    ///
    /// Stepping it backwards with [`RBTree::prev`] moves to the last element.
    #[inline]
    pub fn end(&self) -> Cursor {
        self.cursor_at(None, Side::Right)
    }

    /// Returns a cursor pointing at the last element of the tree, or the
    /// reverse end cursor if the tree is empty.
    #[inline]
    pub fn rbegin(&self) -> Cursor {
        self.cursor_at(self.last, Side::Left)
    }

    /// Returns the cursor before the first element of the tree.
    ///
    /// Stepping it forwards with [`RBTree::next`] moves to the first element.
    #[inline]
    pub fn rend(&self) -> Cursor {
        self.cursor_at(None, Side::Left)
    }

    /// Advances the cursor to the next element in key order.
    ///
    /// Advancing from the last element moves the cursor past the end.
    /// Advancing a cursor that is before the front moves it onto the first
    /// element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndCursor`] if the cursor is past the end (or before
    /// the front of an empty tree), and [`Error::StaleCursor`] if its element
    /// was removed. The cursor is left unchanged on error.
    pub fn next(&self, cursor: &mut Cursor) -> Result<(), Error> {
        let node = match cursor.position {
            Position::REnd if self.first.is_some() => {
                *cursor = self.cursor_at(self.first, Side::Right);
                return Ok(());
            }
            Position::End | Position::REnd => return Err(Error::EndCursor),
            Position::At(_) => self.resolve(cursor)?,
        };
        let next = if Some(node) == self.last {
            None
        } else {
            self.pool.successor(node)
        };
        *cursor = self.cursor_at(next, Side::Right);
        Ok(())
    }

    /// Moves the cursor to the previous element in key order.
    ///
    /// Moving back from the first element moves the cursor before the front.
    /// Moving back a cursor that is past the end moves it onto the last
    /// element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndCursor`] if the cursor is before the front (or past
    /// the end of an empty tree), and [`Error::StaleCursor`] if its element
    /// was removed. The cursor is left unchanged on error.
    pub fn prev(&self, cursor: &mut Cursor) -> Result<(), Error> {
        let node = match cursor.position {
            Position::End if self.last.is_some() => {
                *cursor = self.cursor_at(self.last, Side::Left);
                return Ok(());
            }
            Position::End | Position::REnd => return Err(Error::EndCursor),
            Position::At(_) => self.resolve(cursor)?,
        };
        let prev = if Some(node) == self.first {
            None
        } else {
            self.pool.predecessor(node)
        };
        *cursor = self.cursor_at(prev, Side::Left);
        Ok(())
    }

    /// Returns `true` if the cursor points to the first element.
    #[inline]
    pub fn at_begin(&self, cursor: &Cursor) -> bool {
        self.resolve(cursor).is_ok_and(|node| Some(node) == self.first)
    }

    /// Returns `true` if the cursor is past the last element.
    #[inline]
    pub fn at_end(&self, cursor: &Cursor) -> bool {
        cursor.position == Position::End
    }

    /// Returns `true` if the cursor points to the last element.
    #[inline]
    pub fn at_rbegin(&self, cursor: &Cursor) -> bool {
        self.resolve(cursor).is_ok_and(|node| Some(node) == self.last)
    }

    /// Returns `true` if the cursor is before the first element.
    #[inline]
    pub fn at_rend(&self, cursor: &Cursor) -> bool {
        cursor.position == Position::REnd
    }

    /// Returns the key of the element the cursor points to.
    #[inline]
    pub fn key(&self, cursor: &Cursor) -> Result<&K, Error> {
        self.entry(cursor).map(|(k, _v)| k)
    }

    /// Returns a reference to the value of the element the cursor points to.
    #[inline]
    pub fn value(&self, cursor: &Cursor) -> Result<&V, Error> {
        self.entry(cursor).map(|(_k, v)| v)
    }

    /// Returns a mutable reference to the value of the element the cursor
    /// points to.
    #[inline]
    pub fn value_mut(&mut self, cursor: &Cursor) -> Result<&mut V, Error> {
        let node = self.resolve(cursor)?;
        Ok(&mut self.pool.get_mut(node).value)
    }

    /// Returns the key and a reference to the value of the element the cursor
    /// points to.
    #[inline]
    pub fn entry(&self, cursor: &Cursor) -> Result<(&K, &V), Error> {
        let node = self.pool.get(self.resolve(cursor)?);
        Ok((&node.key, &node.value))
    }
}

impl<K, V, C: Comparator<K>, A: Allocator> RBTree<K, V, C, A> {
    /// Returns a cursor pointing at the element with the given key, or the
    /// end cursor if the key is not present.
    #[inline]
    pub fn find(&self, key: &K) -> Cursor {
        self.cursor_at(self.search(key), Side::Right)
    }
}
