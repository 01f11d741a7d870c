use core::fmt;

/// Errors returned by fallible [`RBTree`](crate::RBTree) operations.
///
/// Rejecting a duplicate key is not an error: [`RBTree::insert`] reports it
/// by returning `false`.
///
/// [`RBTree::insert`]: crate::RBTree::insert
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The cursor is at the end (or reverse end) of the tree and does not
    /// point to an element.
    EndCursor,
    /// The element the cursor pointed to has been removed from the tree.
    StaleCursor,
    /// The tree already holds the maximum number of nodes it can address.
    CapacityOverflow,
    /// The allocator could not provide memory for a new node.
    AllocError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::EndCursor => "cursor does not point to an element",
            Error::StaleCursor => "cursor refers to an element that was removed",
            Error::CapacityOverflow => "tree node capacity exceeded",
            Error::AllocError => "memory allocation failed",
        })
    }
}

impl core::error::Error for Error {}
