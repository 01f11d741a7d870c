//! Orderings used to sort keys in an [`RBTree`](crate::RBTree).

use core::cmp::Ordering;

/// A strict total order over keys of type `K`.
///
/// The tree relies on the ordering being consistent: if `compare(a, b)` is
/// `Less` then `compare(b, a)` must be `Greater`, and the order must be
/// transitive. Two keys comparing `Equal` are considered the same key, so
/// inserting the second one is rejected.
///
/// An inconsistent comparator cannot cause memory unsafety, but lookups may
/// miss present keys and iteration order is unspecified.
///
/// Any `Fn(&K, &K) -> Ordering` closure is a comparator:
///
/// ```
/// use rb_tree::RBTree;
///
/// // Largest key first.
/// let mut tree = RBTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// tree.insert(1, "one");
/// tree.insert(3, "three");
/// tree.insert(2, "two");
/// assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Orders keys by their [`Ord`] implementation.
///
/// This covers integers, `char`, strings and C strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders floating point keys by the IEEE 754 `totalOrder` predicate.
///
/// Unlike `<` this is a total order: `-0.0` sorts before `+0.0` and NaNs are
/// ordered by their sign and payload instead of being incomparable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TotalOrder;

impl Comparator<f32> for TotalOrder {
    #[inline]
    fn compare(&self, a: &f32, b: &f32) -> Ordering {
        a.total_cmp(b)
    }
}

impl Comparator<f64> for TotalOrder {
    #[inline]
    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }
}
