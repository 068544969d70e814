/*!
# Generalized Sets

Abstraction over set-like collections so that generators and algorithms can accept either sparse
(`HashSet`) or dense ([`NodeBitSet`]) node sets.
*/

use std::{
    collections::{HashSet, hash_set::Iter},
    hash::{BuildHasher, Hash},
    iter::Cloned,
};

use crate::node::*;

/// Minimalist trait for a set-like collection.
pub trait Set<T> {
    /// Inserts `value` into the set.
    /// Returns `true` if the element was not present before.
    fn insert(&mut self, value: T) -> bool;

    /// Removes `value` from the set.
    /// Returns `true` if the element was present.
    fn remove(&mut self, value: &T) -> bool;

    /// Iterator over elements in set.
    ///
    /// Returned by [`Set::iter`].
    type SetIter<'a>: Iterator<Item = T>
    where
        Self: 'a,
        T: Clone;

    /// Returns an iterator over all elements in the set.
    fn iter(&self) -> Self::SetIter<'_>
    where
        T: Clone;

    fn contains(&self, value: &T) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, S> Set<T> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn insert(&mut self, value: T) -> bool {
        HashSet::insert(self, value)
    }

    fn remove(&mut self, value: &T) -> bool {
        HashSet::remove(self, value)
    }

    type SetIter<'a>
        = Cloned<Iter<'a, T>>
    where
        Self: 'a,
        T: Clone;

    fn iter(&self) -> Self::SetIter<'_>
    where
        T: Clone,
    {
        HashSet::iter(self).cloned()
    }

    fn contains(&self, value: &T) -> bool {
        HashSet::contains(self, value)
    }

    fn len(&self) -> usize {
        HashSet::len(self)
    }
}

impl Set<Node> for NodeBitSet {
    fn insert(&mut self, value: Node) -> bool {
        !self.set_bit(value)
    }

    fn remove(&mut self, value: &Node) -> bool {
        self.clear_bit(*value)
    }

    type SetIter<'a> = Box<dyn Iterator<Item = Node> + 'a>;

    fn iter(&self) -> Self::SetIter<'_> {
        Box::new(self.iter_set_bits())
    }

    fn contains(&self, value: &Node) -> bool {
        self.get_bit(*value)
    }

    fn len(&self) -> usize {
        self.cardinality() as usize
    }
}
