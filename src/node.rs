/*!
# Node Representation

We choose `Node = u32` as almost all use-cases involve less than `2^32` nodes.
This allows us to (1) save space by not using `usize` or `u64` and (2) directly manipulate
node values without abstracting over them.

Dense node sets (partitions of a cut, visited markers, ...) are stored as a [`NodeBitSet`].
*/

use std::fmt::{Debug, Display};

use fixedbitset::FixedBitSet;
use itertools::Itertools;

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// BitSet for Nodes `0..n`.
///
/// Thin wrapper around [`FixedBitSet`] that speaks in [`Node`]s instead of `usize`.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct NodeBitSet {
    bits: FixedBitSet,
}

impl NodeBitSet {
    /// Creates an empty bitset able to hold the nodes `0..n`
    pub fn new(n: NumNodes) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(n as usize),
        }
    }

    /// Creates a bitset over `0..n` with every bit set
    pub fn new_all_set(n: NumNodes) -> Self {
        let mut bits = FixedBitSet::with_capacity(n as usize);
        bits.insert_range(..);
        Self { bits }
    }

    /// Creates a bitset over `0..n` with exactly the provided bits set
    /// ** Panics if any node is `>= n` **
    pub fn new_with_bits_set<I>(n: NumNodes, bits: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        let mut set = Self::new(n);
        set.set_bits(bits);
        set
    }

    /// Returns the number of bits (set or unset), i.e. `n`
    pub fn number_of_bits(&self) -> NumNodes {
        self.bits.len() as NumNodes
    }

    /// Sets bit `u` and returns its previous value
    /// ** Panics if `u >= n` **
    pub fn set_bit(&mut self, u: Node) -> bool {
        self.bits.put(u as usize)
    }

    /// Sets all provided bits
    /// ** Panics if any node is `>= n` **
    pub fn set_bits<I>(&mut self, bits: I)
    where
        I: IntoIterator<Item = Node>,
    {
        for u in bits {
            self.set_bit(u);
        }
    }

    /// Clears bit `u` and returns its previous value
    /// ** Panics if `u >= n` **
    pub fn clear_bit(&mut self, u: Node) -> bool {
        let prev = self.get_bit(u);
        self.bits.set(u as usize, false);
        prev
    }

    /// Returns *true* if bit `u` is set. Out-of-range queries return *false*.
    pub fn get_bit(&self, u: Node) -> bool {
        self.bits.contains(u as usize)
    }

    /// Clears all bits without changing the number of bits
    pub fn clear_all(&mut self) {
        self.bits.clear();
    }

    /// Returns the number of set bits
    pub fn cardinality(&self) -> NumNodes {
        self.bits.count_ones(..) as NumNodes
    }

    /// Returns *true* if no bit is set
    pub fn are_all_unset(&self) -> bool {
        self.bits.is_clear()
    }

    /// Iterates over all set bits in increasing order
    pub fn iter_set_bits(&self) -> impl Iterator<Item = Node> + '_ {
        self.bits.ones().map(|u| u as Node)
    }

    /// Returns a new bitset over the same range where exactly the unset bits of `self` are set
    #[must_use]
    pub fn complement(&self) -> Self {
        let mut bits = self.bits.clone();
        bits.toggle_range(..);
        Self { bits }
    }
}

impl Display for NodeBitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.iter_set_bits().join(", "))
    }
}

impl Debug for NodeBitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn set_and_clear() {
        let mut set = NodeBitSet::new(10);
        assert!(set.are_all_unset());
        assert!(!set.set_bit(3));
        assert!(set.set_bit(3));
        set.set_bits([5, 7]);

        assert_eq!(set.cardinality(), 3);
        assert_eq!(set.iter_set_bits().collect_vec(), vec![3, 5, 7]);

        assert!(set.clear_bit(5));
        assert!(!set.clear_bit(5));
        assert!(!set.get_bit(5));
        assert!(!set.get_bit(42));
        assert_eq!(format!("{set}"), "{3, 7}");
    }

    #[test]
    fn complement() {
        let set = NodeBitSet::new_with_bits_set(5, [0, 2, 4]);
        let comp = set.complement();
        assert_eq!(comp.number_of_bits(), 5);
        assert_eq!(comp.iter_set_bits().collect_vec(), vec![1, 3]);
        assert_eq!(comp.complement(), set);
        assert_eq!(NodeBitSet::new_all_set(4).cardinality(), 4);
    }
}
