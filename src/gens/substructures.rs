/*!
# Substructure Generators

Inserts common motifs (**paths**, **cycles** and **cliques**) into an existing graph.

# Example

```rust
use wgraphs::{prelude::*, gens::*};

let mut g = AdjArray::new(5);
g.connect_path([0, 1, 2]);
g.connect_cycle([2, 3, 4]);
g.connect_clique(&NodeBitSet::new_with_bits_set(5, [0, 2, 4]), false);

assert_eq!(g.number_of_edges(), 11);
assert!(g.has_edge(4, 2) && g.has_edge(2, 4));
```
*/

use itertools::Itertools;

use crate::utils::Set;

use super::*;

/// Trait for creating additional **substructures** (paths, cycles, cliques)
/// inside an already existing graph.
///
/// Implemented for all graphs that support edge editing and type queries.
pub trait GeneratorSubstructures {
    /// Connects the given nodes in order with a **simple path**.
    ///
    /// # Example
    /// ```rust
    /// use wgraphs::{prelude::*, gens::*};
    ///
    /// let mut g = AdjArray::new(4);
    /// g.connect_path(0..4);
    ///
    /// assert!(g.has_edge(0, 1));
    /// assert!(g.has_edge(1, 2));
    /// assert!(g.has_edge(2, 3));
    /// ```
    fn connect_path<P>(&mut self, nodes_on_path: P)
    where
        P: IntoIterator<Item = Node>,
    {
        self.connect_weighted_path(nodes_on_path, DEFAULT_EDGE_WEIGHT);
    }

    /// Connects the given nodes in order with a path whose edges all have weight `weight`
    fn connect_weighted_path<P>(&mut self, nodes_on_path: P, weight: Weight)
    where
        P: IntoIterator<Item = Node>;

    /// Connects the given nodes with a **cycle**: consecutive nodes are connected and the
    /// last node is connected back to the first. A single node receives a self-loop.
    fn connect_cycle<C>(&mut self, nodes_in_cycle: C)
    where
        C: IntoIterator<Item = Node>;

    /// Connects all given nodes into a **clique** (complete subgraph).
    ///
    /// - If `with_loops` is `true`, each node also gets a self-loop.
    /// - For undirected graphs, each pair is connected only once.
    ///
    /// Edges already present are added again (as parallel edges).
    fn connect_clique<C: Set<Node>>(&mut self, nodes: &C, with_loops: bool);
}

impl<G> GeneratorSubstructures for G
where
    G: GraphEdgeEditing + GraphType,
{
    fn connect_weighted_path<P>(&mut self, nodes_on_path: P, weight: Weight)
    where
        P: IntoIterator<Item = Node>,
    {
        for (u, v) in nodes_on_path.into_iter().tuple_windows() {
            self.add_weighted_edge(u, v, weight);
        }
    }

    fn connect_cycle<C>(&mut self, nodes_in_cycle: C)
    where
        C: IntoIterator<Item = Node>,
    {
        let mut iter = nodes_in_cycle.into_iter();

        // we use a rather tedious implementation to avoid needing to clone the iterator
        if let Some(first) = iter.next() {
            let mut prev = first;
            for cur in iter {
                self.add_edge(prev, cur);
                prev = cur;
            }

            self.add_edge(prev, first);
        }
    }

    fn connect_clique<C: Set<Node>>(&mut self, nodes: &C, with_loops: bool) {
        let nodes = nodes.iter().sorted().collect_vec();
        for &u in &nodes {
            for &v in &nodes {
                let e = Edge(u, v);
                if (!with_loops && e.is_loop()) || (Self::is_undirected() && !e.is_normalized()) {
                    continue;
                }

                self.add_edge(u, v);
            }
        }
    }
}
