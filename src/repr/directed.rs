/*!
# Directed Graph Representations

[`DirectedGraph`] stores **both outgoing and incoming incidences** of every node, so that
in-neighbors (needed by color refinement) and reverse edges (needed by residual networks)
are available without scanning the whole graph.

## Provided Representations

- [`AdjArray`]: incidences as `Vec<EdgeId>`.
- [`SparseAdjArray`]: incidences as `SmallVec<[EdgeId; 8]>`.
*/

use itertools::Itertools;

use crate::{repr::macros::impl_common_graph_ops, testing::test_graph_ops};

use super::*;

/// A weighted directed multigraph.
///
/// # Type parameters
/// - `Inc`: [`Incidence`] implementation used for both directions.
#[derive(Clone, Debug)]
pub struct DirectedGraph<Inc>
where
    Inc: Incidence,
{
    out_inc: Vec<Inc>,
    in_inc: Vec<Inc>,
    edges: EdgeTable,
}

/// Directed graph using adjacency arrays (`Vec<EdgeId>`).
pub type AdjArray = DirectedGraph<ArrIncidence>;

/// Directed graph using sparse adjacency arrays (`SmallVec<[EdgeId; 8]>`).
pub type SparseAdjArray = DirectedGraph<SparseIncidence>;

impl_common_graph_ops!(DirectedGraph => out_inc, Directed);

impl<Inc: Incidence> IncidenceList for DirectedGraph<Inc> {
    fn out_edges_of(&self, u: Node) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_inc[u as usize].edge_ids()
    }

    fn in_edges_of(&self, u: Node) -> impl Iterator<Item = EdgeId> + '_ {
        self.in_inc[u as usize].edge_ids()
    }

    fn edges_of(&self, u: Node) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges_of(u).chain(self.in_edges_of(u))
    }

    fn out_degree_of(&self, u: Node) -> NumEdges {
        self.out_inc[u as usize].num_of_edges()
    }

    fn in_degree_of(&self, u: Node) -> NumEdges {
        self.in_inc[u as usize].num_of_edges()
    }

    fn degree_of(&self, u: Node) -> NumEdges {
        self.out_degree_of(u) + self.in_degree_of(u)
    }
}

impl<Inc: Incidence> GraphNew for DirectedGraph<Inc> {
    fn new(n: NumNodes) -> Self {
        Self {
            out_inc: vec![Inc::default(); n as usize],
            in_inc: vec![Inc::default(); n as usize],
            edges: EdgeTable::default(),
        }
    }
}

impl<Inc: Incidence> GraphEdgeEditing for DirectedGraph<Inc> {
    fn add_weighted_edge(&mut self, u: Node, v: Node, weight: Weight) -> EdgeId {
        assert!(
            self.has_vertex(u) && self.has_vertex(v),
            "edge ({u},{v}) exceeds the {} nodes of the graph",
            self.number_of_nodes()
        );
        let e = self.edges.push(Edge(u, v), weight);
        self.out_inc[u as usize].push(e);
        self.in_inc[v as usize].push(e);
        e
    }

    fn set_edge_weight(&mut self, e: EdgeId, weight: Weight) {
        self.edges.set_weight(e, weight);
    }
}

impl<Inc: Incidence> DirectedGraph<Inc> {
    /// Returns the graph with every edge reversed; edge ids and weights are kept
    #[must_use]
    pub fn transposed(&self) -> Self {
        Self::from_weighted_edges(
            self.number_of_nodes(),
            self.weighted_edges()
                .map(|WeightedEdge(u, v, w)| WeightedEdge(v, u, w))
                .collect_vec(),
        )
    }
}

test_graph_ops!(test_adj_array, AdjArray, false, (GraphNew, IncidenceList, AdjacencyTest, GraphEdgeEditing));
test_graph_ops!(test_sparse_adj_array, SparseAdjArray, false, (GraphNew, IncidenceList, AdjacencyTest, GraphEdgeEditing));
