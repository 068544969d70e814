/*!
# Undirected Graph Representations

[`UndirectedGraph`] stores a single incidence list per node. Every edge appears in the lists of
both endpoints; a self-loop appears exactly once.

## Provided Representations

- [`AdjArrayUndir`]: incidences as `Vec<EdgeId>`.
- [`SparseAdjArrayUndir`]: incidences as `SmallVec<[EdgeId; 8]>`.
*/

use crate::{repr::macros::impl_common_graph_ops, testing::test_graph_ops};

use super::*;

/// A weighted undirected multigraph.
///
/// # Type parameters
/// - `Inc`: [`Incidence`] implementation.
#[derive(Clone, Debug)]
pub struct UndirectedGraph<Inc>
where
    Inc: Incidence,
{
    inc: Vec<Inc>,
    edges: EdgeTable,
}

/// Undirected graph using adjacency arrays (`Vec<EdgeId>`).
pub type AdjArrayUndir = UndirectedGraph<ArrIncidence>;

/// Undirected graph using sparse adjacency arrays (`SmallVec<[EdgeId; 8]>`).
pub type SparseAdjArrayUndir = UndirectedGraph<SparseIncidence>;

impl_common_graph_ops!(UndirectedGraph => inc, Undirected);

impl<Inc: Incidence> IncidenceList for UndirectedGraph<Inc> {
    fn out_edges_of(&self, u: Node) -> impl Iterator<Item = EdgeId> + '_ {
        self.inc[u as usize].edge_ids()
    }

    fn in_edges_of(&self, u: Node) -> impl Iterator<Item = EdgeId> + '_ {
        self.inc[u as usize].edge_ids()
    }

    fn edges_of(&self, u: Node) -> impl Iterator<Item = EdgeId> + '_ {
        self.inc[u as usize].edge_ids()
    }

    fn out_degree_of(&self, u: Node) -> NumEdges {
        self.degree_of(u)
    }

    fn in_degree_of(&self, u: Node) -> NumEdges {
        self.degree_of(u)
    }

    fn degree_of(&self, u: Node) -> NumEdges {
        self.inc[u as usize].num_of_edges()
    }
}

impl<Inc: Incidence> GraphNew for UndirectedGraph<Inc> {
    fn new(n: NumNodes) -> Self {
        Self {
            inc: vec![Inc::default(); n as usize],
            edges: EdgeTable::default(),
        }
    }
}

impl<Inc: Incidence> GraphEdgeEditing for UndirectedGraph<Inc> {
    fn add_weighted_edge(&mut self, u: Node, v: Node, weight: Weight) -> EdgeId {
        assert!(
            self.has_vertex(u) && self.has_vertex(v),
            "edge ({u},{v}) exceeds the {} nodes of the graph",
            self.number_of_nodes()
        );
        let e = self.edges.push(Edge(u, v), weight);
        self.inc[u as usize].push(e);
        if u != v {
            self.inc[v as usize].push(e);
        }
        e
    }

    fn set_edge_weight(&mut self, e: EdgeId, weight: Weight) {
        self.edges.set_weight(e, weight);
    }
}

test_graph_ops!(test_adj_array_undir, AdjArrayUndir, true, (GraphNew, IncidenceList, AdjacencyTest, GraphEdgeEditing));
test_graph_ops!(test_sparse_adj_array_undir, SparseAdjArrayUndir, true, (GraphNew, IncidenceList, AdjacencyTest, GraphEdgeEditing));
