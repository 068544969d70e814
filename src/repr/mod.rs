/*!
# Graph Representations

Weighted (multi-)graphs are stored as one [`Incidence`] list of [`EdgeId`]s per node together
with a shared edge table holding endpoints and weights. The incidence type decides how the
per-node lists are stored:

- [`ArrIncidence`]: a plain `Vec<EdgeId>`,
- [`SparseIncidence`]: a `SmallVec` that keeps up to 8 edges inline (good for sparse graphs).

See [`DirectedGraph`] and [`UndirectedGraph`] for the available aliases.
*/

use std::fmt::Debug;

use smallvec::SmallVec;

use crate::{edge::*, node::*, ops::*};

mod directed;
mod undirected;

pub use directed::*;
pub use undirected::*;

/// Trait for the list of edges incident to a single node
pub trait Incidence: Clone + Debug + Default {
    /// Returns all incident edge ids in insertion order
    fn as_slice(&self) -> &[EdgeId];

    /// Appends an edge id
    fn push(&mut self, e: EdgeId);

    /// Returns the number of incident edges
    fn num_of_edges(&self) -> NumEdges {
        self.as_slice().len() as NumEdges
    }

    /// Returns an iterator over all incident edge ids
    fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.as_slice().iter().copied()
    }
}

/// Incidence stored in a `Vec<EdgeId>`
#[derive(Clone, Debug, Default)]
pub struct ArrIncidence(Vec<EdgeId>);

impl Incidence for ArrIncidence {
    fn as_slice(&self) -> &[EdgeId] {
        &self.0
    }

    fn push(&mut self, e: EdgeId) {
        self.0.push(e);
    }
}

/// Incidence stored in a `SmallVec<[EdgeId; 8]>`
#[derive(Clone, Debug, Default)]
pub struct SparseIncidence(SmallVec<[EdgeId; 8]>);

impl Incidence for SparseIncidence {
    fn as_slice(&self) -> &[EdgeId] {
        &self.0
    }

    fn push(&mut self, e: EdgeId) {
        self.0.push(e);
    }
}

/// Endpoints and weights of all edges, indexed by [`EdgeId`]
#[derive(Clone, Debug, Default)]
pub(crate) struct EdgeTable {
    endpoints: Vec<Edge>,
    weights: Vec<Weight>,
}

impl EdgeTable {
    fn len(&self) -> NumEdges {
        self.endpoints.len() as NumEdges
    }

    fn push(&mut self, edge: Edge, weight: Weight) -> EdgeId {
        let id = self.len();
        self.endpoints.push(edge);
        self.weights.push(weight);
        id
    }

    fn endpoints(&self, e: EdgeId) -> Edge {
        self.endpoints[e as usize]
    }

    fn weight(&self, e: EdgeId) -> Weight {
        self.weights[e as usize]
    }

    fn set_weight(&mut self, e: EdgeId, weight: Weight) {
        self.weights[e as usize] = weight;
    }
}

pub(crate) mod macros {
    /// Implements the node/edge getters shared by all representations.
    /// Requires the fields `edges: EdgeTable` and a per-node `Vec<Inc>` named `$inc`.
    macro_rules! impl_common_graph_ops {
        ($struct:ident => $inc:ident, $directed:ident) => {
            impl<Inc: Incidence> GraphType for $struct<Inc> {
                type Dir = $directed;
            }

            impl<Inc: Incidence> GraphNodeOrder for $struct<Inc> {
                fn number_of_nodes(&self) -> NumNodes {
                    self.$inc.len() as NumNodes
                }
            }

            impl<Inc: Incidence> GraphEdgeOrder for $struct<Inc> {
                fn number_of_edges(&self) -> NumEdges {
                    self.edges.len()
                }
            }

            impl<Inc: Incidence> EdgeAttributes for $struct<Inc> {
                fn endpoints(&self, e: EdgeId) -> Edge {
                    self.edges.endpoints(e)
                }

                fn weight_of(&self, e: EdgeId) -> Weight {
                    self.edges.weight(e)
                }
            }
        };
    }

    pub(crate) use impl_common_graph_ops;
}
