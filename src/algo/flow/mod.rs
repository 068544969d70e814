/*!
# Maximum Flows and Minimum Cuts

Edge weights are interpreted as capacities. Undirected edges can carry flow in either direction
(but only in one at a time), self-loops never carry flow.

- [`PushRelabel`] computes maximum `s-t` flows and minimum `s-t` cuts on directed and undirected graphs.
- [`GusfieldEquivalentFlowTree`] answers all-pairs maximum flow values of an undirected graph
  after `n - 1` minimum cut computations.
- [`GusfieldGomoryHuCutTree`] additionally answers minimum cut queries from its tree.

All algorithms implement [`MaximumFlowAlgorithm`] and/or [`MinimumSTCutAlgorithm`], so they can be
swapped for each other; the flow trees accept any [`MinimumSTCutAlgorithm`] as their cut provider.
*/

mod equivalent_flow_tree;
mod gomory_hu;
mod push_relabel;
mod residual;
mod tolerance;

use super::*;

pub use equivalent_flow_tree::*;
pub use gomory_hu::*;
pub use push_relabel::*;
pub use residual::*;
pub use tolerance::*;

/// A maximum flow: its value and the flow on each edge (indexed by [`EdgeId`])
#[derive(Debug, Clone, PartialEq)]
pub struct MaximumFlow {
    pub value: Weight,
    pub flow: Vec<Weight>,
}

/// Algorithms computing maximum `s-t` flows
pub trait MaximumFlowAlgorithm {
    /// Computes a maximum flow from `source` to `sink` and returns its value
    fn calculate_maximum_flow(&mut self, source: Node, sink: Node) -> Result<Weight, FlowError>;

    /// Value of the last computed flow
    fn maximum_flow_value(&self) -> Option<Weight>;

    /// Flow on every edge of the last computed flow, indexed by [`EdgeId`].
    ///
    /// For undirected edges this is the amount in the direction that carries flow.
    fn flow_map(&self) -> Result<&[Weight], FlowError>;

    /// The endpoint of `e` the flow is heading to.
    ///
    /// Directed edges always report their target.
    fn flow_direction(&self, e: EdgeId) -> Result<Node, FlowError>;

    /// Computes a maximum flow and returns it together with its flow map
    fn maximum_flow(&mut self, source: Node, sink: Node) -> Result<MaximumFlow, FlowError> {
        let value = self.calculate_maximum_flow(source, sink)?;
        Ok(MaximumFlow {
            value,
            flow: self.flow_map()?.to_vec(),
        })
    }
}

/// Algorithms computing minimum `s-t` cuts
pub trait MinimumSTCutAlgorithm {
    /// Computes a minimum cut separating `source` from `sink` and returns its capacity
    fn calculate_min_cut(&mut self, source: Node, sink: Node) -> Result<Weight, FlowError>;

    /// Capacity of the last computed cut
    fn cut_capacity(&self) -> Option<Weight>;

    /// Nodes on the source side of the last computed cut
    fn source_partition(&self) -> Result<NodeBitSet, FlowError>;

    /// Nodes on the sink side of the last computed cut
    fn sink_partition(&self) -> Result<NodeBitSet, FlowError> {
        Ok(self.source_partition()?.complement())
    }

    /// Edges crossing the last computed cut (for directed graphs only those leaving the source side)
    fn cut_edges(&self) -> Result<Vec<EdgeId>, FlowError>;
}

/// Returns all edges leaving `side` (directed) or with exactly one endpoint in `side` (undirected)
pub(crate) fn cut_edges_of<G>(graph: &G, side: &NodeBitSet) -> Vec<EdgeId>
where
    G: EdgeAttributes + GraphType,
{
    graph
        .edge_ids()
        .filter(|&e| {
            let Edge(u, v) = graph.endpoints(e);
            if G::is_directed() {
                side.get_bit(u) && !side.get_bit(v)
            } else {
                side.get_bit(u) != side.get_bit(v)
            }
        })
        .collect()
}

/// Checks the common preconditions of all flow queries
pub(crate) fn check_terminals<G>(graph: &G, source: Node, sink: Node) -> Result<(), FlowError>
where
    G: GraphNodeOrder,
{
    for u in [source, sink] {
        if !graph.has_vertex(u) {
            return Err(FlowError::NodeNotFound(u));
        }
    }
    if source == sink {
        return Err(FlowError::SourceEqualsSink(source));
    }
    Ok(())
}
