/*!
# Residual Network

Arena-based residual network used by [`PushRelabel`](super::PushRelabel).

Every arc lives in a single `Vec` and refers to its paired arc by index. For an undirected
edge both directions are real arcs with the edge's weight. For a directed edge `(u, v)` the
builder pairs it with a not yet paired reverse edge `(v, u)` if the graph has one; otherwise
a synthetic arc of capacity zero is created.

The mutable `capacity` of an arc always equals its physical capacity plus the flow currently
on its inverse, so the spare capacity is `capacity - flow`.
*/

use log::trace;

use super::*;

/// Index of an arc in the arena
pub type ArcId = u32;

/// One direction of a residual edge
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualArc {
    source: Node,
    target: Node,
    inverse: ArcId,
    capacity: Weight,
    flow: Weight,
    base_capacity: Weight,
    edge: Option<EdgeId>,
}

impl ResidualArc {
    pub fn source(&self) -> Node {
        self.source
    }

    pub fn target(&self) -> Node {
        self.target
    }

    /// The paired arc in the opposite direction
    pub fn inverse(&self) -> ArcId {
        self.inverse
    }

    /// Physical capacity plus the flow on the inverse arc
    pub fn capacity(&self) -> Weight {
        self.capacity
    }

    pub fn flow(&self) -> Weight {
        self.flow
    }

    /// Capacity of the arc in the network as built
    pub fn base_capacity(&self) -> Weight {
        self.base_capacity
    }

    /// The original edge this arc was created for; `None` for synthetic arcs
    pub fn edge(&self) -> Option<EdgeId> {
        self.edge
    }

    /// Remaining capacity
    pub fn spare(&self) -> Weight {
        self.capacity - self.flow
    }
}

/// Residual network of a weighted graph
#[derive(Debug, Clone)]
pub struct ResidualNetwork {
    arcs: Vec<ResidualArc>,
    out_arcs: Vec<Vec<ArcId>>,
    arc_of_edge: Vec<Option<ArcId>>,
    directed: bool,
    cmp: ToleranceComparator,
}

impl ResidualNetwork {
    /// Builds the residual network of `graph`.
    ///
    /// Self-loops get no arcs. Fails if any edge weight is negative (or NaN).
    pub fn build<G>(graph: &G, cmp: ToleranceComparator) -> Result<Self, FlowError>
    where
        G: IncidenceList,
    {
        if let Some(e) = graph.edge_ids().find(|&e| !(graph.weight_of(e) >= 0.0)) {
            return Err(FlowError::NegativeWeight {
                edge: e,
                weight: graph.weight_of(e),
            });
        }

        let mut network = Self {
            arcs: Vec::with_capacity(2 * graph.number_of_edges() as usize),
            out_arcs: vec![Vec::new(); graph.len()],
            arc_of_edge: vec![None; graph.number_of_edges() as usize],
            directed: G::is_directed(),
            cmp,
        };

        for u in graph.vertices() {
            for e in graph.out_edges_of(u) {
                let edge = graph.endpoints(e);
                if edge.is_loop() || network.arc_of_edge[e as usize].is_some() {
                    continue;
                }

                let Edge(a, b) = edge;
                let w = graph.weight_of(e);

                if !network.directed {
                    let fwd = network.add_arc_pair(a, b, (w, Some(e)), (w, Some(e)));
                    network.arc_of_edge[e as usize] = Some(fwd);
                    continue;
                }

                let reverse = graph.out_edges_of(b).find(|&r| {
                    graph.edge_target(r) == a && network.arc_of_edge[r as usize].is_none()
                });

                match reverse {
                    Some(r) => {
                        let fwd =
                            network.add_arc_pair(a, b, (w, Some(e)), (graph.weight_of(r), Some(r)));
                        network.arc_of_edge[e as usize] = Some(fwd);
                        network.arc_of_edge[r as usize] = Some(network.arcs[fwd as usize].inverse);
                    }
                    None => {
                        let fwd = network.add_arc_pair(a, b, (w, Some(e)), (0.0, None));
                        network.arc_of_edge[e as usize] = Some(fwd);
                    }
                }
            }
        }

        trace!(
            "built residual network with {} arcs for {} nodes and {} edges",
            network.arcs.len(),
            graph.number_of_nodes(),
            graph.number_of_edges()
        );

        Ok(network)
    }

    /// Adds `u -> v` and `v -> u` as mutual inverses and returns the id of `u -> v`
    fn add_arc_pair(
        &mut self,
        u: Node,
        v: Node,
        (fwd_cap, fwd_edge): (Weight, Option<EdgeId>),
        (bwd_cap, bwd_edge): (Weight, Option<EdgeId>),
    ) -> ArcId {
        let fwd = self.arcs.len() as ArcId;
        let bwd = fwd + 1;

        for (source, target, inverse, capacity, edge) in [
            (u, v, bwd, fwd_cap, fwd_edge),
            (v, u, fwd, bwd_cap, bwd_edge),
        ] {
            self.out_arcs[source as usize].push(self.arcs.len() as ArcId);
            self.arcs.push(ResidualArc {
                source,
                target,
                inverse,
                capacity,
                flow: 0.0,
                base_capacity: capacity,
                edge,
            });
        }

        fwd
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.out_arcs.len() as NumNodes
    }

    pub fn number_of_arcs(&self) -> NumEdges {
        self.arcs.len() as NumEdges
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// ** Panics if `a` is not an arc **
    pub fn arc(&self, a: ArcId) -> &ResidualArc {
        &self.arcs[a as usize]
    }

    /// Returns the ids of all arcs leaving `u`
    /// ** Panics if `u >= n` **
    pub fn out_arcs_of(&self, u: Node) -> &[ArcId] {
        &self.out_arcs[u as usize]
    }

    /// Returns the arc created for edge `e` (the one in the edge's own orientation);
    /// `None` for self-loops
    /// ** Panics if `e >= m` **
    pub fn arc_of_edge(&self, e: EdgeId) -> Option<ArcId> {
        self.arc_of_edge[e as usize]
    }

    /// Sends `amount` units along `a`; flow on the inverse arc is cancelled first.
    ///
    /// `amount` must not exceed the spare capacity of `a`.
    pub fn push_flow(&mut self, a: ArcId, amount: Weight) {
        debug_assert!(!self.cmp.gt(amount, self.arc(a).spare()));

        let inv = self.arc(a).inverse as usize;
        let a = a as usize;
        let back = self.arcs[inv].flow;

        if self.cmp.lt(back, amount) {
            let diff = amount - back;
            self.arcs[a].flow += diff;
            self.arcs[a].capacity -= back;
            self.arcs[inv].flow = 0.0;
            self.arcs[inv].capacity += diff;
        } else {
            self.arcs[a].capacity -= amount;
            self.arcs[inv].flow -= amount;
            if self.cmp.is_zero(self.arcs[inv].flow) {
                self.arcs[inv].flow = 0.0;
                self.arcs[a].capacity = self.arcs[a].base_capacity;
            }
        }
    }

    /// Restores the state right after construction
    pub fn reset(&mut self) {
        for arc in &mut self.arcs {
            arc.capacity = arc.base_capacity;
            arc.flow = 0.0;
        }
    }

    /// Returns all nodes reachable from `s` via arcs with positive spare capacity
    pub fn reachable_from(&self, s: Node) -> NodeBitSet {
        let mut visited = NodeBitSet::new(self.number_of_nodes());
        visited.set_bit(s);
        let mut stack = vec![s];

        while let Some(u) = stack.pop() {
            for &a in self.out_arcs_of(u) {
                let arc = self.arc(a);
                if self.cmp.is_positive(arc.spare()) && !visited.set_bit(arc.target) {
                    stack.push(arc.target);
                }
            }
        }

        visited
    }

    /// Flow carried by edge `e`.
    ///
    /// For an undirected edge this is the larger of both directions (at most one is nonzero).
    /// ** Panics if `e >= m` **
    pub fn edge_flow(&self, e: EdgeId) -> Weight {
        let Some(a) = self.arc_of_edge(e) else {
            return 0.0;
        };
        let arc = self.arc(a);
        if self.directed {
            arc.flow
        } else {
            arc.flow.max(self.arc(arc.inverse).flow)
        }
    }

    /// Node that the flow on `e` is heading to.
    ///
    /// Directed edges always report their target; undirected edges report their source only if
    /// the reverse direction carries more flow.
    /// ** Panics if `e >= m` **
    pub fn edge_direction(&self, e: EdgeId) -> Option<Node> {
        let arc = self.arc(self.arc_of_edge(e)?);
        if !self.directed && self.cmp.gt(self.arc(arc.inverse).flow, arc.flow) {
            Some(arc.source)
        } else {
            Some(arc.target)
        }
    }

    /// Flow of every edge indexed by [`EdgeId`]
    pub fn flow_map(&self) -> Vec<Weight> {
        (0..self.arc_of_edge.len() as EdgeId)
            .map(|e| self.edge_flow(e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn undirected_arcs() {
        let graph = AdjArrayUndir::from_weighted_edges(3, [(0, 1, 2.0), (2, 1, 3.0), (1, 1, 5.0)]);
        let net = ResidualNetwork::build(&graph, ToleranceComparator::default()).unwrap();

        assert_eq!(net.number_of_arcs(), 4);
        assert_eq!(net.arc_of_edge(2), None);

        let a = net.arc(net.arc_of_edge(1).unwrap());
        assert_eq!((a.source(), a.target(), a.capacity()), (2, 1, 3.0));
        let inv = net.arc(a.inverse());
        assert_eq!((inv.source(), inv.target(), inv.capacity()), (1, 2, 3.0));
        assert_eq!(inv.edge(), Some(1));

        assert_eq!(net.out_arcs_of(1).len(), 2);
    }

    #[test]
    fn directed_pairs_reverse_edges() {
        let graph = AdjArray::from_weighted_edges(
            3,
            [(0, 1, 2.0), (1, 0, 4.0), (1, 0, 1.0), (1, 2, 3.0)],
        );
        let net = ResidualNetwork::build(&graph, ToleranceComparator::default()).unwrap();

        // (0,1) + (1,0) share a pair, the second (1,0) and (1,2) get synthetic partners
        assert_eq!(net.number_of_arcs(), 6);

        let a = net.arc(net.arc_of_edge(0).unwrap());
        assert_eq!(net.arc_of_edge(1), Some(a.inverse()));
        assert_eq!(net.arc(a.inverse()).base_capacity(), 4.0);

        let b = net.arc(net.arc_of_edge(2).unwrap());
        assert_eq!((b.source(), b.target()), (1, 0));
        assert_eq!(net.arc(b.inverse()).base_capacity(), 0.0);
        assert_eq!(net.arc(b.inverse()).edge(), None);

        assert!((0..net.number_of_arcs()).all(|a| net.arc(net.arc(a).inverse()).inverse() == a));
    }

    #[test]
    fn negative_weight() {
        let graph = AdjArray::from_weighted_edges(3, [(0, 1, 2.0), (1, 2, -1.0)]);
        assert_eq!(
            ResidualNetwork::build(&graph, ToleranceComparator::default()).unwrap_err(),
            FlowError::NegativeWeight {
                edge: 1,
                weight: -1.0
            }
        );

        let graph = AdjArray::from_weighted_edges(2, [(0, 1, Weight::NAN)]);
        assert!(ResidualNetwork::build(&graph, ToleranceComparator::default()).is_err());
    }

    #[test]
    fn push_cancels_inverse_flow() {
        let graph = AdjArrayUndir::from_weighted_edges(2, [(0, 1, 3.0)]);
        let mut net = ResidualNetwork::build(&graph, ToleranceComparator::default()).unwrap();
        let a = net.arc_of_edge(0).unwrap();
        let inv = net.arc(a).inverse();

        net.push_flow(a, 2.0);
        assert_eq!(net.arc(a).spare(), 1.0);
        assert_eq!(net.arc(inv).spare(), 5.0);
        assert_eq!(net.edge_flow(0), 2.0);
        assert_eq!(net.edge_direction(0), Some(1));

        // cancel 2 units and send 1 unit backwards
        net.push_flow(inv, 3.0);
        assert_eq!(net.arc(a).flow(), 0.0);
        assert_eq!(net.arc(inv).flow(), 1.0);
        assert_eq!(net.arc(a).spare(), 4.0);
        assert_eq!(net.arc(inv).spare(), 2.0);
        assert_eq!(net.edge_flow(0), 1.0);
        assert_eq!(net.edge_direction(0), Some(0));

        net.push_flow(a, 1.0);
        assert_eq!(net.arc(a).capacity(), 3.0);
        assert_eq!(net.flow_map(), vec![0.0]);

        net.push_flow(a, 3.0);
        assert_eq!(net.reachable_from(0).iter_set_bits().collect_vec(), vec![0]);
        assert_eq!(net.reachable_from(1).cardinality(), 2);

        net.reset();
        assert_eq!(net.arc(a).flow(), 0.0);
        assert_eq!(net.arc(a).capacity(), 3.0);
        assert_eq!(net.arc(inv).capacity(), 3.0);
    }
}
