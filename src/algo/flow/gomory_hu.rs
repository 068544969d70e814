/*!
# Gusfield's Gomory-Hu Cut Tree

A *Gomory-Hu tree* of an undirected graph is an equivalent flow tree with an additional property:
removing the lightest edge on the tree path between `s` and `t` splits the nodes into a minimum
`s-t` cut of the graph. Hence, after `n - 1` cut computations, all minimum cut queries are answered
from the tree alone.
*/

use log::{debug, trace};

use super::*;

/// Answer to the last query
#[derive(Debug, Clone)]
struct TreeCut {
    source: Node,
    sink: Node,
    value: Weight,
    source_partition: NodeBitSet,
}

/// Gusfield's Gomory-Hu cut tree.
///
/// The tree is computed on first use with the minimum cut algorithm `M`
/// ([`PushRelabel`] by default).
pub struct GusfieldGomoryHuCutTree<'a, G, M = PushRelabel<'a, G>>
where
    G: IncidenceList,
    M: MinimumSTCutAlgorithm,
{
    graph: &'a G,
    min_cut: M,
    tree: Option<AdjArrayUndir>,
    last_cut: Option<TreeCut>,
}

impl<'a, G> GusfieldGomoryHuCutTree<'a, G>
where
    G: IncidenceList,
{
    /// Uses [`PushRelabel`] with default settings for all cut computations.
    /// Fails if the graph is directed.
    pub fn new(graph: &'a G) -> Result<Self, FlowError> {
        Self::with_min_cut_algorithm(graph, PushRelabel::new(graph))
    }
}

impl<'a, G, M> GusfieldGomoryHuCutTree<'a, G, M>
where
    G: IncidenceList,
    M: MinimumSTCutAlgorithm,
{
    /// Uses `min_cut` (which must operate on `graph`) for all cut computations.
    /// Fails if the graph is directed.
    pub fn with_min_cut_algorithm(graph: &'a G, min_cut: M) -> Result<Self, FlowError> {
        if G::is_directed() {
            return Err(FlowError::RequiresUndirected("Gomory-Hu tree"));
        }
        Ok(Self {
            graph,
            min_cut,
            tree: None,
            last_cut: None,
        })
    }

    fn compute(&mut self) -> Result<&AdjArrayUndir, FlowError> {
        if self.tree.is_none() {
            let n = self.graph.len();
            let mut parents: Vec<Node> = vec![0; n];
            let mut values: Vec<Weight> = vec![0.0; n];

            for s in 1..n {
                let t = parents[s] as usize;
                let value = self.min_cut.calculate_min_cut(s as Node, t as Node)?;
                let side = self.min_cut.source_partition()?;
                values[s] = value;

                for i in 0..n {
                    if i != s && side.get_bit(i as Node) && parents[i] as usize == t {
                        parents[i] = s as Node;
                    }
                }

                if side.get_bit(parents[t]) {
                    trace!("Gomory-Hu tree: {s} takes the place of {t}");
                    parents[s] = parents[t];
                    parents[t] = s as Node;
                    values[s] = values[t];
                    values[t] = value;
                }
            }

            debug!("computed Gomory-Hu tree on {n} nodes");
            self.tree = Some(AdjArrayUndir::from_weighted_edges(
                n as NumNodes,
                (1..n).map(|i| WeightedEdge(i as Node, parents[i], values[i])),
            ));
        }

        self.tree.as_ref().ok_or(FlowError::NotComputed)
    }

    /// Returns the tree parent of `u`; node `0` is the root and its own parent
    pub fn parent_of(&mut self, u: Node) -> Result<Node, FlowError> {
        if !self.graph.has_vertex(u) {
            return Err(FlowError::NodeNotFound(u));
        }
        if u == 0 {
            return Ok(0);
        }
        Ok(self.compute()?.opposite(u - 1, u))
    }

    /// Returns the Gomory-Hu tree; edge `i - 1` connects `i` to its parent
    pub fn gomory_hu_tree(&mut self) -> Result<AdjArrayUndir, FlowError> {
        Ok(self.compute()?.clone())
    }

    /// Returns the Gomory-Hu tree in any representation; edge `i - 1` connects `i` to its parent
    pub fn gomory_hu_tree_as<GO>(&mut self) -> Result<GO, FlowError>
    where
        GO: GraphEdgeEditing,
    {
        let tree = self.compute()?;
        Ok(GO::from_weighted_edges(
            tree.number_of_nodes(),
            tree.weighted_edges(),
        ))
    }

    /// Consumes the tree and returns the minimum cut algorithm
    pub fn into_min_cut_algorithm(self) -> M {
        self.min_cut
    }

    /// Finds the lightest tree edge between `s` and `t` and the side of `s` after removing it
    fn query(&mut self, source: Node, sink: Node) -> Result<&TreeCut, FlowError> {
        check_terminals(self.graph, source, sink)?;

        let is_cached = self
            .last_cut
            .as_ref()
            .is_some_and(|c| c.source == source && c.sink == sink);

        if !is_cached {
            let tree = self.compute()?;

            let mut pred_edge = vec![None; tree.len()];
            for u in tree.bfs(source) {
                for e in tree.edges_of(u) {
                    let v = tree.opposite(e, u);
                    if v != source && pred_edge[v as usize].is_none() {
                        pred_edge[v as usize] = Some(e);
                    }
                }
            }

            let mut cheapest: Option<EdgeId> = None;
            let mut u = sink;
            while let Some(e) = pred_edge[u as usize] {
                if cheapest.is_none_or(|c| tree.weight_of(e) < tree.weight_of(c)) {
                    cheapest = Some(e);
                }
                u = tree.opposite(e, u);
            }

            let cheapest = cheapest.ok_or(FlowError::NotComputed)?;
            let value = tree.weight_of(cheapest);
            let source_partition = tree.bfs(source).with_edge_excluded(cheapest).into_visited();

            self.last_cut = Some(TreeCut {
                source,
                sink,
                value,
                source_partition,
            });
        }

        self.last_cut.as_ref().ok_or(FlowError::NotComputed)
    }

    fn last(&self) -> Result<&TreeCut, FlowError> {
        self.last_cut.as_ref().ok_or(FlowError::NotComputed)
    }
}

impl<G, M> MaximumFlowAlgorithm for GusfieldGomoryHuCutTree<'_, G, M>
where
    G: IncidenceList,
    M: MinimumSTCutAlgorithm,
{
    fn calculate_maximum_flow(&mut self, source: Node, sink: Node) -> Result<Weight, FlowError> {
        Ok(self.query(source, sink)?.value)
    }

    fn maximum_flow_value(&self) -> Option<Weight> {
        self.last_cut.as_ref().map(|c| c.value)
    }

    fn flow_map(&self) -> Result<&[Weight], FlowError> {
        Err(FlowError::Unsupported("flow map of a Gomory-Hu tree"))
    }

    fn flow_direction(&self, _e: EdgeId) -> Result<Node, FlowError> {
        Err(FlowError::Unsupported("flow direction of a Gomory-Hu tree"))
    }
}

impl<G, M> MinimumSTCutAlgorithm for GusfieldGomoryHuCutTree<'_, G, M>
where
    G: IncidenceList,
    M: MinimumSTCutAlgorithm,
{
    fn calculate_min_cut(&mut self, source: Node, sink: Node) -> Result<Weight, FlowError> {
        self.calculate_maximum_flow(source, sink)
    }

    fn cut_capacity(&self) -> Option<Weight> {
        self.maximum_flow_value()
    }

    fn source_partition(&self) -> Result<NodeBitSet, FlowError> {
        Ok(self.last()?.source_partition.clone())
    }

    fn cut_edges(&self) -> Result<Vec<EdgeId>, FlowError> {
        Ok(cut_edges_of(self.graph, &self.last()?.source_partition))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::equivalent_flow_tree::tests::{CountingMinCut, path_bottleneck},
        *,
    };
    use crate::{gens::*, testing::*};
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn wikipedia_graph() -> AdjArrayUndir {
        AdjArrayUndir::from_weighted_edges(
            6,
            [
                (0, 1, 1.0),
                (0, 2, 7.0),
                (1, 2, 1.0),
                (1, 3, 3.0),
                (1, 4, 2.0),
                (2, 4, 4.0),
                (3, 4, 1.0),
                (3, 5, 6.0),
                (4, 5, 2.0),
            ],
        )
    }

    #[test]
    fn cuts_from_tree() {
        init_logging();
        let graph = wikipedia_graph();
        let mut gh = GusfieldGomoryHuCutTree::new(&graph).unwrap();

        assert_eq!(gh.calculate_min_cut(0, 5).unwrap(), 6.0);
        let side = gh.source_partition().unwrap();
        assert!(side.get_bit(0) && !side.get_bit(5));
        assert_eq!(cut_weight(&graph, &side), 6.0);

        let sink_side = gh.sink_partition().unwrap();
        assert_eq!(sink_side.cardinality() + side.cardinality(), 6);

        let total: Weight = gh
            .cut_edges()
            .unwrap()
            .into_iter()
            .map(|e| graph.weight_of(e))
            .sum();
        assert_eq!(total, 6.0);

        let tree = gh.gomory_hu_tree().unwrap();
        assert_eq!(tree.number_of_edges(), 5);
        assert!(tree.is_forest());
        assert_eq!(gh.parent_of(0).unwrap(), 0);
        for u in 1..6 {
            let p = gh.parent_of(u).unwrap();
            assert!(tree.has_edge(u, p));
        }
    }

    #[test]
    fn errors() {
        let directed = AdjArray::from_edges(2, [(0, 1)]);
        assert!(matches!(
            GusfieldGomoryHuCutTree::new(&directed),
            Err(FlowError::RequiresUndirected(_))
        ));

        let graph = wikipedia_graph();
        let mut gh = GusfieldGomoryHuCutTree::new(&graph).unwrap();
        assert_eq!(gh.source_partition(), Err(FlowError::NotComputed));
        assert_eq!(gh.calculate_min_cut(3, 3), Err(FlowError::SourceEqualsSink(3)));
        assert_eq!(gh.calculate_min_cut(0, 6), Err(FlowError::NodeNotFound(6)));

        gh.calculate_maximum_flow(1, 2).unwrap();
        assert!(matches!(gh.flow_map(), Err(FlowError::Unsupported(_))));
        assert!(matches!(gh.flow_direction(1), Err(FlowError::Unsupported(_))));
    }

    #[test]
    fn uses_n_minus_one_cuts() {
        let graph = wikipedia_graph();
        let mut gh =
            GusfieldGomoryHuCutTree::with_min_cut_algorithm(&graph, CountingMinCut::new(&graph))
                .unwrap();
        for (i, j) in (0..6).tuple_combinations() {
            gh.calculate_min_cut(i, j).unwrap();
            gh.source_partition().unwrap();
        }
        assert_eq!(gh.into_min_cut_algorithm().calls, 5);
    }

    #[test]
    fn random_against_pairwise_cuts() {
        init_logging();
        let rng = &mut Pcg64Mcg::seed_from_u64(42);
        let cmp = ToleranceComparator::new(1e-6);

        for n in [2, 5, 8, 11] {
            for p in [0.15, 0.4, 0.8] {
                let edges = Gnp::new().nodes(n).prob(p).weights(0..=5).generate(rng, false);
                let graph = AdjArrayUndir::from_weighted_edges(n, edges);

                let mut gh = GusfieldGomoryHuCutTree::new(&graph).unwrap();
                let tree = gh.gomory_hu_tree_as::<SparseAdjArrayUndir>().unwrap();
                let tree = AdjArrayUndir::from_weighted_edges(n, tree.weighted_edges());

                for (s, t) in (0..n).tuple_combinations() {
                    for (s, t) in [(s, t), (t, s)] {
                        let value = gh.calculate_min_cut(s, t).unwrap();
                        assert!(cmp.eq(value, brute_force_min_cut(&graph, s, t)));
                        assert!(cmp.eq(value, path_bottleneck(&tree, s, t)));

                        let side = gh.source_partition().unwrap();
                        assert!(side.get_bit(s) && !side.get_bit(t));
                        assert!(cmp.eq(cut_weight(&graph, &side), value));
                    }
                }
            }
        }
    }
}
