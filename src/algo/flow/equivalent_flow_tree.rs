/*!
# Gusfield's Equivalent Flow Tree

For an undirected graph, an *equivalent flow tree* is a weighted tree on the same nodes such that
for every pair `(i, j)` the lightest edge on the tree path between `i` and `j` equals the maximum
flow between `i` and `j` in the graph. Gusfield's algorithm builds it from `n - 1` minimum cut
computations without contracting any nodes.
*/

use log::{debug, trace};

use super::*;

/// Parent vector and all-pairs flow values
#[derive(Debug, Clone)]
struct FlowTree {
    parents: Vec<Node>,
    flow_matrix: Vec<Vec<Weight>>,
}

/// Gusfield's equivalent flow tree.
///
/// The tree is computed on first use with the minimum cut algorithm `M`
/// ([`PushRelabel`] by default). Only flow *values* are available; per-edge flows are not.
///
/// # Example
/// ```
/// use wgraphs::{prelude::*, algo::*};
///
/// let graph = AdjArrayUndir::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
/// let mut tree = GusfieldEquivalentFlowTree::new(&graph).unwrap();
/// assert_eq!(tree.calculate_maximum_flow(0, 3).unwrap(), 1.0);
/// ```
pub struct GusfieldEquivalentFlowTree<'a, G, M = PushRelabel<'a, G>>
where
    G: IncidenceList,
    M: MinimumSTCutAlgorithm,
{
    graph: &'a G,
    min_cut: M,
    tree: Option<FlowTree>,
    last_query: Option<(Node, Node)>,
}

impl<'a, G> GusfieldEquivalentFlowTree<'a, G>
where
    G: IncidenceList,
{
    /// Uses [`PushRelabel`] with default settings for all cut computations.
    /// Fails if the graph is directed.
    pub fn new(graph: &'a G) -> Result<Self, FlowError> {
        Self::with_min_cut_algorithm(graph, PushRelabel::new(graph))
    }
}

impl<'a, G, M> GusfieldEquivalentFlowTree<'a, G, M>
where
    G: IncidenceList,
    M: MinimumSTCutAlgorithm,
{
    /// Uses `min_cut` (which must operate on `graph`) for all cut computations.
    /// Fails if the graph is directed.
    pub fn with_min_cut_algorithm(graph: &'a G, min_cut: M) -> Result<Self, FlowError> {
        if G::is_directed() {
            return Err(FlowError::RequiresUndirected("equivalent flow tree"));
        }
        Ok(Self {
            graph,
            min_cut,
            tree: None,
            last_query: None,
        })
    }

    fn compute(&mut self) -> Result<&FlowTree, FlowError> {
        if self.tree.is_none() {
            let n = self.graph.len();
            let mut parents: Vec<Node> = vec![0; n];
            let mut flow_matrix = vec![vec![0.0; n]; n];

            for s in 1..n {
                let t = parents[s] as usize;
                let value = self.min_cut.calculate_min_cut(s as Node, t as Node)?;
                let side = self.min_cut.source_partition()?;
                trace!("flow tree: cut {s} | {t} of value {value}");

                for i in (s + 1)..n {
                    if parents[i] as usize == t && side.get_bit(i as Node) {
                        parents[i] = s as Node;
                    }
                }

                flow_matrix[s][t] = value;
                flow_matrix[t][s] = value;
                for i in 0..s {
                    if i != t {
                        let through = value.min(flow_matrix[t][i]);
                        flow_matrix[s][i] = through;
                        flow_matrix[i][s] = through;
                    }
                }
            }

            debug!("computed equivalent flow tree on {n} nodes");
            self.tree = Some(FlowTree {
                parents,
                flow_matrix,
            });
        }

        self.tree.as_ref().ok_or(FlowError::NotComputed)
    }

    /// Returns the tree parent of `u`; node `0` is the root and its own parent
    pub fn parent_of(&mut self, u: Node) -> Result<Node, FlowError> {
        if !self.graph.has_vertex(u) {
            return Err(FlowError::NodeNotFound(u));
        }
        Ok(self.compute()?.parents[u as usize])
    }

    /// Returns the maximum flow value between two distinct nodes
    pub fn flow_matrix_value(&mut self, i: Node, j: Node) -> Result<Weight, FlowError> {
        check_terminals(self.graph, i, j)?;
        Ok(self.compute()?.flow_matrix[i as usize][j as usize])
    }

    /// Returns the `n - 1` tree edges `(i, parent_of(i))` for `i = 1..n`, weighted by their flow value
    pub fn tree_edges(&mut self) -> Result<Vec<WeightedEdge>, FlowError> {
        let tree = self.compute()?;
        Ok((1..tree.parents.len())
            .map(|i| {
                let p = tree.parents[i] as usize;
                WeightedEdge(i as Node, p as Node, tree.flow_matrix[i][p])
            })
            .collect())
    }

    /// Returns the equivalent flow tree as an [`AdjArrayUndir`]; edge `i - 1` connects `i` to its parent
    pub fn equivalent_flow_tree(&mut self) -> Result<AdjArrayUndir, FlowError> {
        self.equivalent_flow_tree_as()
    }

    /// Returns the equivalent flow tree in any representation; edge `i - 1` connects `i` to its parent
    pub fn equivalent_flow_tree_as<GO>(&mut self) -> Result<GO, FlowError>
    where
        GO: GraphEdgeEditing,
    {
        let edges = self.tree_edges()?;
        Ok(GO::from_weighted_edges(self.graph.number_of_nodes(), edges))
    }

    /// Consumes the tree and returns the minimum cut algorithm
    pub fn into_min_cut_algorithm(self) -> M {
        self.min_cut
    }
}

impl<G, M> MaximumFlowAlgorithm for GusfieldEquivalentFlowTree<'_, G, M>
where
    G: IncidenceList,
    M: MinimumSTCutAlgorithm,
{
    fn calculate_maximum_flow(&mut self, source: Node, sink: Node) -> Result<Weight, FlowError> {
        let value = self.flow_matrix_value(source, sink)?;
        self.last_query = Some((source, sink));
        Ok(value)
    }

    fn maximum_flow_value(&self) -> Option<Weight> {
        let (s, t) = self.last_query?;
        self.tree
            .as_ref()
            .map(|tree| tree.flow_matrix[s as usize][t as usize])
    }

    fn flow_map(&self) -> Result<&[Weight], FlowError> {
        Err(FlowError::Unsupported("flow map of an equivalent flow tree"))
    }

    fn flow_direction(&self, _e: EdgeId) -> Result<Node, FlowError> {
        Err(FlowError::Unsupported("flow direction of an equivalent flow tree"))
    }
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use crate::{gens::*, testing::*};
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    /// Forwards to [`PushRelabel`] and counts the cut computations
    pub(crate) struct CountingMinCut<'a, G: IncidenceList> {
        pub inner: PushRelabel<'a, G>,
        pub calls: usize,
    }

    impl<'a, G: IncidenceList> CountingMinCut<'a, G> {
        pub fn new(graph: &'a G) -> Self {
            Self {
                inner: PushRelabel::new(graph),
                calls: 0,
            }
        }
    }

    impl<G: IncidenceList> MinimumSTCutAlgorithm for CountingMinCut<'_, G> {
        fn calculate_min_cut(&mut self, source: Node, sink: Node) -> Result<Weight, FlowError> {
            self.calls += 1;
            self.inner.calculate_min_cut(source, sink)
        }

        fn cut_capacity(&self) -> Option<Weight> {
            self.inner.cut_capacity()
        }

        fn source_partition(&self) -> Result<NodeBitSet, FlowError> {
            self.inner.source_partition()
        }

        fn cut_edges(&self) -> Result<Vec<EdgeId>, FlowError> {
            self.inner.cut_edges()
        }
    }

    /// Minimum edge weight on the path between `u` and `v` in a tree
    pub(crate) fn path_bottleneck(tree: &AdjArrayUndir, u: Node, v: Node) -> Weight {
        let mut bottleneck = vec![None; tree.len()];
        bottleneck[u as usize] = Some(Weight::INFINITY);
        let mut stack = vec![u];
        while let Some(x) = stack.pop() {
            let b = bottleneck[x as usize].unwrap();
            for e in tree.edges_of(x) {
                let y = tree.opposite(e, x);
                if bottleneck[y as usize].is_none() {
                    bottleneck[y as usize] = Some(b.min(tree.weight_of(e)));
                    stack.push(y);
                }
            }
        }
        bottleneck[v as usize].unwrap()
    }

    #[test]
    fn path_graph() {
        init_logging();
        let mut graph = AdjArrayUndir::new(4);
        graph.connect_path(0..4);

        let mut eft = GusfieldEquivalentFlowTree::new(&graph).unwrap();
        for (i, j) in (0..4).tuple_combinations() {
            assert_eq!(eft.calculate_maximum_flow(i, j).unwrap(), 1.0);
            assert_eq!(eft.calculate_maximum_flow(j, i).unwrap(), 1.0);
        }
        assert_eq!(eft.maximum_flow_value(), Some(1.0));

        let tree = eft.equivalent_flow_tree().unwrap();
        assert_eq!(tree.number_of_edges(), 3);
        assert!(tree.weighted_edges().all(|e| e.weight() == 1.0));
    }

    #[test]
    fn triangle_and_pendant() {
        let graph = AdjArrayUndir::from_weighted_edges(
            4,
            [(0, 1, 3.0), (1, 2, 4.0), (2, 0, 7.0), (2, 3, 2.0)],
        );
        let mut eft = GusfieldEquivalentFlowTree::new(&graph).unwrap();

        assert_eq!(eft.flow_matrix_value(0, 1).unwrap(), 7.0);
        assert_eq!(eft.flow_matrix_value(0, 2).unwrap(), 10.0);
        assert_eq!(eft.flow_matrix_value(1, 2).unwrap(), 7.0);
        assert_eq!(eft.flow_matrix_value(3, 1).unwrap(), 2.0);
        assert_eq!(eft.parent_of(0).unwrap(), 0);
        assert_eq!(eft.parent_of(4), Err(FlowError::NodeNotFound(4)));
        assert_eq!(eft.flow_matrix_value(2, 2), Err(FlowError::SourceEqualsSink(2)));
    }

    #[test]
    fn rejects_directed_and_unsupported_queries() {
        let directed = AdjArray::from_edges(3, [(0, 1), (1, 2)]);
        assert_eq!(
            GusfieldEquivalentFlowTree::new(&directed).err(),
            Some(FlowError::RequiresUndirected("equivalent flow tree"))
        );

        let graph = AdjArrayUndir::from_edges(3, [(0, 1), (1, 2)]);
        let mut eft = GusfieldEquivalentFlowTree::new(&graph).unwrap();
        assert_eq!(eft.maximum_flow_value(), None);
        assert_eq!(eft.calculate_maximum_flow(0, 2).unwrap(), 1.0);
        assert!(matches!(eft.flow_map(), Err(FlowError::Unsupported(_))));
        assert!(matches!(eft.flow_direction(0), Err(FlowError::Unsupported(_))));
        assert!(matches!(eft.maximum_flow(0, 2), Err(FlowError::Unsupported(_))));
    }

    #[test]
    fn negative_weight_propagates() {
        let graph = AdjArrayUndir::from_weighted_edges(3, [(0, 1, 1.0), (1, 2, -1.0)]);
        let mut eft = GusfieldEquivalentFlowTree::new(&graph).unwrap();
        assert!(matches!(
            eft.calculate_maximum_flow(0, 1),
            Err(FlowError::NegativeWeight { edge: 1, .. })
        ));
    }

    #[test]
    fn tiny_graphs() {
        for n in [0, 1] {
            let graph = AdjArrayUndir::new(n);
            let mut eft = GusfieldEquivalentFlowTree::new(&graph).unwrap();
            assert!(eft.tree_edges().unwrap().is_empty());
            assert_eq!(eft.equivalent_flow_tree().unwrap().number_of_nodes(), n);
        }
    }

    #[test]
    fn uses_n_minus_one_cuts() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);
        let graph = AdjArrayUndir::gnp(rng, 12, 0.4);

        let mut eft =
            GusfieldEquivalentFlowTree::with_min_cut_algorithm(&graph, CountingMinCut::new(&graph))
                .unwrap();
        for (i, j) in (0..12).tuple_combinations() {
            eft.calculate_maximum_flow(i, j).unwrap();
        }
        assert_eq!(eft.into_min_cut_algorithm().calls, 11);
    }

    #[test]
    fn random_against_pairwise_flows() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0xbeef);
        let cmp = ToleranceComparator::new(1e-6);

        for n in [2, 6, 10, 15] {
            for p in [0.1, 0.3, 0.7] {
                let edges = Gnp::new().nodes(n).prob(p).weights(1..=9).generate(rng, false);
                let graph = SparseAdjArrayUndir::from_weighted_edges(n, edges);

                let mut eft = GusfieldEquivalentFlowTree::new(&graph).unwrap();
                let tree = eft.equivalent_flow_tree().unwrap();
                assert!(tree.is_forest() && tree.number_of_edges() + 1 == n);

                let mut pr = PushRelabel::new(&graph);
                for (i, j) in (0..n).tuple_combinations() {
                    let expected = pr.calculate_maximum_flow(i, j).unwrap();
                    assert!(cmp.eq(eft.calculate_maximum_flow(i, j).unwrap(), expected));
                    assert!(cmp.eq(path_bottleneck(&tree, i, j), expected));
                }
            }
        }
    }
}
