/*!
# Isomorphism Testing by Color Refinement

Color refinement is a sound but incomplete isomorphism test: if the stable colorings of two
graphs differ, the graphs are not isomorphic. If they agree, the graphs *may* be isomorphic.
The inspector only answers *isomorphic* in two situations where the answer is certain:

- the common stable coloring is discrete, so it pairs up the nodes of both graphs directly;
- both graphs are forests; then individualizing a node in both graphs and refining again
  until the coloring becomes discrete yields the mapping. Directed forests are refined by
  in-neighbors as well, since out-neighbors alone do not separate their orbits.

In all other cases the answer is [`IsomorphismDecision::Undecidable`], which must not be
confused with a negative answer (e.g. for regular graphs of equal size and degree).
*/

use log::{debug, trace};

use super::{color_refinement::refine_both_directions, *};

/// A bijection between the nodes of two isomorphic graphs
#[derive(Debug, Clone)]
pub struct IsomorphicGraphMapping {
    mapper: NodeMapper,
}

impl IsomorphicGraphMapping {
    /// Wraps a mapper from nodes of the first graph (old) to nodes of the second graph (new)
    pub fn new(mapper: NodeMapper) -> Self {
        Self { mapper }
    }

    /// Returns the node of the second graph that `u` is mapped to
    pub fn forward(&self, u: Node) -> Option<Node> {
        self.mapper.new_id_of(u)
    }

    /// Returns the node of the first graph that is mapped to `v`
    pub fn backward(&self, v: Node) -> Option<Node> {
        self.mapper.old_id_of(v)
    }

    /// Returns the partner of `u` in the other graph; `forward` selects the direction
    pub fn vertex_correspondence(&self, u: Node, forward: bool) -> Option<Node> {
        if forward {
            self.forward(u)
        } else {
            self.backward(u)
        }
    }

    /// Swaps the roles of the two graphs
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::new(self.mapper.inverse())
    }

    pub fn mapper(&self) -> &NodeMapper {
        &self.mapper
    }

    /// Returns *true* if the mapping is a bijection under which an edge `(u, v)` exists in
    /// `first` exactly if the edge `(forward(u), forward(v))` exists in `second`
    pub fn is_edge_preserving<G1, G2>(&self, first: &G1, second: &G2) -> bool
    where
        G1: AdjacencyTest,
        G2: AdjacencyTest,
    {
        let n = first.number_of_nodes();
        if n != second.number_of_nodes() || self.mapper.len() != n {
            return false;
        }

        let maps_all = first.vertices().all(|u| {
            self.forward(u)
                .is_some_and(|v| second.has_vertex(v) && self.backward(v) == Some(u))
        });
        if !maps_all {
            return false;
        }

        let image_of = |e: EdgeId| -> Option<(Node, Node)> {
            let Edge(u, v) = first.endpoints(e);
            Some((self.forward(u)?, self.forward(v)?))
        };
        let preimage_of = |e: EdgeId| -> Option<(Node, Node)> {
            let Edge(u, v) = second.endpoints(e);
            Some((self.backward(u)?, self.backward(v)?))
        };

        first
            .edge_ids()
            .all(|e| image_of(e).is_some_and(|(u, v)| second.has_edge(u, v)))
            && second
                .edge_ids()
                .all(|e| preimage_of(e).is_some_and(|(u, v)| first.has_edge(u, v)))
    }
}

/// Outcome of the color refinement isomorphism test
#[derive(Debug, Clone)]
pub enum IsomorphismDecision {
    Isomorphic(IsomorphicGraphMapping),
    NotIsomorphic,
    /// Color refinement cannot tell the graphs apart, but cannot prove isomorphism either
    Undecidable,
}

impl IsomorphismDecision {
    pub fn is_isomorphic(&self) -> bool {
        matches!(self, Self::Isomorphic(_))
    }

    pub fn is_undecidable(&self) -> bool {
        matches!(self, Self::Undecidable)
    }
}

/// Tests two graphs for isomorphism using color refinement.
///
/// The decision is computed on first use and cached.
pub struct ColorRefinementIsomorphismInspector<'a, G1, G2>
where
    G1: IncidenceList,
    G2: IncidenceList,
{
    graph1: &'a G1,
    graph2: &'a G2,
    decision: Option<IsomorphismDecision>,
    stable_colorings: Option<(Coloring, Coloring)>,
    forests: Option<bool>,
    refinements: usize,
}

impl<'a, G1, G2> ColorRefinementIsomorphismInspector<'a, G1, G2>
where
    G1: IncidenceList,
    G2: IncidenceList,
{
    /// Fails if exactly one of the graphs is directed or if any of them has parallel edges
    pub fn new(graph1: &'a G1, graph2: &'a G2) -> Result<Self, IsomorphismError> {
        if G1::is_directed() != G2::is_directed() {
            return Err(IsomorphismError::DirectednessMismatch);
        }
        if graph1.has_parallel_edges() || graph2.has_parallel_edges() {
            return Err(IsomorphismError::ParallelEdges);
        }

        Ok(Self {
            graph1,
            graph2,
            decision: None,
            stable_colorings: None,
            forests: None,
            refinements: 0,
        })
    }

    /// Runs the test (once) and returns its outcome
    pub fn decide(&mut self) -> &IsomorphismDecision {
        let decision = match self.decision.take() {
            Some(decision) => decision,
            None => self.run(),
        };
        self.decision.insert(decision)
    }

    /// Returns whether the graphs are isomorphic; an inconclusive test yields
    /// [`IsomorphismError::Undecidable`]
    pub fn isomorphism_exists(&mut self) -> Result<bool, IsomorphismError> {
        match self.decide() {
            IsomorphismDecision::Isomorphic(_) => Ok(true),
            IsomorphismDecision::NotIsomorphic => Ok(false),
            IsomorphismDecision::Undecidable => Err(IsomorphismError::Undecidable),
        }
    }

    /// Iterates over the found mappings (at most one)
    pub fn mappings(&mut self) -> impl Iterator<Item = &IsomorphicGraphMapping> + '_ {
        match self.decide() {
            IsomorphismDecision::Isomorphic(mapping) => Some(mapping),
            _ => None,
        }
        .into_iter()
    }

    /// Returns *true* if the stable colorings of both graphs are discrete.
    /// Refines both graphs if this has not happened yet.
    pub fn is_coloring_discrete(&mut self) -> bool {
        let (c1, c2) = self.stable_colorings();
        c1.is_discrete() && c2.is_discrete()
    }

    /// Returns *true* if both graphs are forests
    pub fn is_forest(&mut self) -> bool {
        let (graph1, graph2) = (self.graph1, self.graph2);
        *self
            .forests
            .get_or_insert_with(|| graph1.is_forest() && graph2.is_forest())
    }

    /// Number of color refinement runs performed so far (two per compared coloring)
    pub fn number_of_refinements(&self) -> usize {
        self.refinements
    }

    fn stable_colorings(&mut self) -> &(Coloring, Coloring) {
        let colorings = match self.stable_colorings.take() {
            Some(colorings) => colorings,
            None => {
                self.refinements += 2;
                (
                    self.graph1.color_refinement(),
                    self.graph2.color_refinement(),
                )
            }
        };
        self.stable_colorings.insert(colorings)
    }

    fn run(&mut self) -> IsomorphismDecision {
        let n = self.graph1.number_of_nodes();
        if n != self.graph2.number_of_nodes() {
            debug!(
                "isomorphism: node counts {n} and {} differ",
                self.graph2.number_of_nodes()
            );
            return IsomorphismDecision::NotIsomorphic;
        }

        let (c1, c2) = self.stable_colorings().clone();
        if !same_color_classes(&c1, &c2) {
            debug!("isomorphism: stable colorings differ");
            return IsomorphismDecision::NotIsomorphic;
        }

        if c1.is_discrete() {
            return match self.verified_mapping(&c1, &c2) {
                Some(mapping) => IsomorphismDecision::Isomorphic(mapping),
                None => IsomorphismDecision::NotIsomorphic,
            };
        }

        if !self.is_forest() {
            debug!(
                "isomorphism: {} colors on {n} nodes and no forest; undecidable",
                c1.number_of_colors()
            );
            return IsomorphismDecision::Undecidable;
        }

        let (c1, c2) = if G1::is_directed() {
            self.refinements += 2;
            (
                refine_both_directions(self.graph1, &c1),
                refine_both_directions(self.graph2, &c2),
            )
        } else {
            (c1, c2)
        };

        match self.individualize_until_discrete(c1, c2) {
            Some(mapping) => IsomorphismDecision::Isomorphic(mapping),
            None => IsomorphismDecision::NotIsomorphic,
        }
    }

    /// Repeatedly individualizes the smallest node of the first non-singleton class in both
    /// graphs and refines again until the colorings are discrete
    fn individualize_until_discrete(
        &mut self,
        mut c1: Coloring,
        mut c2: Coloring,
    ) -> Option<IsomorphicGraphMapping> {
        while !c1.is_discrete() {
            if !same_color_classes(&c1, &c2) {
                return None;
            }

            let classes1 = c1.color_classes();
            let classes2 = c2.color_classes();
            let (class1, class2) = classes1
                .iter()
                .zip(classes2.iter())
                .find(|(class, _)| class.len() > 1)?;
            let (u, v) = (*class1.first()?, *class2.first()?);
            trace!("isomorphism: individualize {u} and {v}");

            c1 = refine_both_directions(self.graph1, &c1.individualized(u));
            c2 = refine_both_directions(self.graph2, &c2.individualized(v));
            self.refinements += 2;
        }

        if !same_color_classes(&c1, &c2) {
            return None;
        }

        self.verified_mapping(&c1, &c2)
    }

    /// Pairs the nodes of equal color of two matching discrete colorings and checks the result
    fn verified_mapping(&self, c1: &Coloring, c2: &Coloring) -> Option<IsomorphicGraphMapping> {
        let mut node_of_color = vec![INVALID_NODE; c2.len() + 1];
        for v in self.graph2.vertices() {
            node_of_color[c2.color_of(v) as usize] = v;
        }

        let mut mapper = NodeMapper::with_capacity(self.graph1.number_of_nodes());
        for u in self.graph1.vertices() {
            mapper.map_node_to(u, node_of_color[c1.color_of(u) as usize]);
        }

        let mapping = IsomorphicGraphMapping::new(mapper);
        let valid = mapping.is_edge_preserving(self.graph1, self.graph2);
        debug!("isomorphism: candidate mapping is {}", if valid { "valid" } else { "invalid" });
        valid.then_some(mapping)
    }
}

/// Equal number of colors and equal class size for every color
fn same_color_classes(c1: &Coloring, c2: &Coloring) -> bool {
    c1.number_of_colors() == c2.number_of_colors() && c1.class_sizes() == c2.class_sizes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gens::*, testing::*};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    fn relabelled<G>(rng: &mut Pcg64Mcg, graph: &G) -> G
    where
        G: IncidenceList + GraphFromScratch,
    {
        NodeMapper::random(rng, graph.number_of_nodes()).relabelled_graph(graph)
    }

    #[test]
    fn two_triangles_are_undecidable() {
        init_logging();
        let mut graph = AdjArrayUndir::new(6);
        graph.connect_cycle([0, 1, 2]);
        graph.connect_cycle([3, 4, 5]);

        let mut inspector = ColorRefinementIsomorphismInspector::new(&graph, &graph).unwrap();
        assert!(inspector.decide().is_undecidable());
        assert_eq!(inspector.isomorphism_exists(), Err(IsomorphismError::Undecidable));
        assert_eq!(inspector.mappings().count(), 0);
        assert!(!inspector.is_coloring_discrete());
        assert!(!inspector.is_forest());
    }

    #[test]
    fn squares_are_undecidable() {
        let mut square1 = AdjArrayUndir::new(4);
        square1.connect_cycle(0..4);
        let mut square2 = SparseAdjArrayUndir::new(4);
        square2.connect_cycle([0, 2, 1, 3]);

        let mut inspector = ColorRefinementIsomorphismInspector::new(&square1, &square2).unwrap();
        assert_eq!(inspector.isomorphism_exists(), Err(IsomorphismError::Undecidable));
    }

    #[test]
    fn paths_are_isomorphic() {
        init_logging();
        let mut path1 = AdjArrayUndir::new(4);
        path1.connect_path(0..4);
        let mut path2 = AdjArrayUndir::new(4);
        path2.connect_path([2, 0, 3, 1]);

        let mut inspector = ColorRefinementIsomorphismInspector::new(&path1, &path2).unwrap();
        assert_eq!(inspector.isomorphism_exists(), Ok(true));
        assert!(inspector.is_forest());
        assert!(!inspector.is_coloring_discrete());

        let mapping = inspector.mappings().next().unwrap().clone();
        assert!(mapping.is_edge_preserving(&path1, &path2));
        assert!(mapping.inverse().is_edge_preserving(&path2, &path1));

        // ends are mapped to ends
        for u in [0, 3] {
            let v = mapping.forward(u).unwrap();
            assert!([2, 1].contains(&v));
            assert_eq!(mapping.vertex_correspondence(v, false), Some(u));
        }
    }

    #[test]
    fn path_and_star_differ() {
        let mut path = AdjArrayUndir::new(4);
        path.connect_path(0..4);
        let star = AdjArrayUndir::from_edges(4, [(0, 1), (0, 2), (0, 3)]);

        let mut inspector = ColorRefinementIsomorphismInspector::new(&path, &star).unwrap();
        assert_eq!(inspector.isomorphism_exists(), Ok(false));
        assert_eq!(inspector.number_of_refinements(), 2);
    }

    #[test]
    fn node_count_bailout() {
        let graph1 = AdjArrayUndir::from_edges(3, [(0, 1)]);
        let graph2 = AdjArrayUndir::from_edges(4, [(0, 1)]);

        let mut inspector = ColorRefinementIsomorphismInspector::new(&graph1, &graph2).unwrap();
        assert_eq!(inspector.isomorphism_exists(), Ok(false));
        assert_eq!(inspector.number_of_refinements(), 0);
    }

    #[test]
    fn discrete_directed_coloring() {
        let graph1 = AdjArray::from_edges(3, [(0, 1), (1, 2)]);
        let graph2 = AdjArray::from_edges(3, [(2, 0), (0, 1)]);

        let mut inspector = ColorRefinementIsomorphismInspector::new(&graph1, &graph2).unwrap();
        assert!(inspector.is_coloring_discrete());
        let mapping = inspector.mappings().next().unwrap().clone();
        assert_eq!(mapping.forward(0), Some(2));
        assert_eq!(mapping.forward(1), Some(0));
        assert_eq!(mapping.forward(2), Some(1));

        let out_star = AdjArray::from_edges(3, [(0, 1), (0, 2)]);
        let mut inspector = ColorRefinementIsomorphismInspector::new(&graph1, &out_star).unwrap();
        assert_eq!(inspector.isomorphism_exists(), Ok(false));
    }

    #[test]
    fn empty_graphs() {
        let graph = AdjArray::new(0);
        let mut inspector = ColorRefinementIsomorphismInspector::new(&graph, &graph).unwrap();
        assert_eq!(inspector.isomorphism_exists(), Ok(true));
    }

    #[test]
    fn preconditions() {
        let directed = AdjArray::from_edges(2, [(0, 1)]);
        let undirected = AdjArrayUndir::from_edges(2, [(0, 1)]);
        assert_eq!(
            ColorRefinementIsomorphismInspector::new(&directed, &undirected).err(),
            Some(IsomorphismError::DirectednessMismatch)
        );

        let multi = AdjArrayUndir::from_edges(2, [(0, 1), (1, 0)]);
        assert_eq!(
            ColorRefinementIsomorphismInspector::new(&undirected, &multi).err(),
            Some(IsomorphismError::ParallelEdges)
        );

        // antiparallel edges are fine in directed graphs
        let antiparallel = AdjArray::from_edges(2, [(0, 1), (1, 0)]);
        assert!(ColorRefinementIsomorphismInspector::new(&antiparallel, &directed).is_ok());
    }

    fn check_against_brute_force<G>(graph1: &G, graph2: &G, expect_isomorphic: bool)
    where
        G: IncidenceList,
    {
        let mut inspector = ColorRefinementIsomorphismInspector::new(graph1, graph2).unwrap();
        match inspector.decide().clone() {
            IsomorphismDecision::Isomorphic(mapping) => {
                assert!(mapping.is_edge_preserving(graph1, graph2));
                assert!(brute_force_isomorphic(graph1, graph2));
            }
            IsomorphismDecision::NotIsomorphic => {
                assert!(!expect_isomorphic);
                assert!(!brute_force_isomorphic(graph1, graph2));
            }
            IsomorphismDecision::Undecidable => {
                assert!(!inspector.is_coloring_discrete());
                assert!(!inspector.is_forest());
            }
        }
    }

    #[test]
    fn random_graphs_against_brute_force() {
        init_logging();
        let rng = &mut Pcg64Mcg::seed_from_u64(0x150);

        for n in 1..=7 {
            for p in [0.2, 0.4, 0.6] {
                for _ in 0..5 {
                    let graph = AdjArrayUndir::gnp(rng, n, p);
                    let other = AdjArrayUndir::gnp(rng, n, p);
                    check_against_brute_force(&graph, &relabelled(rng, &graph), true);
                    check_against_brute_force(&graph, &other, false);

                    let graph = AdjArray::gnp(rng, n, p);
                    let other = AdjArray::gnp(rng, n, p);
                    check_against_brute_force(&graph, &relabelled(rng, &graph), true);
                    check_against_brute_force(&graph, &other, false);
                }
            }
        }
    }

    /// Random forest where each node `u > 0` is attached to an earlier node with probability `p`.
    /// Directed edges point towards or away from the earlier node at random.
    fn random_forest<G: GraphEdgeEditing>(rng: &mut Pcg64Mcg, n: NumNodes, p: f64) -> G {
        let mut forest = G::new(n);
        for u in 1..n {
            if rng.random_bool(p) {
                let parent = rng.random_range(0..u);
                if rng.random_bool(0.5) {
                    forest.add_edge(parent, u);
                } else {
                    forest.add_edge(u, parent);
                }
            }
        }
        forest
    }

    #[test]
    fn forests_are_always_decided() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0x7733);

        for n in 1..=8 {
            for p in [0.5, 0.8, 1.0] {
                for _ in 0..5 {
                    let forest: AdjArrayUndir = random_forest(rng, n, p);
                    let copy = relabelled(rng, &forest);
                    let other: AdjArrayUndir = random_forest(rng, n, p);

                    let mut inspector =
                        ColorRefinementIsomorphismInspector::new(&forest, &copy).unwrap();
                    assert!(inspector.is_forest());
                    let mapping = inspector.mappings().next().unwrap().clone();
                    assert!(mapping.is_edge_preserving(&forest, &copy));

                    let mut inspector =
                        ColorRefinementIsomorphismInspector::new(&forest, &other).unwrap();
                    assert_eq!(
                        inspector.isomorphism_exists(),
                        Ok(brute_force_isomorphic(&forest, &other))
                    );
                }
            }
        }
    }

    #[test]
    fn directed_forest_with_equal_sinks() {
        // sinks 2 and 3 only differ by their predecessors
        let forest = AdjArray::from_edges(4, [(0, 1), (0, 2), (1, 3)]);
        let swapped = AdjArray::from_edges(4, [(0, 1), (0, 3), (1, 2)]);

        let mut inspector = ColorRefinementIsomorphismInspector::new(&forest, &swapped).unwrap();
        assert!(inspector.is_forest());
        assert!(!inspector.is_coloring_discrete());
        let mapping = inspector.mappings().next().unwrap().clone();
        assert!(mapping.is_edge_preserving(&forest, &swapped));
        assert_eq!(mapping.forward(2), Some(3));
        assert_eq!(mapping.forward(3), Some(2));
        assert_eq!(inspector.number_of_refinements(), 4);

        // same undirected shape, different orientation
        let path = AdjArray::from_edges(4, [(0, 1), (2, 0), (1, 3)]);
        let mut inspector = ColorRefinementIsomorphismInspector::new(&forest, &path).unwrap();
        assert_eq!(inspector.isomorphism_exists(), Ok(false));
    }

    #[test]
    fn directed_forests_are_always_decided() {
        init_logging();
        let rng = &mut Pcg64Mcg::seed_from_u64(0xd1f0);

        for n in [1, 2, 5, 10, 25, 60] {
            for p in [0.5, 0.8, 1.0] {
                for _ in 0..10 {
                    let forest: AdjArray = random_forest(rng, n, p);
                    let copy = relabelled(rng, &forest);

                    let mut inspector =
                        ColorRefinementIsomorphismInspector::new(&forest, &copy).unwrap();
                    assert!(inspector.is_forest());
                    let mapping = inspector.mappings().next().unwrap().clone();
                    assert!(mapping.is_edge_preserving(&forest, &copy));

                    if n <= 7 {
                        let other: AdjArray = random_forest(rng, n, p);
                        let mut inspector =
                            ColorRefinementIsomorphismInspector::new(&forest, &other).unwrap();
                        assert_eq!(
                            inspector.isomorphism_exists(),
                            Ok(brute_force_isomorphic(&forest, &other))
                        );
                    }
                }
            }
        }
    }
}
