#[cfg(test)]
use itertools::Itertools;

#[cfg(test)]
use crate::{algo::Color, edge::*, node::*, ops::*};

/// Every graph representation should pass the checks for `GraphNew`, `IncidenceList`,
/// `AdjacencyTest` and `GraphEdgeEditing`
macro_rules! test_graph_ops {
    ($env:ident, $graph:ident, $undirected:literal, ($($trait:ident),*)) => {
        #[cfg(test)]
        mod $env {
            use crate::{edge::*, node::*, ops::*, repr::*, testing::test_graph_ops};
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;
            use itertools::Itertools;

            /// Creates `m` random weighted edges for nodes `0..n` (self-loops and parallel edges included)
            fn random_edges<R: Rng>(rng: &mut R, n: NumNodes, m: NumEdges) -> Vec<WeightedEdge> {
                (0..m).map(|_| {
                    let u = rng.random_range(0..n);
                    let v = rng.random_range(0..n);
                    WeightedEdge(u, v, rng.random_range(1..10) as Weight)
                }).collect_vec()
            }

            /// Key under which an edge is looked up
            fn key(edge: Edge) -> Edge {
                if $undirected { edge.normalized() } else { edge }
            }

            $(
                test_graph_ops!($graph<$undirected>: $trait);
            )*
        }
    };
    ($graph:ident<$undirected:literal>: GraphNew) => {
        #[test]
        fn graph_new() {
            for n in 1..50 {
                let graph = <$graph>::new(n);

                assert_eq!(graph.number_of_edges(), 0);
                assert_eq!(graph.number_of_nodes(), n);
                assert!(graph.is_edgeless());

                assert_eq!(graph.vertices_range().len(), n as usize);
                assert_eq!(graph.vertices().collect_vec(), (0..n).collect_vec());
                assert!(graph.vertices().all(|u| graph.degree_of(u) == 0));
                assert_eq!(<$graph>::is_undirected(), $undirected);
            }
        }
    };
    ($graph:ident<$undirected:literal>: IncidenceList) => {
        #[test]
        fn incidence_list() {
            let rng = &mut Pcg64Mcg::seed_from_u64(3);

            for n in [10 as NumNodes, 20, 50] {
                for m in [n, n * 3, n * 10] {
                    let edges = random_edges(rng, n, m);
                    let graph = <$graph>::from_weighted_edges(n, edges.iter());

                    assert_eq!(graph.number_of_nodes(), n);
                    assert_eq!(graph.number_of_edges(), m);
                    assert_eq!(graph.weighted_edges().collect_vec(), edges);

                    let mut out_edges = vec![Vec::new(); n as usize];
                    let mut in_edges = vec![Vec::new(); n as usize];
                    for (e, &WeightedEdge(u, v, _)) in edges.iter().enumerate() {
                        let e = e as EdgeId;
                        out_edges[u as usize].push(e);
                        if $undirected {
                            if u != v {
                                out_edges[v as usize].push(e);
                            }
                        } else {
                            in_edges[v as usize].push(e);
                        }
                    }

                    for u in 0..n {
                        let expected_out = &out_edges[u as usize];
                        let expected_in = if $undirected { expected_out } else { &in_edges[u as usize] };

                        assert_eq!(&graph.out_edges_of(u).collect_vec(), expected_out);
                        assert_eq!(&graph.in_edges_of(u).collect_vec(), expected_in);
                        assert_eq!(graph.out_degree_of(u) as usize, expected_out.len());
                        assert_eq!(graph.in_degree_of(u) as usize, expected_in.len());
                        assert_eq!(graph.edges_of(u).count(), graph.degree_of(u) as usize);

                        for v in graph.out_neighbors_of(u) {
                            assert!(graph.in_neighbors_of(v).contains(&u));
                        }

                        for e in graph.edges_of(u) {
                            let Edge(a, b) = graph.endpoints(e);
                            assert!(a == u || b == u);
                            assert_eq!(graph.opposite(e, graph.opposite(e, u)), u);
                        }
                    }
                }
            }
        }
    };
    ($graph:ident<$undirected:literal>: AdjacencyTest) => {
        #[test]
        fn adjacency_test() {
            let rng = &mut Pcg64Mcg::seed_from_u64(5);

            for n in [5 as NumNodes, 15] {
                for m in [n, n * 4] {
                    let edges = random_edges(rng, n, m);
                    let graph = <$graph>::from_weighted_edges(n, edges.iter());
                    let keys = edges.iter().map(|e| key(e.edge())).collect_vec();

                    for u in 0..n {
                        for v in 0..n {
                            assert_eq!(graph.has_edge(u, v), keys.contains(&key(Edge(u, v))));
                            if let Some(e) = graph.find_edge(u, v) {
                                assert_eq!(key(graph.endpoints(e)), key(Edge(u, v)));
                            }
                        }
                    }

                    assert_eq!(graph.has_parallel_edges(), keys.iter().unique().count() < keys.len());
                    assert_eq!(graph.has_self_loops(), keys.iter().any(|e| e.is_loop()));
                }
            }
        }
    };
    ($graph:ident<$undirected:literal>: GraphEdgeEditing) => {
        #[test]
        fn edge_editing() {
            let mut graph = <$graph>::new(4);
            let a = graph.add_edge(0, 1);
            let b = graph.add_weighted_edge(1, 2, 2.5);
            let c = graph.add_weighted_edge(2, 2, 0.5);
            let d = graph.add_edge(0, 1);

            assert_eq!((a, b, c, d), (0, 1, 2, 3));
            assert_eq!(graph.weight_of(a), DEFAULT_EDGE_WEIGHT);

            graph.set_edge_weight(b, 4.0);
            assert_eq!(graph.weight_of(b), 4.0);
            assert_eq!(graph.total_weight(), 6.5);

            assert_eq!(graph.out_neighbors_of(0).collect_vec(), vec![1, 1]);
            assert_eq!(graph.has_edge(1, 0), $undirected);
            assert!(graph.has_parallel_edges());
            assert!(graph.has_self_loops());

            if $undirected {
                assert_eq!(graph.in_neighbors_of(1).collect_vec(), vec![0, 2, 0]);
            } else {
                assert_eq!(graph.in_neighbors_of(1).collect_vec(), vec![0, 0]);
            }
        }

        #[test]
        #[should_panic]
        fn edge_out_of_range() {
            let mut graph = <$graph>::new(3);
            graph.add_edge(1, 3);
        }
    };
}

pub(crate) use test_graph_ops;

/// Installs `env_logger` in test mode so `RUST_LOG=trace cargo test` shows algorithm logs
#[cfg(test)]
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Weight of all edges leaving `side` (directed) or crossing it (undirected)
#[cfg(test)]
pub(crate) fn cut_weight<G>(graph: &G, side: &NodeBitSet) -> Weight
where
    G: EdgeAttributes + GraphType,
{
    graph
        .weighted_edges()
        .filter(|&WeightedEdge(u, v, _)| {
            if G::is_directed() {
                side.get_bit(u) && !side.get_bit(v)
            } else {
                side.get_bit(u) != side.get_bit(v)
            }
        })
        .map(|e| e.weight())
        .sum()
}

/// Minimum `s-t` cut by enumerating all node sets that contain `s` but not `t`
#[cfg(test)]
pub(crate) fn brute_force_min_cut<G>(graph: &G, s: Node, t: Node) -> Weight
where
    G: GraphNodeOrder + EdgeAttributes + GraphType,
{
    let n = graph.number_of_nodes();
    assert!(n <= 16, "brute force is limited to tiny graphs");

    (0u32..(1 << n))
        .filter(|mask| mask & (1 << s) != 0 && mask & (1 << t) == 0)
        .map(|mask| {
            let side = NodeBitSet::new_with_bits_set(n, (0..n).filter(|u| mask & (1 << u) != 0));
            cut_weight(graph, &side)
        })
        .fold(Weight::INFINITY, Weight::min)
}

/// Decides isomorphism of two simple graphs by trying every permutation
#[cfg(test)]
pub(crate) fn brute_force_isomorphic<G1, G2>(g1: &G1, g2: &G2) -> bool
where
    G1: AdjacencyTest,
    G2: AdjacencyTest,
{
    let n = g1.number_of_nodes();
    if n != g2.number_of_nodes() || g1.number_of_edges() != g2.number_of_edges() {
        return false;
    }
    assert!(n <= 8, "brute force is limited to tiny graphs");

    (0..n).permutations(n as usize).any(|perm| {
        g1.edge_ids().all(|e| {
            let Edge(u, v) = g1.endpoints(e);
            g2.has_edge(perm[u as usize], perm[v as usize])
        })
    })
}

/// Textbook 1-dimensional Weisfeiler-Leman: recolor by (own color, multiset of colors of the
/// distinct out-neighbors) until the number of classes stops growing
#[cfg(test)]
pub(crate) fn naive_stable_partition<G>(graph: &G, initial: &[Color]) -> Vec<usize>
where
    G: IncidenceList,
{
    let mut colors = initial.iter().map(|&c| c as usize).collect_vec();
    let mut num_classes = colors.iter().unique().count();

    loop {
        let signatures = graph
            .vertices()
            .map(|u| {
                let mut nbs = graph
                    .out_neighbors_of(u)
                    .unique()
                    .map(|v| colors[v as usize])
                    .collect_vec();
                nbs.sort_unstable();
                (colors[u as usize], nbs)
            })
            .collect_vec();

        let distinct = signatures.iter().sorted().dedup().collect_vec();
        colors = signatures
            .iter()
            .map(|s| distinct.binary_search(&s).unwrap())
            .collect_vec();

        if distinct.len() == num_classes {
            return colors;
        }
        num_classes = distinct.len();
    }
}

/// Returns *true* if both labelings induce the same partition of `0..n`
#[cfg(test)]
pub(crate) fn same_partition<A: Eq, B: Eq>(a: &[A], b: &[B]) -> bool {
    a.len() == b.len()
        && (0..a.len()).all(|u| (0..a.len()).all(|v| (a[u] == a[v]) == (b[u] == b[v])))
}
