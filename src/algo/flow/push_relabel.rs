/*!
# Push-Relabel Maximum Flow

FIFO variant of Goldberg and Tarjan's push-relabel algorithm on a [`ResidualNetwork`].

Each node carries a *label* (a lower bound on its residual distance to the sink) and an
*excess*. The source starts at label `n` and saturates all of its arcs. Afterwards active nodes
are discharged in FIFO order: excess is pushed along admissible arcs (`label(u) == label(v) + 1`)
and a node that cannot get rid of its excess is relabelled to one more than its lowest residual
neighbor. The run ends when no node other than source and sink holds excess; the flow value is
the excess of the sink.

The optional *gap heuristic* lifts every node above an empty label level `k < n` to `n + 1`,
since none of them can reach the sink anymore.
*/

use std::collections::VecDeque;

use log::{debug, trace};

use super::*;

/// Label of nodes without any residual arc
const INFINITE_LABEL: u32 = u32::MAX;

/// Work counters of a single push-relabel run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushRelabelStats {
    pub pushes: u64,
    pub relabels: u64,
    pub gap_lifts: u64,
    pub discharges: u64,
}

/// Result of the last successful run
#[derive(Debug, Clone)]
struct CachedFlow {
    source: Node,
    sink: Node,
    value: Weight,
    flow_map: Vec<Weight>,
    source_partition: NodeBitSet,
    stats: PushRelabelStats,
}

/// Push-relabel maximum flow / minimum cut on a weighted graph.
///
/// The residual network is built on first use and reused for later source/sink pairs.
/// Repeated queries for the same pair are answered from the cache.
///
/// # Example
/// ```
/// use wgraphs::{prelude::*, algo::*};
///
/// let graph = AdjArrayUndir::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
/// let mut flow = PushRelabel::new(&graph);
/// assert_eq!(flow.calculate_maximum_flow(0, 2).unwrap(), 2.0);
/// ```
pub struct PushRelabel<'a, G>
where
    G: IncidenceList,
{
    graph: &'a G,
    network: Option<ResidualNetwork>,
    cmp: ToleranceComparator,
    gap_heuristic: bool,
    discharge_budget: Option<u64>,
    cached: Option<CachedFlow>,
}

impl<'a, G> PushRelabel<'a, G>
where
    G: IncidenceList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            network: None,
            cmp: ToleranceComparator::default(),
            gap_heuristic: true,
            discharge_budget: None,
            cached: None,
        }
    }

    /// Sets the tolerance for all capacity comparisons
    /// ** Panics if `epsilon` is not a positive finite number **
    pub fn set_epsilon(&mut self, epsilon: Weight) {
        self.cmp = ToleranceComparator::new(epsilon);
        self.network = None;
        self.cached = None;
    }

    /// Sets the tolerance for all capacity comparisons
    /// ** Panics if `epsilon` is not a positive finite number **
    pub fn epsilon(mut self, epsilon: Weight) -> Self {
        self.set_epsilon(epsilon);
        self
    }

    /// Enables or disables the gap heuristic (enabled by default)
    pub fn set_gap_heuristic(&mut self, enabled: bool) {
        self.gap_heuristic = enabled;
        self.cached = None;
    }

    /// Enables or disables the gap heuristic (enabled by default)
    pub fn gap_heuristic(mut self, enabled: bool) -> Self {
        self.set_gap_heuristic(enabled);
        self
    }

    /// Limits the number of node discharges per run; `None` means unlimited
    pub fn set_discharge_budget(&mut self, budget: Option<u64>) {
        self.discharge_budget = budget;
        self.cached = None;
    }

    /// Limits the number of node discharges per run; `None` means unlimited
    pub fn discharge_budget(mut self, budget: Option<u64>) -> Self {
        self.set_discharge_budget(budget);
        self
    }

    /// Work counters of the last successful run
    pub fn stats(&self) -> Option<PushRelabelStats> {
        self.cached.as_ref().map(|c| c.stats)
    }

    /// Source and sink of the last successful run
    pub fn last_terminals(&self) -> Option<(Node, Node)> {
        self.cached.as_ref().map(|c| (c.source, c.sink))
    }

    fn compute(&mut self, source: Node, sink: Node) -> Result<&CachedFlow, FlowError> {
        check_terminals(self.graph, source, sink)?;

        let is_cached = self
            .cached
            .as_ref()
            .is_some_and(|c| c.source == source && c.sink == sink);

        if !is_cached {
            self.cached = None;

            let mut network = match self.network.take() {
                Some(mut network) => {
                    network.reset();
                    network
                }
                None => ResidualNetwork::build(self.graph, self.cmp)?,
            };

            let mut run = PushRelabelRun::new(
                &mut network,
                self.cmp,
                source,
                sink,
                self.gap_heuristic,
                self.discharge_budget,
            );
            let outcome = run.execute().map(|value| (value, run.stats));

            let cached = outcome.map(|(value, stats)| CachedFlow {
                source,
                sink,
                value,
                flow_map: network.flow_map(),
                source_partition: network.reachable_from(source),
                stats,
            });
            self.network = Some(network);
            let cached = cached?;

            let stats = cached.stats;
            debug!(
                "push-relabel {source} -> {sink}: value {}, {} pushes, {} relabels, {} gap lifts, {} discharges",
                cached.value, stats.pushes, stats.relabels, stats.gap_lifts, stats.discharges
            );
            self.cached = Some(cached);
        }

        self.cached.as_ref().ok_or(FlowError::NotComputed)
    }

    fn last(&self) -> Result<&CachedFlow, FlowError> {
        self.cached.as_ref().ok_or(FlowError::NotComputed)
    }
}

impl<G> MaximumFlowAlgorithm for PushRelabel<'_, G>
where
    G: IncidenceList,
{
    fn calculate_maximum_flow(&mut self, source: Node, sink: Node) -> Result<Weight, FlowError> {
        Ok(self.compute(source, sink)?.value)
    }

    fn maximum_flow_value(&self) -> Option<Weight> {
        self.cached.as_ref().map(|c| c.value)
    }

    fn flow_map(&self) -> Result<&[Weight], FlowError> {
        Ok(&self.last()?.flow_map)
    }

    fn flow_direction(&self, e: EdgeId) -> Result<Node, FlowError> {
        self.last()?;
        if !self.graph.has_edge_id(e) {
            return Err(FlowError::EdgeNotFound(e));
        }

        // self-loops have no arcs and their flow stays at zero
        Ok(self
            .network
            .as_ref()
            .and_then(|network| network.edge_direction(e))
            .unwrap_or_else(|| self.graph.edge_target(e)))
    }
}

impl<G> MinimumSTCutAlgorithm for PushRelabel<'_, G>
where
    G: IncidenceList,
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

/// State of a single run on a freshly reset network
struct PushRelabelRun<'n> {
    network: &'n mut ResidualNetwork,
    cmp: ToleranceComparator,
    sink: Node,
    n: u32,

    labels: Vec<u32>,
    excess: Vec<Weight>,
    label_count: Vec<u32>,

    active: NodeBitSet,
    queue: VecDeque<Node>,

    gap_heuristic: bool,
    budget: Option<u64>,
    stats: PushRelabelStats,
}

impl<'n> PushRelabelRun<'n> {
    fn new(
        network: &'n mut ResidualNetwork,
        cmp: ToleranceComparator,
        source: Node,
        sink: Node,
        gap_heuristic: bool,
        budget: Option<u64>,
    ) -> Self {
        let n = network.number_of_nodes();

        let mut labels = vec![0; n as usize];
        labels[source as usize] = n;

        let mut label_count = vec![0; 2 * n as usize + 2];
        label_count[0] = n - 1;
        label_count[n as usize] = 1;

        // source and sink never become active
        let active = NodeBitSet::new_with_bits_set(n, [source, sink]);

        let mut run = Self {
            network,
            cmp,
            sink,
            n,
            labels,
            excess: vec![0.0; n as usize],
            label_count,
            active,
            queue: VecDeque::new(),
            gap_heuristic,
            budget,
            stats: PushRelabelStats::default(),
        };

        for i in 0..run.network.out_arcs_of(source).len() {
            let a = run.network.out_arcs_of(source)[i];
            let spare = run.network.arc(a).spare();
            if run.cmp.is_positive(spare) {
                run.excess[source as usize] += spare;
                run.push(source, a, spare);
            }
        }

        run
    }

    fn execute(&mut self) -> Result<Weight, FlowError> {
        while let Some(u) = self.queue.pop_front() {
            self.active.clear_bit(u);

            if let Some(budget) = self.budget {
                if self.stats.discharges >= budget {
                    debug!("push-relabel aborted after {budget} discharges");
                    return Err(FlowError::BudgetExhausted(budget));
                }
            }
            self.stats.discharges += 1;

            self.discharge(u);
        }

        Ok(self.excess[self.sink as usize])
    }

    fn discharge(&mut self, u: Node) {
        for i in 0..self.network.out_arcs_of(u).len() {
            if !self.cmp.is_positive(self.excess[u as usize]) {
                break;
            }

            let a = self.network.out_arcs_of(u)[i];
            let arc = self.network.arc(a);
            let spare = arc.spare();
            if self.cmp.is_positive(spare)
                && self.labels[u as usize] == self.labels[arc.target() as usize].saturating_add(1)
            {
                let amount = self.cmp.min(self.excess[u as usize], spare);
                self.push(u, a, amount);
            }
        }

        if !self.cmp.is_positive(self.excess[u as usize]) {
            return;
        }

        let k = self.labels[u as usize];
        if self.gap_heuristic && k < self.n && self.label_count[k as usize] == 1 {
            self.gap(k);
        } else {
            self.relabel(u);
        }

        if self.labels[u as usize] != INFINITE_LABEL && !self.active.set_bit(u) {
            self.queue.push_back(u);
        }
    }

    fn push(&mut self, u: Node, a: ArcId, amount: Weight) {
        let v = self.network.arc(a).target();
        self.network.push_flow(a, amount);
        self.excess[u as usize] -= amount;
        self.excess[v as usize] += amount;
        self.stats.pushes += 1;

        if !self.active.set_bit(v) {
            self.queue.push_back(v);
        }
    }

    fn relabel(&mut self, u: Node) {
        let lowest = self
            .network
            .out_arcs_of(u)
            .iter()
            .map(|&a| self.network.arc(a))
            .filter(|arc| self.cmp.is_positive(arc.spare()))
            .map(|arc| self.labels[arc.target() as usize])
            .min();

        let label = match lowest {
            Some(l) => l.saturating_add(1),
            None => {
                debug_assert!(false, "node {u} holds excess but has no residual arc");
                INFINITE_LABEL
            }
        };

        trace!("relabel {u}: {} -> {label}", self.labels[u as usize]);
        self.set_label(u, label);
        self.stats.relabels += 1;
    }

    /// Lifts every node with label in `k..n` to `n + 1`; the source is never touched
    fn gap(&mut self, k: u32) {
        let lifted = (0..self.n)
            .filter(|&v| (k..self.n).contains(&self.labels[v as usize]))
            .collect::<Vec<_>>();

        trace!("gap at label {k} lifts {} nodes", lifted.len());
        for &v in &lifted {
            self.set_label(v, self.n + 1);
        }
        self.stats.gap_lifts += lifted.len() as u64;
    }

    fn set_label(&mut self, u: Node, label: u32) {
        let old = std::mem::replace(&mut self.labels[u as usize], label);
        if let Some(c) = self.label_count.get_mut(old as usize) {
            *c -= 1;
        }
        if let Some(c) = self.label_count.get_mut(label as usize) {
            *c += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gens::*, testing::*};
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    /// Checks capacity constraints and flow conservation of the last computed flow
    fn assert_valid_flow<G, M>(graph: &G, s: Node, t: Node, algo: &M)
    where
        G: IncidenceList,
        M: MaximumFlowAlgorithm,
    {
        let cmp = ToleranceComparator::new(1e-6);
        let value = algo.maximum_flow_value().unwrap();
        let flow = algo.flow_map().unwrap();
        assert_eq!(flow.len(), graph.number_of_edges() as usize);

        let mut balance = vec![0.0; graph.len()];
        for e in graph.edge_ids() {
            let f = flow[e as usize];
            assert!(!cmp.lt(f, 0.0) && !cmp.gt(f, graph.weight_of(e)), "edge {e}: {f}");

            if graph.endpoints(e).is_loop() {
                assert_eq!(f, 0.0);
                continue;
            }
            let head = algo.flow_direction(e).unwrap();
            let tail = graph.opposite(e, head);
            balance[tail as usize] -= f;
            balance[head as usize] += f;
        }

        for u in graph.vertices() {
            let expected = if u == s {
                -value
            } else if u == t {
                value
            } else {
                0.0
            };
            assert!(cmp.eq(balance[u as usize], expected), "node {u}: {}", balance[u as usize]);
        }
    }

    #[test]
    fn triangle() {
        init_logging();
        let graph = AdjArrayUndir::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
        let mut algo = PushRelabel::new(&graph);

        assert_eq!(algo.calculate_maximum_flow(0, 2).unwrap(), 2.0);
        assert_eq!(algo.maximum_flow_value(), Some(2.0));
        assert_eq!(algo.flow_map().unwrap(), &[1.0, 1.0, 1.0]);
        assert_eq!(algo.flow_direction(0).unwrap(), 1);
        assert_eq!(algo.flow_direction(1).unwrap(), 2);
        assert_eq!(algo.flow_direction(2).unwrap(), 2);

        assert_eq!(algo.source_partition().unwrap().iter_set_bits().collect_vec(), vec![0]);
        assert_eq!(algo.sink_partition().unwrap().iter_set_bits().collect_vec(), vec![1, 2]);
        assert_eq!(algo.cut_edges().unwrap(), vec![0, 2]);
    }

    #[test]
    fn directed_with_antiparallel_edges() {
        let graph = AdjArray::from_weighted_edges(
            4,
            [
                (0, 1, 3.0),
                (1, 0, 2.0),
                (0, 2, 2.0),
                (1, 2, 1.0),
                (2, 1, 5.0),
                (1, 3, 2.0),
                (2, 3, 3.0),
            ],
        );
        let mut algo = PushRelabel::new(&graph);
        let flow = algo.maximum_flow(0, 3).unwrap();

        assert_eq!(flow.value, 5.0);
        assert_eq!(flow.flow, algo.flow_map().unwrap());
        assert_valid_flow(&graph, 0, 3, &algo);
        assert_eq!(algo.flow_direction(1).unwrap(), 0);

        assert_eq!(algo.calculate_maximum_flow(3, 0).unwrap(), 0.0);
        assert_eq!(algo.source_partition().unwrap().iter_set_bits().collect_vec(), vec![3]);
        assert!(algo.cut_edges().unwrap().is_empty());
    }

    #[test]
    fn self_loops_and_parallel_edges() {
        let graph = AdjArrayUndir::from_weighted_edges(
            3,
            [(0, 0, 9.0), (0, 1, 1.5), (0, 1, 2.5), (1, 1, 1.0), (1, 2, 10.0)],
        );
        let mut algo = PushRelabel::new(&graph);

        assert_eq!(algo.calculate_maximum_flow(0, 2).unwrap(), 4.0);
        assert_eq!(algo.flow_map().unwrap(), &[0.0, 1.5, 2.5, 0.0, 4.0]);
        assert_eq!(algo.flow_direction(0).unwrap(), 0);
        assert_eq!(algo.flow_direction(9), Err(FlowError::EdgeNotFound(9)));
    }

    #[test]
    fn precondition_errors() {
        let graph = AdjArray::from_weighted_edges(3, [(0, 1, 1.0), (1, 2, -2.0)]);
        let mut algo = PushRelabel::new(&graph);

        assert_eq!(algo.flow_map(), Err(FlowError::NotComputed));
        assert_eq!(algo.source_partition(), Err(FlowError::NotComputed));
        assert_eq!(algo.calculate_maximum_flow(0, 3), Err(FlowError::NodeNotFound(3)));
        assert_eq!(algo.calculate_maximum_flow(1, 1), Err(FlowError::SourceEqualsSink(1)));
        assert_eq!(
            algo.calculate_maximum_flow(0, 2),
            Err(FlowError::NegativeWeight {
                edge: 1,
                weight: -2.0
            })
        );
        assert_eq!(algo.maximum_flow_value(), None);
    }

    #[test]
    fn budget_exhausted() {
        let mut graph = AdjArrayUndir::new(30);
        graph.connect_path(0..30);
        let mut algo = PushRelabel::new(&graph).discharge_budget(Some(3));

        assert_eq!(algo.calculate_maximum_flow(0, 29), Err(FlowError::BudgetExhausted(3)));
        assert_eq!(algo.maximum_flow_value(), None);

        algo.set_discharge_budget(None);
        assert_eq!(algo.calculate_maximum_flow(0, 29).unwrap(), 1.0);
    }

    #[test]
    fn gap_lifts_stranded_node() {
        // node 1 receives 2 units but can only forward 1; once it is alone on label 1,
        // the gap heuristic lifts it above the source instead of relabelling
        let graph = AdjArray::from_weighted_edges(3, [(0, 1, 2.0), (1, 2, 1.0)]);

        let mut algo = PushRelabel::new(&graph);
        assert_eq!(algo.calculate_maximum_flow(0, 2).unwrap(), 1.0);
        let with_gap = algo.stats().unwrap();
        assert!(with_gap.gap_lifts > 0);

        algo.set_gap_heuristic(false);
        assert_eq!(algo.calculate_maximum_flow(0, 2).unwrap(), 1.0);
        let without_gap = algo.stats().unwrap();
        assert_eq!(without_gap.gap_lifts, 0);
        assert!(without_gap.relabels > with_gap.relabels);
    }

    #[test]
    fn coarse_epsilon_ignores_tiny_capacities() {
        let graph = AdjArray::from_weighted_edges(3, [(0, 1, 1.0), (1, 2, 0.05)]);

        let mut fine = PushRelabel::new(&graph);
        assert_eq!(fine.calculate_maximum_flow(0, 2).unwrap(), 0.05);
        let side = fine.source_partition().unwrap();
        assert!(side.get_bit(1) && !side.get_bit(2));

        // 0.05 is below the tolerance, so the arc into the sink counts as saturated from the start
        let mut coarse = PushRelabel::new(&graph).epsilon(0.1);
        assert_eq!(coarse.calculate_maximum_flow(0, 2).unwrap(), 0.0);
        assert_eq!(coarse.cut_edges().unwrap(), vec![1]);

        coarse.set_epsilon(1e-9);
        assert_eq!(coarse.calculate_maximum_flow(0, 2).unwrap(), 0.05);
    }

    #[test]
    fn cached_results() {
        let mut graph = AdjArrayUndir::new(6);
        graph.connect_cycle(0..6);
        let mut algo = PushRelabel::new(&graph);

        assert_eq!(algo.calculate_maximum_flow(0, 3).unwrap(), 2.0);
        let stats = algo.stats().unwrap();
        assert!(stats.pushes > 0);

        assert_eq!(algo.calculate_maximum_flow(0, 3).unwrap(), 2.0);
        assert_eq!(algo.stats(), Some(stats));
        assert_eq!(algo.last_terminals(), Some((0, 3)));

        assert_eq!(algo.calculate_maximum_flow(1, 2).unwrap(), 2.0);
        assert_eq!(algo.last_terminals(), Some((1, 2)));
    }

    #[test]
    fn random_against_brute_force() {
        init_logging();
        let rng = &mut Pcg64Mcg::seed_from_u64(0x1234);

        for directed in [false, true] {
            for n in [2, 5, 8, 11] {
                for p in [0.2, 0.5, 0.8] {
                    let edges = Gnp::new().nodes(n).prob(p).weights(0..=6).generate(rng, directed);

                    for gap in [true, false] {
                        if directed {
                            let graph = AdjArray::from_weighted_edges(n, edges.iter());
                            check_all_pairs(&graph, gap);
                        } else {
                            let graph = AdjArrayUndir::from_weighted_edges(n, edges.iter());
                            check_all_pairs(&graph, gap);
                        }
                    }
                }
            }
        }
    }

    fn check_all_pairs<G: IncidenceList>(graph: &G, gap: bool) {
        let mut algo = PushRelabel::new(graph).gap_heuristic(gap);
        let cmp = ToleranceComparator::new(1e-6);

        for (s, t) in graph.vertices_range().tuple_combinations() {
            for (s, t) in [(s, t), (t, s)] {
                let value = algo.calculate_maximum_flow(s, t).unwrap();
                let expected = brute_force_min_cut(graph, s, t);
                assert!(cmp.eq(value, expected), "{s}->{t}: {value} vs {expected}");

                assert_valid_flow(graph, s, t, &algo);

                let side = algo.source_partition().unwrap();
                assert!(side.get_bit(s) && !side.get_bit(t));
                assert!(cmp.eq(cut_weight(graph, &side), value));

                let cut_total: Weight = algo
                    .cut_edges()
                    .unwrap()
                    .into_iter()
                    .map(|e| graph.weight_of(e))
                    .sum();
                assert!(cmp.eq(cut_total, value));
            }
        }
    }
}
