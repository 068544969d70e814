use itertools::Itertools;

use super::*;

/// Connectivity queries on the underlying undirected graph
pub trait Connectivity: IncidenceList {
    /// Returns an iterator over the weakly connected components (ignoring edge orientation).
    /// Each component is emitted as the nodes in BFS order from its smallest node.
    fn connected_components(&self) -> ConnectedComponents<'_, Self> {
        ConnectedComponents::new(self)
    }

    /// Returns the number of weakly connected components; an empty graph has none
    fn number_of_connected_components(&self) -> NumNodes {
        self.connected_components().count() as NumNodes
    }

    /// Returns *true* if the underlying undirected multigraph has no cycle.
    ///
    /// Self-loops, parallel edges and directed 2-cycles all count as cycles.
    fn is_forest(&self) -> bool {
        self.number_of_edges() as u64 + self.number_of_connected_components() as u64
            == self.number_of_nodes() as u64
    }
}

impl<G: IncidenceList> Connectivity for G {}

/// Iterator over the weakly connected components of a graph
pub struct ConnectedComponents<'a, G>
where
    G: IncidenceList,
{
    bfs: Option<BFS<'a, G>>,
}

impl<'a, G> ConnectedComponents<'a, G>
where
    G: IncidenceList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            bfs: (!graph.is_empty()).then(|| graph.bfs_undirected(0)),
        }
    }
}

impl<G> Iterator for ConnectedComponents<'_, G>
where
    G: IncidenceList,
{
    type Item = Vec<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let bfs = self.bfs.as_mut()?;
        loop {
            let cc = bfs.by_ref().collect_vec();
            if !cc.is_empty() {
                return Some(cc);
            }

            if !bfs.try_restart_at_unvisited() {
                return None;
            }
        }
    }
}
