/*!
Graph traversal iterators.

[`TraversalSearch`] is generic over its frontier ([`NodeSequencer`]): a `VecDeque` yields a
breadth-first search, a `Vec` a depth-first search. A traversal either follows edges in their
direction or treats the graph as undirected, and individual edges can be excluded, which is how
the components of a tree with one edge removed are found.
*/

use std::collections::VecDeque;

use fxhash::FxHashSet;
use itertools::Either;

use super::*;

/// Abstraction for the traversal frontier data structure.
///
/// - [`VecDeque`] -> queue semantics -> **BFS**
/// - [`Vec`] -> stack semantics -> **DFS**
pub trait NodeSequencer {
    /// Creates a new sequencer initialized with a single node.
    fn init(u: Node) -> Self;

    /// Pushes a node into the frontier.
    fn push(&mut self, u: Node);

    /// Removes and returns the next node from the frontier.
    fn pop(&mut self) -> Option<Node>;

    /// Returns the number of items currently in the frontier.
    fn cardinality(&self) -> usize;
}

impl NodeSequencer for VecDeque<Node> {
    fn init(u: Node) -> Self {
        Self::from(vec![u])
    }
    fn push(&mut self, u: Node) {
        self.push_back(u)
    }
    fn pop(&mut self) -> Option<Node> {
        self.pop_front()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

impl NodeSequencer for Vec<Node> {
    fn init(u: Node) -> Self {
        vec![u]
    }
    fn push(&mut self, u: Node) {
        self.push(u)
    }
    fn pop(&mut self) -> Option<Node> {
        self.pop()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

/// Which edges a traversal may take from a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalDirection {
    /// Follow out-edges only
    #[default]
    Forward,
    /// Follow every incident edge regardless of its orientation
    Undirected,
}

/// Generic traversal iterator supporting BFS and DFS variants.
///
/// Yields every node reachable from the start node exactly once (including the start node).
pub struct TraversalSearch<'a, G, S>
where
    G: IncidenceList,
    S: NodeSequencer,
{
    graph: &'a G,
    visited: NodeBitSet,
    sequencer: S,
    direction: TraversalDirection,
    excluded_edges: FxHashSet<EdgeId>,
    stop_at: Option<Node>,
}

/// A BFS traversal iterator over the graph, visiting nodes in
/// breadth-first order from a given starting node.
pub type BFS<'a, G> = TraversalSearch<'a, G, VecDeque<Node>>;

/// A DFS traversal iterator over the graph, visiting nodes in
/// depth-first order from a given starting node.
pub type DFS<'a, G> = TraversalSearch<'a, G, Vec<Node>>;

impl<'a, G, S> TraversalSearch<'a, G, S>
where
    G: IncidenceList,
    S: NodeSequencer,
{
    /// Creates a new traversal iterator starting from `start`.
    /// ** Panics if `start >= n` **
    pub fn new(graph: &'a G, start: Node) -> Self {
        let mut visited = graph.vertex_bitset_unset();
        visited.set_bit(start);
        Self {
            graph,
            visited,
            sequencer: S::init(start),
            direction: TraversalDirection::default(),
            excluded_edges: FxHashSet::default(),
            stop_at: None,
        }
    }

    /// Sets which edges may be taken
    pub fn set_direction(&mut self, direction: TraversalDirection) {
        self.direction = direction;
    }

    /// Sets which edges may be taken
    pub fn direction(mut self, direction: TraversalDirection) -> Self {
        self.set_direction(direction);
        self
    }

    /// Excludes an edge from the search; it will never be taken in either direction.
    pub fn exclude_edge(&mut self, e: EdgeId) {
        self.excluded_edges.insert(e);
    }

    /// Excludes an edge from the search; it will never be taken in either direction.
    pub fn with_edge_excluded(mut self, e: EdgeId) -> Self {
        self.exclude_edge(e);
        self
    }

    /// Sets a stopper node. If this node is reached, the iterator returns it and afterwards only None.
    pub fn stop_at(mut self, stopper: Node) -> Self {
        self.stop_at = Some(stopper);
        self
    }

    /// Returns the set of nodes discovered so far
    pub fn visited(&self) -> &NodeBitSet {
        &self.visited
    }

    /// Checks if a given node `u` has already been discovered.
    pub fn did_visit_node(&self, u: Node) -> bool {
        self.visited.get_bit(u)
    }

    /// Runs the search to completion and returns the set of reached nodes
    pub fn into_visited(mut self) -> NodeBitSet {
        while self.next().is_some() {}
        self.visited
    }

    /// Tries to restart the search at an yet unvisited node and returns
    /// true iff successful. Requires that search came to a hold earlier,
    /// i.e. self.next() returned None
    pub fn try_restart_at_unvisited(&mut self) -> bool {
        assert_eq!(self.sequencer.cardinality(), 0);
        match self.graph.vertices().find(|&u| !self.visited.get_bit(u)) {
            None => false,
            Some(x) => {
                self.visited.set_bit(x);
                self.sequencer.push(x);
                true
            }
        }
    }
}

impl<G, S> Iterator for TraversalSearch<'_, G, S>
where
    G: IncidenceList,
    S: NodeSequencer,
{
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        let u = self.sequencer.pop()?;

        if self.stop_at == Some(u) {
            while self.sequencer.pop().is_some() {} // drop all
            return Some(u);
        }

        let graph = self.graph;
        let edges = match self.direction {
            TraversalDirection::Forward => Either::Left(graph.out_edges_of(u)),
            TraversalDirection::Undirected => Either::Right(graph.edges_of(u)),
        };

        for e in edges {
            if self.excluded_edges.contains(&e) {
                continue;
            }
            let v = graph.opposite(e, u);
            if !self.visited.set_bit(v) {
                self.sequencer.push(v);
            }
        }

        Some(u)
    }
}

/// Offers traversal algorithms as methods of the graph itself
pub trait Traversal: IncidenceList {
    /// Returns an iterator traversing nodes in breadth-first-search order
    fn bfs(&self, start: Node) -> BFS<'_, Self> {
        BFS::new(self, start)
    }

    /// Returns an iterator traversing nodes in depth-first-search order
    fn dfs(&self, start: Node) -> DFS<'_, Self> {
        DFS::new(self, start)
    }

    /// Breadth-first search in the underlying undirected graph
    fn bfs_undirected(&self, start: Node) -> BFS<'_, Self> {
        BFS::new(self, start).direction(TraversalDirection::Undirected)
    }

    /// Returns *true* if there exists a directed path from `u` to `v`
    fn is_reachable(&self, u: Node, v: Node) -> bool {
        self.bfs(u).stop_at(v).any(|w| w == v)
    }
}

impl<G: IncidenceList> Traversal for G {}
