/*!
# Color Refinement

Color refinement (1-dimensional Weisfeiler-Leman) computes the coarsest *stable* coloring that
refines an initial coloring `alpha`. A coloring is stable if any two nodes of the same color have,
for every color `r`, the same number of (distinct) out-neighbors of color `r`. For undirected
graphs this is the usual neighborhood condition.

The implementation follows the worklist scheme of Berkholz, Bonsma and Grohe: colors whose
classes may split others are kept on a stack; popping color `r` counts for every node how many
of its out-neighbors have color `r` and splits each affected class by that count. All but one
of the new sub-classes are pushed back onto the stack, which yields `O((n + m) log n)` time.

Color numbers are deterministic: the sub-class with the smallest count keeps the color of its
parent and the other sub-classes receive fresh colors `k + 1, k + 2, ...` in order of increasing
count. Split colors are processed in increasing order.

Internally, directed graphs can also be refined with respect to in- *and* out-neighbors. The
isomorphism test uses this on directed forests, whose orientation is otherwise invisible to
refinement.
*/

use itertools::{Either, Itertools};
use log::{debug, trace};

use super::*;

/// Color refinement of a graph, starting from an initial coloring
pub struct ColorRefinement<'a, G>
where
    G: IncidenceList,
{
    graph: &'a G,
    alpha: Coloring,
    result: Option<Coloring>,
}

impl<'a, G> ColorRefinement<'a, G>
where
    G: IncidenceList,
{
    /// Starts from the trivial coloring
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            alpha: Coloring::trivial(graph.number_of_nodes()),
            result: None,
        }
    }

    /// Starts from `alpha`; fails if `alpha` does not color exactly the nodes of `graph`
    pub fn with_initial_coloring(graph: &'a G, alpha: Coloring) -> Result<Self, ColoringError> {
        alpha.validate_for(graph)?;
        Ok(Self {
            graph,
            alpha,
            result: None,
        })
    }

    pub fn initial_coloring(&self) -> &Coloring {
        &self.alpha
    }

    /// Returns the coarsest stable coloring refining the initial coloring (computed on first call)
    pub fn coloring(&mut self) -> &Coloring {
        let (graph, alpha) = (self.graph, &self.alpha);
        self.result
            .get_or_insert_with(|| RefinementState::new(graph, alpha).run())
    }

    pub fn into_coloring(mut self) -> Coloring {
        match self.result.take() {
            Some(coloring) => coloring,
            None => RefinementState::new(self.graph, &self.alpha).run(),
        }
    }
}

/// Offers color refinement as a method of the graph itself
pub trait StableColoring: IncidenceList {
    /// Returns the coarsest stable coloring of the graph
    fn color_refinement(&self) -> Coloring {
        ColorRefinement::new(self).into_coloring()
    }
}

impl<G: IncidenceList> StableColoring for G {}

/// Refines `alpha` until nodes of equal color agree in their number of out-neighbors *and*
/// in-neighbors of every color
pub(crate) fn refine_both_directions<G: IncidenceList>(graph: &G, alpha: &Coloring) -> Coloring {
    debug_assert_eq!(alpha.len(), graph.len());
    let mut state = RefinementState::new(graph, alpha);
    state.count_in_neighbors = G::is_directed();
    state.run()
}

/// Returns *true* if `coloring` is stable on `graph`
pub fn is_stable<G: IncidenceList>(graph: &G, coloring: &Coloring) -> bool {
    if coloring.len() != graph.len() {
        return false;
    }

    let signature = |u: Node| {
        graph
            .out_neighbors_of(u)
            .unique()
            .map(|v| coloring.color_of(v))
            .sorted_unstable()
            .collect_vec()
    };

    coloring.color_classes().into_iter().all(|class| {
        let mut members = class.into_iter();
        match members.next() {
            None => true,
            Some(first) => {
                let expected = signature(first);
                members.all(|u| signature(u) == expected)
            }
        }
    })
}

/// Working data of a single refinement run
struct RefinementState<'a, G>
where
    G: IncidenceList,
{
    graph: &'a G,
    k: Color,
    /// also split by the number of in-neighbors of the processed color
    count_in_neighbors: bool,

    color: Vec<Color>,
    /// members of each color class; index 0 is unused
    classes: Vec<Vec<Node>>,
    /// position of every node within its class
    position: Vec<usize>,

    /// number of distinct out-neighbors of the color currently processed
    color_degree: Vec<u32>,
    /// nodes of each color with nonzero color degree
    touched: Vec<Vec<Node>>,
    max_degree: Vec<u32>,
    min_degree: Vec<u32>,
    adjacent_colors: Vec<Color>,
    is_adjacent: Vec<bool>,
    /// visit stamp of the node whose in-neighbors were last counted for each node
    last_visit: Vec<u64>,
    visit: u64,
    /// snapshot of the processed class
    members: Vec<Node>,

    stack: Vec<Color>,
    in_stack: Vec<bool>,
}

impl<'a, G> RefinementState<'a, G>
where
    G: IncidenceList,
{
    fn new(graph: &'a G, alpha: &Coloring) -> Self {
        let n = graph.len();
        let k = alpha.number_of_colors();

        let mut classes = vec![Vec::new(); n + 1];
        let mut position = vec![0; n];
        for u in graph.vertices() {
            let class = &mut classes[alpha.color_of(u) as usize];
            position[u as usize] = class.len();
            class.push(u);
        }

        // color 1 is on top
        let stack = (1..=k).rev().collect_vec();
        let mut in_stack = vec![false; n + 1];
        for &c in &stack {
            in_stack[c as usize] = true;
        }

        Self {
            graph,
            k,
            count_in_neighbors: false,
            color: alpha.as_slice().to_vec(),
            classes,
            position,
            color_degree: vec![0; n],
            touched: vec![Vec::new(); n + 1],
            max_degree: vec![0; n + 1],
            min_degree: vec![0; n + 1],
            adjacent_colors: Vec::new(),
            is_adjacent: vec![false; n + 1],
            last_visit: vec![0; n],
            visit: 0,
            members: Vec::new(),
            stack,
            in_stack,
        }
    }

    fn run(mut self) -> Coloring {
        let initial = self.k;

        while let Some(r) = self.stack.pop() {
            self.in_stack[r as usize] = false;

            // the class of `r` may split while processing it; both passes count the old members
            let mut members = std::mem::take(&mut self.members);
            members.clear();
            members.extend_from_slice(&self.classes[r as usize]);

            self.split_by(&members, false);
            if self.count_in_neighbors {
                self.split_by(&members, true);
            }

            self.members = members;
        }

        debug!(
            "color refinement: {initial} -> {} colors on {} nodes",
            self.k,
            self.color.len()
        );
        Coloring::new_unchecked(self.color, self.k)
    }

    /// Splits every class by its color degree with respect to `members`
    fn split_by(&mut self, members: &[Node], incoming: bool) {
        self.count_color_degrees(members, incoming);

        let split = self
            .adjacent_colors
            .iter()
            .copied()
            .filter(|&c| self.min_degree[c as usize] < self.max_degree[c as usize])
            .sorted_unstable()
            .collect_vec();
        for c in split {
            self.split_up(c);
        }

        self.reset_counters();
    }

    /// For every node, counts its distinct out-neighbors (or in-neighbors if `incoming`) among
    /// `members`
    fn count_color_degrees(&mut self, members: &[Node], incoming: bool) {
        let graph = self.graph;
        for &v in members {
            self.visit += 1;
            let counted = if incoming {
                Either::Right(graph.out_neighbors_of(v))
            } else {
                Either::Left(graph.in_neighbors_of(v))
            };
            for w in counted {
                if std::mem::replace(&mut self.last_visit[w as usize], self.visit) == self.visit {
                    continue;
                }

                let c = self.color[w as usize] as usize;
                let deg = &mut self.color_degree[w as usize];
                *deg += 1;
                if *deg == 1 {
                    self.touched[c].push(w);
                }
                if !self.is_adjacent[c] {
                    self.is_adjacent[c] = true;
                    self.adjacent_colors.push(c as Color);
                }
                self.max_degree[c] = self.max_degree[c].max(*deg);
            }
        }

        for &c in &self.adjacent_colors {
            let c = c as usize;
            self.min_degree[c] = if self.classes[c].len() != self.touched[c].len() {
                0
            } else {
                self.touched[c]
                    .iter()
                    .map(|&v| self.color_degree[v as usize])
                    .min()
                    .unwrap_or(0)
            };
        }
    }

    /// Splits class `s` by color degree
    fn split_up(&mut self, s: Color) {
        let su = s as usize;
        let max = self.max_degree[su] as usize;
        let min = self.min_degree[su] as usize;

        let mut count = vec![0usize; max + 1];
        count[0] = self.classes[su].len() - self.touched[su].len();
        for &v in &self.touched[su] {
            count[self.color_degree[v as usize] as usize] += 1;
        }

        // first degree with the most members
        let largest = (1..=max).fold(0, |b, i| if count[i] > count[b] { i } else { b });
        let was_in_stack = self.in_stack[su];

        let mut new_color = vec![s; max + 1];
        for d in 0..=max {
            if count[d] == 0 {
                continue;
            }

            if d == min {
                if !was_in_stack && d != largest {
                    self.push(s);
                }
            } else {
                self.k += 1;
                new_color[d] = self.k;
                if was_in_stack || d != largest {
                    self.push(self.k);
                }
            }
        }

        trace!(
            "split color {s} by degrees {:?} into {:?}",
            count,
            new_color.iter().enumerate().filter(|&(d, _)| count[d] > 0).map(|(_, c)| c).collect_vec()
        );

        for i in 0..self.touched[su].len() {
            let v = self.touched[su][i];
            let target = new_color[self.color_degree[v as usize] as usize];
            if target != s {
                self.move_node(v, target);
            }
        }
    }

    fn push(&mut self, c: Color) {
        self.stack.push(c);
        self.in_stack[c as usize] = true;
    }

    fn move_node(&mut self, v: Node, target: Color) {
        let old = self.color[v as usize] as usize;
        let pos = self.position[v as usize];

        self.classes[old].swap_remove(pos);
        if let Some(&moved) = self.classes[old].get(pos) {
            self.position[moved as usize] = pos;
        }

        let class = &mut self.classes[target as usize];
        self.position[v as usize] = class.len();
        class.push(v);
        self.color[v as usize] = target;
    }

    fn reset_counters(&mut self) {
        for c in self.adjacent_colors.drain(..) {
            let c = c as usize;
            for &v in &self.touched[c] {
                self.color_degree[v as usize] = 0;
            }
            self.touched[c].clear();
            self.max_degree[c] = 0;
            self.is_adjacent[c] = false;
        }
    }
}
