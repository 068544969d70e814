use std::ops::RangeInclusive;

use itertools::Itertools;

use crate::{gens::*, utils::geometric::GeometricJumper, utils::*};

/// `G(n,p)` graphs contain every possible edge between distinct nodes with probability `p`
/// independently from each other.
///
/// Node pairs are encoded as `u * n + v` and sampled by geometric jumps, so the running time is
/// linear in the number of generated edges rather than in `n^2`.
#[derive(Debug, Clone, Default)]
pub struct Gnp {
    n: NumNodes,
    p: Option<f64>,
    weights: Option<RangeInclusive<u32>>,
}

impl Gnp {
    /// Creates a new empty `G(n,p)` generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates `p` directly
    /// ** Panics if `prob` is not a valid probability **
    pub fn prob(mut self, prob: f64) -> Self {
        assert!(prob.is_valid_probability());
        self.p = Some(prob);
        self
    }

    /// Draws every edge weight uniformly from the given integers instead of using
    /// [`DEFAULT_EDGE_WEIGHT`]
    /// ** Panics if the range is empty **
    pub fn weights(mut self, weights: RangeInclusive<u32>) -> Self {
        assert!(!weights.is_empty(), "weight range must not be empty");
        self.weights = Some(weights);
        self
    }
}

impl NumNodesGen for Gnp {
    /// Updates `n`
    fn nodes(mut self, n: NumNodes) -> Self {
        self.n = n;
        self
    }
}

impl GraphGenerator for Gnp {
    /// ** Panics if the probability was not set **
    fn generate<R: Rng>(&self, rng: &mut R, directed: bool) -> Vec<WeightedEdge> {
        let Some(p) = self.p else {
            panic!("Probability of Gnp was not set!");
        };
        let n = self.n as u64;

        let edges = GeometricJumper::new(p)
            .stop_at(n * n)
            .iter(rng)
            .map(|x| Edge((x / n) as Node, (x % n) as Node))
            .filter(|&Edge(u, v)| if directed { u != v } else { u < v })
            .collect_vec();

        edges
            .into_iter()
            .map(|Edge(u, v)| {
                let weight = match &self.weights {
                    Some(range) => rng.random_range(range.clone()) as Weight,
                    None => DEFAULT_EDGE_WEIGHT,
                };
                WeightedEdge(u, v, weight)
            })
            .collect()
    }
}
