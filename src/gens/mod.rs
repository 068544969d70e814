/*!
# Graph Generators

Random graph generators and helpers that insert fixed substructures, mainly used to create test
instances for the flow and refinement algorithms.

Generators follow a builder pattern:

1. Create a generator instance (e.g., `Gnp::new()`).
2. Set parameters using trait methods (e.g., `.nodes(n).prob(p)`), optionally with random
   integral edge weights (`.weights(1..=9)`).
3. Generate weighted edges via `generate(rng, directed)`.

The [`RandomGraph`] trait builds whole graph instances from these generators.
*/

use rand::Rng;

use crate::prelude::*;

mod gnp;
mod substructures;

pub use gnp::*;
pub use substructures::*;

/// Trait for generators that allow setting the number of nodes.
pub trait NumNodesGen {
    /// Sets the number of nodes in the graph generator.
    fn nodes(self, n: NumNodes) -> Self;
}

/// General trait for a configurable random edge generator.
pub trait GraphGenerator {
    /// Generates a list of random weighted edges.
    /// Undirected edges `{u, v}` are reported once as `(min, max)`.
    fn generate<R>(&self, rng: &mut R, directed: bool) -> Vec<WeightedEdge>
    where
        R: Rng;
}

/// Trait for building full graph instances from common random models.
pub trait RandomGraph: Sized {
    /// Creates a random `G(n,p)` graph using edge probability `p`; all edges have weight
    /// [`DEFAULT_EDGE_WEIGHT`] and there are neither self-loops nor parallel edges.
    fn gnp<R>(rng: &mut R, n: NumNodes, p: f64) -> Self
    where
        R: Rng;
}

impl<G> RandomGraph for G
where
    G: GraphFromScratch + GraphType,
{
    fn gnp<R>(rng: &mut R, n: NumNodes, p: f64) -> Self
    where
        R: Rng,
    {
        Self::from_weighted_edges(
            n,
            Gnp::new()
                .nodes(n)
                .prob(p)
                .generate(rng, Self::is_directed()),
        )
    }
}
