/*!
# Utilities

Provides a small set of utility traits/structs:
- [`GeometricJumper`](self::geometric::GeometricJumper): the generator behind [`G(n,p)`](crate::gens::Gnp) graphs,
- an abstraction over [`Set`]s of nodes,
- the `NodeMapper`-framework for mapping one graph to another (see [`NodeMapSetter`] / [`NodeMapGetter`]).
  It describes isomorphisms found by the isomorphism test and relabels graphs in tests.
*/

use num::{One, Zero};

pub mod geometric;
pub mod node_mapper;
pub mod set;

pub use node_mapper::{NodeMapCompose, NodeMapGetter, NodeMapInverse, NodeMapSetter, NodeMapper};
pub use set::Set;

/// Helper trait for probalities
pub trait Probability {
    /// Returns *true* if the probality is valid (ie. between `0` and `1`)
    fn is_valid_probability(&self) -> bool;
}

impl<P> Probability for P
where
    P: Zero + One + PartialOrd,
{
    fn is_valid_probability(&self) -> bool {
        Self::zero().le(self) && Self::one().ge(self)
    }
}
