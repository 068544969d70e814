/*!
# Graph Algorithms

All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use wgraphs::algo::*;
```
and gain access to traversal, connectivity, flows and cuts, flow trees, color refinement and
isomorphism testing. Traversals are provided as **iterators**, making it easy to consume results
lazily.
*/

mod color_refinement;
mod coloring;
mod connectivity;
pub mod flow;
mod isomorphism;
mod traversal;

use crate::{prelude::*, utils::*};

pub use color_refinement::{ColorRefinement, StableColoring, is_stable};
pub use coloring::*;
pub use connectivity::*;
pub use flow::*;
pub use isomorphism::*;
pub use traversal::*;
