/*!
`wgraphs` is a library for **w**eighted graphs with a focus on two algorithm families:
- **maximum flows and minimum cuts**: push-relabel on directed and undirected graphs, and
  Gusfield's equivalent flow tree and Gomory-Hu cut tree for all-pairs queries on undirected graphs,
- **color refinement** (1-dimensional Weisfeiler-Leman) and the isomorphism test built on it.

# Representation

We represent **nodes** as `u32` in the range `0..n` where `n` is the number of nodes in the graph.
**Edges** are identified by their insertion index `0..m` (an [`EdgeId`](crate::edge::EdgeId)) and
carry an `f64` weight, which flow algorithms interpret as capacity. Self-loops and parallel edges
are allowed.

### Directed vs Undirected

- In an **undirected** graph, the edge `(u, v)` is incident to both `u` and `v` and can be traversed
  in both directions.
- In a **directed** graph, the edge leaves `u` and enters `v`; both directions are stored so that
  in-neighborhoods are available in constant time per edge.

See the [`repr`] module for the available representations.

# Design

All algorithms are provided as configurable structs that are created for a graph and then queried.
Results are computed lazily on the first query and cached for subsequent ones.
The most common functionalities are also available as traits implemented on the graph itself,
e.g. `graph.bfs(start_node)` or `graph.color_refinement()`.

Precondition violations (missing nodes, negative capacities, mismatching graphs, ...) are reported
as typed errors from the [`error`] module before any work is done.
Progress is reported through the [`log`](https://crates.io/crates/log) facade.

# Usage

There are *4* core submodules you probably want to interact with:
- [`prelude`] includes definitions for nodes, edges, errors, basic graph operations, and all graph representations,
- [`algo`] includes traversals, connectivity, flows, cuts, flow trees, color refinement and isomorphism testing,
- [`gens`] includes random `G(n,p)` graphs (optionally weighted) and deterministic substructures such as paths/cycles/cliques,
- [`utils`] includes helper traits such as `NodeMapper` to map one graph onto another.

In most use-cases, `use wgraphs::{prelude::*, algo::*};` suffices for your needs.

```rust
use wgraphs::{prelude::*, algo::*};

let graph = AdjArrayUndir::from_weighted_edges(3, [(0, 1, 2.0), (1, 2, 1.0), (0, 2, 1.0)]);
let mut flow = PushRelabel::new(&graph);
assert_eq!(flow.calculate_maximum_flow(0, 2).unwrap(), 2.0);
```
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod gens;
pub mod node;
pub mod ops;
pub mod repr;
pub(crate) mod testing;
pub mod utils;

/// `wgraphs::prelude` includes definitions for nodes, edges and errors, all basic graph operation traits as well as all implemented representations.
pub mod prelude {
    pub use super::{edge::*, error::*, node::*, ops::*, repr::*};
}
