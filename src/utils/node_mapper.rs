/*!
# Node Mapper

Provides functionality to map nodes between graphs.
A mapping stores pairs `old <-> new` and can be queried in both directions, inverted, composed
and used to relabel a graph (edge weights are carried over).
*/
use crate::{edge::*, node::*, ops::*};

use fxhash::FxHashMap;
use itertools::Itertools;
use rand::{Rng, seq::SliceRandom};
use std::fmt;

/// A trait for constructing node mappings.
pub trait NodeMapSetter: Sized {
    /// Creates a mapper where the largest node that can be inserted is `n-1`.
    fn with_capacity(n: NumNodes) -> Self;

    /// Creates a mapper where each mapping is of form `x <-> x` for all `x`.
    /// Subsequent calls to [`NodeMapSetter::map_node_to`] are forbidden.
    ///
    /// # Example
    /// ```
    /// use wgraphs::utils::*;
    ///
    /// let mapper = NodeMapper::identity(5);
    /// assert_eq!(mapper.new_id_of(2), Some(2));
    /// ```
    fn identity(n: NumNodes) -> Self;

    /// Stores a mapping `old <-> new`.
    /// ** Panics if `old` or `new` is already mapped **
    fn map_node_to(&mut self, old: Node, new: Node);

    /// Constructs a mapper from a Node-slice `new_ids` where `new_ids[i]` stores the new id of the old node `i`.
    ///
    /// # Example
    /// ```
    /// use wgraphs::utils::*;
    ///
    /// let mapper = NodeMapper::from_rank(&[1, 0]);
    /// assert_eq!(mapper.new_id_of(0), Some(1));
    /// assert_eq!(mapper.new_id_of(1), Some(0));
    /// ```
    fn from_rank(new_ids: &[Node]) -> Self {
        let mut res = Self::with_capacity(new_ids.len() as NumNodes);
        for (old, &new) in new_ids.iter().enumerate() {
            res.map_node_to(old as Node, new);
        }
        res
    }

    /// Constructs a mapper from a sequence of tuples `(old, new)`.
    fn from_sequence(seq: &[(Node, Node)]) -> Self {
        let mut res = Self::with_capacity(seq.len() as NumNodes);
        for &(old, new) in seq {
            res.map_node_to(old, new);
        }
        res
    }
}

/// A trait for accessing node mappings.
pub trait NodeMapGetter {
    /// If the mapping `(old, new)` exists, returns `Some(new)`, otherwise `None`.
    fn new_id_of(&self, old: Node) -> Option<Node>;

    /// If the mapping `(old, new)` exists, returns `Some(old)`, otherwise `None`.
    fn old_id_of(&self, new: Node) -> Option<Node>;

    /// Returns the number of explicitly stored mappings; returns `0` for identity mapping.
    fn len(&self) -> Node;

    /// Returns `true` if no mapping is stored; returns `true` for identity mapping.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a 'copy' of type `GO` from the input graph where all nodes are relabelled according
    /// to this mapper. Edges keep their weights and their relative order.
    /// Any node `u` (and its incident edges) is dropped if there is no mapping.
    ///
    /// # Example
    /// ```
    /// use wgraphs::{prelude::*, utils::*};
    ///
    /// let g = AdjArray::from_weighted_edges(2, [(0, 1, 3.0)]);
    ///
    /// let mapper = NodeMapper::from_rank(&[1, 0]);
    /// let gm: AdjArrayUndir = mapper.relabelled_graph_as(&g);
    /// assert_eq!(gm.weighted_edges().collect::<Vec<_>>(), vec![WeightedEdge(1, 0, 3.0)]);
    /// ```
    fn relabelled_graph_as<GI, GO>(&self, input: &GI) -> GO
    where
        GI: GraphNodeOrder + EdgeAttributes,
        GO: GraphFromScratch,
    {
        let n = input
            .vertices()
            .flat_map(|u| self.new_id_of(u).map(|x| x + 1))
            .max()
            .unwrap_or(0);

        GO::from_weighted_edges(
            n,
            input.weighted_edges().filter_map(|WeightedEdge(u, v, w)| {
                Some(WeightedEdge(self.new_id_of(u)?, self.new_id_of(v)?, w))
            }),
        )
    }

    /// Short-hand for [`NodeMapGetter::relabelled_graph_as`] where the output type matches the input type.
    fn relabelled_graph<G>(&self, input: &G) -> G
    where
        G: GraphNodeOrder + EdgeAttributes + GraphFromScratch,
    {
        self.relabelled_graph_as::<G, G>(input)
    }
}

/// A trait for composing two node mappings.
pub trait NodeMapCompose {
    /// Takes two mappers `M1` (original -> intermediate) and `M2` (intermediate -> final)
    /// and produces a new mapper (original -> final). All mappings without a correspondence
    /// in the other mapper are dropped.
    ///
    /// # Example
    /// ```
    /// use wgraphs::utils::*;
    ///
    /// let mut m1 = NodeMapper::with_capacity(5);
    /// m1.map_node_to(0, 1);
    /// let mut m2 = NodeMapper::with_capacity(5);
    /// m2.map_node_to(1, 3);
    /// let composed = NodeMapper::compose(&m1, &m2);
    /// assert_eq!(composed.new_id_of(0), Some(3));
    /// ```
    fn compose(first: &Self, second: &Self) -> Self;
}

/// A trait for inverting a node mapping.
pub trait NodeMapInverse {
    /// Returns a new mapper where for each mapping `(a, b)` of the original,
    /// there exists a mapping `(b, a)` in the new mapper.
    #[must_use]
    fn inverse(&self) -> Self;
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// A bidirectional node mapping between "old" and "new" nodes.
///
/// Can represent identity mappings (all nodes map to themselves) or explicit mappings.
#[derive(Clone)]
pub struct NodeMapper {
    new_to_old: FxHashMap<Node, Node>,
    old_to_new: FxHashMap<Node, Node>,
    is_identity: bool,
}

impl NodeMapper {
    /// Creates a uniformly random permutation of `0..n`
    pub fn random<R: Rng>(rng: &mut R, n: NumNodes) -> Self {
        let mut new_ids = (0..n).collect_vec();
        new_ids.shuffle(rng);
        Self::from_rank(&new_ids)
    }
}

impl NodeMapSetter for NodeMapper {
    fn with_capacity(n: Node) -> Self {
        Self {
            new_to_old: FxHashMap::with_capacity_and_hasher(n as usize, Default::default()),
            old_to_new: FxHashMap::with_capacity_and_hasher(n as usize, Default::default()),
            is_identity: false,
        }
    }

    fn identity(_n: Node) -> Self {
        let mut res = Self::with_capacity(0);
        res.is_identity = true;
        res
    }

    fn map_node_to(&mut self, old: Node, new: Node) {
        assert!(!self.is_identity);
        let success = self.old_to_new.insert(old, new).is_none()
            && self.new_to_old.insert(new, old).is_none();
        assert!(success, "{old} or {new} is mapped twice");
    }
}

impl NodeMapGetter for NodeMapper {
    fn new_id_of(&self, old: Node) -> Option<Node> {
        if self.is_identity {
            Some(old)
        } else {
            self.old_to_new.get(&old).copied()
        }
    }

    fn old_id_of(&self, new: Node) -> Option<Node> {
        if self.is_identity {
            Some(new)
        } else {
            self.new_to_old.get(&new).copied()
        }
    }

    fn len(&self) -> Node {
        self.old_to_new.len() as Node
    }
}

impl NodeMapCompose for NodeMapper {
    fn compose(first: &Self, second: &Self) -> Self {
        if first.is_identity {
            return second.clone();
        }

        if second.is_identity {
            return first.clone();
        }

        let mut composition = Self::with_capacity(second.len());
        for (&original, &intermediate) in first.old_to_new.iter() {
            if let Some(new) = second.new_id_of(intermediate) {
                composition.map_node_to(original, new);
            }
        }
        composition
    }
}

impl NodeMapInverse for NodeMapper {
    fn inverse(&self) -> Self {
        Self {
            old_to_new: self.new_to_old.clone(),
            new_to_old: self.old_to_new.clone(),
            is_identity: self.is_identity,
        }
    }
}

impl fmt::Debug for NodeMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity {
            return f.write_str("[identity]");
        }

        write!(
            f,
            "[{}]",
            self.old_to_new
                .iter()
                .sorted()
                .map(|(&o, &n)| format!("{o}<->{n}"))
                .join(", ")
        )
    }
}
