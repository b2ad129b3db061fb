//! Adjacency-list form: node → set of successors.
//!
//! # Invariants
//! - Closure: every successor is also a key (with an empty set when it has no
//!   outgoing edges). Enforced by every constructor and mutator.
//! - No self-loops.
//! - Keys iterate in insertion order; successors iterate in name order.

use crate::error::{GraphError, Result};
use crate::forms::{Edge, FormKind};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Serialized spelling: `[(key, [successor, ...]), ...]` in key order.
type AdjacencyRepr = Vec<(Node, Vec<Node>)>;

/// Adjacency-list graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "AdjacencyRepr", into = "AdjacencyRepr")]
pub struct Adjacency {
    /// Keys in insertion order.
    order: Vec<Node>,
    successors: HashMap<Node, BTreeSet<Node>>,
}

impl Adjacency {
    /// Creates an empty adjacency.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an adjacency from `(key, successors)` pairs.
    ///
    /// Successors that are not keys are registered with an empty set.
    /// Repeated keys merge their successor sets.
    ///
    /// # Errors
    /// `MalformedInput` if a key lists itself as a successor.
    pub fn from_pairs<I, K, S, N>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<Node>,
        S: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        let mut adjacency = Self::new();
        for (key, stops) in pairs {
            let key = key.into();
            adjacency.insert_node(key.clone());
            for stop in stops {
                let stop = stop.into();
                if stop == key {
                    return Err(GraphError::malformed(
                        FormKind::Adjacency,
                        format!("{key} lists itself as a successor"),
                    ));
                }
                adjacency.link(key.clone(), stop);
            }
        }
        Ok(adjacency)
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.successors.values().map(BTreeSet::len).sum()
    }

    #[inline]
    pub fn contains(&self, node: &Node) -> bool {
        self.successors.contains_key(node)
    }

    /// Whether `start → stop` is an edge.
    pub fn has_edge(&self, start: &Node, stop: &Node) -> bool {
        self.successors
            .get(start)
            .is_some_and(|stops| stops.contains(stop))
    }

    /// Returns the successors of `node`, or `None` if it is not a key.
    #[inline]
    pub fn successors(&self, node: &Node) -> Option<&BTreeSet<Node>> {
        self.successors.get(node)
    }

    /// Returns every node with an edge into `node`, in key order.
    pub fn predecessors(&self, node: &Node) -> Vec<Node> {
        self.iter()
            .filter(|(_, stops)| stops.contains(node))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Iterates over the keys in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter()
    }

    /// Iterates over `(key, successors)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Node, &BTreeSet<Node>)> {
        self.order
            .iter()
            .filter_map(move |key| self.successors.get(key).map(|stops| (key, stops)))
    }

    /// Registers `node` with no successors. Returns `false` if it was already a key.
    pub fn insert_node(&mut self, node: Node) -> bool {
        if self.successors.contains_key(&node) {
            return false;
        }
        self.order.push(node.clone());
        self.successors.insert(node, BTreeSet::new());
        true
    }

    /// Adds `edge`, registering both ends as keys. Returns `false` if the edge existed.
    pub fn insert_edge(&mut self, edge: &Edge) -> bool {
        self.link(edge.start().clone(), edge.stop().clone())
    }

    /// Removes `edge`. Returns `false` if it was not present.
    pub fn remove_edge(&mut self, edge: &Edge) -> bool {
        self.successors
            .get_mut(edge.start())
            .is_some_and(|stops| stops.remove(edge.stop()))
    }

    /// Removes `node` and strips it from every successor set.
    /// Returns `false` if it was not a key.
    pub fn remove_node(&mut self, node: &Node) -> bool {
        if self.successors.remove(node).is_none() {
            return false;
        }
        self.order.retain(|key| key != node);
        for stops in self.successors.values_mut() {
            stops.remove(node);
        }
        true
    }

    /// Returns a copy holding only the nodes in `keep` and the edges between them.
    pub fn restrict(&self, keep: &HashSet<Node>) -> Adjacency {
        let mut restricted = Adjacency::new();
        for (key, stops) in self.iter() {
            if !keep.contains(key) {
                continue;
            }
            let kept: BTreeSet<Node> = stops.iter().filter(|s| keep.contains(*s)).cloned().collect();
            restricted.order.push(key.clone());
            restricted.successors.insert(key.clone(), kept);
        }
        restricted
    }

    fn link(&mut self, start: Node, stop: Node) -> bool {
        self.insert_node(start.clone());
        self.insert_node(stop.clone());
        self.successors
            .get_mut(&start)
            .is_some_and(|stops| stops.insert(stop))
    }
}

/// Mapping equality: same keys, same successor sets. Key order is ignored.
impl PartialEq for Adjacency {
    fn eq(&self, other: &Self) -> bool {
        self.successors == other.successors
    }
}

impl Eq for Adjacency {}

impl TryFrom<AdjacencyRepr> for Adjacency {
    type Error = GraphError;

    fn try_from(pairs: AdjacencyRepr) -> Result<Self> {
        Adjacency::from_pairs(pairs)
    }
}

impl From<Adjacency> for AdjacencyRepr {
    fn from(adjacency: Adjacency) -> Self {
        adjacency
            .iter()
            .map(|(key, stops)| (key.clone(), stops.iter().cloned().collect()))
            .collect()
    }
}
