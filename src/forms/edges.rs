//! Edge values and the edge-list form.
//!
//! # Invariants
//! - An `Edge` never has `start == stop`.
//! - `Edges::loose` holds nodes with no incident edge, each once, and none of
//!   them appears in `contents`.

use crate::error::{GraphError, Result};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Directed `(start, stop)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(Node, Node)", into = "(Node, Node)")]
pub struct Edge {
    start: Node,
    stop: Node,
}

impl Edge {
    /// Creates an edge.
    ///
    /// # Errors
    /// `InvalidEdge` with `SelfLoop` when both ends name the same node.
    pub fn new(start: impl Into<Node>, stop: impl Into<Node>) -> Result<Self> {
        let start = start.into();
        let stop = stop.into();
        if start == stop {
            return Err(GraphError::self_loop(&start));
        }
        Ok(Self { start, stop })
    }

    /// Pairs two nodes the caller already knows to be distinct.
    pub(crate) fn between(start: Node, stop: Node) -> Self {
        debug_assert_ne!(start, stop, "self-loop edge");
        Self { start, stop }
    }

    #[inline]
    pub fn start(&self) -> &Node {
        &self.start
    }

    #[inline]
    pub fn stop(&self) -> &Node {
        &self.stop
    }

    /// Returns the edge pointing the other way.
    pub fn reversed(&self) -> Edge {
        Edge {
            start: self.stop.clone(),
            stop: self.start.clone(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.stop)
    }
}

impl TryFrom<(Node, Node)> for Edge {
    type Error = GraphError;

    fn try_from((start, stop): (Node, Node)) -> Result<Self> {
        Edge::new(start, stop)
    }
}

impl From<Edge> for (Node, Node) {
    fn from(edge: Edge) -> Self {
        (edge.start, edge.stop)
    }
}

#[derive(Deserialize)]
struct EdgesRepr {
    contents: Vec<Edge>,
    #[serde(default)]
    loose: Vec<Node>,
}

/// Ordered edge list.
///
/// Duplicates are kept and order is preserved. Isolated nodes have no edge
/// to appear in, so they ride along in `loose`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EdgesRepr")]
pub struct Edges {
    contents: Vec<Edge>,
    loose: Vec<Node>,
}

impl Edges {
    /// Wraps an edge list with no isolated nodes.
    pub fn new(contents: Vec<Edge>) -> Self {
        Self {
            contents,
            loose: Vec::new(),
        }
    }

    /// Wraps an edge list plus isolated nodes.
    ///
    /// Loose nodes already covered by an edge, and repeats, are dropped.
    pub fn with_loose(contents: Vec<Edge>, loose: impl IntoIterator<Item = Node>) -> Self {
        let mut seen: HashSet<Node> = contents
            .iter()
            .flat_map(|edge| [edge.start.clone(), edge.stop.clone()])
            .collect();
        let loose = loose
            .into_iter()
            .filter(|node| seen.insert(node.clone()))
            .collect();
        Self { contents, loose }
    }

    /// Builds from `(start, stop)` pairs.
    ///
    /// # Errors
    /// `InvalidEdge` on the first self-loop.
    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<Node>,
        T: Into<Node>,
    {
        let contents = pairs
            .into_iter()
            .map(|(start, stop)| Edge::new(start, stop))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(contents))
    }

    #[inline]
    pub fn contents(&self) -> &[Edge] {
        &self.contents
    }

    /// Isolated nodes, in registration order.
    #[inline]
    pub fn loose(&self) -> &[Node] {
        &self.loose
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty() && self.loose.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.contents.iter()
    }

    /// Every node, first appearance order: edge ends, then loose nodes.
    pub fn nodes(&self) -> Vec<Node> {
        let mut seen = HashSet::new();
        self.contents
            .iter()
            .flat_map(|edge| [&edge.start, &edge.stop])
            .chain(self.loose.iter())
            .filter(|node| seen.insert(*node))
            .cloned()
            .collect()
    }

    /// Always `true`; undirected graphs are not modeled.
    #[inline]
    pub const fn is_directed(&self) -> bool {
        true
    }

    pub(crate) fn contents_mut(&mut self) -> &mut Vec<Edge> {
        &mut self.contents
    }

    pub(crate) fn loose_mut(&mut self) -> &mut Vec<Node> {
        &mut self.loose
    }
}

impl From<EdgesRepr> for Edges {
    fn from(repr: EdgesRepr) -> Self {
        Edges::with_loose(repr.contents, repr.loose)
    }
}

impl<'a> IntoIterator for &'a Edges {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.contents.iter()
    }
}
