//! Path forms: a single `Serial` path and a `Parallel` collection of them.
//!
//! # Invariants
//! - No node repeats within a `Serial`.
//! - A `Parallel` may hold paths that share nodes; each path is still simple.

use crate::error::{GraphError, Result};
use crate::forms::{Edge, FormKind};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One simple path, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Node>", into = "Vec<Node>")]
pub struct Serial(Vec<Node>);

impl Serial {
    /// Wraps a node sequence.
    ///
    /// # Errors
    /// `MalformedInput` when a node repeats.
    pub fn new<I, N>(nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        let nodes: Vec<Node> = nodes.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(nodes.len());
        if let Some(node) = nodes.iter().find(|node| !seen.insert(*node)) {
            return Err(GraphError::malformed(
                FormKind::Serial,
                format!("{node} appears more than once"),
            ));
        }
        Ok(Self(nodes))
    }

    /// Wraps a sequence already known to be simple.
    pub(crate) fn from_path_unchecked(nodes: Vec<Node>) -> Self {
        debug_assert_eq!(
            nodes.iter().collect::<HashSet<_>>().len(),
            nodes.len(),
            "serial path repeats a node"
        );
        Self(nodes)
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.0.contains(node)
    }

    pub fn position(&self, node: &Node) -> Option<usize> {
        self.0.iter().position(|candidate| candidate == node)
    }

    /// First node.
    pub fn root(&self) -> Option<&Node> {
        self.0.first()
    }

    /// Last node.
    pub fn endpoint(&self) -> Option<&Node> {
        self.0.last()
    }

    /// Consecutive pairs, in path order.
    pub fn pairs(&self) -> impl Iterator<Item = Edge> + '_ {
        self.0
            .windows(2)
            .map(|pair| Edge::between(pair[0].clone(), pair[1].clone()))
    }

    /// Contiguous sub-path from `start` to `stop`, both inclusive.
    ///
    /// A `stop` positioned before `start` yields an empty path.
    ///
    /// # Errors
    /// `MissingReference` naming whichever of `start`/`stop` is absent.
    pub fn walk_between(&self, start: &Node, stop: &Node) -> Result<Serial> {
        let (from, to) = match (self.position(start), self.position(stop)) {
            (Some(from), Some(to)) => (from, to),
            (from, to) => {
                let missing = [(from, start), (to, stop)]
                    .into_iter()
                    .filter(|(index, _)| index.is_none())
                    .map(|(_, node)| node.to_string());
                return Err(GraphError::missing(missing));
            }
        };
        if to < from {
            return Ok(Serial::default());
        }
        Ok(Serial(self.0[from..=to].to_vec()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.0
    }
}

impl TryFrom<Vec<Node>> for Serial {
    type Error = GraphError;

    fn try_from(nodes: Vec<Node>) -> Result<Self> {
        Serial::new(nodes)
    }
}

impl From<Serial> for Vec<Node> {
    fn from(serial: Serial) -> Self {
        serial.0
    }
}

impl<'a> IntoIterator for &'a Serial {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Every root-to-endpoint path of a graph, root-major.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parallel(Vec<Serial>);

impl Parallel {
    pub fn new(paths: Vec<Serial>) -> Self {
        Self(paths)
    }

    /// Builds from raw node sequences, validating each one.
    pub fn from_paths<I, P, N>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        paths
            .into_iter()
            .map(Serial::new)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    #[inline]
    pub fn paths(&self) -> &[Serial] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Serial> {
        self.0.iter()
    }

    pub fn push(&mut self, path: Serial) {
        self.0.push(path);
    }

    /// Distinct first nodes, in path order.
    pub fn roots(&self) -> Vec<Node> {
        distinct(self.0.iter().filter_map(Serial::root))
    }

    /// Distinct last nodes, in path order.
    pub fn endpoints(&self) -> Vec<Node> {
        distinct(self.0.iter().filter_map(Serial::endpoint))
    }

    /// Collapses to the single path this collection holds.
    ///
    /// # Errors
    /// `LossyCollapse` unless there is exactly one path.
    pub fn into_serial(self) -> Result<Serial> {
        let count = self.0.len();
        let mut paths = self.0.into_iter();
        match (paths.next(), count) {
            (Some(path), 1) => Ok(path),
            _ => Err(GraphError::LossyCollapse { paths: count }),
        }
    }

    pub fn into_paths(self) -> Vec<Serial> {
        self.0
    }
}

fn distinct<'a>(nodes: impl Iterator<Item = &'a Node>) -> Vec<Node> {
    let mut seen = HashSet::new();
    nodes.filter(|node| seen.insert(*node)).cloned().collect()
}

impl From<Vec<Serial>> for Parallel {
    fn from(paths: Vec<Serial>) -> Self {
        Self(paths)
    }
}

impl<'a> IntoIterator for &'a Parallel {
    type Item = &'a Serial;
    type IntoIter = std::slice::Iter<'a, Serial>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Parallel {
    type Item = Serial;
    type IntoIter = std::vec::IntoIter<Serial>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
