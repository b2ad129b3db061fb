//! Named, adjacency-backed graph.

use super::Composite;
use crate::error::Result;
use crate::forms::{Adjacency, Edge, FormKind};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A graph with optional metadata, stored as an adjacency.
///
/// `subset` carries the name over to the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    name: Option<String>,
    contents: Adjacency,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            contents: Adjacency::new(),
        }
    }

    /// Builder: attaches `contents` to this system.
    pub fn with_contents(mut self, contents: Adjacency) -> Self {
        self.contents = contents;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn contents(&self) -> &Adjacency {
        &self.contents
    }

    pub fn into_contents(self) -> Adjacency {
        self.contents
    }

    /// Successors of `node`, or `None` if it is not in the graph.
    pub fn successors(&self, node: &Node) -> Option<&BTreeSet<Node>> {
        self.contents.successors(node)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl Composite for System {
    fn kind(&self) -> FormKind {
        FormKind::Adjacency
    }

    fn contains(&self, node: &Node) -> bool {
        self.contents.contains(node)
    }

    fn has_edge(&self, start: &Node, stop: &Node) -> bool {
        self.contents.has_edge(start, stop)
    }

    fn insert_node(&mut self, node: Node) -> Result<()> {
        Composite::insert_node(&mut self.contents, node)
    }

    fn remove_node(&mut self, node: &Node) -> Result<()> {
        Composite::remove_node(&mut self.contents, node)
    }

    fn install_edge(&mut self, edge: &Edge) -> Result<()> {
        Composite::install_edge(&mut self.contents, edge)
    }

    fn remove_edge(&mut self, edge: &Edge) -> Result<()> {
        Composite::remove_edge(&mut self.contents, edge)
    }

    fn restrict(&self, keep: &HashSet<Node>) -> Result<Self> {
        Ok(Self {
            name: self.name.clone(),
            contents: self.contents.restrict(keep),
        })
    }

    fn adjacency(&self) -> Adjacency {
        self.contents.clone()
    }

    fn from_adjacency(adjacency: Adjacency) -> Result<Self> {
        Ok(Self::new().with_contents(adjacency))
    }
}
