//! Directed composition of whole graphs.
//!
//! Automatically implemented for every `Composite`.

use super::{merge_changes, Change, Composite};
use crate::error::Result;
use crate::forms::Edge;
use crate::node::Node;
use tracing::debug;

/// Serial composition: hang one graph off another's endpoints or roots.
pub trait Directed: Composite {
    /// Merges `other` and links every endpoint of `self` to every root of
    /// `other`. On an empty receiver this is a plain merge.
    fn append<C: Composite>(&mut self, other: &C) -> Result<()> {
        let tails = self.endpoints();
        let heads = other.roots();
        debug!(tails = tails.len(), heads = heads.len(), "append");
        let changes = splice(self, other, &tails, &heads);
        self.commit(changes)
    }

    /// Merges `other` and links every endpoint of `other` to every root of
    /// `self`. On an empty receiver this is a plain merge.
    fn prepend<C: Composite>(&mut self, other: &C) -> Result<()> {
        let tails = other.endpoints();
        let heads = self.roots();
        debug!(tails = tails.len(), heads = heads.len(), "prepend");
        let changes = splice(self, other, &tails, &heads);
        self.commit(changes)
    }

    /// Adds `node` after every current endpoint.
    fn append_node(&mut self, node: impl Into<Node>) -> Result<()> {
        let node = node.into();
        let mut tails = self.endpoints();
        tails.retain(|tail| *tail != node);
        self.add_linked(node, &tails, &[])
    }

    /// Adds `node` before every current root.
    fn prepend_node(&mut self, node: impl Into<Node>) -> Result<()> {
        let node = node.into();
        let mut heads = self.roots();
        heads.retain(|head| *head != node);
        self.add_linked(node, &[], &heads)
    }
}

impl<T: Composite> Directed for T {}

/// Merge of `other` plus a `tail → head` edge for every distinct pair.
fn splice<T: Composite, C: Composite>(
    target: &T,
    other: &C,
    tails: &[Node],
    heads: &[Node],
) -> Vec<Change> {
    let incoming = other.adjacency();
    let mut changes = merge_changes(target, &incoming);
    for tail in tails {
        for head in heads {
            if tail == head || target.has_edge(tail, head) || incoming.has_edge(tail, head) {
                continue;
            }
            changes.push(Change::AddEdge(Edge::between(tail.clone(), head.clone())));
        }
    }
    changes
}
