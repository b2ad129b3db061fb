//! The mutation contract shared by every graph form.
//!
//! A form implements a handful of primitives (`insert_node`, `install_edge`,
//! ...) plus its pivot conversions. Everything else (views, batched mutation,
//! selection and walking) is provided on top of those.
//!
//! # Invariants
//! - Every provided mutator validates its whole batch before touching the
//!   graph, then applies it through `commit`.
//! - `commit` is all-or-nothing: a failing change restores the prior state.
//! - No mutator ever installs a self-loop or an edge to an absent node.

pub mod directed;
pub mod system;

use crate::config::WalkConfig;
use crate::convert;
use crate::error::{GraphError, Result, SelectionFault};
use crate::forms::{Adjacency, Edge, Edges, Form, FormKind, Matrix, Parallel, Serial};
use crate::node::Node;
use crate::raw::Raw;
use crate::walk;
use std::collections::HashSet;
use tracing::debug;

pub use directed::Directed;
pub use system::System;

/// One primitive mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    AddNode(Node),
    RemoveNode(Node),
    AddEdge(Edge),
    RemoveEdge(Edge),
}

impl Change {
    /// Applies this change through `target`'s primitives.
    pub fn apply<C: Composite>(&self, target: &mut C) -> Result<()> {
        match self {
            Change::AddNode(node) => target.insert_node(node.clone()),
            Change::RemoveNode(node) => target.remove_node(node),
            Change::AddEdge(edge) => target.install_edge(edge),
            Change::RemoveEdge(edge) => target.remove_edge(edge),
        }
    }
}

/// A directed graph held in one of the five forms.
pub trait Composite: Clone + Sized {
    /// Tag of the native form.
    fn kind(&self) -> FormKind;

    fn contains(&self, node: &Node) -> bool;

    fn has_edge(&self, start: &Node, stop: &Node) -> bool;

    /// Registers `node`; a node already present is left alone.
    fn insert_node(&mut self, node: Node) -> Result<()>;

    /// Removes `node` and every edge touching it.
    fn remove_node(&mut self, node: &Node) -> Result<()>;

    /// Installs an edge between two present nodes.
    fn install_edge(&mut self, edge: &Edge) -> Result<()>;

    /// Removes a present edge.
    fn remove_edge(&mut self, edge: &Edge) -> Result<()>;

    /// Copy holding only `keep` and the edges among it.
    fn restrict(&self, keep: &HashSet<Node>) -> Result<Self>;

    /// Pivot view.
    fn adjacency(&self) -> Adjacency;

    /// Builds the native form from the pivot.
    fn from_adjacency(adjacency: Adjacency) -> Result<Self>;

    /// Applies `changes` in order, all or nothing.
    ///
    /// The default snapshots the graph and restores it if any change fails.
    fn commit(&mut self, changes: Vec<Change>) -> Result<()> {
        let snapshot = self.clone();
        for change in &changes {
            if let Err(err) = change.apply(self) {
                debug!(form = %self.kind(), ?change, error = %err, "commit rolled back");
                *self = snapshot;
                return Err(err);
            }
        }
        Ok(())
    }

    // -- construction -------------------------------------------------------

    fn from_edges(edges: &Edges) -> Result<Self> {
        Self::from_adjacency(convert::edges_to_adjacency(edges))
    }

    fn from_matrix(matrix: &Matrix) -> Result<Self> {
        Self::from_adjacency(convert::matrix_to_adjacency(matrix))
    }

    fn from_serial(serial: &Serial) -> Result<Self> {
        Self::from_adjacency(convert::serial_to_adjacency(serial))
    }

    fn from_parallel(parallel: &Parallel) -> Result<Self> {
        Self::from_adjacency(convert::parallel_to_adjacency(parallel))
    }

    fn from_form(form: &Form) -> Result<Self> {
        Self::from_adjacency(form.to_adjacency())
    }

    /// Classifies untyped data and builds from whichever form it is.
    fn from_raw(raw: &Raw) -> Result<Self> {
        Self::from_form(&Form::from_raw(raw)?)
    }

    // -- views --------------------------------------------------------------

    fn edges(&self) -> Edges {
        convert::adjacency_to_edges(&self.adjacency())
    }

    fn matrix(&self) -> Matrix {
        convert::adjacency_to_matrix(&self.adjacency())
    }

    /// # Errors
    /// `LossyCollapse` unless the graph is one path.
    fn serial(&self) -> Result<Serial> {
        convert::adjacency_to_serial(&self.adjacency())
    }

    fn parallel(&self) -> Parallel {
        convert::adjacency_to_parallel(&self.adjacency())
    }

    /// Every node, in pivot key order.
    fn nodes(&self) -> Vec<Node> {
        self.adjacency().nodes().cloned().collect()
    }

    /// Nodes with no incoming edge.
    fn roots(&self) -> Vec<Node> {
        walk::roots(&self.adjacency())
    }

    /// Nodes with no outgoing edge.
    fn endpoints(&self) -> Vec<Node> {
        walk::endpoints(&self.adjacency())
    }

    /// Always `true`; undirected graphs are not modeled.
    fn is_directed(&self) -> bool {
        true
    }

    // -- mutation -----------------------------------------------------------

    fn add(&mut self, node: impl Into<Node>) -> Result<()> {
        self.add_linked(node, &[], &[])
    }

    /// Adds `node` with an edge from each ancestor and to each descendant.
    ///
    /// # Errors
    /// - `InvalidEdge` if `node` lists itself.
    /// - `MissingReference` naming every absent ancestor and descendant.
    fn add_linked(
        &mut self,
        node: impl Into<Node>,
        ancestors: &[Node],
        descendants: &[Node],
    ) -> Result<()> {
        let node = node.into();
        let mut edges = Vec::with_capacity(ancestors.len() + descendants.len());
        for ancestor in ancestors {
            edges.push(Edge::new(ancestor, &node)?);
        }
        for descendant in descendants {
            edges.push(Edge::new(&node, descendant)?);
        }
        let absent = absent_names(self, ancestors.iter().chain(descendants));
        if !absent.is_empty() {
            debug!(node = %node, missing = ?absent, "add refused");
            return Err(GraphError::missing(absent));
        }
        let mut changes = Vec::with_capacity(edges.len() + 1);
        if !self.contains(&node) {
            changes.push(Change::AddNode(node.clone()));
        }
        changes.extend(
            distinct_edges(edges)
                .into_iter()
                .filter(|edge| !self.has_edge(edge.start(), edge.stop()))
                .map(Change::AddEdge),
        );
        debug!(
            node = %node,
            ancestors = ancestors.len(),
            descendants = descendants.len(),
            "add"
        );
        self.commit(changes)
    }

    /// Removes `node` and strips it from every other node's edges.
    ///
    /// # Errors
    /// `MissingReference` if `node` is absent.
    fn delete(&mut self, node: &Node) -> Result<()> {
        if !self.contains(node) {
            debug!(node = %node, "delete refused");
            return Err(GraphError::missing([node.to_string()]));
        }
        debug!(node = %node, "delete");
        self.commit(vec![Change::RemoveNode(node.clone())])
    }

    fn connect(&mut self, start: impl Into<Node>, stop: impl Into<Node>) -> Result<()> {
        self.connect_all([(start.into(), stop.into())])
    }

    /// Installs every edge, or none.
    ///
    /// # Errors
    /// - `InvalidEdge` on a self-loop.
    /// - `MissingReference` naming every absent endpoint in the batch.
    fn connect_all<I, S, T>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<Node>,
        T: Into<Node>,
    {
        let edges = collect_edges(pairs)?;
        let absent = absent_names(self, edges.iter().flat_map(|e| [e.start(), e.stop()]));
        if !absent.is_empty() {
            debug!(missing = ?absent, "connect refused");
            return Err(GraphError::missing(absent));
        }
        let changes: Vec<Change> = distinct_edges(edges)
            .into_iter()
            .filter(|edge| !self.has_edge(edge.start(), edge.stop()))
            .map(Change::AddEdge)
            .collect();
        debug!(count = changes.len(), "connect");
        self.commit(changes)
    }

    fn disconnect(&mut self, start: impl Into<Node>, stop: impl Into<Node>) -> Result<()> {
        self.disconnect_all([(start.into(), stop.into())])
    }

    /// Removes every edge, or none.
    ///
    /// # Errors
    /// `InvalidEdge` on a self-loop or on the first edge that is not present.
    fn disconnect_all<I, S, T>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<Node>,
        T: Into<Node>,
    {
        let edges = collect_edges(pairs)?;
        if let Some(edge) = edges.iter().find(|e| !self.has_edge(e.start(), e.stop())) {
            debug!(start = %edge.start(), stop = %edge.stop(), "disconnect refused");
            return Err(GraphError::absent_edge(edge.start(), edge.stop()));
        }
        let changes: Vec<Change> = distinct_edges(edges)
            .into_iter()
            .map(Change::RemoveEdge)
            .collect();
        debug!(count = changes.len(), "disconnect");
        self.commit(changes)
    }

    /// Unions `other`'s nodes and edges into this graph. Nodes unify by name.
    fn merge<C: Composite>(&mut self, other: &C) -> Result<()> {
        let changes = merge_changes(self, &other.adjacency());
        debug!(form = %self.kind(), other = %other.kind(), count = changes.len(), "merge");
        self.commit(changes)
    }

    /// New graph over the selected nodes.
    ///
    /// Exactly one of `include` and `exclude` must be given. Edges leaving the
    /// selection are dropped.
    ///
    /// # Errors
    /// `Selection` when both or neither are given, or when the selection
    /// names nodes that are not in the graph.
    fn subset(&self, include: Option<&[Node]>, exclude: Option<&[Node]>) -> Result<Self> {
        let (names, including) = match (include, exclude) {
            (None, None) => return Err(GraphError::Selection(SelectionFault::Unspecified)),
            (Some(_), Some(_)) => return Err(GraphError::Selection(SelectionFault::Ambiguous)),
            (Some(names), None) => (names, true),
            (None, Some(names)) => (names, false),
        };
        let mut unknown = absent_names(self, names.iter());
        if !unknown.is_empty() {
            unknown.sort();
            unknown.dedup();
            debug!(unknown = ?unknown, "subset refused");
            return Err(GraphError::Selection(SelectionFault::Unknown(unknown)));
        }
        let named: HashSet<Node> = names.iter().cloned().collect();
        let keep: HashSet<Node> = if including {
            named
        } else {
            self.nodes()
                .into_iter()
                .filter(|node| !named.contains(node))
                .collect()
        };
        debug!(kept = keep.len(), "subset");
        self.restrict(&keep)
    }

    /// Every simple path between the given ends.
    ///
    /// A missing `start` means every root; a missing `stop` every endpoint.
    ///
    /// # Errors
    /// `MissingReference` when `start` or `stop` is not in the graph.
    fn walk(&self, start: Option<&Node>, stop: Option<&Node>) -> Result<Parallel> {
        self.walk_with(start, stop, &WalkConfig::default())
    }

    /// [`Composite::walk`] under enumeration limits.
    fn walk_with(
        &self,
        start: Option<&Node>,
        stop: Option<&Node>,
        config: &WalkConfig,
    ) -> Result<Parallel> {
        let adjacency = self.adjacency();
        let absent: Vec<String> = [start, stop]
            .into_iter()
            .flatten()
            .filter(|node| !adjacency.contains(node))
            .map(ToString::to_string)
            .collect();
        if !absent.is_empty() {
            return Err(GraphError::missing(absent));
        }
        let starts = start.map_or_else(|| walk::roots(&adjacency), |node| vec![node.clone()]);
        let stops = stop.map_or_else(|| walk::endpoints(&adjacency), |node| vec![node.clone()]);
        walk::walk_pairs_with(&adjacency, &starts, &stops, config)
    }
}

/// Changes that bring `incoming`'s nodes and edges into `target`.
pub(crate) fn merge_changes<C: Composite>(target: &C, incoming: &Adjacency) -> Vec<Change> {
    let mut changes: Vec<Change> = incoming
        .nodes()
        .filter(|node| !target.contains(node))
        .cloned()
        .map(Change::AddNode)
        .collect();
    for (start, stops) in incoming.iter() {
        for stop in stops {
            if !target.has_edge(start, stop) {
                changes.push(Change::AddEdge(Edge::between(start.clone(), stop.clone())));
            }
        }
    }
    changes
}

/// Names of `nodes` absent from `graph`, in input order.
fn absent_names<'a, C: Composite>(graph: &C, nodes: impl Iterator<Item = &'a Node>) -> Vec<String> {
    nodes
        .filter(|node| !graph.contains(node))
        .map(ToString::to_string)
        .collect()
}

fn collect_edges<I, S, T>(pairs: I) -> Result<Vec<Edge>>
where
    I: IntoIterator<Item = (S, T)>,
    S: Into<Node>,
    T: Into<Node>,
{
    pairs
        .into_iter()
        .map(|(start, stop)| Edge::new(start, stop))
        .collect()
}

/// Drops repeated edges, keeping first occurrences.
pub(crate) fn distinct_edges(edges: Vec<Edge>) -> Vec<Edge> {
    let mut seen = HashSet::with_capacity(edges.len());
    edges
        .into_iter()
        .filter(|edge| seen.insert(edge.clone()))
        .collect()
}

fn require_ends(present: impl Fn(&Node) -> bool, edge: &Edge) -> Result<()> {
    let absent: Vec<String> = [edge.start(), edge.stop()]
        .into_iter()
        .filter(|node| !present(node))
        .map(ToString::to_string)
        .collect();
    if absent.is_empty() {
        Ok(())
    } else {
        Err(GraphError::missing(absent))
    }
}

// ---------------------------------------------------------------------------
// Adjacency
// ---------------------------------------------------------------------------

impl Composite for Adjacency {
    fn kind(&self) -> FormKind {
        FormKind::Adjacency
    }

    fn contains(&self, node: &Node) -> bool {
        Adjacency::contains(self, node)
    }

    fn has_edge(&self, start: &Node, stop: &Node) -> bool {
        Adjacency::has_edge(self, start, stop)
    }

    fn insert_node(&mut self, node: Node) -> Result<()> {
        Adjacency::insert_node(self, node);
        Ok(())
    }

    fn remove_node(&mut self, node: &Node) -> Result<()> {
        if Adjacency::remove_node(self, node) {
            Ok(())
        } else {
            Err(GraphError::missing([node.to_string()]))
        }
    }

    fn install_edge(&mut self, edge: &Edge) -> Result<()> {
        require_ends(|node| Adjacency::contains(self, node), edge)?;
        self.insert_edge(edge);
        Ok(())
    }

    fn remove_edge(&mut self, edge: &Edge) -> Result<()> {
        if Adjacency::remove_edge(self, edge) {
            Ok(())
        } else {
            Err(GraphError::absent_edge(edge.start(), edge.stop()))
        }
    }

    fn restrict(&self, keep: &HashSet<Node>) -> Result<Self> {
        Ok(Adjacency::restrict(self, keep))
    }

    fn adjacency(&self) -> Adjacency {
        self.clone()
    }

    fn from_adjacency(adjacency: Adjacency) -> Result<Self> {
        Ok(adjacency)
    }
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

impl Composite for Edges {
    fn kind(&self) -> FormKind {
        FormKind::Edges
    }

    fn contains(&self, node: &Node) -> bool {
        self.loose().contains(node)
            || self.iter().any(|edge| edge.start() == node || edge.stop() == node)
    }

    fn has_edge(&self, start: &Node, stop: &Node) -> bool {
        self.iter()
            .any(|edge| edge.start() == start && edge.stop() == stop)
    }

    fn insert_node(&mut self, node: Node) -> Result<()> {
        if !Composite::contains(self, &node) {
            self.loose_mut().push(node);
        }
        Ok(())
    }

    fn remove_node(&mut self, node: &Node) -> Result<()> {
        if !Composite::contains(self, node) {
            return Err(GraphError::missing([node.to_string()]));
        }
        let neighbors: Vec<Node> = self
            .iter()
            .filter_map(|edge| match (edge.start() == node, edge.stop() == node) {
                (true, _) => Some(edge.stop().clone()),
                (_, true) => Some(edge.start().clone()),
                _ => None,
            })
            .collect();
        self.contents_mut()
            .retain(|edge| edge.start() != node && edge.stop() != node);
        self.loose_mut().retain(|loose| loose != node);
        for neighbor in neighbors {
            Composite::insert_node(self, neighbor)?;
        }
        Ok(())
    }

    fn install_edge(&mut self, edge: &Edge) -> Result<()> {
        require_ends(|node| Composite::contains(self, node), edge)?;
        self.loose_mut()
            .retain(|node| node != edge.start() && node != edge.stop());
        self.contents_mut().push(edge.clone());
        Ok(())
    }

    fn remove_edge(&mut self, edge: &Edge) -> Result<()> {
        if !Composite::has_edge(self, edge.start(), edge.stop()) {
            return Err(GraphError::absent_edge(edge.start(), edge.stop()));
        }
        self.contents_mut().retain(|existing| existing != edge);
        for end in [edge.start(), edge.stop()] {
            Composite::insert_node(self, end.clone())?;
        }
        Ok(())
    }

    fn restrict(&self, keep: &HashSet<Node>) -> Result<Self> {
        let contents = self
            .iter()
            .filter(|edge| keep.contains(edge.start()) && keep.contains(edge.stop()))
            .cloned()
            .collect();
        let kept = Edges::nodes(self)
            .into_iter()
            .filter(|node| keep.contains(node));
        Ok(Edges::with_loose(contents, kept))
    }

    fn adjacency(&self) -> Adjacency {
        convert::edges_to_adjacency(self)
    }

    fn from_adjacency(adjacency: Adjacency) -> Result<Self> {
        Ok(convert::adjacency_to_edges(&adjacency))
    }
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

/// Row and column of `edge` in `matrix`.
fn cell_of(matrix: &Matrix, edge: &Edge) -> Result<(usize, usize)> {
    let start = matrix.index_of(edge.start());
    let stop = matrix.index_of(edge.stop());
    match (start, stop) {
        (Some(i), Some(j)) => Ok((i, j)),
        _ => Err(GraphError::missing(
            [(start, edge.start()), (stop, edge.stop())]
                .into_iter()
                .filter(|(index, _)| index.is_none())
                .map(|(_, node)| node.to_string()),
        )),
    }
}

impl Composite for Matrix {
    fn kind(&self) -> FormKind {
        FormKind::Matrix
    }

    fn contains(&self, node: &Node) -> bool {
        self.index_of(node).is_some()
    }

    fn has_edge(&self, start: &Node, stop: &Node) -> bool {
        self.get(start, stop)
    }

    fn insert_node(&mut self, node: Node) -> Result<()> {
        self.push_label(node);
        Ok(())
    }

    fn remove_node(&mut self, node: &Node) -> Result<()> {
        if self.remove_label(node) {
            Ok(())
        } else {
            Err(GraphError::missing([node.to_string()]))
        }
    }

    fn install_edge(&mut self, edge: &Edge) -> Result<()> {
        let (i, j) = cell_of(self, edge)?;
        self.set(i, j, true);
        Ok(())
    }

    fn remove_edge(&mut self, edge: &Edge) -> Result<()> {
        let (i, j) = cell_of(self, edge)?;
        if !self.set(i, j, false) {
            return Err(GraphError::absent_edge(edge.start(), edge.stop()));
        }
        Ok(())
    }

    fn restrict(&self, keep: &HashSet<Node>) -> Result<Self> {
        let indices: Vec<usize> = self
            .labels()
            .iter()
            .enumerate()
            .filter(|(_, label)| keep.contains(*label))
            .map(|(i, _)| i)
            .collect();
        let labels = indices.iter().map(|&i| self.labels()[i].clone()).collect();
        let rows = indices
            .iter()
            .map(|&i| indices.iter().map(|&j| self.rows()[i][j]).collect())
            .collect();
        Ok(Matrix::from_parts(rows, labels))
    }

    fn adjacency(&self) -> Adjacency {
        convert::matrix_to_adjacency(self)
    }

    fn from_adjacency(adjacency: Adjacency) -> Result<Self> {
        Ok(convert::adjacency_to_matrix(&adjacency))
    }
}

// ---------------------------------------------------------------------------
// Path forms
// ---------------------------------------------------------------------------

/// Path forms cannot represent intermediate states of a batch, so they stage
/// the whole batch on the pivot and rebuild once.
fn rebuild<C: Composite>(graph: &mut C, changes: &[Change]) -> Result<()> {
    let mut staged = graph.adjacency();
    for change in changes {
        change.apply(&mut staged)?;
    }
    match C::from_adjacency(staged) {
        Ok(rebuilt) => {
            *graph = rebuilt;
            Ok(())
        }
        Err(err) => {
            debug!(form = %graph.kind(), error = %err, "rebuild refused");
            Err(err)
        }
    }
}

impl Composite for Serial {
    fn kind(&self) -> FormKind {
        FormKind::Serial
    }

    fn contains(&self, node: &Node) -> bool {
        Serial::contains(self, node)
    }

    fn has_edge(&self, start: &Node, stop: &Node) -> bool {
        self.pairs()
            .any(|edge| edge.start() == start && edge.stop() == stop)
    }

    fn insert_node(&mut self, node: Node) -> Result<()> {
        rebuild(self, &[Change::AddNode(node)])
    }

    fn remove_node(&mut self, node: &Node) -> Result<()> {
        rebuild(self, &[Change::RemoveNode(node.clone())])
    }

    fn install_edge(&mut self, edge: &Edge) -> Result<()> {
        rebuild(self, &[Change::AddEdge(edge.clone())])
    }

    fn remove_edge(&mut self, edge: &Edge) -> Result<()> {
        rebuild(self, &[Change::RemoveEdge(edge.clone())])
    }

    fn restrict(&self, keep: &HashSet<Node>) -> Result<Self> {
        convert::adjacency_to_serial(&convert::serial_to_adjacency(self).restrict(keep))
    }

    fn adjacency(&self) -> Adjacency {
        convert::serial_to_adjacency(self)
    }

    fn from_adjacency(adjacency: Adjacency) -> Result<Self> {
        convert::adjacency_to_serial(&adjacency)
    }

    fn commit(&mut self, changes: Vec<Change>) -> Result<()> {
        rebuild(self, &changes)
    }
}

/// Every root-to-endpoint path, provided together they hold the whole graph.
fn covering_paths(adjacency: &Adjacency) -> Result<Parallel> {
    let parallel = convert::adjacency_to_parallel(adjacency);
    let covered = convert::parallel_to_adjacency(&parallel);
    let mut missing: Vec<String> = adjacency
        .nodes()
        .filter(|node| !covered.contains(node))
        .map(ToString::to_string)
        .collect();
    for (start, stops) in adjacency.iter() {
        missing.extend(
            stops
                .iter()
                .filter(|stop| !covered.has_edge(start, stop))
                .map(|stop| format!("({start}, {stop})")),
        );
    }
    if missing.is_empty() {
        return Ok(parallel);
    }
    debug!(missing = ?missing, "paths do not cover the graph");
    Err(GraphError::Uncovered { missing })
}

impl Composite for Parallel {
    fn kind(&self) -> FormKind {
        FormKind::Parallel
    }

    fn contains(&self, node: &Node) -> bool {
        self.iter().any(|path| path.contains(node))
    }

    fn has_edge(&self, start: &Node, stop: &Node) -> bool {
        self.iter().any(|path| Composite::has_edge(path, start, stop))
    }

    fn insert_node(&mut self, node: Node) -> Result<()> {
        rebuild(self, &[Change::AddNode(node)])
    }

    fn remove_node(&mut self, node: &Node) -> Result<()> {
        rebuild(self, &[Change::RemoveNode(node.clone())])
    }

    fn install_edge(&mut self, edge: &Edge) -> Result<()> {
        rebuild(self, &[Change::AddEdge(edge.clone())])
    }

    fn remove_edge(&mut self, edge: &Edge) -> Result<()> {
        rebuild(self, &[Change::RemoveEdge(edge.clone())])
    }

    fn restrict(&self, keep: &HashSet<Node>) -> Result<Self> {
        covering_paths(&convert::parallel_to_adjacency(self).restrict(keep))
    }

    fn adjacency(&self) -> Adjacency {
        convert::parallel_to_adjacency(self)
    }

    /// # Errors
    /// `Uncovered` when some node or edge lies on no root-to-endpoint path.
    fn from_adjacency(adjacency: Adjacency) -> Result<Self> {
        covering_paths(&adjacency)
    }

    fn commit(&mut self, changes: Vec<Change>) -> Result<()> {
        rebuild(self, &changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdgeFault;

    fn n(name: &str) -> Node {
        Node::new(name)
    }

    fn chain() -> Adjacency {
        Adjacency::from_pairs([("a", vec!["b"]), ("b", vec!["c"])]).unwrap()
    }

    fn in_every_form(adjacency: &Adjacency, check: impl Fn(FormKind, Result<Adjacency>)) {
        check(FormKind::Adjacency, run::<Adjacency>(adjacency));
        check(FormKind::Edges, run::<Edges>(adjacency));
        check(FormKind::Matrix, run::<Matrix>(adjacency));
        check(FormKind::Parallel, run::<Parallel>(adjacency));
    }

    fn run<C: Composite>(adjacency: &Adjacency) -> Result<Adjacency> {
        let mut graph = C::from_adjacency(adjacency.clone())?;
        graph.connect("a", "c")?;
        Ok(graph.adjacency())
    }

    #[test]
    fn connect_agrees_across_forms() {
        in_every_form(&chain(), |kind, result| {
            let adjacency = result.unwrap();
            assert!(adjacency.has_edge(&n("a"), &n("c")), "{kind}");
            assert_eq!(adjacency.edge_count(), 3, "{kind}");
        });
    }

    #[test]
    fn connect_batch_reports_every_missing_end() {
        let mut graph = chain();
        let err = graph
            .connect_all([("a", "p"), ("q", "b"), ("a", "b")])
            .unwrap_err();
        assert_eq!(err, GraphError::missing(["p", "q"]));
        assert_eq!(graph, chain());
    }

    #[test]
    fn self_loop_is_rejected_before_mutation() {
        let mut graph = chain();
        let err = graph.connect_all([("a", "c"), ("b", "b")]).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidEdge {
                reason: EdgeFault::SelfLoop,
                ..
            }
        ));
        assert!(!graph.has_edge(&n("a"), &n("c")));
    }

    #[test]
    fn disconnect_absent_edge() {
        let mut graph = Edges::from_adjacency(chain()).unwrap();
        let err = graph.disconnect("a", "c").unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidEdge {
                reason: EdgeFault::Absent,
                ..
            }
        ));
        graph.disconnect("a", "b").unwrap();
        // Both ends survive as nodes.
        assert!(Composite::contains(&graph, &n("a")));
        assert_eq!(graph.adjacency().len(), 3);
    }

    #[test]
    fn delete_strips_edges_in_edge_list() {
        let mut graph = Edges::from_adjacency(chain()).unwrap();
        graph.delete(&n("b")).unwrap();
        let adjacency = graph.adjacency();
        assert_eq!(adjacency.len(), 2);
        assert_eq!(adjacency.edge_count(), 0);
        assert_eq!(
            graph.delete(&n("b")).unwrap_err(),
            GraphError::missing(["b"])
        );
    }

    #[test]
    fn matrix_mutations() {
        let mut graph = Matrix::from_adjacency(chain()).unwrap();
        graph.add_linked("d", &[n("c")], &[n("a")]).unwrap();
        assert!(graph.get(&n("c"), &n("d")));
        assert!(graph.get(&n("d"), &n("a")));
        graph.delete(&n("a")).unwrap();
        assert_eq!(graph.labels(), [n("b"), n("c"), n("d")].as_slice());
    }

    #[test]
    fn serial_mutation_that_branches_rolls_back() {
        let mut serial = Serial::new(["a", "b", "c"]).unwrap();
        let before = serial.clone();
        assert_eq!(
            serial.add_linked("x", &[n("a")], &[]).unwrap_err(),
            GraphError::LossyCollapse { paths: 2 }
        );
        assert_eq!(serial, before);
        serial.add_linked("d", &[n("c")], &[]).unwrap();
        assert_eq!(serial, Serial::new(["a", "b", "c", "d"]).unwrap());
    }

    #[test]
    fn parallel_gains_a_path() {
        let mut parallel = Parallel::from_adjacency(chain()).unwrap();
        parallel.add("solo").unwrap();
        assert_eq!(parallel.len(), 2);
        assert!(Composite::contains(&parallel, &n("solo")));
    }

    #[test]
    fn parallel_refuses_a_closing_cycle() {
        let mut parallel = Parallel::from_paths([["a", "b", "c"]]).unwrap();
        let before = parallel.clone();
        let err = parallel.connect("c", "a").unwrap_err();
        assert!(matches!(err, GraphError::Uncovered { ref missing } if missing.len() == 6));
        assert_eq!(parallel, before);
        assert_eq!(Composite::nodes(&parallel), [n("a"), n("b"), n("c")]);
    }

    #[test]
    fn parallel_refuses_cyclic_sources() {
        let edges = Edges::from_pairs([("a", "b"), ("b", "a"), ("x", "y")]).unwrap();
        assert_eq!(
            Parallel::from_edges(&edges).unwrap_err(),
            GraphError::Uncovered {
                missing: vec![
                    "a".to_string(),
                    "b".to_string(),
                    "(a, b)".to_string(),
                    "(b, a)".to_string(),
                ]
            }
        );

        // A cycle hanging off a covered path still loses its back edge.
        let looped =
            Adjacency::from_pairs([("r", vec!["a"]), ("a", vec!["b"]), ("b", vec!["a", "e"])])
                .unwrap();
        assert_eq!(
            Parallel::from_adjacency(looped).unwrap_err(),
            GraphError::Uncovered {
                missing: vec!["(b, a)".to_string()]
            }
        );

        let mut parallel = Parallel::from_paths([["x", "y"]]).unwrap();
        let before = parallel.clone();
        assert!(parallel.merge(&edges).is_err());
        assert_eq!(parallel, before);
    }

    #[test]
    fn disconnect_batch_is_all_or_nothing() {
        fn check<C: Composite + PartialEq + std::fmt::Debug>(mut graph: C) {
            let before = graph.clone();
            let err = graph
                .disconnect_all([("a", "b"), ("a", "c")])
                .unwrap_err();
            assert!(matches!(
                err,
                GraphError::InvalidEdge {
                    reason: EdgeFault::Absent,
                    ..
                }
            ));
            assert_eq!(graph, before);
            assert!(graph.has_edge(&n("a"), &n("b")));
        }
        check(chain());
        check(Edges::from_adjacency(chain()).unwrap());
        check(Matrix::from_adjacency(chain()).unwrap());
        check(Serial::from_adjacency(chain()).unwrap());
        check(Parallel::from_adjacency(chain()).unwrap());
    }

    #[test]
    fn subset_selection_errors() {
        let graph = chain();
        assert_eq!(
            graph.subset(None, None).unwrap_err(),
            GraphError::Selection(SelectionFault::Unspecified)
        );
        assert_eq!(
            graph.subset(Some(&[n("a")]), Some(&[n("b")])).unwrap_err(),
            GraphError::Selection(SelectionFault::Ambiguous)
        );
        assert_eq!(
            graph.subset(Some(&[n("zz"), n("a")]), None).unwrap_err(),
            GraphError::Selection(SelectionFault::Unknown(vec!["zz".to_string()]))
        );
    }

    #[test]
    fn subset_by_exclusion() {
        let graph = Matrix::from_adjacency(chain()).unwrap();
        let sub = graph.subset(None, Some(&[n("a")])).unwrap();
        assert_eq!(sub.labels(), [n("b"), n("c")].as_slice());
        assert!(sub.get(&n("b"), &n("c")));
    }

    #[test]
    fn walk_variants() {
        let graph = Adjacency::from_pairs([
            ("a", vec!["b", "d"]),
            ("c", vec!["d"]),
            ("d", vec!["e"]),
        ])
        .unwrap();
        assert_eq!(graph.walk(None, None).unwrap().len(), 3);
        assert_eq!(graph.walk(Some(&n("a")), None).unwrap().len(), 2);
        assert_eq!(graph.walk(None, Some(&n("e"))).unwrap().len(), 2);
        assert_eq!(
            graph.walk(Some(&n("c")), Some(&n("e"))).unwrap(),
            Parallel::from_paths([["c", "d", "e"]]).unwrap()
        );
        assert_eq!(
            graph.walk(Some(&n("nope")), None).unwrap_err(),
            GraphError::missing(["nope"])
        );
    }

    #[test]
    fn merge_unifies_by_name() {
        let mut left = Edges::from_adjacency(chain()).unwrap();
        let right = Adjacency::from_pairs([("c", vec!["d"]), ("a", vec!["b"])]).unwrap();
        left.merge(&right).unwrap();
        assert_eq!(left.len(), 3);
        assert_eq!(left.adjacency().len(), 4);
    }

    #[test]
    fn commit_restores_on_failure() {
        let mut graph = Edges::from_adjacency(chain()).unwrap();
        let before = graph.clone();
        let err = graph
            .commit(vec![
                Change::AddNode(n("x")),
                Change::AddEdge(Edge::new("x", "ghost").unwrap()),
            ])
            .unwrap_err();
        assert_eq!(err, GraphError::missing(["ghost"]));
        assert_eq!(graph, before);
    }
}
