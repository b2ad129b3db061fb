//! Root/endpoint discovery and simple-path enumeration over an adjacency.
//!
//! The search is depth-first with an explicit stack of successor iterators,
//! one per node on the current path. A node may appear on many reported
//! paths; it is only barred from repeating within one path.
//!
//! # Invariants
//! - Every reported path starts at `start`, ends at `stop` and repeats no node.
//! - Output order is deterministic: successors are visited in name order and
//!   whole-graph walks are root-major, endpoint-minor.

use crate::config::WalkConfig;
use crate::error::{GraphError, Result};
use crate::forms::{Adjacency, Parallel, Serial};
use crate::node::Node;
use std::collections::{btree_set, HashSet};
use std::ops::ControlFlow;
use tracing::{debug, trace};

/// Keys that appear in no successor set, in key order.
pub fn roots(adjacency: &Adjacency) -> Vec<Node> {
    let targets: HashSet<&Node> = adjacency.iter().flat_map(|(_, stops)| stops).collect();
    adjacency
        .nodes()
        .filter(|node| !targets.contains(node))
        .cloned()
        .collect()
}

/// Keys with no successors, in key order.
pub fn endpoints(adjacency: &Adjacency) -> Vec<Node> {
    adjacency
        .iter()
        .filter(|(_, stops)| stops.is_empty())
        .map(|(node, _)| node.clone())
        .collect()
}

/// Every simple path from `start` to `stop`.
///
/// `start == stop` yields the single-node path. A `start` that is absent or
/// has no successors yields nothing.
pub fn walk(adjacency: &Adjacency, start: &Node, stop: &Node) -> Vec<Serial> {
    let mut paths = Vec::new();
    let flow = search(adjacency, start, stop, &WalkConfig::unbounded(), &mut |path| {
        paths.push(Serial::from_path_unchecked(path.to_vec()));
        ControlFlow::Continue(())
    });
    // The visitor above never breaks.
    debug_assert!(flow.is_continue());
    paths
}

/// [`walk`] under enumeration limits.
///
/// # Errors
/// `PathLimit` when more than `config.max_paths` paths exist.
pub fn walk_with(
    adjacency: &Adjacency,
    start: &Node,
    stop: &Node,
    config: &WalkConfig,
) -> Result<Vec<Serial>> {
    let mut collector = Collector::new(config);
    collector.run(adjacency, start, stop)?;
    Ok(collector.paths)
}

/// Every root-to-endpoint path of the graph.
pub fn walk_all(adjacency: &Adjacency) -> Parallel {
    let roots = roots(adjacency);
    let endpoints = endpoints(adjacency);
    let mut paths = Vec::new();
    for root in &roots {
        for endpoint in &endpoints {
            paths.extend(walk(adjacency, root, endpoint));
        }
    }
    debug!(roots = roots.len(), endpoints = endpoints.len(), paths = paths.len(), "walked graph");
    Parallel::new(paths)
}

/// [`walk_all`] under enumeration limits.
///
/// # Errors
/// `PathLimit` when more than `config.max_paths` paths exist.
pub fn walk_all_with(adjacency: &Adjacency, config: &WalkConfig) -> Result<Parallel> {
    walk_pairs_with(adjacency, &roots(adjacency), &endpoints(adjacency), config)
}

/// Paths for every `(start, stop)` pair, start-major, stop-minor.
///
/// # Errors
/// `PathLimit` when more than `config.max_paths` paths exist in total.
pub fn walk_pairs_with(
    adjacency: &Adjacency,
    starts: &[Node],
    stops: &[Node],
    config: &WalkConfig,
) -> Result<Parallel> {
    let mut collector = Collector::new(config);
    for start in starts {
        for stop in stops {
            collector.run(adjacency, start, stop)?;
        }
    }
    debug!(
        starts = starts.len(),
        stops = stops.len(),
        paths = collector.paths.len(),
        "walked pairs"
    );
    Ok(Parallel::new(collector.paths))
}

/// Accumulates paths across searches and enforces `max_paths`.
struct Collector<'c> {
    config: &'c WalkConfig,
    paths: Vec<Serial>,
}

impl<'c> Collector<'c> {
    fn new(config: &'c WalkConfig) -> Self {
        Self {
            config,
            paths: Vec::new(),
        }
    }

    fn run(&mut self, adjacency: &Adjacency, start: &Node, stop: &Node) -> Result<()> {
        let limit = self.config.max_paths;
        let paths = &mut self.paths;
        let flow = search(adjacency, start, stop, self.config, &mut |path| {
            if limit.is_some_and(|limit| paths.len() >= limit) {
                return ControlFlow::Break(());
            }
            paths.push(Serial::from_path_unchecked(path.to_vec()));
            ControlFlow::Continue(())
        });
        match (flow, limit) {
            (ControlFlow::Break(()), Some(limit)) => {
                debug!(limit, start = %start, stop = %stop, "path limit exceeded");
                Err(GraphError::PathLimit { limit })
            }
            _ => Ok(()),
        }
    }
}

/// Depth-first search handing each complete path to `visit`.
///
/// Stops early when `visit` breaks.
fn search<F>(
    adjacency: &Adjacency,
    start: &Node,
    stop: &Node,
    config: &WalkConfig,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(&[Node]) -> ControlFlow<()>,
{
    if !config.admits_depth(1) {
        return ControlFlow::Continue(());
    }
    if start == stop {
        return visit(std::slice::from_ref(start));
    }
    let Some(first) = adjacency.successors(start) else {
        return ControlFlow::Continue(());
    };

    let mut path = vec![start.clone()];
    let mut on_path: HashSet<&Node> = HashSet::from([start]);
    let mut frontier: Vec<btree_set::Iter<'_, Node>> = vec![first.iter()];

    while let Some(top) = frontier.last_mut() {
        let Some(next) = top.next() else {
            frontier.pop();
            if let Some(done) = path.pop() {
                on_path.remove(&done);
            }
            continue;
        };
        if on_path.contains(next) || !config.admits_depth(path.len() + 1) {
            continue;
        }
        path.push(next.clone());
        if next == stop {
            trace!(len = path.len(), "path found");
            let flow = visit(&path);
            path.pop();
            if flow.is_break() {
                return flow;
            }
            continue;
        }
        match adjacency.successors(next) {
            Some(successors) if !successors.is_empty() => {
                on_path.insert(next);
                frontier.push(successors.iter());
            }
            _ => {
                path.pop();
            }
        }
    }
    ControlFlow::Continue(())
}
