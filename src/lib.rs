//! graphforms: directed graphs in five interchangeable forms.
//!
//! One logical graph can be held as an adjacency mapping, an edge list, a
//! labelled 0/1 matrix, a single serial path, or a parallel set of paths.
//! Every form converts to every other through the adjacency pivot, every
//! form accepts the same mutations, and every form enumerates its simple
//! root-to-endpoint paths.
//!
//! # Layers
//!
//! - [`node`]: name-based identity for anything that can name itself.
//! - [`raw`] and [`check`]: untyped input and the structural classifier.
//! - [`forms`]: the validated representations and the tagged [`Form`].
//! - [`convert`]: every cell of the conversion table.
//! - [`walk`]: path enumeration with an explicit stack.
//! - [`composite`]: the all-or-nothing mutation contract shared by all forms.
//! - [`fingerprint`] and [`codec`]: content hashing and CBOR bytes.
//!
//! # Invariants
//!
//! - No form ever holds a self-loop.
//! - Every node named as a successor is itself a node of the graph.
//! - A failed mutation leaves the graph exactly as it was.
//!
//! # Example
//!
//! ```
//! use graphforms::prelude::*;
//!
//! let mut graph = Adjacency::new();
//! graph.add("a").unwrap();
//! graph.add("b").unwrap();
//! graph.connect("a", "b").unwrap();
//! assert!(graph.connect("a", "a").is_err());
//!
//! let edges = graph.edges();
//! assert_eq!(edges.len(), 1);
//! assert_eq!(Form::from(edges).fingerprint(), Form::from(graph).fingerprint());
//! ```

pub mod check;
pub mod codec;
pub mod composite;
pub mod config;
pub mod convert;
pub mod error;
pub mod fingerprint;
pub mod forms;
pub mod node;
pub mod raw;
pub mod walk;

pub use check::CheckerRegistry;
pub use composite::{Change, Composite, Directed, System};
pub use config::WalkConfig;
pub use error::{EdgeFault, GraphError, Result, SelectionFault};
pub use fingerprint::{graph_fingerprint, HashValue};
pub use forms::{Adjacency, Edge, Edges, Form, FormKind, Matrix, Parallel, Serial};
pub use node::{Labeled, Named, Node};
pub use raw::Raw;

/// Glob import for the common types and traits.
pub mod prelude {
    pub use crate::check::CheckerRegistry;
    pub use crate::composite::{Composite, Directed, System};
    pub use crate::config::WalkConfig;
    pub use crate::error::{GraphError, Result};
    pub use crate::fingerprint::{graph_fingerprint, HashValue};
    pub use crate::forms::{Adjacency, Edge, Edges, Form, FormKind, Matrix, Parallel, Serial};
    pub use crate::node::{identity, Labeled, Named, Node};
    pub use crate::raw::Raw;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::error::EdgeFault;
    use std::collections::HashSet;

    fn n(name: &str) -> Node {
        Node::new(name)
    }

    fn names(parallel: &Parallel) -> Vec<Vec<&str>> {
        parallel
            .iter()
            .map(|path| path.iter().map(Node::name).collect())
            .collect()
    }

    fn branching() -> Adjacency {
        Adjacency::from_pairs([
            ("a", vec!["b", "d"]),
            ("b", vec![]),
            ("c", vec!["d"]),
            ("d", vec!["e"]),
            ("e", vec![]),
        ])
        .unwrap()
    }

    fn line() -> Adjacency {
        Adjacency::from_pairs([("a", vec!["b"]), ("b", vec!["c"]), ("c", vec![])]).unwrap()
    }

    #[test]
    fn walked_paths_run_root_to_endpoint_without_repeats() {
        let graph = branching();
        let roots = graph.roots();
        let endpoints = graph.endpoints();
        for path in graph.walk(None, None).unwrap().iter() {
            assert!(roots.contains(path.root().unwrap()));
            assert!(endpoints.contains(path.endpoint().unwrap()));
            let distinct: HashSet<&Node> = path.iter().collect();
            assert_eq!(distinct.len(), path.len());
        }
    }

    #[test]
    fn branching_graph_has_three_paths() {
        let parallel = branching().parallel();
        let mut paths = names(&parallel);
        paths.sort();
        assert_eq!(paths, vec![vec!["a", "b"], vec!["a", "d", "e"], vec!["c", "d", "e"]]);
    }

    fn refuses_self_loop<C: Composite + PartialEq + std::fmt::Debug>(mut graph: C) {
        let before = graph.clone();
        for node in graph.nodes() {
            let err = graph.connect_all([(node.clone(), node.clone())]).unwrap_err();
            assert!(matches!(
                err,
                GraphError::InvalidEdge { reason: EdgeFault::SelfLoop, .. }
            ));
        }
        assert_eq!(graph, before);
    }

    #[test]
    fn every_form_refuses_self_loops() {
        let graph = line();
        refuses_self_loop(graph.clone());
        refuses_self_loop(graph.edges());
        refuses_self_loop(graph.matrix());
        refuses_self_loop(graph.serial().unwrap());
        refuses_self_loop(graph.parallel());
        refuses_self_loop(System::named("line").with_contents(graph));
    }

    #[test]
    fn subset_keeps_only_internal_edges() {
        let graph = line();
        let sub = graph.subset(Some(&[n("a"), n("b")]), None).unwrap();
        assert!(sub.has_edge(&n("a"), &n("b")));
        assert!(!sub.has_edge(&n("b"), &n("c")));
        assert!(!sub.contains(&n("c")));

        let edges = graph.edges().subset(Some(&[n("a"), n("b")]), None).unwrap();
        assert_eq!(edges.adjacency(), sub);
    }

    fn add_then_delete_restores<C: Composite>(mut graph: C) {
        let before = graph.adjacency();
        graph.add("x").unwrap();
        assert!(graph.contains(&n("x")));
        graph.delete(&n("x")).unwrap();
        assert_eq!(graph.adjacency(), before);
    }

    #[test]
    fn add_then_delete_is_a_no_op() {
        let graph = branching();
        add_then_delete_restores(graph.clone());
        add_then_delete_restores(graph.edges());
        add_then_delete_restores(graph.matrix());
        add_then_delete_restores(System::new().with_contents(graph));
    }

    #[test]
    fn missing_descendants_are_reported_together() {
        let mut graph = line();
        let before = graph.clone();
        let err = graph.add_linked("x", &[], &[n("p"), n("q")]).unwrap_err();
        assert_eq!(
            err,
            GraphError::MissingReference {
                names: vec!["p".to_string(), "q".to_string()]
            }
        );
        assert!(!graph.contains(&n("x")));
        assert_eq!(graph, before);
    }

    #[test]
    fn appended_graph_extends_every_path() {
        let edges = Edges::from_pairs([("a", "b"), ("c", "d"), ("a", "d"), ("d", "e")]).unwrap();
        let mut dag = System::from_edges(&edges).unwrap();
        assert_eq!(
            names(&dag.walk(None, None).unwrap()),
            vec![vec!["a", "b"], vec!["a", "d", "e"], vec!["c", "d", "e"]]
        );

        dag.add("cat").unwrap();
        dag.connect("e", "cat").unwrap();
        let yard = Adjacency::from_pairs([
            ("tree", vec!["house", "yard"]),
            ("house", vec![]),
            ("yard", vec![]),
        ])
        .unwrap();
        dag.append(&System::from_adjacency(yard).unwrap()).unwrap();

        assert_eq!(
            dag.successors(&n("cat")).unwrap().iter().collect::<Vec<_>>(),
            vec![&n("tree")]
        );
        assert_eq!(dag.parallel().len(), 6);
        assert_eq!(dag.endpoints(), vec![n("house"), n("yard")]);
        assert_eq!(dag.roots(), vec![n("a"), n("c")]);
        assert_eq!(
            names(&dag.walk(None, None).unwrap()),
            vec![
                vec!["a", "b", "tree", "house"],
                vec!["a", "d", "e", "cat", "tree", "house"],
                vec!["a", "b", "tree", "yard"],
                vec!["a", "d", "e", "cat", "tree", "yard"],
                vec!["c", "d", "e", "cat", "tree", "house"],
                vec!["c", "d", "e", "cat", "tree", "yard"],
            ]
        );
    }

    #[derive(Debug, Clone)]
    struct AnotherThing;

    #[test]
    fn labeled_payloads_join_by_synthesized_name() {
        let mut graph = System::new();
        let payload = Labeled::new(AnotherThing);
        graph.add(identity(&payload)).unwrap();
        graph.add(Labeled::named("something", AnotherThing).node()).unwrap();
        graph.connect("something", "another_thing").unwrap();
        assert!(graph.has_edge(&n("something"), &payload.node()));
    }

    #[test]
    fn raw_entry_points_agree() {
        let raw = Raw::List(vec![Raw::pair("a", "b"), Raw::pair("b", "c")]);
        let form = Form::from_raw(&raw).unwrap();
        assert_eq!(form.kind(), FormKind::Edges);
        assert_eq!(form.to_adjacency(), line());
        assert_eq!(Adjacency::from_raw(&raw).unwrap(), line());
        assert_eq!(
            Serial::from_raw(&raw).unwrap(),
            Serial::new(["a", "b", "c"]).unwrap()
        );
    }
}
