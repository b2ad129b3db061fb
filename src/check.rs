//! Structural classification of raw values.
//!
//! Every predicate inspects shape, never a nominal tag, so data built outside
//! the crate can be recognized. Predicates are total: an unfamiliar shape is
//! simply `false`.
//!
//! `CheckerRegistry` holds named predicates and can be extended with new
//! recognizers. It is an ordinary value; there is no process-wide registry.

use crate::forms::FormKind;
use crate::raw::Raw;
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

/// Hashable and either text or a named object.
pub fn is_node(item: &Raw) -> bool {
    matches!(item, Raw::Text(_) | Raw::Named(_))
}

/// A two-element list or tuple of nodes.
pub fn is_edge(item: &Raw) -> bool {
    matches!(item.as_sequence(), Some([start, stop]) if is_node(start) && is_node(stop))
}

/// A mapping from nodes to sets of nodes.
pub fn is_adjacency(item: &Raw) -> bool {
    match item {
        Raw::Map(entries) => entries.iter().all(|(key, value)| {
            is_node(key) && matches!(value, Raw::Set(stops) if stops.iter().all(is_node))
        }),
        _ => false,
    }
}

/// A list of edges. The empty list qualifies.
pub fn is_edges(item: &Raw) -> bool {
    matches!(item, Raw::List(items) if items.iter().all(is_edge))
}

/// A `(rows, labels)` tuple: equal-length 0/1 rows and one label per row.
///
/// Labels must be hashable scalars (text, named objects, integers or
/// booleans). Hashable tuples are refused: a node is identified by one name,
/// and no rendering of a tuple into a name avoids colliding with some text
/// label.
pub fn is_matrix(item: &Raw) -> bool {
    let Raw::Tuple(parts) = item else {
        return false;
    };
    let [rows, labels] = parts.as_slice() else {
        return false;
    };
    let (Some(rows), Some(labels)) = (rows.as_sequence(), labels.as_sequence()) else {
        return false;
    };
    let width = rows.first().and_then(Raw::as_sequence).map(<[Raw]>::len);
    labels.len() == rows.len()
        && labels.iter().all(|label| label.is_hashable() && label.as_label().is_some())
        && rows.iter().all(|row| {
            row.as_sequence().is_some_and(|cells| {
                Some(cells.len()) == width && cells.iter().all(|cell| cell.as_cell().is_some())
            })
        })
}

/// A list of nodes, none of which is itself a pair.
pub fn is_serial(item: &Raw) -> bool {
    matches!(item, Raw::List(items) if items.iter().all(|i| is_node(i) && !is_edge(i)))
}

/// A list of serials.
pub fn is_parallel(item: &Raw) -> bool {
    matches!(item, Raw::List(items) if items.iter().all(is_serial))
}

/// Any of the graph-shaped forms: adjacency, edges or matrix.
pub fn is_graph(item: &Raw) -> bool {
    is_adjacency(item) || is_matrix(item) || is_edges(item)
}

/// Predicate for one form.
pub fn is_form(kind: FormKind, item: &Raw) -> bool {
    match kind {
        FormKind::Adjacency => is_adjacency(item),
        FormKind::Edges => is_edges(item),
        FormKind::Matrix => is_matrix(item),
        FormKind::Serial => is_serial(item),
        FormKind::Parallel => is_parallel(item),
    }
}

/// First form, in `FormKind::ALL` order, whose predicate accepts `item`.
pub fn recognize(item: &Raw) -> Option<FormKind> {
    let kind = FormKind::ALL.into_iter().find(|&kind| is_form(kind, item));
    trace!(shape = item.shape(), form = ?kind, "recognize");
    kind
}

/// A named structural predicate.
pub type Checker = Box<dyn Fn(&Raw) -> bool + Send + Sync>;

/// Named predicates, iterated in name order.
pub struct CheckerRegistry {
    checkers: BTreeMap<String, Checker>,
}

impl CheckerRegistry {
    /// A registry holding the built-in recognizers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.add_checker("node", is_node);
        registry.add_checker("edge", is_edge);
        registry.add_checker("adjacency", is_adjacency);
        registry.add_checker("edges", is_edges);
        registry.add_checker("matrix", is_matrix);
        registry.add_checker("serial", is_serial);
        registry.add_checker("parallel", is_parallel);
        registry.add_checker("graph", is_graph);
        registry
    }

    pub fn empty() -> Self {
        Self {
            checkers: BTreeMap::new(),
        }
    }

    /// Registers `checker` under `name`, replacing any earlier one.
    pub fn add_checker<F>(&mut self, name: impl Into<String>, checker: F) -> &mut Self
    where
        F: Fn(&Raw) -> bool + Send + Sync + 'static,
    {
        self.checkers.insert(name.into(), Box::new(checker));
        self
    }

    pub fn remove_checker(&mut self, name: &str) -> Option<Checker> {
        self.checkers.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checkers.contains_key(name)
    }

    /// Runs the named checker; `None` if no checker has that name.
    pub fn check(&self, name: &str, item: &Raw) -> Option<bool> {
        self.checkers.get(name).map(|checker| checker(item))
    }

    /// Names of every checker that accepts `item`.
    pub fn kinds_of(&self, item: &Raw) -> Vec<&str> {
        self.checkers
            .iter()
            .filter(|(_, checker)| checker(item))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checkers.keys().map(String::as_str)
    }
}

impl Default for CheckerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CheckerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.checkers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> Raw {
        Raw::Set(names.iter().map(|n| Raw::text(*n)).collect())
    }

    fn grid(rows: &[&[i64]], labels: &[&str]) -> Raw {
        Raw::Tuple(vec![
            Raw::List(
                rows.iter()
                    .map(|row| Raw::List(row.iter().map(|c| Raw::Int(*c)).collect()))
                    .collect(),
            ),
            Raw::texts(labels.iter().copied()),
        ])
    }

    #[test]
    fn nodes_and_edges() {
        assert!(is_node(&Raw::text("a")));
        assert!(is_node(&Raw::Named("a".into())));
        assert!(!is_node(&Raw::Int(1)));
        assert!(is_edge(&Raw::pair("a", "b")));
        assert!(is_edge(&Raw::texts(["a", "b"])));
        assert!(!is_edge(&Raw::texts(["a", "b", "c"])));
    }

    #[test]
    fn adjacency_needs_set_values() {
        let good = Raw::Map(vec![(Raw::text("a"), set(&["b"])), (Raw::text("b"), set(&[]))]);
        assert!(is_adjacency(&good));
        let bad = Raw::Map(vec![(Raw::text("a"), Raw::texts(["b"]))]);
        assert!(!is_adjacency(&bad));
    }

    #[test]
    fn matrix_shape() {
        assert!(is_matrix(&grid(&[&[0, 1], &[0, 0]], &["a", "b"])));
        assert!(!is_matrix(&grid(&[&[0, 1], &[0]], &["a", "b"])));
        assert!(!is_matrix(&grid(&[&[0, 2], &[0, 0]], &["a", "b"])));
        assert!(!is_matrix(&grid(&[&[0, 1], &[0, 0]], &["a"])));
    }

    #[test]
    fn matrix_labels_are_scalars() {
        let Raw::Tuple(mut parts) = grid(&[&[0, 1], &[0, 0]], &["a", "b"]) else {
            unreachable!()
        };
        parts[1] = Raw::List(vec![Raw::Int(7), Raw::Bool(true)]);
        assert!(is_matrix(&Raw::Tuple(parts.clone())));
        parts[1] = Raw::List(vec![Raw::text("a"), Raw::pair("b", "c")]);
        assert!(Raw::pair("b", "c").is_hashable());
        assert!(!is_matrix(&Raw::Tuple(parts)));
    }

    #[test]
    fn serial_is_not_edges() {
        let serial = Raw::texts(["a", "b", "c"]);
        assert!(is_serial(&serial));
        assert!(!is_edges(&serial));
        let edges = Raw::List(vec![Raw::pair("a", "b")]);
        assert!(is_edges(&edges));
        assert!(!is_serial(&edges));
    }

    #[test]
    fn recognition_order() {
        assert_eq!(recognize(&Raw::List(vec![])), Some(FormKind::Edges));
        assert_eq!(recognize(&Raw::texts(["a"])), Some(FormKind::Serial));
        assert_eq!(
            recognize(&Raw::List(vec![Raw::texts(["a", "b", "c"])])),
            Some(FormKind::Parallel)
        );
        assert_eq!(recognize(&Raw::Int(4)), None);
    }

    #[test]
    fn registry_extends_recognition() {
        let mut registry = CheckerRegistry::new();
        assert_eq!(registry.check("tree", &Raw::texts(["a"])), None);
        registry.add_checker("tree", |item| matches!(item, Raw::List(_)));
        assert_eq!(registry.check("tree", &Raw::texts(["a"])), Some(true));
        assert_eq!(
            registry.kinds_of(&Raw::texts(["a"])),
            vec!["serial", "tree"]
        );
        assert_eq!(
            registry.kinds_of(&Raw::List(vec![Raw::pair("a", "b")])),
            vec!["edges", "graph", "tree"]
        );
    }
}
