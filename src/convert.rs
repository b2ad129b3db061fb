//! Conversions between the five forms.
//!
//! Adjacency is the pivot. Each form has a direct translator to and from it;
//! every other pair is composed through it, except where a shorter route is
//! obvious (`serial → edges`, `serial → parallel`).
//!
//! # Invariants
//! - Every cell of the 5×5 table is defined.
//! - Translating to adjacency never loses a node or an edge.
//! - The only fallible cell family is `* → serial`, which refuses anything
//!   but a single path rather than concatenating paths.

use crate::check;
use crate::error::{GraphError, Result};
use crate::forms::{Adjacency, Edge, Edges, Form, FormKind, Matrix, Parallel, Serial};
use crate::node::Node;
use crate::raw::Raw;
use crate::walk;
use std::collections::HashSet;
use tracing::debug;

// ---------------------------------------------------------------------------
// Into the pivot
// ---------------------------------------------------------------------------

/// Folds each edge into its start's successor set. Loose nodes become keys.
pub fn edges_to_adjacency(edges: &Edges) -> Adjacency {
    let mut adjacency = Adjacency::new();
    for edge in edges {
        adjacency.insert_edge(edge);
    }
    for node in edges.loose() {
        adjacency.insert_node(node.clone());
    }
    adjacency
}

/// Every label becomes a key, in label order; set cells become edges.
pub fn matrix_to_adjacency(matrix: &Matrix) -> Adjacency {
    let mut adjacency = Adjacency::new();
    for label in matrix.labels() {
        adjacency.insert_node(label.clone());
    }
    let labels = matrix.labels();
    for (start, row) in labels.iter().zip(matrix.rows()) {
        for (stop, &cell) in labels.iter().zip(row) {
            if cell {
                adjacency.insert_edge(&Edge::between(start.clone(), stop.clone()));
            }
        }
    }
    adjacency
}

/// Consecutive nodes become edges. A single node becomes one empty key.
pub fn serial_to_adjacency(serial: &Serial) -> Adjacency {
    let mut adjacency = Adjacency::new();
    for node in serial {
        adjacency.insert_node(node.clone());
    }
    for edge in serial.pairs() {
        adjacency.insert_edge(&edge);
    }
    adjacency
}

/// Union of every path's adjacency. Successor sets only ever grow.
pub fn parallel_to_adjacency(parallel: &Parallel) -> Adjacency {
    let mut adjacency = Adjacency::new();
    for serial in parallel {
        for node in serial {
            adjacency.insert_node(node.clone());
        }
        for edge in serial.pairs() {
            adjacency.insert_edge(&edge);
        }
    }
    adjacency
}

// ---------------------------------------------------------------------------
// Out of the pivot
// ---------------------------------------------------------------------------

/// Flattens `(key, successor)` pairs in key order. Keys with no incident edge
/// are carried as loose nodes.
pub fn adjacency_to_edges(adjacency: &Adjacency) -> Edges {
    let contents: Vec<Edge> = adjacency
        .iter()
        .flat_map(|(start, stops)| {
            stops
                .iter()
                .map(move |stop| Edge::between(start.clone(), stop.clone()))
        })
        .collect();
    let touched: HashSet<&Node> = contents
        .iter()
        .flat_map(|edge| [edge.start(), edge.stop()])
        .collect();
    let loose: Vec<Node> = adjacency
        .nodes()
        .filter(|node| !touched.contains(node))
        .cloned()
        .collect();
    Edges::with_loose(contents, loose)
}

/// Indexes keys in insertion order and sets `[i][j]` for each edge.
pub fn adjacency_to_matrix(adjacency: &Adjacency) -> Matrix {
    let labels: Vec<Node> = adjacency.nodes().cloned().collect();
    let rows = labels
        .iter()
        .map(|start| {
            labels
                .iter()
                .map(|stop| adjacency.has_edge(start, stop))
                .collect()
        })
        .collect();
    Matrix::from_parts(rows, labels)
}

/// Every root-to-endpoint path, root-major, endpoint-minor.
pub fn adjacency_to_parallel(adjacency: &Adjacency) -> Parallel {
    walk::walk_all(adjacency)
}

/// The graph's only root-to-endpoint path.
///
/// An empty graph yields an empty serial.
///
/// # Errors
/// `LossyCollapse` when the graph holds zero or several paths.
pub fn adjacency_to_serial(adjacency: &Adjacency) -> Result<Serial> {
    if adjacency.is_empty() {
        return Ok(Serial::default());
    }
    let parallel = walk::walk_all(adjacency);
    // A cycle can hide nodes from every root-to-endpoint path.
    let covered: usize = parallel.iter().map(Serial::len).sum();
    if parallel.len() == 1 && covered == adjacency.len() {
        return parallel.into_serial();
    }
    debug!(paths = parallel.len(), nodes = adjacency.len(), "serial collapse refused");
    Err(GraphError::LossyCollapse {
        paths: parallel.len(),
    })
}

// ---------------------------------------------------------------------------
// Composed and direct cross-form conversions
// ---------------------------------------------------------------------------

pub fn edges_to_matrix(edges: &Edges) -> Matrix {
    adjacency_to_matrix(&edges_to_adjacency(edges))
}

pub fn edges_to_serial(edges: &Edges) -> Result<Serial> {
    adjacency_to_serial(&edges_to_adjacency(edges))
}

pub fn edges_to_parallel(edges: &Edges) -> Parallel {
    adjacency_to_parallel(&edges_to_adjacency(edges))
}

pub fn matrix_to_edges(matrix: &Matrix) -> Edges {
    adjacency_to_edges(&matrix_to_adjacency(matrix))
}

pub fn matrix_to_serial(matrix: &Matrix) -> Result<Serial> {
    adjacency_to_serial(&matrix_to_adjacency(matrix))
}

pub fn matrix_to_parallel(matrix: &Matrix) -> Parallel {
    adjacency_to_parallel(&matrix_to_adjacency(matrix))
}

/// Consecutive pairs; a lone node rides along as loose.
pub fn serial_to_edges(serial: &Serial) -> Edges {
    Edges::with_loose(serial.pairs().collect(), serial.iter().cloned())
}

pub fn serial_to_matrix(serial: &Serial) -> Matrix {
    adjacency_to_matrix(&serial_to_adjacency(serial))
}

/// The serial as the only path; an empty serial has none.
pub fn serial_to_parallel(serial: &Serial) -> Parallel {
    if serial.is_empty() {
        return Parallel::default();
    }
    Parallel::new(vec![serial.clone()])
}

pub fn parallel_to_edges(parallel: &Parallel) -> Edges {
    adjacency_to_edges(&parallel_to_adjacency(parallel))
}

pub fn parallel_to_matrix(parallel: &Parallel) -> Matrix {
    adjacency_to_matrix(&parallel_to_adjacency(parallel))
}

pub fn parallel_to_serial(parallel: &Parallel) -> Result<Serial> {
    adjacency_to_serial(&parallel_to_adjacency(parallel))
}

// ---------------------------------------------------------------------------
// Tagged dispatch
// ---------------------------------------------------------------------------

/// Pivot conversion for any form.
pub fn form_to_adjacency(form: &Form) -> Adjacency {
    match form {
        Form::Adjacency(adjacency) => adjacency.clone(),
        Form::Edges(edges) => edges_to_adjacency(edges),
        Form::Matrix(matrix) => matrix_to_adjacency(matrix),
        Form::Serial(serial) => serial_to_adjacency(serial),
        Form::Parallel(parallel) => parallel_to_adjacency(parallel),
    }
}

/// Converts `form` to `target`.
///
/// # Errors
/// `LossyCollapse` when `target` is `Serial` and the graph is not one path.
pub fn transform(form: &Form, target: FormKind) -> Result<Form> {
    debug!(from = %form.kind(), to = %target, "transform");
    let converted = match (form, target) {
        (Form::Adjacency(a), FormKind::Adjacency) => Form::Adjacency(a.clone()),
        (Form::Adjacency(a), FormKind::Edges) => Form::Edges(adjacency_to_edges(a)),
        (Form::Adjacency(a), FormKind::Matrix) => Form::Matrix(adjacency_to_matrix(a)),
        (Form::Adjacency(a), FormKind::Serial) => Form::Serial(adjacency_to_serial(a)?),
        (Form::Adjacency(a), FormKind::Parallel) => Form::Parallel(adjacency_to_parallel(a)),

        (Form::Edges(e), FormKind::Adjacency) => Form::Adjacency(edges_to_adjacency(e)),
        (Form::Edges(e), FormKind::Edges) => Form::Edges(e.clone()),
        (Form::Edges(e), FormKind::Matrix) => Form::Matrix(edges_to_matrix(e)),
        (Form::Edges(e), FormKind::Serial) => Form::Serial(edges_to_serial(e)?),
        (Form::Edges(e), FormKind::Parallel) => Form::Parallel(edges_to_parallel(e)),

        (Form::Matrix(m), FormKind::Adjacency) => Form::Adjacency(matrix_to_adjacency(m)),
        (Form::Matrix(m), FormKind::Edges) => Form::Edges(matrix_to_edges(m)),
        (Form::Matrix(m), FormKind::Matrix) => Form::Matrix(m.clone()),
        (Form::Matrix(m), FormKind::Serial) => Form::Serial(matrix_to_serial(m)?),
        (Form::Matrix(m), FormKind::Parallel) => Form::Parallel(matrix_to_parallel(m)),

        (Form::Serial(s), FormKind::Adjacency) => Form::Adjacency(serial_to_adjacency(s)),
        (Form::Serial(s), FormKind::Edges) => Form::Edges(serial_to_edges(s)),
        (Form::Serial(s), FormKind::Matrix) => Form::Matrix(serial_to_matrix(s)),
        (Form::Serial(s), FormKind::Serial) => Form::Serial(s.clone()),
        (Form::Serial(s), FormKind::Parallel) => Form::Parallel(serial_to_parallel(s)),

        (Form::Parallel(p), FormKind::Adjacency) => Form::Adjacency(parallel_to_adjacency(p)),
        (Form::Parallel(p), FormKind::Edges) => Form::Edges(parallel_to_edges(p)),
        (Form::Parallel(p), FormKind::Matrix) => Form::Matrix(parallel_to_matrix(p)),
        (Form::Parallel(p), FormKind::Serial) => Form::Serial(parallel_to_serial(p)?),
        (Form::Parallel(p), FormKind::Parallel) => Form::Parallel(p.clone()),
    };
    Ok(converted)
}

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// Recognizes the shape of `raw` and parses it into that form.
///
/// # Errors
/// `MalformedInput` when no form recognizes the value, or when the values
/// inside a recognized shape break that form's invariants.
pub fn classify(raw: &Raw) -> Result<Form> {
    let Some(kind) = check::recognize(raw) else {
        debug!(shape = raw.shape(), "unrecognized graph shape");
        return Err(GraphError::unrecognized(format!(
            "a {} is not any graph form",
            raw.shape()
        )));
    };
    parse(kind, raw)
}

/// Parses `raw` as exactly `kind`.
///
/// # Errors
/// `MalformedInput` naming `kind` when the shape does not fit.
pub fn parse(kind: FormKind, raw: &Raw) -> Result<Form> {
    if !check::is_form(kind, raw) {
        return Err(GraphError::malformed(
            kind,
            format!("a {} does not have this shape", raw.shape()),
        ));
    }
    let form = match kind {
        FormKind::Adjacency => Form::Adjacency(parse_adjacency(raw)?),
        FormKind::Edges => Form::Edges(parse_edges(raw)?),
        FormKind::Matrix => Form::Matrix(parse_matrix(raw)?),
        FormKind::Serial => Form::Serial(parse_serial(raw)?),
        FormKind::Parallel => Form::Parallel(parse_parallel(raw)?),
    };
    Ok(form)
}

/// Classifies `raw` and converts it to adjacency.
pub fn to_adjacency(raw: &Raw) -> Result<Adjacency> {
    classify(raw).map(|form| form_to_adjacency(&form))
}

/// Classifies `raw` and converts it to an edge list.
pub fn to_edges(raw: &Raw) -> Result<Edges> {
    match transform(&classify(raw)?, FormKind::Edges)? {
        Form::Edges(edges) => Ok(edges),
        other => Err(mismatch(FormKind::Edges, &other)),
    }
}

/// Classifies `raw` and converts it to a matrix.
pub fn to_matrix(raw: &Raw) -> Result<Matrix> {
    match transform(&classify(raw)?, FormKind::Matrix)? {
        Form::Matrix(matrix) => Ok(matrix),
        other => Err(mismatch(FormKind::Matrix, &other)),
    }
}

/// Classifies `raw` and collapses it to one path.
pub fn to_serial(raw: &Raw) -> Result<Serial> {
    match transform(&classify(raw)?, FormKind::Serial)? {
        Form::Serial(serial) => Ok(serial),
        other => Err(mismatch(FormKind::Serial, &other)),
    }
}

/// Classifies `raw` and enumerates its paths.
pub fn to_parallel(raw: &Raw) -> Result<Parallel> {
    match transform(&classify(raw)?, FormKind::Parallel)? {
        Form::Parallel(parallel) => Ok(parallel),
        other => Err(mismatch(FormKind::Parallel, &other)),
    }
}

fn mismatch(expected: FormKind, got: &Form) -> GraphError {
    GraphError::malformed(expected, format!("conversion produced {}", got.kind()))
}

fn node_of(kind: FormKind, item: &Raw) -> Result<Node> {
    item.as_node()
        .ok_or_else(|| GraphError::malformed(kind, format!("a {} is not a node", item.shape())))
}

fn parse_adjacency(raw: &Raw) -> Result<Adjacency> {
    let Raw::Map(entries) = raw else {
        return Err(GraphError::malformed(FormKind::Adjacency, "expected a map"));
    };
    let mut pairs = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let key = node_of(FormKind::Adjacency, key)?;
        let Raw::Set(stops) = value else {
            return Err(GraphError::malformed(
                FormKind::Adjacency,
                format!("successors of {key} are not a set"),
            ));
        };
        let stops = stops
            .iter()
            .map(|stop| node_of(FormKind::Adjacency, stop))
            .collect::<Result<Vec<_>>>()?;
        pairs.push((key, stops));
    }
    Adjacency::from_pairs(pairs)
}

fn parse_edges(raw: &Raw) -> Result<Edges> {
    let Raw::List(items) = raw else {
        return Err(GraphError::malformed(FormKind::Edges, "expected a list"));
    };
    let contents = items
        .iter()
        .map(|item| match item.as_sequence() {
            Some([start, stop]) => {
                let start = node_of(FormKind::Edges, start)?;
                let stop = node_of(FormKind::Edges, stop)?;
                Edge::new(start, stop)
                    .map_err(|err| GraphError::malformed(FormKind::Edges, err.to_string()))
            }
            _ => Err(GraphError::malformed(
                FormKind::Edges,
                format!("a {} is not an edge", item.shape()),
            )),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Edges::new(contents))
}

fn parse_matrix(raw: &Raw) -> Result<Matrix> {
    let malformed = |reason: &str| GraphError::malformed(FormKind::Matrix, reason);
    let Some([rows, labels]) = raw.as_sequence() else {
        return Err(malformed("expected a (rows, labels) pair"));
    };
    let rows = rows
        .as_sequence()
        .ok_or_else(|| malformed("rows are not a sequence"))?
        .iter()
        .map(|row| {
            row.as_sequence()
                .ok_or_else(|| malformed("a row is not a sequence"))?
                .iter()
                .map(|cell| cell.as_cell().ok_or_else(|| malformed("a cell is not 0 or 1")))
                .collect::<Result<Vec<bool>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    let labels = labels
        .as_sequence()
        .ok_or_else(|| malformed("labels are not a sequence"))?
        .iter()
        .map(|label| label.as_label().ok_or_else(|| malformed("a label is not hashable")))
        .collect::<Result<Vec<_>>>()?;
    Matrix::new(rows, labels)
}

fn parse_serial(raw: &Raw) -> Result<Serial> {
    let items = raw
        .as_sequence()
        .ok_or_else(|| GraphError::malformed(FormKind::Serial, "expected a list"))?;
    let nodes = items
        .iter()
        .map(|item| node_of(FormKind::Serial, item))
        .collect::<Result<Vec<_>>>()?;
    Serial::new(nodes)
}

fn parse_parallel(raw: &Raw) -> Result<Parallel> {
    let items = raw
        .as_sequence()
        .ok_or_else(|| GraphError::malformed(FormKind::Parallel, "expected a list"))?;
    let paths = items
        .iter()
        .map(parse_serial)
        .collect::<Result<Vec<_>>>()?;
    Ok(Parallel::new(paths))
}
