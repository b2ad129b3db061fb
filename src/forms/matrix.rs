//! Matrix form: square 0/1 matrix plus its labels.
//!
//! # Invariants
//! - `rows.len() == labels.len()` and every row has that same length.
//! - Labels are unique.
//! - The diagonal is clear (no self-loops).

use crate::error::{GraphError, Result};
use crate::forms::FormKind;
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Deserialize)]
struct MatrixRepr {
    rows: Vec<Vec<bool>>,
    labels: Vec<Node>,
}

/// `rows[i][j]` is set iff `labels[i] → labels[j]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr")]
pub struct Matrix {
    rows: Vec<Vec<bool>>,
    labels: Vec<Node>,
}

impl Matrix {
    /// Validates and wraps a matrix.
    ///
    /// # Errors
    /// `MalformedInput` when the matrix is not square over its labels, a label
    /// repeats, or a diagonal cell is set.
    pub fn new(rows: Vec<Vec<bool>>, labels: Vec<Node>) -> Result<Self> {
        let side = labels.len();
        if rows.len() != side {
            return Err(GraphError::malformed(
                FormKind::Matrix,
                format!("{} rows for {} labels", rows.len(), side),
            ));
        }
        if let Some(i) = rows.iter().position(|row| row.len() != side) {
            return Err(GraphError::malformed(
                FormKind::Matrix,
                format!("row {i} has {} cells, expected {side}", rows[i].len()),
            ));
        }
        let mut seen = HashSet::with_capacity(side);
        if let Some(label) = labels.iter().find(|label| !seen.insert(*label)) {
            return Err(GraphError::malformed(
                FormKind::Matrix,
                format!("label {label} repeats"),
            ));
        }
        if let Some(i) = (0..side).find(|&i| rows[i][i]) {
            return Err(GraphError::malformed(
                FormKind::Matrix,
                format!("{} is connected to itself", labels[i]),
            ));
        }
        Ok(Self { rows, labels })
    }

    /// Wraps parts already known to satisfy the invariants.
    pub(crate) fn from_parts(rows: Vec<Vec<bool>>, labels: Vec<Node>) -> Self {
        debug_assert!(rows.len() == labels.len() && rows.iter().all(|row| row.len() == labels.len()));
        Self { rows, labels }
    }

    /// Builds from integer cells; anything other than 0 or 1 is malformed.
    pub fn from_bits(rows: &[Vec<u8>], labels: Vec<Node>) -> Result<Self> {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&cell| match cell {
                        0 => Ok(false),
                        1 => Ok(true),
                        other => Err(GraphError::malformed(
                            FormKind::Matrix,
                            format!("cell value {other} is not 0 or 1"),
                        )),
                    })
                    .collect::<Result<Vec<bool>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(rows, labels)
    }

    #[inline]
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    #[inline]
    pub fn labels(&self) -> &[Node] {
        &self.labels
    }

    /// Side length.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn index_of(&self, label: &Node) -> Option<usize> {
        self.labels.iter().position(|candidate| candidate == label)
    }

    /// Cell for `start → stop`; `false` when either label is unknown.
    pub fn get(&self, start: &Node, stop: &Node) -> bool {
        match (self.index_of(start), self.index_of(stop)) {
            (Some(i), Some(j)) => self.rows[i][j],
            _ => false,
        }
    }

    /// Rows rendered as 0/1 integers.
    pub fn bits(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|&cell| u8::from(cell)).collect())
            .collect()
    }

    /// Appends a label with an empty row and column. Returns `false` if present.
    pub(crate) fn push_label(&mut self, label: Node) -> bool {
        if self.index_of(&label).is_some() {
            return false;
        }
        for row in &mut self.rows {
            row.push(false);
        }
        self.labels.push(label);
        self.rows.push(vec![false; self.labels.len()]);
        true
    }

    /// Drops a label with its row and column. Returns `false` if absent.
    pub(crate) fn remove_label(&mut self, label: &Node) -> bool {
        let Some(index) = self.index_of(label) else {
            return false;
        };
        self.labels.remove(index);
        self.rows.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        true
    }

    /// Sets one off-diagonal cell. Returns whether the cell changed.
    pub(crate) fn set(&mut self, start: usize, stop: usize, value: bool) -> bool {
        if start == stop {
            return false;
        }
        let cell = &mut self.rows[start][stop];
        let changed = *cell != value;
        *cell = value;
        changed
    }
}

impl TryFrom<MatrixRepr> for Matrix {
    type Error = GraphError;

    fn try_from(repr: MatrixRepr) -> Result<Self> {
        Matrix::new(repr.rows, repr.labels)
    }
}
