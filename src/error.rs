//! Error type shared by every graph operation.
//!
//! All failures are local and synchronous. Nothing is retried and nothing is
//! coerced: an operation either succeeds completely or reports precisely why
//! it refused.

use crate::forms::FormKind;
use std::fmt;
use thiserror::Error;

/// Why an edge was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFault {
    /// Start and stop are the same node.
    SelfLoop,
    /// The edge is not present in the graph.
    Absent,
}

impl fmt::Display for EdgeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeFault::SelfLoop => write!(f, "start and stop are the same node"),
            EdgeFault::Absent => write!(f, "edge is not in the graph"),
        }
    }
}

/// Why a `subset` selection was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionFault {
    /// Neither `include` nor `exclude` was supplied.
    Unspecified,
    /// Both `include` and `exclude` were supplied.
    Ambiguous,
    /// The selection names nodes that are not in the graph.
    Unknown(Vec<String>),
}

impl fmt::Display for SelectionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionFault::Unspecified => write!(f, "either include or exclude must be given"),
            SelectionFault::Ambiguous => write!(f, "only one of include or exclude may be given"),
            SelectionFault::Unknown(names) => {
                write!(f, "not in the graph: {}", names.join(", "))
            }
        }
    }
}

/// Errors raised by classification, conversion, mutation and enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A value does not have the shape of the requested form. `expected` is
    /// `None` when no form recognized the value at all.
    #[error(
        "malformed {} input: {reason}",
        .expected.map_or("graph", |kind| kind.as_str())
    )]
    MalformedInput {
        expected: Option<FormKind>,
        reason: String,
    },

    /// One or more referenced nodes are absent. Lists every missing name.
    #[error("missing references: {}", .names.join(", "))]
    MissingReference { names: Vec<String> },

    /// An edge was a self-loop, or does not exist where one was required.
    #[error("invalid edge ({start}, {stop}): {reason}")]
    InvalidEdge {
        start: String,
        stop: String,
        reason: EdgeFault,
    },

    /// `subset` was called with an unusable selection.
    #[error("invalid selection: {0}")]
    Selection(SelectionFault),

    /// A graph with other than exactly one root-to-endpoint path was asked
    /// for as a single serial.
    #[error("cannot losslessly represent {paths} paths as one serial")]
    LossyCollapse { paths: usize },

    /// A path form was asked to hold nodes or edges that lie on no
    /// root-to-endpoint path, typically because of a cycle.
    #[error("not on any root-to-endpoint path: {}", .missing.join(", "))]
    Uncovered { missing: Vec<String> },

    /// Path enumeration exceeded the configured limit.
    #[error("path enumeration exceeded the limit of {limit} paths")]
    PathLimit { limit: usize },

    /// CBOR encoding or decoding failed.
    #[error("codec failure: {0}")]
    Codec(String),
}

impl GraphError {
    pub(crate) fn malformed(expected: FormKind, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            expected: Some(expected),
            reason: reason.into(),
        }
    }

    pub(crate) fn unrecognized(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            expected: None,
            reason: reason.into(),
        }
    }

    /// Builds a `MissingReference` with names sorted and deduplicated.
    pub(crate) fn missing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self::MissingReference { names }
    }

    pub(crate) fn self_loop(node: &impl fmt::Display) -> Self {
        Self::InvalidEdge {
            start: node.to_string(),
            stop: node.to_string(),
            reason: EdgeFault::SelfLoop,
        }
    }

    pub(crate) fn absent_edge(start: &impl fmt::Display, stop: &impl fmt::Display) -> Self {
        Self::InvalidEdge {
            start: start.to_string(),
            stop: stop.to_string(),
            reason: EdgeFault::Absent,
        }
    }
}

impl From<serde_cbor::Error> for GraphError {
    fn from(err: serde_cbor::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reference_lists_all_names_sorted() {
        let err = GraphError::missing(["q", "p", "q"]);
        assert_eq!(
            err,
            GraphError::MissingReference {
                names: vec!["p".to_string(), "q".to_string()]
            }
        );
        assert_eq!(err.to_string(), "missing references: p, q");
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            GraphError::self_loop(&"x").to_string(),
            "invalid edge (x, x): start and stop are the same node"
        );
        assert_eq!(
            GraphError::LossyCollapse { paths: 3 }.to_string(),
            "cannot losslessly represent 3 paths as one serial"
        );
        assert_eq!(
            GraphError::Uncovered {
                missing: vec!["c".to_string(), "(b, a)".to_string()]
            }
            .to_string(),
            "not on any root-to-endpoint path: c, (b, a)"
        );
        assert_eq!(
            GraphError::unrecognized("a set").to_string(),
            "malformed graph input: a set"
        );
        assert_eq!(
            GraphError::malformed(FormKind::Matrix, "ragged").to_string(),
            "malformed matrix input: ragged"
        );
        assert_eq!(
            GraphError::Selection(SelectionFault::Unspecified).to_string(),
            "invalid selection: either include or exclude must be given"
        );
    }
}
