//! Untyped graph data as it arrives from outside the crate.
//!
//! `Raw` keeps the distinctions the structural classifier relies on: a
//! `List` is a mutable sequence, a `Tuple` an immutable one, a `Set` is
//! unordered, and only scalars and tuples of hashables are hashable.

use crate::node::Node;
use serde::{Deserialize, Serialize};

/// An externally constructed value of unknown shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Raw {
    /// A string; always usable as a node.
    Text(String),
    /// An object exposing a string-valued name.
    Named(String),
    Int(i64),
    Bool(bool),
    /// Mutable, ordered sequence.
    List(Vec<Raw>),
    /// Immutable, ordered sequence.
    Tuple(Vec<Raw>),
    /// Unordered collection.
    Set(Vec<Raw>),
    /// Key/value mapping in insertion order.
    Map(Vec<(Raw, Raw)>),
}

impl Raw {
    /// Shorthand for a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Raw::Text(value.into())
    }

    /// Shorthand for a pair tuple, the usual spelling of an edge.
    pub fn pair(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Raw::Tuple(vec![Raw::Text(start.into()), Raw::Text(stop.into())])
    }

    /// Shorthand for a list of text values, the usual spelling of a serial.
    pub fn texts<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Raw::List(items.into_iter().map(|s| Raw::Text(s.into())).collect())
    }

    /// Whether the value could serve as a mapping key.
    pub fn is_hashable(&self) -> bool {
        match self {
            Raw::Text(_) | Raw::Named(_) | Raw::Int(_) | Raw::Bool(_) => true,
            Raw::Tuple(items) => items.iter().all(Raw::is_hashable),
            Raw::List(_) | Raw::Set(_) | Raw::Map(_) => false,
        }
    }

    /// Returns the items of a list or tuple.
    pub fn as_sequence(&self) -> Option<&[Raw]> {
        match self {
            Raw::List(items) | Raw::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the node identity of a text or named value.
    pub fn as_node(&self) -> Option<Node> {
        match self {
            Raw::Text(name) | Raw::Named(name) => Some(Node::new(name)),
            _ => None,
        }
    }

    /// Returns a 0/1 cell value for an integer or boolean.
    pub fn as_cell(&self) -> Option<bool> {
        match self {
            Raw::Int(0) | Raw::Bool(false) => Some(false),
            Raw::Int(1) | Raw::Bool(true) => Some(true),
            _ => None,
        }
    }

    /// Returns a label node for any hashable scalar.
    pub(crate) fn as_label(&self) -> Option<Node> {
        match self {
            Raw::Text(name) | Raw::Named(name) => Some(Node::new(name)),
            Raw::Int(value) => Some(Node::new(value.to_string())),
            Raw::Bool(value) => Some(Node::new(value.to_string())),
            _ => None,
        }
    }

    /// Short description of the value's shape for error messages.
    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Raw::Text(_) => "text",
            Raw::Named(_) => "named object",
            Raw::Int(_) => "integer",
            Raw::Bool(_) => "boolean",
            Raw::List(_) => "list",
            Raw::Tuple(_) => "tuple",
            Raw::Set(_) => "set",
            Raw::Map(_) => "map",
        }
    }
}

impl From<&str> for Raw {
    fn from(value: &str) -> Self {
        Raw::Text(value.to_string())
    }
}

impl From<&Node> for Raw {
    fn from(node: &Node) -> Self {
        Raw::Text(node.name().to_string())
    }
}
