//! The five canonical graph forms.
//!
//! - `Adjacency`: node → successor set, the pivot for every conversion.
//! - `Edges`: ordered list of `(start, stop)` pairs.
//! - `Matrix`: square 0/1 matrix plus its labels.
//! - `Serial`: one simple root-to-endpoint path.
//! - `Parallel`: every simple root-to-endpoint path.
//!
//! `Form` is the tagged union over all five. Each payload is validated on
//! construction, so holding a `Form` means holding a well-shaped graph.

pub mod adjacency;
pub mod edges;
pub mod matrix;
pub mod path;

pub use adjacency::Adjacency;
pub use edges::{Edge, Edges};
pub use matrix::Matrix;
pub use path::{Parallel, Serial};

use crate::error::Result;
use crate::raw::Raw;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag naming one of the five forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Adjacency,
    Edges,
    Matrix,
    Serial,
    Parallel,
}

impl FormKind {
    /// All forms, in classification order.
    pub const ALL: [FormKind; 5] = [
        FormKind::Adjacency,
        FormKind::Matrix,
        FormKind::Edges,
        FormKind::Serial,
        FormKind::Parallel,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            FormKind::Adjacency => "adjacency",
            FormKind::Edges => "edges",
            FormKind::Matrix => "matrix",
            FormKind::Serial => "serial",
            FormKind::Parallel => "parallel",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A graph in one of the five forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", content = "data", rename_all = "snake_case")]
pub enum Form {
    Adjacency(Adjacency),
    Edges(Edges),
    Matrix(Matrix),
    Serial(Serial),
    Parallel(Parallel),
}

impl Form {
    /// Returns the tag of the carried form.
    pub const fn kind(&self) -> FormKind {
        match self {
            Form::Adjacency(_) => FormKind::Adjacency,
            Form::Edges(_) => FormKind::Edges,
            Form::Matrix(_) => FormKind::Matrix,
            Form::Serial(_) => FormKind::Serial,
            Form::Parallel(_) => FormKind::Parallel,
        }
    }

    /// Recognizes the shape of `raw` and validates it into a typed form.
    ///
    /// # Errors
    /// `MalformedInput` when no form recognizes the value, or when the
    /// recognized form's invariants do not hold.
    pub fn from_raw(raw: &Raw) -> Result<Self> {
        crate::convert::classify(raw)
    }

    /// Converts to the pivot representation. Never lossy.
    pub fn to_adjacency(&self) -> Adjacency {
        crate::convert::form_to_adjacency(self)
    }

    /// Converts to any other form.
    ///
    /// # Errors
    /// `LossyCollapse` when the target is `Serial` and the graph is not a
    /// single path.
    pub fn convert(&self, target: FormKind) -> Result<Form> {
        crate::convert::transform(self, target)
    }
}

impl From<Adjacency> for Form {
    fn from(item: Adjacency) -> Self {
        Form::Adjacency(item)
    }
}

impl From<Edges> for Form {
    fn from(item: Edges) -> Self {
        Form::Edges(item)
    }
}

impl From<Matrix> for Form {
    fn from(item: Matrix) -> Self {
        Form::Matrix(item)
    }
}

impl From<Serial> for Form {
    fn from(item: Serial) -> Self {
        Form::Serial(item)
    }
}

impl From<Parallel> for Form {
    fn from(item: Parallel) -> Self {
        Form::Parallel(item)
    }
}
