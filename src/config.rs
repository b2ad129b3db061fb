//! Limits for path enumeration.
//!
//! Enumeration is exhaustive by default. Callers that feed untrusted or dense
//! graphs can cap the number of reported paths or prune long ones.

use serde::{Deserialize, Serialize};

/// Path enumeration limits. `Default` is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Fail with `PathLimit` once more than this many paths are found.
    pub max_paths: Option<usize>,

    /// Skip paths holding more than this many nodes.
    pub max_depth: Option<usize>,
}

impl WalkConfig {
    /// Unbounded enumeration.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_paths: None,
            max_depth: None,
        }
    }

    #[must_use]
    pub const fn with_max_paths(mut self, limit: usize) -> Self {
        self.max_paths = Some(limit);
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Whether a path of `len` nodes is within `max_depth`.
    #[inline]
    pub(crate) fn admits_depth(&self, len: usize) -> bool {
        self.max_depth.map_or(true, |depth| len <= depth)
    }
}
