//! Order-independent fingerprints of a graph's logical content.
//!
//! A fingerprint depends only on the node set and the edge set. Key order,
//! edge-list order, matrix label order and path order do not contribute, so
//! every form of one logical graph hashes the same.
//!
//! Hashing is SHA-256 with domain separation and length prefixing: each
//! name is written as a 64-bit little-endian byte count followed by its
//! UTF-8 bytes, so `("ab", "c")` and `("a", "bc")` never collide.

use crate::forms::{Adjacency, Form};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 256-bit hash value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// All-zero hash.
    #[inline]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// SHA-256 over `b"GF:" || domain || b":v1" || len(data) as u64 LE || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"GF:");
        hasher.update(domain);
        hasher.update(b":v1");
        hasher.update((data.len() as u64).to_le_bytes());
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Full lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HashValue({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

fn put_name(data: &mut Vec<u8>, node: &Node) {
    let name = node.name().as_bytes();
    data.extend_from_slice(&(name.len() as u64).to_le_bytes());
    data.extend_from_slice(name);
}

/// Fingerprint of the node set and edge set of `graph`.
///
/// Nodes are hashed in name order, edges in `(start, stop)` order. Counts
/// precede both sections so an isolated node can not be confused with an
/// edge endpoint.
pub fn graph_fingerprint(graph: &Adjacency) -> HashValue {
    let mut nodes: Vec<&Node> = graph.nodes().collect();
    nodes.sort();
    let mut edges: Vec<(&Node, &Node)> = graph
        .iter()
        .flat_map(|(start, stops)| stops.iter().map(move |stop| (start, stop)))
        .collect();
    edges.sort();

    let mut data = Vec::new();
    data.extend_from_slice(&(nodes.len() as u64).to_le_bytes());
    for node in nodes {
        put_name(&mut data, node);
    }
    data.extend_from_slice(&(edges.len() as u64).to_le_bytes());
    for (start, stop) in edges {
        put_name(&mut data, start);
        put_name(&mut data, stop);
    }
    HashValue::hash_with_domain(b"GRAPH_FINGERPRINT", &data)
}

impl Form {
    /// Fingerprint of the logical graph this form carries.
    pub fn fingerprint(&self) -> HashValue {
        graph_fingerprint(&self.to_adjacency())
    }
}
