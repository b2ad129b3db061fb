//! Node identity.
//!
//! A node is identified solely by its name. Two payloads that derive the same
//! name are the same node for graph purposes, whatever else they carry.
//!
//! # Invariant
//! - Equality, ordering and hashing of `Node` are defined on the name string only.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Name-based identity of a graph vertex.
///
/// Cloning is cheap: the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(Arc<str>);

impl Node {
    /// Creates a node with the given name.
    #[inline]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Derives the node for any named value.
    #[inline]
    pub fn of<T: Named + ?Sized>(item: &T) -> Self {
        Self::new(item.name())
    }

    /// Returns the name this node is identified by.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Node {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Node {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&String> for Node {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<&Node> for Node {
    fn from(node: &Node) -> Self {
        node.clone()
    }
}

impl AsRef<str> for Node {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Anything that can derive a stable name and therefore act as a node.
pub trait Named {
    /// Returns the name the value is identified by.
    fn name(&self) -> Cow<'_, str>;
}

impl Named for str {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Named for String {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl Named for Node {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.name())
    }
}

/// Derives the identity key of a named value.
#[inline]
pub fn identity<T: Named + ?Sized>(item: &T) -> Node {
    Node::of(item)
}

/// A payload wrapped with a name.
///
/// `Labeled::new` synthesizes the name once, from the snake-cased short type
/// name of the payload, so repeated identity lookups never vary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labeled<T> {
    name: String,
    value: T,
}

impl<T> Labeled<T> {
    /// Wraps `value`, naming it after its type (`AnotherThing` → `another_thing`).
    pub fn new(value: T) -> Self {
        Self {
            name: snakify(short_type_name::<T>()),
            value,
        }
    }

    /// Wraps `value` under an explicit name.
    pub fn named(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns the node this payload is identified by.
    pub fn node(&self) -> Node {
        Node::new(&self.name)
    }
}

impl<T> Named for Labeled<T> {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

/// Last path segment of a type name, without generic arguments.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Converts a CamelCase identifier to snake_case.
///
/// Follows the two classic rules: split before an uppercase letter that
/// starts a lowercase run, and between a lowercase letter or digit and an
/// uppercase letter. `HTTPServer` becomes `http_server`.
pub fn snakify(item: &str) -> String {
    let chars: Vec<char> = item.chars().collect();
    let mut out = String::with_capacity(item.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let after_word = prev.is_lowercase() || prev.is_ascii_digit();
            if prev != '_' && (after_word || next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
