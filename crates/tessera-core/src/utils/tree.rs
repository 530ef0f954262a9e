//! Shape-preserving leaf transforms over nested JSON-like trees.
//!
//! A [`JsonTree`] is a closed grammar: a string-keyed mapping, an ordered
//! list, a fixed-arity tuple, or a leaf. Leaves are opaque and need not be
//! JSON-serializable (tensors, handles, ...). The mapper, the leaf iterator
//! and `Drop` walk containers with an explicit work stack, so nesting depth is
//! bounded by heap, not by the thread stack.

use std::convert::Infallible;
use std::{mem, slice};

use indexmap::IndexMap;
use indexmap::map;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

use crate::TRACING_TARGET;

/// A nested structure of mappings, lists and tuples whose leaves are `T`.
///
/// Anything stored in [`JsonTree::Leaf`] is a leaf, even when it looks like a
/// container (for example a `serde_json::Value::Array`).
#[derive(Debug, Clone, PartialEq)]
pub enum JsonTree<T> {
    /// String-keyed mapping; insertion order is preserved.
    Map(IndexMap<String, JsonTree<T>>),
    /// Ordered, variable-length sequence.
    List(Vec<JsonTree<T>>),
    /// Ordered, fixed-arity sequence.
    Tuple(Box<[JsonTree<T>]>),
    /// Opaque value.
    Leaf(T),
}

impl<T> JsonTree<T> {
    /// Creates a leaf.
    pub fn leaf(value: T) -> Self {
        Self::Leaf(value)
    }

    /// Creates a tuple from its elements.
    pub fn tuple(items: impl IntoIterator<Item = JsonTree<T>>) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    /// Creates a list from its elements.
    pub fn list(items: impl IntoIterator<Item = JsonTree<T>>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Creates a mapping from key/value pairs, keeping their order.
    pub fn map<K>(entries: impl IntoIterator<Item = (K, JsonTree<T>)>) -> Self
    where
        K: Into<String>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns true if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns the leaf value, if this node is a leaf.
    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            Self::Leaf(value) => Some(value),
            _ => None,
        }
    }

    /// Returns a new tree of the same shape with every leaf replaced by `f(leaf)`.
    pub fn map_leaves<U, F>(&self, f: F) -> JsonTree<U>
    where
        F: FnMut(&T) -> U,
    {
        json_map_leaves(f, self)
    }

    /// Like [`map_leaves`](Self::map_leaves), stopping at the first leaf error.
    pub fn try_map_leaves<U, E, F>(&self, f: F) -> Result<JsonTree<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        try_json_map_leaves(f, self)
    }

    /// Moves this node's direct children into `into`, leaving it empty.
    fn detach_children(&mut self, into: &mut Vec<JsonTree<T>>) {
        match self {
            Self::Map(entries) => into.extend(mem::take(entries).into_values()),
            Self::List(items) => into.append(items),
            Self::Tuple(items) => into.extend(mem::take(items).into_vec()),
            Self::Leaf(_) => {}
        }
    }

    /// Iterates over leaves depth-first, in key and element order.
    pub fn leaves(&self) -> Leaves<'_, T> {
        Leaves { stack: vec![self] }
    }

    /// Returns the number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }
}

impl<T> Drop for JsonTree<T> {
    fn drop(&mut self) {
        if self.is_leaf() {
            return;
        }

        // Flatten the subtree so dropping never recurses.
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

/// Applies `f` to every leaf of `value`, preserving container kinds, key order
/// and element order.
///
/// The input is only borrowed; `f` observes each leaf exactly once, in
/// depth-first order.
///
/// # Examples
///
/// ```rust
/// use tessera_core::{JsonTree, json_map_leaves};
///
/// let tree = JsonTree::map([
///     ("a", JsonTree::list([
///         JsonTree::leaf(1),
///         JsonTree::tuple([JsonTree::leaf(2), JsonTree::leaf(3)]),
///     ])),
///     ("b", JsonTree::leaf(4)),
/// ]);
///
/// let scaled = json_map_leaves(|x| x * 10, &tree);
/// assert_eq!(scaled.leaves().copied().collect::<Vec<_>>(), [10, 20, 30, 40]);
/// ```
pub fn json_map_leaves<T, U, F>(mut f: F, value: &JsonTree<T>) -> JsonTree<U>
where
    F: FnMut(&T) -> U,
{
    match try_json_map_leaves(|leaf| Ok::<_, Infallible>(f(leaf)), value) {
        Ok(tree) => tree,
        Err(never) => match never {},
    }
}

/// Fallible form of [`json_map_leaves`]: the first `Err` returned by `f`
/// aborts the walk and is returned unchanged.
pub fn try_json_map_leaves<T, U, E, F>(mut f: F, value: &JsonTree<T>) -> Result<JsonTree<U>, E>
where
    F: FnMut(&T) -> Result<U, E>,
{
    let mut stack = match Frame::open(value) {
        Node::Container(frame) => vec![frame],
        Node::Leaf(leaf) => return f(leaf).map(JsonTree::Leaf),
    };

    while let Some(frame) = stack.last_mut() {
        match frame.next_child() {
            Some(child) => match Frame::open(child) {
                Node::Container(nested) => stack.push(nested),
                Node::Leaf(leaf) => frame.push(JsonTree::Leaf(f(leaf)?)),
            },
            None => {
                let Some(done) = stack.pop().map(Frame::finish) else {
                    break;
                };

                match stack.last_mut() {
                    Some(parent) => parent.push(done),
                    None => {
                        tracing::trace!(
                            target: TRACING_TARGET,
                            leaves = done.leaf_count(),
                            "Mapped tree leaves"
                        );
                        return Ok(done);
                    }
                }
            }
        }
    }

    unreachable!("tree mapper drained its work stack without producing a root")
}

/// A node classified for the work stack.
enum Node<'a, T, U> {
    Container(Frame<'a, T, U>),
    Leaf(&'a T),
}

/// A container being rebuilt: the remaining input children and the output so far.
enum Frame<'a, T, U> {
    Map {
        entries: map::Iter<'a, String, JsonTree<T>>,
        key: Option<&'a String>,
        output: IndexMap<String, JsonTree<U>>,
    },
    List {
        items: slice::Iter<'a, JsonTree<T>>,
        output: Vec<JsonTree<U>>,
    },
    Tuple {
        items: slice::Iter<'a, JsonTree<T>>,
        output: Vec<JsonTree<U>>,
    },
}

impl<'a, T, U> Frame<'a, T, U> {
    fn open(node: &'a JsonTree<T>) -> Node<'a, T, U> {
        let frame = match node {
            JsonTree::Map(entries) => Self::Map {
                output: IndexMap::with_capacity(entries.len()),
                entries: entries.iter(),
                key: None,
            },
            JsonTree::List(items) => Self::List {
                output: Vec::with_capacity(items.len()),
                items: items.iter(),
            },
            JsonTree::Tuple(items) => Self::Tuple {
                output: Vec::with_capacity(items.len()),
                items: items.iter(),
            },
            JsonTree::Leaf(leaf) => return Node::Leaf(leaf),
        };

        Node::Container(frame)
    }

    fn next_child(&mut self) -> Option<&'a JsonTree<T>> {
        match self {
            Self::Map { entries, key, .. } => entries.next().map(|(k, v)| {
                *key = Some(k);
                v
            }),
            Self::List { items, .. } | Self::Tuple { items, .. } => items.next(),
        }
    }

    fn push(&mut self, child: JsonTree<U>) {
        match self {
            Self::Map { key, output, .. } => {
                if let Some(key) = key.take() {
                    output.insert(key.clone(), child);
                }
            }
            Self::List { output, .. } | Self::Tuple { output, .. } => output.push(child),
        }
    }

    fn finish(self) -> JsonTree<U> {
        match self {
            Self::Map { output, .. } => JsonTree::Map(output),
            Self::List { output, .. } => JsonTree::List(output),
            Self::Tuple { output, .. } => JsonTree::Tuple(output.into_boxed_slice()),
        }
    }
}

/// Depth-first iterator over the leaves of a [`JsonTree`].
#[derive(Debug)]
pub struct Leaves<'a, T> {
    stack: Vec<&'a JsonTree<T>>,
}

impl<'a, T> Iterator for Leaves<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                JsonTree::Leaf(leaf) => return Some(leaf),
                JsonTree::Map(entries) => self.stack.extend(entries.values().rev()),
                JsonTree::List(items) => self.stack.extend(items.iter().rev()),
                JsonTree::Tuple(items) => self.stack.extend(items.iter().rev()),
            }
        }

        None
    }
}

impl From<Value> for JsonTree<Value> {
    /// Objects become mappings, arrays become lists, everything else a leaf.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            leaf => Self::Leaf(leaf),
        }
    }
}

impl<T: Serialize> Serialize for JsonTree<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Map(entries) => {
                let mut state = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
            Self::List(items) => serialize_items(serializer, items),
            Self::Tuple(items) => serialize_items(serializer, items),
            Self::Leaf(leaf) => leaf.serialize(serializer),
        }
    }
}

fn serialize_items<S, T>(serializer: S, items: &[JsonTree<T>]) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let mut state = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        state.serialize_element(item)?;
    }
    state.end()
}
