//! Standalone helpers for inspecting and transforming nested data.
//!
//! - [`is_list_of`] / [`is_json_list_of`] answer whether a value is a sequence
//!   of a given element type, with a caller-selected [`ListCheck`].
//! - [`JsonTree`] and [`json_map_leaves`] apply a leaf transform over nested
//!   mappings, sequences and tuples while keeping their shape.

mod collections;
mod tree;

pub use collections::{JsonKind, ListCheck, is_json_list_of, is_list_of};
pub use tree::{JsonTree, Leaves, json_map_leaves, try_json_map_leaves};
