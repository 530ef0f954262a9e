#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Tessera Core
//!
//! This crate provides the foundational pieces shared by the tessera crates: a
//! structured error type, a lightweight sequence type-check helper, and a
//! shape-preserving leaf mapper over nested JSON-like trees. None of it depends
//! on how request inputs are represented.

/// Tracing target for core utilities.
pub const TRACING_TARGET: &str = "tessera_core";

mod error;
pub mod utils;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use utils::{
    JsonKind, JsonTree, ListCheck, is_json_list_of, is_list_of, json_map_leaves,
    try_json_map_leaves,
};
