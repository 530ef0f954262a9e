#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod adapter;
mod config;
pub mod types;
mod variant;

// Re-export commonly used items at crate root for convenience
pub use adapter::{InputsAdapter, InputsView, Property};
pub use config::ParseConfig;
pub use tessera_core::{Error, ErrorKind, ListCheck, Result};
pub use variant::{
    DecoderOnlyInputs, InputsKind, MultiModalInputs, SingletonInputs, TokenInputs,
    TokenInputsBuilder, TokenInputsError, token_inputs,
};

/// Tracing target for input parsing and construction.
pub const TRACING_TARGET: &str = "tessera_inputs";

/// Tracing target for adapter property resolution.
pub const TRACING_TARGET_ADAPTER: &str = "tessera_inputs::adapter";
