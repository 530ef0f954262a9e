//! Configuration for decoding serialized inputs.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tessera_core::ListCheck;

/// Configuration for [`SingletonInputs::from_json_value`](crate::SingletonInputs::from_json_value).
///
/// # Environment Variables
///
/// With the `config` feature enabled, options can also be set through:
/// - `TOKEN_CHECK` - how token id lists are type-checked (`first` or `all`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ParseConfig {
    /// How thoroughly `prompt_token_ids` and `token_type_ids` are type-checked.
    ///
    /// `first` only inspects the first element and is constant-time; `all`
    /// inspects every element.
    #[cfg_attr(
        feature = "config",
        arg(long = "token-check", env = "TOKEN_CHECK", value_enum, default_value_t = ListCheck::First)
    )]
    #[serde(default)]
    pub token_check: ListCheck,
}

impl ParseConfig {
    /// Creates a configuration with the given token check mode.
    pub fn new(token_check: ListCheck) -> Self {
        Self { token_check }
    }
}
