//! The closed set of representations a single request's input may take.
//!
//! - [`TokenInputs`] - token ids plus optional raw multimodal payloads
//! - [`MultiModalInputs`] - token ids plus already-processed multimodal payloads
//!
//! [`SingletonInputs`] is the tagged union of both. On the wire it is a JSON
//! object whose `"type"` field is `"token"` or `"multimodal"`.

mod multimodal;
mod token;

use std::str::FromStr;

pub use multimodal::MultiModalInputs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantNames};
use tessera_core::{JsonKind, is_json_list_of};
pub use token::{TokenInputs, TokenInputsBuilder, TokenInputsError, token_inputs};

use crate::config::ParseConfig;
use crate::{Error, Result, TRACING_TARGET};

/// Name of the field carrying the variant tag.
const TAG_FIELD: &str = "type";

/// Processed inputs of a single prompt, in one of the supported shapes.
///
/// Consumers should read these through [`InputsAdapter`](crate::InputsAdapter)
/// rather than matching on the variant fields directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SingletonInputs {
    /// Token-based inputs.
    Token(TokenInputs),
    /// Pre-processed multimodal inputs.
    Multimodal(MultiModalInputs),
}

/// The inputs handed to a decoder-only model before execution.
pub type DecoderOnlyInputs = SingletonInputs;

/// Tag of a [`SingletonInputs`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, IntoStaticStr, VariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputsKind {
    Token,
    Multimodal,
}

impl SingletonInputs {
    /// Returns the variant tag.
    pub fn kind(&self) -> InputsKind {
        match self {
            Self::Token(_) => InputsKind::Token,
            Self::Multimodal(_) => InputsKind::Multimodal,
        }
    }

    /// Decodes inputs from a JSON value.
    ///
    /// The tag is resolved first so that an unknown variant is reported as
    /// such, then the token id fields are type-checked according to
    /// [`ParseConfig::token_check`], and finally the variant is decoded.
    pub fn from_json_value(value: Value, config: &ParseConfig) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::invalid_input().with_message(format!(
                "inputs must be a JSON object, got {}",
                JsonKind::of(&value)
            )));
        };

        let Some(tag) = object.get(TAG_FIELD).and_then(Value::as_str) else {
            return Err(Error::invalid_input()
                .with_message(format!("inputs must carry a string '{TAG_FIELD}' field")));
        };

        let kind = InputsKind::from_str(tag).map_err(|_| {
            Error::unknown_variant().with_message(format!(
                "unknown inputs type '{tag}', expected one of {:?}",
                InputsKind::VARIANTS
            ))
        })?;

        let Some(prompt_token_ids) = object.get("prompt_token_ids") else {
            return Err(Error::invalid_input()
                .with_message(format!("{kind} inputs are missing 'prompt_token_ids'")));
        };

        let id_fields = [
            ("prompt_token_ids", Some(prompt_token_ids)),
            ("token_type_ids", object.get("token_type_ids")),
        ];
        for (field, ids) in id_fields {
            if let Some(ids) = ids
                && !is_json_list_of(ids, JsonKind::Integer, config.token_check)
            {
                return Err(Error::invalid_input().with_message(format!(
                    "'{field}' must be a list of integers ({} check)",
                    config.token_check
                )));
            }
        }

        let inputs: Self = serde_json::from_value(value)?;

        tracing::debug!(
            target: TRACING_TARGET,
            kind = %kind,
            prompt_tokens = inputs.prompt_token_ids().len(),
            "Decoded request inputs"
        );

        Ok(inputs)
    }

    /// Decodes inputs from JSON text.
    pub fn from_json_str(text: &str, config: &ParseConfig) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(value, config)
    }

    /// Returns the prompt token ids, which every variant carries.
    fn prompt_token_ids(&self) -> &[u32] {
        match self {
            Self::Token(inputs) => &inputs.prompt_token_ids,
            Self::Multimodal(inputs) => &inputs.prompt_token_ids,
        }
    }
}

impl From<TokenInputs> for SingletonInputs {
    fn from(inputs: TokenInputs) -> Self {
        Self::Token(inputs)
    }
}

impl From<MultiModalInputs> for SingletonInputs {
    fn from(inputs: MultiModalInputs) -> Self {
        Self::Multimodal(inputs)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tessera_core::{ErrorKind, ListCheck};

    use super::*;

    fn strict() -> ParseConfig {
        ParseConfig {
            token_check: ListCheck::All,
        }
    }

    #[test]
    fn test_decode_token_inputs() {
        let value = json!({"type": "token", "prompt_token_ids": [1, 2], "prompt": "hi"});
        let inputs = SingletonInputs::from_json_value(value, &ParseConfig::default()).unwrap();

        assert_eq!(inputs.kind(), InputsKind::Token);
        assert_eq!(
            inputs,
            SingletonInputs::Token(TokenInputs::new(vec![1, 2]).with_prompt("hi"))
        );
    }

    #[test]
    fn test_decode_multimodal_inputs() {
        let text = r#"{
            "type": "multimodal",
            "prompt_token_ids": [9, 9, 9],
            "mm_kwargs": {"pixel_values": [[0.5]]},
            "mm_placeholders": {"image": [{"offset": 0, "length": 3}]}
        }"#;
        let inputs = SingletonInputs::from_json_str(text, &strict()).unwrap();

        let SingletonInputs::Multimodal(inputs) = inputs else {
            panic!("expected multimodal inputs");
        };
        assert_eq!(inputs.placeholder_token_count(), 3);
        assert!(inputs.prompt.is_none());
    }

    #[test]
    fn test_serialized_tag_round_trips() {
        let inputs = SingletonInputs::from(MultiModalInputs::new(vec![4]).with_prompt("p"));
        let value = serde_json::to_value(&inputs).unwrap();

        assert_eq!(
            value,
            json!({"type": "multimodal", "prompt": "p", "prompt_token_ids": [4]})
        );
        assert_eq!(
            SingletonInputs::from_json_value(value, &strict()).unwrap(),
            inputs
        );
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let value = json!({"type": "embeds", "prompt_token_ids": []});
        let error = SingletonInputs::from_json_value(value, &strict()).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UnknownVariant);
        assert!(error.to_string().contains("embeds"));
    }

    #[test]
    fn test_missing_tag_is_invalid() {
        let error = SingletonInputs::from_json_value(json!({"prompt_token_ids": [1]}), &strict())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);

        let error = SingletonInputs::from_json_value(json!([1, 2]), &strict()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_missing_token_ids_is_invalid() {
        let error = SingletonInputs::from_json_value(json!({"type": "token"}), &strict())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_token_check_modes() {
        let value = json!({"type": "token", "prompt_token_ids": [1, "x"]});

        let error = SingletonInputs::from_json_value(value.clone(), &strict()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);

        // The first element passes the cheap check; decoding still rejects it.
        let error =
            SingletonInputs::from_json_value(value, &ParseConfig::default()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn test_token_type_ids_are_checked() {
        let value = json!({"type": "token", "prompt_token_ids": [1], "token_type_ids": "0"});
        let error = SingletonInputs::from_json_value(value, &ParseConfig::default()).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(error.to_string().contains("token_type_ids"));
    }

    #[test]
    fn test_fields_of_other_variant_are_rejected() {
        let value = json!({"type": "multimodal", "prompt_token_ids": [1], "multi_modal_data": {}});
        let error = SingletonInputs::from_json_value(value, &strict()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Serialization);
    }
}
