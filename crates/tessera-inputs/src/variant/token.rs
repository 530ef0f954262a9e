//! Token-based inputs.

use std::sync::Arc;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::types::{
    MultiModalData, MultiModalKwargs, MultiModalPlaceholders, ProcessorKwargs, TokenIds,
};

/// Token ids plus optional raw multimodal payloads.
///
/// Optional fields that were never supplied stay `None` and are omitted when
/// serialized; an explicitly empty payload is kept as supplied.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    name = "TokenInputsBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(private, name = "build_inner", error = "TokenInputsError")
)]
#[serde(deny_unknown_fields)]
pub struct TokenInputs {
    /// The token ids of the prompt.
    pub prompt_token_ids: TokenIds,

    /// The token type ids of the prompt.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type_ids: Option<TokenIds>,

    /// The original prompt text corresponding to the token ids, if available.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Arc<str>>,

    /// Raw multimodal data to pass to the model.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_modal_data: Option<MultiModalData>,

    /// Model-ready multimodal inputs to pass to the model.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_modal_inputs: Option<MultiModalKwargs>,

    /// Placeholder ranges for the multimodal data.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_modal_placeholders: Option<MultiModalPlaceholders>,

    /// Keyword arguments forwarded to every registered multimodal processor.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mm_processor_kwargs: Option<ProcessorKwargs>,
}

/// Error type for TokenInputs builder.
pub type TokenInputsError = derive_builder::UninitializedFieldError;

impl TokenInputsBuilder {
    /// Build the inputs.
    pub fn build(self) -> Result<TokenInputs, TokenInputsError> {
        self.build_inner()
    }
}

/// Constructs [`TokenInputs`] from optional values, keeping only those supplied.
pub fn token_inputs(
    prompt_token_ids: impl Into<TokenIds>,
    token_type_ids: Option<TokenIds>,
    prompt: Option<Arc<str>>,
    multi_modal_data: Option<MultiModalData>,
    multi_modal_inputs: Option<MultiModalKwargs>,
    multi_modal_placeholders: Option<MultiModalPlaceholders>,
    mm_processor_kwargs: Option<ProcessorKwargs>,
) -> TokenInputs {
    TokenInputs {
        prompt_token_ids: prompt_token_ids.into(),
        token_type_ids,
        prompt,
        multi_modal_data,
        multi_modal_inputs,
        multi_modal_placeholders,
        mm_processor_kwargs,
    }
}

impl TokenInputs {
    /// Create new inputs holding only the prompt token ids.
    pub fn new(prompt_token_ids: impl Into<TokenIds>) -> Self {
        token_inputs(prompt_token_ids, None, None, None, None, None, None)
    }

    /// Create a builder for these inputs.
    pub fn builder() -> TokenInputsBuilder {
        TokenInputsBuilder::default()
    }

    /// Set the token type ids.
    pub fn with_token_type_ids(mut self, token_type_ids: impl Into<TokenIds>) -> Self {
        self.token_type_ids = Some(token_type_ids.into());
        self
    }

    /// Set the original prompt text.
    pub fn with_prompt(mut self, prompt: impl Into<Arc<str>>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set the raw multimodal data.
    pub fn with_multi_modal_data(mut self, data: impl Into<MultiModalData>) -> Self {
        self.multi_modal_data = Some(data.into());
        self
    }

    /// Set the model-ready multimodal inputs.
    pub fn with_multi_modal_inputs(mut self, inputs: impl Into<MultiModalKwargs>) -> Self {
        self.multi_modal_inputs = Some(inputs.into());
        self
    }

    /// Set the multimodal placeholder ranges.
    pub fn with_multi_modal_placeholders(
        mut self,
        placeholders: impl Into<MultiModalPlaceholders>,
    ) -> Self {
        self.multi_modal_placeholders = Some(placeholders.into());
        self
    }

    /// Set the multimodal processor keyword arguments.
    pub fn with_mm_processor_kwargs(mut self, kwargs: impl Into<ProcessorKwargs>) -> Self {
        self.mm_processor_kwargs = Some(kwargs.into());
        self
    }

    /// Returns the number of prompt tokens.
    pub fn len(&self) -> usize {
        self.prompt_token_ids.len()
    }

    /// Returns true if the prompt has no tokens.
    pub fn is_empty(&self) -> bool {
        self.prompt_token_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::Payload;

    #[test]
    fn test_token_inputs_keeps_only_supplied_fields() {
        let inputs = token_inputs(vec![1, 2, 3], None, Some("hi".into()), None, None, None, None);

        assert_eq!(&*inputs.prompt_token_ids, &[1, 2, 3]);
        assert_eq!(inputs.prompt.as_deref(), Some("hi"));
        assert!(inputs.token_type_ids.is_none());
        assert!(inputs.multi_modal_data.is_none());
        assert!(inputs.mm_processor_kwargs.is_none());
        assert_eq!(
            serde_json::to_value(&inputs).unwrap(),
            json!({"prompt_token_ids": [1, 2, 3], "prompt": "hi"})
        );
    }

    #[test]
    fn test_explicit_empty_payload_is_kept() {
        let inputs = TokenInputs::new(vec![7]).with_mm_processor_kwargs(Payload::new());

        assert!(inputs.mm_processor_kwargs.is_some());
        assert_eq!(
            serde_json::to_value(&inputs).unwrap(),
            json!({"prompt_token_ids": [7], "mm_processor_kwargs": {}})
        );
    }

    #[test]
    fn test_token_inputs_builder() {
        let inputs = TokenInputs::builder()
            .with_prompt_token_ids(vec![5, 6])
            .with_prompt("two tokens")
            .with_multi_modal_data(Payload::from_iter([("image", json!("cat.png"))]))
            .build()
            .unwrap();

        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs.prompt.as_deref(), Some("two tokens"));
        assert!(inputs.multi_modal_inputs.is_none());
        assert_eq!(
            inputs.multi_modal_data.as_ref().and_then(|d| d.get("image")),
            Some(&json!("cat.png"))
        );
    }

    #[test]
    fn test_builder_requires_token_ids() {
        let error = TokenInputs::builder().with_prompt("no ids").build().unwrap_err();
        assert_eq!(error.field_name(), "prompt_token_ids");
    }

    #[test]
    fn test_token_inputs_rejects_foreign_fields() {
        let result = serde_json::from_value::<TokenInputs>(json!({
            "prompt_token_ids": [1],
            "mm_kwargs": {}
        }));
        assert!(result.is_err());
    }
}
