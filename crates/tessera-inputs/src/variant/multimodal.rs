//! Pre-processed multimodal inputs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{MultiModalKwargs, MultiModalPlaceholders, TokenIds};

/// Inputs whose multimodal payloads were already turned into model-ready
/// keyword arguments by a multimodal processor.
///
/// There is no processor-kwargs field: processing has already happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultiModalInputs {
    /// The processed prompt text, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Arc<str>>,

    /// The processed token ids, including multimodal placeholder tokens.
    pub prompt_token_ids: TokenIds,

    /// The token type ids of the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type_ids: Option<TokenIds>,

    /// Keyword arguments to be passed to the model's multimodal inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mm_kwargs: Option<MultiModalKwargs>,

    /// Placeholder ranges of each modality inside `prompt_token_ids`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mm_placeholders: Option<MultiModalPlaceholders>,
}

impl MultiModalInputs {
    /// Create new inputs holding only the processed token ids.
    pub fn new(prompt_token_ids: impl Into<TokenIds>) -> Self {
        Self {
            prompt: None,
            prompt_token_ids: prompt_token_ids.into(),
            token_type_ids: None,
            mm_kwargs: None,
            mm_placeholders: None,
        }
    }

    /// Set the processed prompt text.
    pub fn with_prompt(mut self, prompt: impl Into<Arc<str>>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set the token type ids.
    pub fn with_token_type_ids(mut self, token_type_ids: impl Into<TokenIds>) -> Self {
        self.token_type_ids = Some(token_type_ids.into());
        self
    }

    /// Set the model-ready keyword arguments.
    pub fn with_mm_kwargs(mut self, mm_kwargs: impl Into<MultiModalKwargs>) -> Self {
        self.mm_kwargs = Some(mm_kwargs.into());
        self
    }

    /// Set the placeholder ranges.
    pub fn with_mm_placeholders(
        mut self,
        mm_placeholders: impl Into<MultiModalPlaceholders>,
    ) -> Self {
        self.mm_placeholders = Some(mm_placeholders.into());
        self
    }

    /// Returns the number of placeholder tokens across all modalities,
    /// saturating at `usize::MAX`.
    pub fn placeholder_token_count(&self) -> usize {
        self.mm_placeholders
            .iter()
            .flat_map(|placeholders| placeholders.values())
            .flatten()
            .fold(0, |total: usize, range| total.saturating_add(range.length))
    }
}
