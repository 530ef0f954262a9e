use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::InputsKind;
use crate::types::{
    MultiModalData, MultiModalKwargs, MultiModalPlaceholders, ProcessorKwargs, PromptEmbeds,
    TokenIds,
};

/// Snapshot of every property of an [`InputsAdapter`](super::InputsAdapter).
///
/// Payloads share their storage with the adapter they were taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputsView {
    /// Variant the properties were resolved from.
    pub kind: InputsKind,
    pub prompt: Option<Arc<str>>,
    pub prompt_token_ids: TokenIds,
    pub token_type_ids: TokenIds,
    pub prompt_embeds: Option<PromptEmbeds>,
    pub multi_modal_data: MultiModalData,
    pub multi_modal_inputs: MultiModalKwargs,
    pub multi_modal_placeholders: MultiModalPlaceholders,
    pub mm_processor_kwargs: ProcessorKwargs,
}

impl InputsView {
    /// Returns the number of prompt tokens.
    pub fn num_tokens(&self) -> usize {
        self.prompt_token_ids.len()
    }
}
