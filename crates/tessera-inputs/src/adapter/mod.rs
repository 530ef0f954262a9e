//! Unified access to the components of [`SingletonInputs`].
//!
//! [`InputsAdapter`] exposes eight properties over every input variant. Each
//! property is resolved by an exhaustive match on the variant the first time
//! it is read and stored in a single-assignment slot; later reads return the
//! stored value. Adding a variant makes every accessor fail to compile until
//! it handles the new case.
//!
//! | Property | `Token` source | `Multimodal` source | Default |
//! |---|---|---|---|
//! | `prompt` | `prompt` | `prompt` | `None` |
//! | `prompt_token_ids` | `prompt_token_ids` | `prompt_token_ids` | - |
//! | `token_type_ids` | `token_type_ids` | `token_type_ids` | empty |
//! | `prompt_embeds` | - | - | `None` |
//! | `multi_modal_data` | `multi_modal_data` | `mm_kwargs` | empty |
//! | `multi_modal_inputs` | `multi_modal_inputs` | `mm_kwargs` | empty |
//! | `multi_modal_placeholders` | `multi_modal_placeholders` | `mm_placeholders` | empty |
//! | `mm_processor_kwargs` | `mm_processor_kwargs` | - | empty |

mod view;

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};
pub use view::InputsView;

use crate::types::{
    MultiModalData, MultiModalKwargs, MultiModalPlaceholders, ProcessorKwargs, PromptEmbeds,
    TokenIds,
};
use crate::{InputsKind, SingletonInputs, TRACING_TARGET_ADAPTER, TokenInputs};

/// A logical property exposed by [`InputsAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Property {
    Prompt,
    PromptTokenIds,
    TokenTypeIds,
    PromptEmbeds,
    MultiModalData,
    MultiModalInputs,
    MultiModalPlaceholders,
    MmProcessorKwargs,
}

/// One single-assignment slot per property.
#[derive(Default)]
struct Memo {
    prompt: OnceLock<Option<Arc<str>>>,
    prompt_token_ids: OnceLock<TokenIds>,
    token_type_ids: OnceLock<TokenIds>,
    prompt_embeds: OnceLock<Option<PromptEmbeds>>,
    multi_modal_data: OnceLock<MultiModalData>,
    multi_modal_inputs: OnceLock<MultiModalKwargs>,
    multi_modal_placeholders: OnceLock<MultiModalPlaceholders>,
    mm_processor_kwargs: OnceLock<ProcessorKwargs>,
}

/// Unified, read-only view over one [`SingletonInputs`].
///
/// Each property is computed at most once per adapter, including when the
/// adapter is shared between threads: concurrent first readers wait for a
/// single initializer. References returned by the accessors point at the
/// memoized value and stay identical across calls.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use tessera_inputs::types::Payload;
/// use tessera_inputs::{InputsAdapter, MultiModalInputs};
///
/// let kwargs: Payload = Payload::from_iter([("pixel_values", json!([[0.5]]))]);
/// let adapter = InputsAdapter::from(MultiModalInputs::new(vec![1, 2]).with_mm_kwargs(kwargs));
///
/// assert!(adapter.multi_modal_data().ptr_eq(adapter.multi_modal_inputs()));
/// assert!(adapter.mm_processor_kwargs().is_empty());
/// assert!(adapter.prompt().is_none());
/// ```
pub struct InputsAdapter {
    inputs: Arc<SingletonInputs>,
    memo: Memo,
}

impl InputsAdapter {
    /// Wraps the given inputs.
    pub fn new(inputs: impl Into<Arc<SingletonInputs>>) -> Self {
        Self {
            inputs: inputs.into(),
            memo: Memo::default(),
        }
    }

    /// Returns the wrapped inputs.
    pub fn inputs(&self) -> &SingletonInputs {
        &self.inputs
    }

    /// Returns the variant tag of the wrapped inputs.
    pub fn kind(&self) -> InputsKind {
        self.inputs.kind()
    }

    /// The original prompt text, if available.
    pub fn prompt(&self) -> Option<&str> {
        self.resolve(&self.memo.prompt, Property::Prompt, |inputs| match inputs {
            SingletonInputs::Token(inputs) => inputs.prompt.clone(),
            SingletonInputs::Multimodal(inputs) => inputs.prompt.clone(),
        })
        .as_deref()
    }

    /// The prompt token ids.
    pub fn prompt_token_ids(&self) -> &TokenIds {
        self.resolve(
            &self.memo.prompt_token_ids,
            Property::PromptTokenIds,
            |inputs| match inputs {
                SingletonInputs::Token(inputs) => inputs.prompt_token_ids.clone(),
                SingletonInputs::Multimodal(inputs) => inputs.prompt_token_ids.clone(),
            },
        )
    }

    /// The token type ids, or an empty sequence when absent.
    pub fn token_type_ids(&self) -> &TokenIds {
        self.resolve(
            &self.memo.token_type_ids,
            Property::TokenTypeIds,
            |inputs| {
                let token_type_ids = match inputs {
                    SingletonInputs::Token(inputs) => inputs.token_type_ids.as_ref(),
                    SingletonInputs::Multimodal(inputs) => inputs.token_type_ids.as_ref(),
                };
                token_type_ids.cloned().unwrap_or_else(|| Arc::from([]))
            },
        )
    }

    /// The prompt embeddings; no current variant carries them.
    pub fn prompt_embeds(&self) -> Option<&PromptEmbeds> {
        self.resolve(
            &self.memo.prompt_embeds,
            Property::PromptEmbeds,
            |inputs| match inputs {
                SingletonInputs::Token(_) | SingletonInputs::Multimodal(_) => None,
            },
        )
        .as_ref()
    }

    /// The multimodal data, or an empty mapping when absent.
    ///
    /// For pre-processed inputs this is the same payload as
    /// [`multi_modal_inputs`](Self::multi_modal_inputs).
    pub fn multi_modal_data(&self) -> &MultiModalData {
        self.resolve(
            &self.memo.multi_modal_data,
            Property::MultiModalData,
            |inputs| {
                let data = match inputs {
                    SingletonInputs::Token(inputs) => inputs.multi_modal_data.as_ref(),
                    SingletonInputs::Multimodal(inputs) => inputs.mm_kwargs.as_ref(),
                };
                data.cloned().unwrap_or_default()
            },
        )
    }

    /// The model-ready multimodal inputs, or an empty mapping when absent.
    pub fn multi_modal_inputs(&self) -> &MultiModalKwargs {
        // Pre-processed inputs no longer distinguish raw data from model-ready
        // kwargs, so both properties read `mm_kwargs`.
        self.resolve(
            &self.memo.multi_modal_inputs,
            Property::MultiModalInputs,
            |inputs| {
                let kwargs = match inputs {
                    SingletonInputs::Token(inputs) => inputs.multi_modal_inputs.as_ref(),
                    SingletonInputs::Multimodal(inputs) => inputs.mm_kwargs.as_ref(),
                };
                kwargs.cloned().unwrap_or_default()
            },
        )
    }

    /// The multimodal placeholder ranges, or an empty mapping when absent.
    pub fn multi_modal_placeholders(&self) -> &MultiModalPlaceholders {
        self.resolve(
            &self.memo.multi_modal_placeholders,
            Property::MultiModalPlaceholders,
            |inputs| {
                let placeholders = match inputs {
                    SingletonInputs::Token(inputs) => inputs.multi_modal_placeholders.as_ref(),
                    SingletonInputs::Multimodal(inputs) => inputs.mm_placeholders.as_ref(),
                };
                placeholders.cloned().unwrap_or_default()
            },
        )
    }

    /// The multimodal processor kwargs, or an empty mapping when absent.
    ///
    /// Always empty for pre-processed inputs.
    pub fn mm_processor_kwargs(&self) -> &ProcessorKwargs {
        self.resolve(
            &self.memo.mm_processor_kwargs,
            Property::MmProcessorKwargs,
            |inputs| match inputs {
                SingletonInputs::Token(inputs) => {
                    inputs.mm_processor_kwargs.clone().unwrap_or_default()
                }
                SingletonInputs::Multimodal(_) => ProcessorKwargs::default(),
            },
        )
    }

    /// Returns true if the property has already been computed.
    pub fn is_resolved(&self, property: Property) -> bool {
        let memo = &self.memo;
        match property {
            Property::Prompt => memo.prompt.get().is_some(),
            Property::PromptTokenIds => memo.prompt_token_ids.get().is_some(),
            Property::TokenTypeIds => memo.token_type_ids.get().is_some(),
            Property::PromptEmbeds => memo.prompt_embeds.get().is_some(),
            Property::MultiModalData => memo.multi_modal_data.get().is_some(),
            Property::MultiModalInputs => memo.multi_modal_inputs.get().is_some(),
            Property::MultiModalPlaceholders => memo.multi_modal_placeholders.get().is_some(),
            Property::MmProcessorKwargs => memo.mm_processor_kwargs.get().is_some(),
        }
    }

    /// Resolves every property and returns a serializable snapshot.
    pub fn view(&self) -> InputsView {
        InputsView {
            kind: self.kind(),
            prompt: self.prompt().map(Arc::from),
            prompt_token_ids: self.prompt_token_ids().clone(),
            token_type_ids: self.token_type_ids().clone(),
            prompt_embeds: self.prompt_embeds().cloned(),
            multi_modal_data: self.multi_modal_data().clone(),
            multi_modal_inputs: self.multi_modal_inputs().clone(),
            multi_modal_placeholders: self.multi_modal_placeholders().clone(),
            mm_processor_kwargs: self.mm_processor_kwargs().clone(),
        }
    }

    fn resolve<'a, T, F>(&'a self, slot: &'a OnceLock<T>, property: Property, compute: F) -> &'a T
    where
        F: FnOnce(&SingletonInputs) -> T,
    {
        slot.get_or_init(|| {
            tracing::trace!(
                target: TRACING_TARGET_ADAPTER,
                property = %property,
                kind = %self.kind(),
                "Resolving input property"
            );
            compute(&self.inputs)
        })
    }
}

impl fmt::Debug for InputsAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputsAdapter")
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

impl From<SingletonInputs> for InputsAdapter {
    fn from(inputs: SingletonInputs) -> Self {
        Self::new(inputs)
    }
}

impl From<Arc<SingletonInputs>> for InputsAdapter {
    fn from(inputs: Arc<SingletonInputs>) -> Self {
        Self::new(inputs)
    }
}

impl From<TokenInputs> for InputsAdapter {
    fn from(inputs: TokenInputs) -> Self {
        Self::new(SingletonInputs::from(inputs))
    }
}

impl From<crate::MultiModalInputs> for InputsAdapter {
    fn from(inputs: crate::MultiModalInputs) -> Self {
        Self::new(SingletonInputs::from(inputs))
    }
}
