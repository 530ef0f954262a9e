//! Value types carried by request inputs.
//!
//! This module provides the opaque payload containers used by every input
//! variant:
//! - [`Payload`] - shared, insertion-ordered, string-keyed mapping
//! - [`PlaceholderRange`] - location of one multimodal item in the prompt

mod payload;
mod placeholder;

use std::sync::Arc;

pub use payload::Payload;
pub use placeholder::PlaceholderRange;

/// Prompt token ids, shared so memoized reads hand out the same allocation.
pub type TokenIds = Arc<[u32]>;

/// Prompt embeddings, flattened. No current input variant carries them.
pub type PromptEmbeds = Arc<[f32]>;

/// Raw multimodal data keyed by modality (for example `"image"`).
pub type MultiModalData = Payload;

/// Model-ready multimodal keyword arguments keyed by name.
pub type MultiModalKwargs = Payload;

/// Placeholder ranges of each modality inside the prompt token ids.
pub type MultiModalPlaceholders = Payload<Vec<PlaceholderRange>>;

/// Keyword arguments forwarded to multimodal processors.
pub type ProcessorKwargs = Payload;
