//! Seams to the tokenizer and the causal language model

use candle_core::Tensor;
use isgpt_core::{Error, Result};
use tokenizers::Tokenizer;

/// Turns raw text into token ids.
///
/// Implementations must be deterministic. Empty input may legitimately yield
/// an empty sequence.
pub trait TextEncoder: Send + Sync {
    /// Encode `text` into token ids
    fn encode(&self, text: &str) -> Result<Vec<u32>>;
}

impl TextEncoder for Tokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        // GPT-2 adds no special tokens; keep the raw byte-pair ids.
        let encoding = (**self)
            .encode(text, false)
            .map_err(|e| Error::tokenizer(format!("Tokenization failed: {}", e)))?;
        Ok(encoding.get_ids().to_vec())
    }
}

/// A causal language model returning next-token logits for every position.
///
/// Calls take `&mut self`: a session is stateful and is never driven by two
/// callers at once.
pub trait LanguageModel: Send {
    /// Maximum number of positions the model attends to in one call
    fn max_context(&self) -> usize;

    /// Run the model over one window.
    ///
    /// `position_ids[i]` is `i`. The returned tensor has shape
    /// `[1, input_ids.len(), vocab_size]` and holds `f32` logits; row `i`
    /// scores the token following `input_ids[i]`.
    fn logits(&mut self, input_ids: &[i64], position_ids: &[i64]) -> Result<Tensor>;
}
