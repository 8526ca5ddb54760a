//! Sliding-window perplexity of a token sequence
//!
//! The sequence is cut into overlapping windows no longer than the model's
//! context, each window is run through the model once, and the negative
//! log-likelihoods of each window's targets are summed. A token is scored at
//! most once. The first token of the sequence and the first newly covered
//! token of every overlapping window are not scored, yet the perplexity is
//! still `exp(total_nll / max(1, N - 1))`.

use crate::config::DetectorConfig;
use crate::model::{LanguageModel, TextEncoder};
use crate::nll::{window_nll, DEFAULT_PROBABILITY_FLOOR};
use crate::window::WindowPlan;
use isgpt_core::{Error, Result};
use tracing::debug;

/// Perplexity of one scored text unit
#[derive(Debug, Clone, PartialEq)]
pub struct Perplexity {
    /// `exp(total_nll / scored_tokens)`
    pub value: f64,

    /// Sum of all window NLLs
    pub total_nll: f64,

    /// Denominator: `max(1, N - 1)`
    pub scored_tokens: usize,

    /// NLL contributed by each window, in window order
    pub window_nlls: Vec<f64>,
}

/// Drives window planning, model calls and NLL accumulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerplexityEngine {
    max_length: usize,
    stride: usize,
    probability_floor: f64,
}

impl PerplexityEngine {
    /// Create an engine with the given window length and stride
    pub fn new(max_length: usize, stride: usize) -> Self {
        Self {
            max_length,
            stride,
            probability_floor: DEFAULT_PROBABILITY_FLOOR,
        }
    }

    /// Create an engine from detector configuration
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self {
            max_length: config.max_length,
            stride: config.stride,
            probability_floor: config.probability_floor,
        }
    }

    /// Set the probability floor applied before taking logs
    pub fn with_probability_floor(mut self, floor: f64) -> Self {
        self.probability_floor = floor;
        self
    }

    /// Tokenize `text` and score it
    pub fn score_text(
        &self,
        encoder: &dyn TextEncoder,
        model: &mut dyn LanguageModel,
        text: &str,
    ) -> Result<Perplexity> {
        let tokens = encoder.encode(text)?;
        self.score_tokens(model, &tokens)
    }

    /// Score an already tokenized sequence
    pub fn score_tokens(
        &self,
        model: &mut dyn LanguageModel,
        tokens: &[u32],
    ) -> Result<Perplexity> {
        if tokens.is_empty() {
            return Err(Error::EmptyInput);
        }

        // The window can never exceed what the model attends to.
        let size = self.max_length.min(model.max_context());
        let plan = WindowPlan::new(tokens.len(), size, self.stride.min(size))?;

        let mut window_nlls = Vec::new();
        for window in plan.windows() {
            let window_tokens = &tokens[window.range()];
            let input_ids: Vec<i64> = window_tokens.iter().map(|&id| i64::from(id)).collect();
            let position_ids: Vec<i64> = (0..window_tokens.len() as i64).collect();

            let logits = model.logits(&input_ids, &position_ids)?;
            let nll = window_nll(&logits, window_tokens, &window, self.probability_floor)?;

            debug!(
                begin = window.begin,
                end = window.end,
                target_start = window.target_start,
                nll,
                "scored window"
            );
            window_nlls.push(nll);
        }

        let total_nll: f64 = window_nlls.iter().sum();
        let scored_tokens = tokens.len().saturating_sub(1).max(1);

        Ok(Perplexity {
            value: (total_nll / scored_tokens as f64).exp(),
            total_nll,
            scored_tokens,
            window_nlls,
        })
    }
}

impl Default for PerplexityEngine {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}
