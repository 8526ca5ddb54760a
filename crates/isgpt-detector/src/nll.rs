//! Negative log-likelihood of one window's newly scored tokens

use crate::softmax::softmax;
use crate::window::Window;
use candle_core::Tensor;
use isgpt_core::{Error, Result};

/// Lower bound applied to target probabilities before taking the log
pub const DEFAULT_PROBABILITY_FLOOR: f64 = 1e-10;

/// Sum `-ln p(token)` over the targets of `window`.
///
/// `logits` is the model output for the window, shaped `[1, len, vocab]`,
/// and `tokens` are the window's own token ids. Rows `[target_start, len - 1)`
/// are scored: row `i` gives the distribution of the token at offset `i + 1`. Probabilities below
/// `probability_floor` are clamped so a confident miss costs a bounded amount.
pub fn window_nll(
    logits: &Tensor,
    tokens: &[u32],
    window: &Window,
    probability_floor: f64,
) -> Result<f64> {
    let (batch, seq_len, vocab_size) = logits
        .dims3()
        .map_err(|e| Error::inference(format!("Unexpected logits rank: {}", e)))?;

    if batch != 1 || seq_len != tokens.len() || seq_len != window.len() {
        return Err(Error::inference(format!(
            "logits shape [{}, {}, {}] does not match a window of {} tokens",
            batch,
            seq_len,
            vocab_size,
            window.len()
        )));
    }

    let rows = logits
        .squeeze(0)
        .map_err(|e| Error::inference(format!("Failed to squeeze batch dimension: {}", e)))?;

    let mut nll = 0.0;
    for target in window.targets() {
        let row = rows
            .get(target - 1)
            .and_then(|r| r.to_vec1::<f32>())
            .map_err(|e| {
                Error::inference(format!("Failed to read logits row {}: {}", target - 1, e))
            })?;

        let token = tokens[target] as usize;
        let probs = softmax(&row);
        let prob = probs.get(token).copied().ok_or_else(|| {
            Error::inference(format!(
                "token id {} is outside the model vocabulary ({})",
                token, vocab_size
            ))
        })?;

        nll -= prob.max(probability_floor).ln();
    }

    Ok(nll)
}
