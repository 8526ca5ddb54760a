//! Numerically stable softmax over a logits row

/// Normalize `logits` into a probability distribution.
///
/// The maximum logit is subtracted before exponentiating so large scores
/// cannot overflow. Exponentials are accumulated in `f64`; with a full GPT-2
/// vocabulary (~50k entries) an `f32` sum drifts visibly from 1.
pub fn softmax(logits: &[f32]) -> Vec<f64> {
    if logits.is_empty() {
        return Vec::new();
    }

    let max_logit = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;

    let mut probs: Vec<f64> = logits
        .iter()
        .map(|&v| (v as f64 - max_logit).exp())
        .collect();
    let exp_sum: f64 = probs.iter().sum();

    for p in &mut probs {
        *p /= exp_sum;
    }

    probs
}
