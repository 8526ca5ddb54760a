//! Threshold classification of perplexity scores
//!
//! Low perplexity means the model found the text predictable, which is what
//! machine-generated text tends to look like. The confidence reported here is
//! a calibration heuristic that grows linearly with the distance from the
//! nearest threshold and is clamped to `[50, 100]`. It is not a probability.

use crate::config::Thresholds;
use isgpt_core::Label;

pub const AI_MESSAGE: &str = "The Text is generated by AI.";
pub const MIXED_MESSAGE: &str =
    "The Text is most probably contain parts which are generated by AI.";
pub const HUMAN_MESSAGE: &str = "The Text is written by Human.";

/// Confidence floor, also the fixed confidence of the uncertain band
const MIN_CONFIDENCE: f64 = 50.0;
const MAX_CONFIDENCE: f64 = 100.0;

/// Label, message and confidence for one perplexity score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub label: Label,
    pub message: &'static str,
    /// Percentage in `[50, 100]`
    pub confidence: f64,
}

/// Maps perplexity scores to verdicts using fixed thresholds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerplexityClassifier {
    thresholds: Thresholds,
}

impl PerplexityClassifier {
    /// Create a classifier with the given thresholds
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Classify a perplexity score
    pub fn classify(&self, score: f64) -> Verdict {
        let Thresholds {
            ai_below,
            human_from,
        } = self.thresholds;

        if score < ai_below {
            Verdict {
                label: Label::Ai,
                message: AI_MESSAGE,
                confidence: clamp_confidence((ai_below - score) / ai_below * 100.0),
            }
        } else if score < human_from {
            Verdict {
                label: Label::Ai,
                message: MIXED_MESSAGE,
                confidence: MIN_CONFIDENCE,
            }
        } else {
            Verdict {
                label: Label::Human,
                message: HUMAN_MESSAGE,
                confidence: clamp_confidence((score - human_from) / human_from * 100.0),
            }
        }
    }
}

fn clamp_confidence(raw: f64) -> f64 {
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}
