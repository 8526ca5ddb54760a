//! Detection pipeline: whole-text and per-sentence perplexity, aggregation,
//! classification and the marked-text rendering.

use crate::classifier::PerplexityClassifier;
use crate::config::DetectorConfig;
use crate::model::{LanguageModel, TextEncoder};
use crate::perplexity::{Perplexity, PerplexityEngine};
use crate::segmenter::{count_alphanumeric, SentenceSegmenter};
use isgpt_core::{
    need_more_text_status, DetectionResult, Result, SentenceDetail, NO_VALID_SENTENCES,
};
use parking_lot::Mutex;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Perplexity-based AI text detector.
///
/// The model session sits behind one exclusive lock that is held for a whole
/// [`Detector::detect`] call, so concurrent requests are served strictly one
/// after the other and never interleave their windows.
pub struct Detector {
    encoder: Box<dyn TextEncoder>,
    model: Mutex<Box<dyn LanguageModel>>,
    engine: PerplexityEngine,
    segmenter: SentenceSegmenter,
    classifier: PerplexityClassifier,
    config: DetectorConfig,
}

impl Detector {
    /// Create a detector from a tokenizer, a model and configuration
    pub fn new<E, M>(encoder: E, model: M, config: DetectorConfig) -> Result<Self>
    where
        E: TextEncoder + 'static,
        M: LanguageModel + 'static,
    {
        config.validate()?;

        Ok(Self {
            encoder: Box::new(encoder),
            model: Mutex::new(Box::new(model)),
            engine: PerplexityEngine::from_config(&config),
            segmenter: SentenceSegmenter::new()?,
            classifier: PerplexityClassifier::new(config.thresholds),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Perplexity of `text` as a single unit
    pub fn perplexity(&self, text: &str) -> Result<Perplexity> {
        let mut model = self.model.lock();
        self.engine.score_text(self.encoder.as_ref(), &mut **model, text)
    }

    /// Run the full detection pipeline on `text`.
    ///
    /// Too little text and an empty sentence set are soft failures reported
    /// through [`DetectionResult::status`]. A failure while scoring the whole
    /// text is returned as an error; a failure on one sentence only drops that
    /// sentence.
    pub fn detect(&self, text: &str, detailed: bool) -> Result<DetectionResult> {
        let alnum = count_alphanumeric(text);
        if alnum < self.config.min_alnum_chars {
            debug!(alnum, min = self.config.min_alnum_chars, "Input too short to score");
            return Ok(DetectionResult::soft_failure(need_more_text_status(
                self.config.min_alnum_chars,
            )));
        }

        let start = Instant::now();
        let mut guard = self.model.lock();
        let model = &mut **guard;
        let encoder = self.encoder.as_ref();

        let document = self.engine.score_text(encoder, model, text)?;
        debug!(
            perplexity = document.value,
            windows = document.window_nlls.len(),
            "Scored whole text"
        );

        let mut scored: Vec<(&str, f64)> = Vec::new();
        let mut skipped = 0;
        for sentence in self.segmenter.segment(text) {
            match self.engine.score_text(encoder, model, sentence) {
                Ok(ppl) => scored.push((sentence, ppl.value)),
                Err(e) => {
                    warn!(error = %e, chars = sentence.len(), "Failed to score sentence, skipping");
                    skipped += 1;
                }
            }
        }

        if scored.is_empty() {
            let mut result = DetectionResult::soft_failure(NO_VALID_SENTENCES);
            result.skipped_sentences = skipped;
            return Ok(result);
        }

        let mean = scored.iter().map(|(_, ppl)| ppl).sum::<f64>() / scored.len() as f64;
        let burstiness = scored
            .iter()
            .map(|(_, ppl)| *ppl)
            .fold(f64::NEG_INFINITY, f64::max);

        // The headline confidence is not surfaced; only label and message are.
        let overall = self.classifier.classify(mean);

        let mut result = DetectionResult {
            perplexity: Some(document.value),
            perplexity_per_line: Some(mean),
            burstiness: Some(burstiness),
            label: Some(overall.label),
            message: overall.message.to_string(),
            skipped_sentences: skipped,
            ..Default::default()
        };

        if detailed {
            result.sentences = scored
                .iter()
                .map(|&(text, ppl)| {
                    let verdict = self.classifier.classify(ppl);
                    SentenceDetail {
                        text: text.to_string(),
                        perplexity: ppl,
                        label: verdict.label,
                        classification: verdict.message.to_string(),
                        confidence: verdict.confidence,
                    }
                })
                .collect();
            result.marked_text = marked_text(&result.sentences);
        }

        info!(
            perplexity = document.value,
            perplexity_per_line = mean,
            burstiness,
            sentences = scored.len(),
            skipped,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Detection complete"
        );

        Ok(result)
    }
}

/// Wrap each sentence in a tag named after its label and join with spaces
pub fn marked_text(sentences: &[SentenceDetail]) -> String {
    sentences
        .iter()
        .map(|s| {
            let tag = s.label.tag();
            format!("<{}>{}</{}>", tag, s.text, tag)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
