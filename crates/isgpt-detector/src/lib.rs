//! isgpt Detector
//!
//! Perplexity-based detection of machine-generated text.
//!
//! A GPT-2 class causal language model scores how predictable a text is:
//! - The whole text is scored with overlapping windows no longer than the
//!   model's context
//! - Every sentence is scored on its own; the mean and the maximum of those
//!   scores summarise the document
//! - Fixed thresholds on the mean decide between AI and Human
//!
//! The tokenizer and the model are reached through the [`TextEncoder`] and
//! [`LanguageModel`] traits. The ONNX Runtime backend is behind the `onnx`
//! feature.

pub mod classifier;
pub mod config;
pub mod detector;
pub mod model;
pub mod model_loader;
pub mod nll;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod perplexity;
pub mod segmenter;
pub mod softmax;
pub mod window;

pub use classifier::{PerplexityClassifier, Verdict, AI_MESSAGE, HUMAN_MESSAGE, MIXED_MESSAGE};
pub use config::{DetectorConfig, Thresholds};
pub use detector::{marked_text, Detector};
pub use model::{LanguageModel, TextEncoder};
pub use model_loader::{load_detector, load_tokenizer, ModelConfig, ModelSource, GPT2_CONTEXT};
pub use nll::{window_nll, DEFAULT_PROBABILITY_FLOOR};
#[cfg(feature = "onnx")]
pub use onnx::OnnxLanguageModel;
pub use perplexity::{Perplexity, PerplexityEngine};
pub use segmenter::{count_alphanumeric, has_alphanumeric, SentenceSegmenter};
pub use softmax::softmax;
pub use window::{Window, WindowPlan, Windows};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::DetectorConfig;
    pub use crate::detector::Detector;
    pub use crate::model::{LanguageModel, TextEncoder};
    pub use crate::model_loader::{load_detector, ModelConfig, ModelSource};
    pub use isgpt_core::{DetectionResult, Label, SentenceDetail};
}
