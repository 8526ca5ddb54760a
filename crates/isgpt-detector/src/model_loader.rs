//! Model and tokenizer resolution and loading

use crate::config::DetectorConfig;
use crate::detector::Detector;
use hf_hub::{api::sync::Api, Repo, RepoType};
use isgpt_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokenizers::Tokenizer;
use tracing::info;

/// GPT-2's n_positions
pub const GPT2_CONTEXT: usize = 1024;

/// Where a model artifact comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSource {
    /// Load from local file system
    LocalPath { path: PathBuf },

    /// Download from Hugging Face Hub
    HuggingFace {
        repo_id: String,
        #[serde(default)]
        revision: Option<String>,
        filename: String,
    },
}

impl ModelSource {
    /// Local file source
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::LocalPath { path: path.into() }
    }

    /// Hugging Face Hub source on the `main` revision
    pub fn hugging_face(repo_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            revision: None,
            filename: filename.into(),
        }
    }

    /// Resolve to a local file, downloading into the hf-hub cache if needed
    pub fn resolve(&self) -> Result<PathBuf> {
        match self {
            Self::LocalPath { path } => {
                if !path.exists() {
                    return Err(Error::config(format!("Model file not found: {}", path.display())));
                }
                Ok(path.clone())
            }
            Self::HuggingFace {
                repo_id,
                revision,
                filename,
            } => {
                let api = Api::new()
                    .map_err(|e| Error::config(format!("Failed to initialize HF API: {}", e)))?;

                let repo = api.repo(Repo::with_revision(
                    repo_id.clone(),
                    RepoType::Model,
                    revision.clone().unwrap_or_else(|| "main".to_string()),
                ));

                info!(repo_id, filename, "Fetching from Hugging Face Hub");
                repo.get(filename).map_err(|e| {
                    Error::model(format!("Failed to download {} from {}: {}", filename, repo_id, e))
                })
            }
        }
    }
}

/// Locations and runtime options for the language model and its tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Exported ONNX graph
    pub model: ModelSource,

    /// `tokenizer.json`
    pub tokenizer: ModelSource,

    /// Context length the graph was exported for
    pub max_context: usize,

    /// ONNX Runtime intra-op threads
    pub intra_threads: Option<usize>,
}

impl ModelConfig {
    /// Configuration for local model and tokenizer files
    pub fn from_local(model: impl Into<PathBuf>, tokenizer: impl Into<PathBuf>) -> Self {
        Self {
            model: ModelSource::local(model),
            tokenizer: ModelSource::local(tokenizer),
            max_context: GPT2_CONTEXT,
            intra_threads: None,
        }
    }

    /// Set intra-op thread count
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = Some(threads);
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::from_local("/app/models/model.onnx", "/app/models/tokenizer.json")
    }
}

/// Load a tokenizer from its source
pub fn load_tokenizer(source: &ModelSource) -> Result<Tokenizer> {
    let path = source.resolve()?;
    let tokenizer = Tokenizer::from_file(&path).map_err(|e| {
        Error::tokenizer(format!("Failed to load tokenizer {}: {}", path.display(), e))
    })?;
    info!(path = %path.display(), vocab = tokenizer.get_vocab_size(false), "Loaded tokenizer");
    Ok(tokenizer)
}

/// Resolve and load the tokenizer and ONNX model, then build a detector
#[cfg(feature = "onnx")]
pub fn load_detector(model: &ModelConfig, config: DetectorConfig) -> Result<Detector> {
    use crate::onnx::OnnxLanguageModel;

    let tokenizer = load_tokenizer(&model.tokenizer)?;
    let model_path = model.model.resolve()?;
    let language_model =
        OnnxLanguageModel::load(&model_path, model.max_context, model.intra_threads)?;

    Detector::new(tokenizer, language_model, config)
}

/// Without the `onnx` feature there is no built-in model backend
#[cfg(not(feature = "onnx"))]
pub fn load_detector(_model: &ModelConfig, _config: DetectorConfig) -> Result<Detector> {
    Err(Error::model("Loading an ONNX model requires the 'onnx' feature"))
}
