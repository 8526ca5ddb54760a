//! ONNX Runtime backend for an exported GPT-2 language model
//!
//! The graph takes `input_ids` and `position_ids` (int64, `[1, len]`) and
//! returns `logits` (`[1, len, vocab]`). It is exported without a KV cache, so
//! every call sees the whole window.

use crate::model::LanguageModel;
use candle_core::{Device, Tensor};
use isgpt_core::{Error, Result};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use tracing::info;

/// Causal language model executed by ONNX Runtime
pub struct OnnxLanguageModel {
    session: Session,
    max_context: usize,
}

impl OnnxLanguageModel {
    /// Load a model from an `.onnx` file.
    ///
    /// `intra_threads` limits ONNX Runtime's intra-op parallelism; `None`
    /// keeps the runtime default.
    pub fn load(
        path: impl AsRef<Path>,
        max_context: usize,
        intra_threads: Option<usize>,
    ) -> Result<Self> {
        let path = path.as_ref();

        let mut builder = Session::builder()
            .map_err(|e| Error::model(format!("Failed to create ONNX session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::model(format!("Failed to set optimization level: {}", e)))?;

        if let Some(threads) = intra_threads {
            builder = builder
                .with_intra_threads(threads)
                .map_err(|e| Error::model(format!("Failed to set intra-op threads: {}", e)))?;
        }

        let session = builder.commit_from_file(path).map_err(|e| {
            Error::model(format!("Failed to load ONNX model {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), max_context, "Loaded ONNX language model");

        Ok(Self {
            session,
            max_context,
        })
    }
}

impl LanguageModel for OnnxLanguageModel {
    fn max_context(&self) -> usize {
        self.max_context
    }

    fn logits(&mut self, input_ids: &[i64], position_ids: &[i64]) -> Result<Tensor> {
        if input_ids.len() != position_ids.len() {
            return Err(Error::inference(format!(
                "input_ids has {} positions but position_ids has {}",
                input_ids.len(),
                position_ids.len()
            )));
        }
        if input_ids.is_empty() || input_ids.len() > self.max_context {
            return Err(Error::inference(format!(
                "window of {} tokens is outside 1..={}",
                input_ids.len(),
                self.max_context
            )));
        }

        let seq_len = input_ids.len();
        let shape = [1_i64, seq_len as i64];

        let input_ids = TensorRef::from_array_view((shape, input_ids))
            .map_err(|e| Error::inference(format!("Failed to create input tensor: {}", e)))?;
        let position_ids = TensorRef::from_array_view((shape, position_ids))
            .map_err(|e| Error::inference(format!("Failed to create position tensor: {}", e)))?;

        let outputs = self
            .session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "position_ids" => position_ids,
            ])
            .map_err(|e| Error::inference(format!("Inference failed: {}", e)))?;

        let (out_shape, data) = outputs["logits"]
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::inference(format!("Failed to read logits: {}", e)))?;

        if out_shape.len() != 3 || out_shape[0] != 1 || out_shape[1] != seq_len as i64 {
            return Err(Error::inference(format!(
                "unexpected logits shape {:?} for {} input tokens",
                &out_shape[..],
                seq_len
            )));
        }
        let vocab_size = out_shape[2] as usize;

        Tensor::from_slice(data, (1, seq_len, vocab_size), &Device::Cpu)
            .map_err(|e| Error::inference(format!("Failed to wrap logits: {}", e)))
    }
}
