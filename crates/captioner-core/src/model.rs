//! ONNX Runtime session wrapper for next-token scoring.
//!
//! Loads the exported captioning model and implements [`Scorer`] by running
//! one forward pass per decoding step. The exported graph consumes the
//! image tensor and tracks the decoded sequence internally, so the prefix
//! is not fed back as a separate input.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::decode::Scorer;
use crate::error::{CaptionError, Result};

/// Wraps an ONNX Runtime session for caption scoring.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`; the session
/// itself is read-only model state and safe to share across decoding runs.
pub struct ModelSession {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
    /// Name of the output tensor (detected from model metadata).
    output_name: String,
}

impl ModelSession {
    /// Load a captioning model from an ONNX file.
    pub fn load(model_path: &Path) -> Result<Self> {
        let session = Session::builder()
            .map_err(|e| {
                CaptionError::Inference(format!("Failed to create ONNX session builder: {e}"))
            })?
            .commit_from_file(model_path)
            .map_err(|e| CaptionError::Inference(format!("Failed to load ONNX model: {e}")))?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "image".to_string());
        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .unwrap_or_else(|| "scores".to_string());

        tracing::info!(
            "Model loaded successfully: {} (input: {:?}, output: {:?})",
            model_path.display(),
            input_name,
            output_name
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl Scorer for ModelSession {
    /// Run one forward pass and return per-vocabulary-token scores.
    ///
    /// The output tensor is expected to be `[1, vocab_size]`; the first row
    /// is the score vector for the next token.
    fn score_step(&self, image: &Array4<f32>, _prefix: &[usize]) -> Result<Vec<f32>> {
        // Convert ndarray to (shape, flat_data) for ort.
        let shape: Vec<i64> = image.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = image.iter().copied().collect();

        let input_value = Value::from_array((shape, flat_data)).map_err(|e| {
            CaptionError::Inference(format!("Failed to create input tensor: {e}"))
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self
            .session
            .lock()
            .map_err(|e| CaptionError::Inference(format!("Session lock poisoned: {e}")))?;

        let outputs = session
            .run(inputs)
            .map_err(|e| CaptionError::Inference(format!("ONNX inference failed: {e}")))?;

        let output = outputs
            .iter()
            .find(|(name, _)| *name == self.output_name)
            .ok_or_else(|| {
                CaptionError::Inference(format!(
                    "Model did not produce output {:?}",
                    self.output_name
                ))
            })?;

        let (shape, data) = output.1.try_extract_tensor::<f32>().map_err(|e| {
            CaptionError::Inference(format!("Failed to extract output tensor: {e}"))
        })?;

        // [1, vocab_size] is the expected shape; a bare 1-D vector of
        // scores is tolerated.
        let width = match shape.len() {
            1 => data.len(),
            2 => shape[1] as usize,
            _ => {
                return Err(CaptionError::Inference(format!(
                    "Unexpected output shape: {:?}",
                    shape
                )));
            }
        };

        Ok(data[..width].to_vec())
    }
}
