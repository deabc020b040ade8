// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Model-backed component classifier.
//
// Runs a pre-trained binary image classifier through `rten`. The model takes
// one `size x size` single-channel patch and produces a single sigmoid
// probability that the patch is body text or noise.
//
// # Feature Gate
//
// This module is only available when the `model` feature is enabled.
//
// # Model Setup
//
// Export the trained network to ONNX and convert it to the `.rten` format:
//
// ```sh
// pip install rten-convert
// rten-convert component_classifier.onnx component_classifier.rten
// ```

use std::path::PathBuf;

use marginalia_core::error::MarginaliaError;
use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::{NdTensor, Tensor};
use tracing::{debug, info, instrument};

use super::{ComponentClassifier, Patch};

/// Memory layout of the model's input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputLayout {
    /// `[1, size, size, 1]`: channels last, as exported from Keras.
    #[default]
    Nhwc,
    /// `[1, 1, size, size]`: channels first, as exported from PyTorch.
    Nchw,
}

/// Configuration for constructing a [`ModelClassifier`].
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Path to the `.rten` model file.
    pub model_path: PathBuf,
    /// Input tensor layout the model expects.
    pub layout: InputLayout,
}

impl ModelConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            layout: InputLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: InputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Verify that the model file exists.
    pub fn validate(&self) -> Result<(), MarginaliaError> {
        if !self.model_path.exists() {
            return Err(MarginaliaError::ModelError(format!(
                "classifier model not found at {}",
                self.model_path.display()
            )));
        }
        Ok(())
    }
}

/// Component classifier backed by an `rten` model.
///
/// Loading the model is the expensive step; build one classifier and reuse it
/// for every page.
pub struct ModelClassifier {
    model: Model,
    layout: InputLayout,
}

impl ModelClassifier {
    /// Load the model described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MarginaliaError::ModelError`] if the file is missing or is
    /// not a valid model.
    #[instrument(skip_all, fields(model = %config.model_path.display()))]
    pub fn new(config: ModelConfig) -> Result<Self, MarginaliaError> {
        config.validate()?;

        info!("Loading component classifier model");
        let model = Model::load_file(&config.model_path).map_err(|err| {
            MarginaliaError::ModelError(format!(
                "failed to load classifier model from {}: {}",
                config.model_path.display(),
                err
            ))
        })?;

        Ok(Self {
            model,
            layout: config.layout,
        })
    }

    fn input_tensor(&self, patch: &Patch) -> NdTensor<f32, 4> {
        let size = patch.size() as usize;
        let shape = match self.layout {
            InputLayout::Nhwc => [1, size, size, 1],
            InputLayout::Nchw => [1, 1, size, size],
        };
        // With a single channel both layouts share the same row-major data.
        NdTensor::from_data(shape, patch.values().to_vec())
    }
}

impl ComponentClassifier for ModelClassifier {
    fn probability(&self, patch: &Patch) -> Result<f32, MarginaliaError> {
        let input = self.input_tensor(patch);

        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|err| {
                MarginaliaError::ClassifierError(format!("model inference failed: {}", err))
            })?;
        let output: Tensor<f32> = output.try_into().map_err(|err| {
            MarginaliaError::ClassifierError(format!("unexpected model output: {}", err))
        })?;

        let probability = output.iter().next().copied().ok_or_else(|| {
            MarginaliaError::ClassifierError("model produced an empty output".into())
        })?;
        debug!(probability, "Component classified");
        Ok(probability.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_missing_model() {
        let config = ModelConfig::new("/nonexistent/component_classifier.rten");
        assert!(matches!(
            config.validate(),
            Err(MarginaliaError::ModelError(_))
        ));
    }

    #[test]
    fn new_fails_for_missing_model() {
        let result = ModelClassifier::new(ModelConfig::new("/nonexistent/model.rten"));
        assert!(result.is_err());
    }

    #[test]
    fn default_layout_is_channels_last() {
        let config = ModelConfig::new("model.rten");
        assert_eq!(config.layout, InputLayout::Nhwc);
        let config = config.with_layout(InputLayout::Nchw);
        assert_eq!(config.layout, InputLayout::Nchw);
    }
}
