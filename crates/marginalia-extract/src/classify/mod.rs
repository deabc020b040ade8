// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Component classification: size filtering, patch preparation and the
// classifier seam through which a pre-trained model is consulted.
//
// The model-backed classifier is only available with the `model` feature:
//
// ```toml
// marginalia-extract = { path = "crates/marginalia-extract", features = ["model"] }
// ```

pub mod filter;
pub mod patch;

#[cfg(feature = "model")]
pub mod model;

pub use filter::ComponentFilter;
pub use patch::Patch;

#[cfg(feature = "model")]
pub use model::{InputLayout, ModelClassifier, ModelConfig};

use marginalia_core::error::MarginaliaError;

/// A binary classifier over component patches.
///
/// Implementations return the probability, in `[0, 1]`, that the patch shows
/// body text or noise rather than an annotation mark. Any closure
/// `Fn(&Patch) -> f32` is a classifier.
pub trait ComponentClassifier {
    fn probability(&self, patch: &Patch) -> Result<f32, MarginaliaError>;
}

impl<F> ComponentClassifier for F
where
    F: Fn(&Patch) -> f32,
{
    fn probability(&self, patch: &Patch) -> Result<f32, MarginaliaError> {
        Ok(self(patch))
    }
}

/// Outcome of classifying one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Body text or noise; excluded from voting.
    TextOrNoise,
    /// Annotation-like; contributes edges to the vote rasters.
    Annotation,
}

impl Verdict {
    /// Probabilities strictly above `threshold` are text/noise.
    pub fn from_probability(probability: f32, threshold: f32) -> Self {
        if probability > threshold {
            Verdict::TextOrNoise
        } else {
            Verdict::Annotation
        }
    }
}
