// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// marginalia-extract: Margin annotation extraction for scanned manuscripts.
//
// Provides local (Sauvola) binarization with centre suppression, connected
// component segmentation, a classifier seam for telling annotation marks from
// body text, edge-line voting, and contour-based crop inference, plus
// diagnostic panels for inspecting each decision.

pub mod classify;
pub mod crop;
pub mod diagnostics;
pub mod extractor;
pub mod raster;
pub mod scan;

// Re-export the primary structs so callers can use `marginalia_extract::ComponentExtractor` etc.
pub use classify::{ComponentClassifier, ComponentFilter, Patch, Verdict};
pub use crop::{CropLocator, CropOutcome, TieBreak, VoteRasters};
pub use diagnostics::Diagnostics;
pub use extractor::{ComponentExtractor, Extraction, ExtractionSummary};
pub use scan::{Segmentation, Segmenter};

#[cfg(feature = "model")]
pub use classify::{InputLayout, ModelClassifier, ModelConfig};
