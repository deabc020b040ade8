// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan segmentation: local binarization, margin isolation and connected
// component labelling.

pub mod binarize;
pub mod segment;

pub use binarize::{FOREGROUND, binarize_sauvola, suppress_centre};
pub use segment::{LabelMap, Segmentation, Segmenter, component_mask, component_stats};
