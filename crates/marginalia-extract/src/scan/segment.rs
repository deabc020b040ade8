// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Segmentation: binarize a scan, keep only its margins, and label the
// remaining foreground into 4-connected components with a statistics table.

use std::collections::BTreeMap;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use imageproc::region_labelling::{Connectivity, connected_components};
use marginalia_core::error::MarginaliaError;
use marginalia_core::{BoundingBox, ComponentStats, ExtractorConfig, SauvolaParams};
use tracing::{debug, info, instrument};

use crate::raster::open_scan;
use crate::scan::binarize::{FOREGROUND, binarize_sauvola, suppress_centre};

/// Label map: 0 is background, components are numbered from 1.
pub type LabelMap = ImageBuffer<Luma<u32>, Vec<u32>>;

/// Output of one segmentation pass.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Binary margin mask (foreground = 255).
    pub mask: GrayImage,
    /// Per-pixel component labels.
    pub labels: LabelMap,
    /// One row per component, ordered by label. Background is not listed.
    pub components: Vec<ComponentStats>,
}

/// Turns a scan into a margin mask and its connected components.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    sauvola: SauvolaParams,
    margin_ratio: f64,
}

impl Segmenter {
    pub fn new(sauvola: SauvolaParams, margin_ratio: f64) -> Self {
        Self {
            sauvola,
            margin_ratio,
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.sauvola, config.margin_ratio)
    }

    /// Load the scan at `path` and segment it.
    ///
    /// Returns the decoded image alongside the segmentation so the caller can
    /// crop the original without decoding twice.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn segment_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(DynamicImage, Segmentation), MarginaliaError> {
        let image = open_scan(path)?;
        let segmentation = self.segment_image(&image);
        Ok((image, segmentation))
    }

    /// Segment an already-decoded scan.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn segment_image(&self, image: &DynamicImage) -> Segmentation {
        let gray = image.to_luma8();
        let mut mask = binarize_sauvola(&gray, &self.sauvola);
        suppress_centre(&mut mask, self.margin_ratio);

        let labels = label_components(&mask);
        let components = component_stats(&labels);
        info!(components = components.len(), "Margin components labelled");

        Segmentation {
            mask,
            labels,
            components,
        }
    }
}

/// Label 4-connected foreground regions of a binary mask.
pub fn label_components(mask: &GrayImage) -> LabelMap {
    connected_components(mask, Connectivity::Four, Luma([0u8]))
}

/// Build the statistics table (bounding box and pixel area) for every
/// non-background label, ordered by label.
pub fn component_stats(labels: &LabelMap) -> Vec<ComponentStats> {
    // (min_x, min_y, max_x, max_y, area) per label
    let mut regions: BTreeMap<u32, (u32, u32, u32, u32, u32)> = BTreeMap::new();

    for (x, y, label) in labels.enumerate_pixels() {
        let label = label.0[0];
        if label == 0 {
            continue;
        }
        regions
            .entry(label)
            .and_modify(|(min_x, min_y, max_x, max_y, area)| {
                *min_x = (*min_x).min(x);
                *min_y = (*min_y).min(y);
                *max_x = (*max_x).max(x);
                *max_y = (*max_y).max(y);
                *area += 1;
            })
            .or_insert((x, y, x, y, 1));
    }

    let stats: Vec<ComponentStats> = regions
        .into_iter()
        .map(|(label, (min_x, min_y, max_x, max_y, area))| ComponentStats {
            label,
            bbox: BoundingBox::from_corners(min_x, min_y, max_x, max_y),
            area,
        })
        .collect();
    debug!(count = stats.len(), "Component statistics computed");
    stats
}

/// Binary mask of a single component, cropped to its bounding box.
///
/// Pixels of other components inside the box stay background.
pub fn component_mask(labels: &LabelMap, component: &ComponentStats) -> GrayImage {
    let bbox = component.bbox;
    GrayImage::from_fn(bbox.width, bbox.height, |x, y| {
        if labels.get_pixel(bbox.x + x, bbox.y + y).0[0] == component.label {
            Luma([FOREGROUND])
        } else {
            Luma([0])
        }
    })
}
