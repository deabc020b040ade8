// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image loading and the few geometric operations the extraction pipeline
// needs.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use marginalia_core::error::MarginaliaError;
use marginalia_core::CropRegion;
use tracing::{debug, info, instrument};

/// Load a scan from disk (TIFF, JPEG, PNG, ...).
///
/// An unreadable or missing file is fatal for the extraction call.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open_scan(path: impl AsRef<Path>) -> Result<DynamicImage, MarginaliaError> {
    let img = image::open(path.as_ref()).map_err(|err| {
        MarginaliaError::ImageError(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    info!(width = img.width(), height = img.height(), "Scan loaded");
    Ok(img)
}

/// Cut `region` out of `image`. The region is clamped to the image bounds.
#[instrument(skip(image), fields(x = region.x, y = region.y, width = region.width, height = region.height))]
pub fn crop_to_region(image: &DynamicImage, region: CropRegion) -> DynamicImage {
    let img_w = image.width();
    let img_h = image.height();

    if region.is_full(img_w, img_h) {
        return image.clone();
    }

    let safe_x = region.x.min(img_w.saturating_sub(1));
    let safe_y = region.y.min(img_h.saturating_sub(1));
    let safe_w = region.width.min(img_w - safe_x);
    let safe_h = region.height.min(img_h - safe_y);

    debug!(safe_x, safe_y, safe_w, safe_h, "Cropping scan");
    image.crop_imm(safe_x, safe_y, safe_w, safe_h)
}

/// Resize a mask to exactly `width` x `height` with nearest-neighbour
/// sampling, so binary masks stay binary.
pub fn resize_nearest(mask: &GrayImage, width: u32, height: u32) -> GrayImage {
    if mask.dimensions() == (width, height) {
        return mask.clone();
    }
    imageops::resize(mask, width, height, FilterType::Nearest)
}

/// Write an image to a file. The format is inferred from the file extension.
pub fn save_image(image: &DynamicImage, path: impl AsRef<Path>) -> Result<(), MarginaliaError> {
    image.save(path.as_ref()).map_err(|err| {
        MarginaliaError::ImageError(format!(
            "failed to save image to {}: {}",
            path.as_ref().display(),
            err
        ))
    })
}
