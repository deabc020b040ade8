// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Classifier input: a component mask resized to a fixed square and
// normalised to [0, 1].

use image::GrayImage;

use crate::raster::resize_nearest;

/// Square single-channel patch in row-major order, values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    size: u32,
    values: Vec<f32>,
}

impl Patch {
    /// Resize `mask` to `size` x `size` (nearest neighbour) and scale each
    /// pixel by 1/255.
    pub fn from_mask(mask: &GrayImage, size: u32) -> Self {
        let resized = resize_nearest(mask, size, size);
        let values = resized.pixels().map(|p| p.0[0] as f32 / 255.0).collect();
        Self { size, values }
    }

    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row-major values, `size * size` of them.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[(y * self.size + x) as usize]
    }

    /// Fraction of the patch that is foreground.
    pub fn fill_ratio(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }
}
