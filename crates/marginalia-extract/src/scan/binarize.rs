// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binarization of manuscript scans: Sauvola local thresholding over integral
// images, and suppression of the central text block so only the margins
// remain.

use image::{GrayImage, Luma};
use marginalia_core::SauvolaParams;
use tracing::{debug, instrument};

/// Foreground value in every mask produced by this crate.
pub const FOREGROUND: u8 = 255;

/// Binarize a grayscale scan with the Sauvola local threshold.
///
/// For each pixel the threshold is `m * (1 + k * (s / r - 1))`, where `m` and
/// `s` are the mean and standard deviation of the `window_size` square
/// centred on it. Windows are clamped at the image border. Pixels darker
/// than their threshold become foreground (255); all others become 0.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn binarize_sauvola(gray: &GrayImage, params: &SauvolaParams) -> GrayImage {
    let (width, height) = gray.dimensions();
    let radius = params.window_size / 2;
    let table = IntegralTables::new(gray);

    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let (mean, std_dev) = table.window_stats(x, y, radius);
            let threshold = mean * (1.0 + params.k * (std_dev / params.r - 1.0));
            let value = gray.get_pixel(x, y).0[0] as f64;
            if value < threshold {
                output.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
    }

    debug!(
        foreground = output.pixels().filter(|p| p.0[0] == FOREGROUND).count(),
        "Sauvola binarization complete"
    );
    output
}

/// Zero the central block of `mask`, keeping a band of `margin_ratio` of each
/// axis along every edge.
///
/// With `hc = floor(height * ratio)` and `wc = floor(width * ratio)`, rows
/// `[hc, height - hc)` crossed with columns `[wc, width - wc)` are cleared.
pub fn suppress_centre(mask: &mut GrayImage, margin_ratio: f64) {
    let (width, height) = mask.dimensions();
    let height_cutoff = (height as f64 * margin_ratio) as u32;
    let width_cutoff = (width as f64 * margin_ratio) as u32;

    for y in height_cutoff..height.saturating_sub(height_cutoff) {
        for x in width_cutoff..width.saturating_sub(width_cutoff) {
            mask.put_pixel(x, y, Luma([0]));
        }
    }
}

// -- Integral image helpers ---------------------------------------------------

/// Summed-area tables of pixel values and squared pixel values.
///
/// Both tables have dimensions `(width+1) x (height+1)` with a zero-padded
/// first row and column, so entry `(x, y)` holds the sum over `[0, x) x [0, y)`.
struct IntegralTables {
    sums: Vec<u64>,
    squares: Vec<u64>,
    width: u32,
    height: u32,
}

impl IntegralTables {
    fn new(gray: &GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        let stride = (width + 1) as usize;
        let len = stride * (height + 1) as usize;
        let mut sums = vec![0u64; len];
        let mut squares = vec![0u64; len];

        for y in 0..height {
            let mut row_sum: u64 = 0;
            let mut row_sq: u64 = 0;
            for x in 0..width {
                let v = gray.get_pixel(x, y).0[0] as u64;
                row_sum += v;
                row_sq += v * v;
                let idx = (y + 1) as usize * stride + (x + 1) as usize;
                let above = y as usize * stride + (x + 1) as usize;
                sums[idx] = row_sum + sums[above];
                squares[idx] = row_sq + squares[above];
            }
        }

        Self {
            sums,
            squares,
            width,
            height,
        }
    }

    /// Mean and standard deviation of the square window of `radius` centred
    /// on `(cx, cy)`, clamped to the image.
    ///
    /// Clamping shrinks windows near the border instead of mirroring the
    /// image into them, so thresholds within `radius` pixels of an edge are
    /// computed from fewer samples than a reflect-padded Sauvola would use.
    fn window_stats(&self, cx: u32, cy: u32, radius: u32) -> (f64, f64) {
        let stride = (self.width + 1) as usize;

        let x1 = cx.saturating_sub(radius) as usize;
        let y1 = cy.saturating_sub(radius) as usize;
        let x2 = ((cx + radius + 1) as usize).min(self.width as usize);
        let y2 = ((cy + radius + 1) as usize).min(self.height as usize);

        let area = ((x2 - x1) * (y2 - y1)) as f64;
        if area == 0.0 {
            return (0.0, 0.0);
        }

        let lookup = |table: &[u64]| -> f64 {
            table[y2 * stride + x2] as f64 - table[y1 * stride + x2] as f64
                - table[y2 * stride + x1] as f64
                + table[y1 * stride + x1] as f64
        };

        let mean = lookup(&self.sums) / area;
        let variance = (lookup(&self.squares) / area - mean * mean).max(0.0);
        (mean, variance.sqrt())
    }
}
