// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Diagnostic panels: the original page with the winning contour outlined,
// the crop, the row-vote raster and the accepted components, laid out side by
// side in one image.

use std::path::Path;

use image::imageops;
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use marginalia_core::error::MarginaliaError;
use marginalia_core::{BoundingBox, ComponentStats, seeded_rng};
use rand::Rng;
use tracing::{debug, instrument};

use crate::crop::{CropOutcome, Located};
use crate::raster::save_image;
use crate::scan::LabelMap;

/// Space between panels in the composed image.
const GUTTER: u32 = 8;
/// Thickness of the contour outline on the original.
const OUTLINE_WIDTH: i32 = 3;
const OUTLINE_COLOUR: Rgb<u8> = Rgb([0, 255, 0]);

/// The four diagnostic panels of one extraction.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// Original page, with the contour bounding box outlined when a crop was
    /// made.
    pub original: RgbImage,
    /// The kept region.
    pub cropped: RgbImage,
    /// Vertical-edge raster, including the winning line when rows won.
    pub row_votes: GrayImage,
    /// Accepted components, each in its own colour.
    pub components: RgbImage,
}

impl Diagnostics {
    /// Build the panels. Component colours come from an RNG seeded with
    /// `seed`, so the same extraction always renders the same panel.
    #[instrument(skip_all, fields(accepted = accepted.len()))]
    pub fn new(
        original: &DynamicImage,
        cropped: &DynamicImage,
        located: &Located,
        labels: &LabelMap,
        accepted: &[ComponentStats],
        seed: u64,
    ) -> Self {
        let mut annotated = original.to_rgb8();
        if let CropOutcome::Cropped { contour, .. } = located.outcome {
            outline(&mut annotated, &contour);
        }

        let components = paint_components(labels, accepted, seed);
        debug!("Diagnostic panels built");

        Self {
            original: annotated,
            cropped: cropped.to_rgb8(),
            row_votes: located.rasters.rows.clone(),
            components,
        }
    }

    /// Lay the panels out left to right on a white canvas.
    pub fn compose(&self) -> RgbImage {
        let votes = DynamicImage::ImageLuma8(self.row_votes.clone()).to_rgb8();
        let panels = [&self.original, &self.cropped, &votes, &self.components];

        let width = panels.iter().map(|p| p.width()).sum::<u32>()
            + GUTTER * (panels.len() as u32 - 1);
        let height = panels.iter().map(|p| p.height()).max().unwrap_or(0);

        let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        let mut x = 0i64;
        for panel in panels {
            imageops::replace(&mut canvas, panel, x, 0);
            x += (panel.width() + GUTTER) as i64;
        }
        canvas
    }

    /// Write the composed panel to `path`; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MarginaliaError> {
        save_image(&DynamicImage::ImageRgb8(self.compose()), path)
    }
}

fn outline(image: &mut RgbImage, bbox: &BoundingBox) {
    for grow in 0..OUTLINE_WIDTH {
        let rect = Rect::at(bbox.x as i32 - grow, bbox.y as i32 - grow).of_size(
            bbox.width + 2 * grow as u32,
            bbox.height + 2 * grow as u32,
        );
        draw_hollow_rect_mut(image, rect, OUTLINE_COLOUR);
    }
}

fn paint_components(labels: &LabelMap, accepted: &[ComponentStats], seed: u64) -> RgbImage {
    let (width, height) = labels.dimensions();
    let mut canvas = RgbImage::new(width, height);
    let mut rng = seeded_rng(seed);

    for component in accepted {
        // Bright enough to read against the black background.
        let colour = Rgb([
            rng.random_range(64..=255u8),
            rng.random_range(64..=255u8),
            rng.random_range(64..=255u8),
        ]);
        let bbox = component.bbox;
        for y in bbox.y..bbox.y + bbox.height {
            for x in bbox.x..bbox.x + bbox.width {
                if labels.get_pixel(x, y).0[0] == component.label {
                    canvas.put_pixel(x, y, colour);
                }
            }
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::{CropLocator, VoteRasters};
    use crate::scan::segment::label_components;
    use image::Luma;

    fn two_blob_labels() -> (LabelMap, Vec<ComponentStats>) {
        let mut mask = GrayImage::new(50, 40);
        for y in 5..15 {
            for x in 5..15 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        for y in 20..30 {
            for x in 30..45 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        let labels = label_components(&mask);
        let stats = crate::scan::component_stats(&labels);
        (labels, stats)
    }

    #[test]
    fn component_colours_follow_the_seed() {
        let (labels, stats) = two_blob_labels();
        let a = paint_components(&labels, &stats, 42);
        let b = paint_components(&labels, &stats, 42);
        assert_eq!(a.as_raw(), b.as_raw());

        assert_eq!(a.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_ne!(a.get_pixel(10, 10), &Rgb([0, 0, 0]));
        assert_ne!(a.get_pixel(35, 25), &Rgb([0, 0, 0]));
    }

    #[test]
    fn composed_panel_holds_all_four() {
        let (labels, stats) = two_blob_labels();
        let original = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 40, Rgb([200, 200, 200])));
        let cropped = original.crop_imm(0, 10, 50, 30);
        let located = CropLocator::new(100).locate(VoteRasters::new(50, 40));

        let diagnostics = Diagnostics::new(&original, &cropped, &located, &labels, &stats, 1);
        let composed = diagnostics.compose();
        assert_eq!(composed.width(), 50 * 4 + GUTTER * 3);
        assert_eq!(composed.height(), 40);
        // Gutter after the first panel stays white.
        assert_eq!(composed.get_pixel(52, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn contour_is_outlined_on_the_original() {
        let mut img = RgbImage::new(40, 40);
        outline(&mut img, &BoundingBox::new(10, 10, 10, 10));
        assert_eq!(img.get_pixel(10, 10), &OUTLINE_COLOUR);
        assert_eq!(img.get_pixel(8, 8), &OUTLINE_COLOUR);
        assert_eq!(img.get_pixel(15, 15), &Rgb([0, 0, 0]));
    }

    #[test]
    fn save_writes_a_png() {
        let (labels, stats) = two_blob_labels();
        let original = DynamicImage::ImageRgb8(RgbImage::new(50, 40));
        let located = CropLocator::new(100).locate(VoteRasters::new(50, 40));
        let diagnostics = Diagnostics::new(&original, &original, &located, &labels, &stats, 3);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.png");
        diagnostics.save(&path).unwrap();
        assert!(path.exists());
    }
}
