// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Annotation extraction pipeline: segment the margins, classify candidate
// components, vote on their edges and crop at the winning line.

use std::path::Path;

use image::{DynamicImage, GrayImage};
use marginalia_core::error::MarginaliaError;
use marginalia_core::{ComponentStats, CropRegion, ExtractorConfig};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::classify::{ComponentClassifier, ComponentFilter, Patch, Verdict};
use crate::crop::{CropLocator, CropOutcome, VoteRasters};
use crate::diagnostics::Diagnostics;
use crate::raster::crop_to_region;
use crate::scan::{Segmentation, Segmenter, component_mask};

/// Everything one extraction produces.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The kept part of the original image (the whole image when no
    /// annotation line was found).
    pub crop: DynamicImage,
    /// Where `crop` lies in the original.
    pub region: CropRegion,
    pub outcome: CropOutcome,
    /// Binary margin mask the components were labelled from.
    pub mask: GrayImage,
    /// Number of labelled components before filtering.
    pub component_count: usize,
    /// Components that passed the size filter and were classified.
    pub candidates: Vec<ComponentStats>,
    /// Candidates classified as annotation-like.
    pub accepted: Vec<ComponentStats>,
    /// Diagnostic panels, present when `plot` is enabled.
    pub diagnostics: Option<Diagnostics>,
}

impl Extraction {
    /// Serializable digest for reports and logs.
    pub fn summary(&self) -> ExtractionSummary {
        ExtractionSummary {
            region: self.region,
            outcome: self.outcome,
            components: self.component_count,
            candidates: self.candidates.len(),
            accepted: self.accepted.len(),
        }
    }
}

/// Counts and decisions of one extraction, without the pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtractionSummary {
    pub region: CropRegion,
    pub outcome: CropOutcome,
    pub components: usize,
    pub candidates: usize,
    pub accepted: usize,
}

/// Extracts the annotation crop from manuscript scans.
///
/// Holds only its configuration and classifier; every intermediate buffer
/// lives for a single call, so one extractor can process any number of pages.
///
/// ```ignore
/// let config = ExtractorConfig::new(6);
/// let classifier = ModelClassifier::new(ModelConfig::new("classifier.rten"))?;
/// let extractor = ComponentExtractor::new(config, classifier)?;
/// let extraction = extractor.extract_path("page_0104.tif")?;
/// ```
pub struct ComponentExtractor<C> {
    config: ExtractorConfig,
    classifier: C,
}

impl<C: ComponentClassifier> ComponentExtractor<C> {
    /// Validate `config` and pair it with `classifier`.
    pub fn new(config: ExtractorConfig, classifier: C) -> Result<Self, MarginaliaError> {
        config.validate()?;
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Load the scan at `path` and extract from it.
    ///
    /// An unreadable path is returned as [`MarginaliaError::ImageError`].
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn extract_path(&self, path: impl AsRef<Path>) -> Result<Extraction, MarginaliaError> {
        let (image, segmentation) = Segmenter::from_config(&self.config).segment_path(path)?;
        self.extract_segmented(&image, segmentation)
    }

    /// Extract from an already-decoded scan.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn extract_image(&self, image: &DynamicImage) -> Result<Extraction, MarginaliaError> {
        let segmentation = Segmenter::from_config(&self.config).segment_image(image);
        self.extract_segmented(image, segmentation)
    }

    fn extract_segmented(
        &self,
        image: &DynamicImage,
        segmentation: Segmentation,
    ) -> Result<Extraction, MarginaliaError> {
        let Segmentation {
            mask,
            labels,
            components,
        } = segmentation;

        let filter = ComponentFilter::from_config(&self.config);
        let mut rasters = VoteRasters::new(mask.width(), mask.height());
        let mut candidates = Vec::new();
        let mut accepted = Vec::new();

        for component in filter.candidates(&components) {
            let patch = Patch::from_mask(&component_mask(&labels, component), self.config.patch_size);
            let probability = self.classifier.probability(&patch)?;
            let verdict = Verdict::from_probability(probability, self.config.decision_threshold);
            debug!(
                label = component.label,
                area = component.area,
                probability,
                ?verdict,
                "Component classified"
            );

            candidates.push(*component);
            if verdict == Verdict::Annotation {
                rasters.add_box(&component.bbox);
                accepted.push(*component);
            }
        }

        if self.config.verbose {
            info!(
                components = components.len(),
                candidates = candidates.len(),
                accepted = accepted.len(),
                "Components filtered"
            );
        }

        let located = CropLocator::new(self.config.required_votes())
            .with_verbose(self.config.verbose)
            .locate(rasters);
        let crop = crop_to_region(image, located.region);

        let diagnostics = self.config.plot.then(|| {
            Diagnostics::new(image, &crop, &located, &labels, &accepted, self.config.seed)
        });

        Ok(Extraction {
            crop,
            region: located.region,
            outcome: located.outcome,
            mask,
            component_count: components.len(),
            candidates,
            accepted,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};
    use marginalia_core::Axis;

    /// White 200x200 page with 12x12 ink squares in the top margin.
    fn page_with_top_marks(xs: &[u32]) -> DynamicImage {
        let mut page = RgbImage::from_pixel(200, 200, Rgb([255, 255, 255]));
        for &x0 in xs {
            for y in 5..17 {
                for x in x0..x0 + 12 {
                    page.put_pixel(x, y, Rgb([0, 0, 0]));
                }
            }
        }
        DynamicImage::ImageRgb8(page)
    }

    fn annotation_everywhere(_: &Patch) -> f32 {
        0.0
    }

    fn test_config(num_chars: u32) -> ExtractorConfig {
        ExtractorConfig {
            plot: false,
            ..ExtractorConfig::new(num_chars)
        }
    }

    #[test]
    fn aligned_marks_crop_rows() {
        let page = page_with_top_marks(&[20, 60, 120, 160]);
        let extractor = ComponentExtractor::new(test_config(2), annotation_everywhere).unwrap();
        let extraction = extractor.extract_image(&page).unwrap();

        assert_eq!(extraction.candidates.len(), 4);
        assert_eq!(extraction.accepted.len(), 4);

        let CropOutcome::Cropped { axis, votes, cut, .. } = extraction.outcome else {
            panic!("expected a crop, got {:?}", extraction.outcome);
        };
        assert_eq!(axis, Axis::Rows);
        assert_eq!(votes, 8);
        // The marks end at row 16; the cut lands just below them and the
        // page body below is kept.
        assert!((16..=18).contains(&cut), "cut at {cut}");
        assert_eq!(extraction.region.y, cut);
        assert_eq!(extraction.crop.height(), 200 - cut);
        assert_eq!(extraction.crop.width(), 200);
    }

    #[test]
    fn too_few_marks_return_the_page_unchanged() {
        let page = page_with_top_marks(&[20]);
        let extractor = ComponentExtractor::new(test_config(2), annotation_everywhere).unwrap();
        let extraction = extractor.extract_image(&page).unwrap();

        assert!(matches!(extraction.outcome, CropOutcome::NoAnnotation { .. }));
        assert!(extraction.region.is_full(200, 200));
        assert_eq!(extraction.crop.to_rgb8().as_raw(), page.to_rgb8().as_raw());
    }

    #[test]
    fn components_classified_as_text_do_not_vote() {
        let page = page_with_top_marks(&[20, 60, 120, 160]);
        let always_text = |_: &Patch| 0.97f32;
        let extractor = ComponentExtractor::new(test_config(2), always_text).unwrap();
        let extraction = extractor.extract_image(&page).unwrap();

        assert_eq!(extraction.candidates.len(), 4);
        assert!(extraction.accepted.is_empty());
        assert!(!extraction.outcome.is_cropped());
    }

    #[test]
    fn classifier_sees_normalised_square_patches() {
        let page = page_with_top_marks(&[20, 60]);
        let check = |patch: &Patch| {
            assert_eq!(patch.size(), 30);
            assert!(patch.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
            assert!(patch.fill_ratio() > 0.9);
            0.0f32
        };
        let extractor = ComponentExtractor::new(test_config(1), check).unwrap();
        let extraction = extractor.extract_image(&page).unwrap();
        assert_eq!(extraction.candidates.len(), 2);
    }

    #[test]
    fn classifier_errors_abort_the_call() {
        struct Broken;
        impl ComponentClassifier for Broken {
            fn probability(&self, _: &Patch) -> Result<f32, MarginaliaError> {
                Err(MarginaliaError::ClassifierError("model offline".into()))
            }
        }

        let page = page_with_top_marks(&[20, 60]);
        let extractor = ComponentExtractor::new(test_config(1), Broken).unwrap();
        assert!(matches!(
            extractor.extract_image(&page),
            Err(MarginaliaError::ClassifierError(_))
        ));
    }

    #[test]
    fn extraction_is_repeatable() {
        let page = page_with_top_marks(&[20, 60, 120, 160]);
        let config = ExtractorConfig {
            plot: true,
            ..ExtractorConfig::new(2)
        };
        let extractor = ComponentExtractor::new(config, annotation_everywhere).unwrap();

        let a = extractor.extract_image(&page).unwrap();
        let b = extractor.extract_image(&page).unwrap();
        assert_eq!(a.mask.as_raw(), b.mask.as_raw());
        assert_eq!(a.region, b.region);
        assert_eq!(a.outcome, b.outcome);

        let da = a.diagnostics.expect("plot enabled");
        let db = b.diagnostics.expect("plot enabled");
        assert_eq!(da.compose().as_raw(), db.compose().as_raw());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = ComponentExtractor::new(ExtractorConfig::new(0), annotation_everywhere);
        assert!(matches!(result, Err(MarginaliaError::InvalidConfig(_))));
    }

    #[test]
    fn centre_marks_are_ignored() {
        let mut page = GrayImage::from_pixel(200, 200, Luma([255]));
        for x0 in [60u32, 90, 120] {
            for y in 95..107 {
                for x in x0..x0 + 12 {
                    page.put_pixel(x, y, Luma([0]));
                }
            }
        }
        let extractor = ComponentExtractor::new(test_config(1), annotation_everywhere).unwrap();
        let extraction = extractor.extract_image(&DynamicImage::ImageLuma8(page)).unwrap();
        assert_eq!(extraction.component_count, 0);
        assert!(!extraction.outcome.is_cropped());
    }

    #[test]
    fn summary_reports_counts() {
        let page = page_with_top_marks(&[20, 60, 120, 160]);
        let extractor = ComponentExtractor::new(test_config(2), annotation_everywhere).unwrap();
        let summary = extractor.extract_image(&page).unwrap().summary();
        assert_eq!(summary.components, 4);
        assert_eq!(summary.candidates, 4);
        assert_eq!(summary.accepted, 4);
        assert!(summary.outcome.is_cropped());
    }
}
