// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop locator: turns the vote rasters into a cut line and a crop region.

use imageproc::contours::{BorderType, Contour, find_contours};
use imageproc::geometry::contour_area;
use marginalia_core::{Axis, BoundingBox, CropRegion};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::votes::{TieBreak, VoteLine, VoteRasters};

/// Result of locating the annotation line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CropOutcome {
    /// A line gathered enough votes and the image was cut.
    Cropped {
        /// Axis of the winning line and of the cut.
        axis: Axis,
        /// Row or column index of the winning line.
        line: u32,
        /// Edge pixels on the winning line.
        votes: u32,
        /// Bounding box of the largest outer contour in the chosen raster.
        contour: BoundingBox,
        /// Row or column at which the image was split.
        cut: u32,
    },
    /// No line reached the required vote count; the image is kept whole.
    NoAnnotation {
        row_votes: u32,
        column_votes: u32,
        required: u32,
    },
}

impl CropOutcome {
    pub fn is_cropped(&self) -> bool {
        matches!(self, CropOutcome::Cropped { .. })
    }
}

/// The locator's decision together with the rasters it drew on.
#[derive(Debug, Clone)]
pub struct Located {
    pub outcome: CropOutcome,
    /// Region of the original image to keep.
    pub region: CropRegion,
    /// Input rasters with the winning line drawn in.
    pub rasters: VoteRasters,
}

/// Chooses the cut line from accumulated edge votes.
#[derive(Debug, Clone, Copy)]
pub struct CropLocator {
    required_votes: u32,
    tie_break: TieBreak,
    verbose: bool,
}

impl CropLocator {
    /// `required_votes` is normally `2 * num_chars`: each character's box
    /// puts two parallel edges across the annotation line.
    pub fn new(required_votes: u32) -> Self {
        Self {
            required_votes,
            tie_break: TieBreak::default(),
            verbose: false,
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Pick the best row or column, find the contour it belongs to and split
    /// the image at the contour edge nearest the page centre, keeping the
    /// larger side.
    ///
    /// The row axis wins only with strictly more votes than the column axis.
    #[instrument(skip_all, fields(width = rasters.width(), height = rasters.height()))]
    pub fn locate(&self, mut rasters: VoteRasters) -> Located {
        let (width, height) = (rasters.width(), rasters.height());
        let full = CropRegion::full(width, height);

        let zero = VoteLine { index: 0, votes: 0 };
        let row = rasters.best_line(Axis::Rows, self.tie_break).unwrap_or(zero);
        let col = rasters.best_line(Axis::Columns, self.tie_break).unwrap_or(zero);
        debug!(
            row_line = row.index,
            row_votes = row.votes,
            column_line = col.index,
            column_votes = col.votes,
            "Best vote lines"
        );

        let no_annotation = CropOutcome::NoAnnotation {
            row_votes: row.votes,
            column_votes: col.votes,
            required: self.required_votes,
        };

        if row.votes.max(col.votes) < self.required_votes {
            if self.verbose {
                info!(required = self.required_votes, "No annotation found");
            } else {
                debug!(required = self.required_votes, "No annotation found");
            }
            return Located {
                outcome: no_annotation,
                region: full,
                rasters,
            };
        }

        let (axis, winner, dim) = if row.votes > col.votes {
            (Axis::Rows, row, height)
        } else {
            (Axis::Columns, col, width)
        };

        // Both best lines go in, each on its own raster; only the winning
        // axis is searched for contours.
        rasters.draw_line(Axis::Rows, row.index);
        rasters.draw_line(Axis::Columns, col.index);

        let contours = find_contours::<i32>(rasters.raster(axis));
        let Some(contour) = largest_outer_contour(&contours) else {
            debug!(%axis, "No contour around the winning line");
            return Located {
                outcome: no_annotation,
                region: full,
                rasters,
            };
        };
        let bounds = contour_bounds(contour);

        let (start, extent) = bounds.span(axis);
        let cut = nearest_to_centre([start, start + extent], dim);
        let region = if (dim as f64 / 2.0) > cut as f64 {
            CropRegion::along(axis, cut, dim, width, height)
        } else {
            CropRegion::along(axis, 0, cut, width, height)
        };

        info!(
            %axis,
            line = winner.index,
            votes = winner.votes,
            cut,
            kept_x = region.x,
            kept_y = region.y,
            kept_width = region.width,
            kept_height = region.height,
            "Annotation line located"
        );

        Located {
            outcome: CropOutcome::Cropped {
                axis,
                line: winner.index,
                votes: winner.votes,
                contour: bounds,
                cut,
            },
            region,
            rasters,
        }
    }
}

/// Candidate closest to `dim / 2`; the first one wins a tie.
fn nearest_to_centre(candidates: [u32; 2], dim: u32) -> u32 {
    let centre = dim as f64 / 2.0;
    let distance = |c: u32| (c as f64 - centre).abs();
    if distance(candidates[1]) < distance(candidates[0]) {
        candidates[1]
    } else {
        candidates[0]
    }
}

/// Largest top-level outer contour by enclosed area. Contours traced around
/// 1-px lines enclose no area, so equal areas fall back to the longer
/// boundary, then to the first contour found.
fn largest_outer_contour(contours: &[Contour<i32>]) -> Option<&Contour<i32>> {
    let mut best: Option<(&Contour<i32>, f64, usize)> = None;
    for contour in contours.iter().filter(|c| {
        c.border_type == BorderType::Outer && c.parent.is_none() && !c.points.is_empty()
    }) {
        let area = contour_area(&contour.points);
        let length = contour.points.len();
        let better = match best {
            None => true,
            Some((_, best_area, best_length)) => {
                area > best_area || (area == best_area && length > best_length)
            }
        };
        if better {
            best = Some((contour, area, length));
        }
    }
    best.map(|(contour, _, _)| contour)
}

/// Inclusive bounding box of a contour's points.
fn contour_bounds(contour: &Contour<i32>) -> BoundingBox {
    let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
    let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
    for p in &contour.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    BoundingBox::from_corners(
        min_x.max(0) as u32,
        min_y.max(0) as u32,
        max_x.max(0) as u32,
        max_y.max(0) as u32,
    )
}
