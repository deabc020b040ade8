// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge-line vote rasters. Every annotation-like component draws its bounding
// box edges into two binary accumulators; the row or column crossed by the
// most edges marks the line the annotation characters are aligned on.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_line_segment_mut;
use marginalia_core::{Axis, BoundingBox};

use crate::scan::FOREGROUND;

/// How to choose between equally supported lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// The lowest row or column index wins.
    #[default]
    FirstIndex,
    /// The highest row or column index wins.
    LastIndex,
}

/// The best-supported line on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteLine {
    /// Row index (for [`Axis::Rows`]) or column index (for [`Axis::Columns`]).
    pub index: u32,
    /// Number of edge pixels on that line.
    pub votes: u32,
}

/// The pair of binary accumulators.
#[derive(Debug, Clone)]
pub struct VoteRasters {
    /// Horizontal edges (top and bottom of each box). Summed per column.
    pub cols: GrayImage,
    /// Vertical edges (left and right of each box). Summed per row.
    pub rows: GrayImage,
}

impl VoteRasters {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cols: GrayImage::new(width, height),
            rows: GrayImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.cols.width()
    }

    pub fn height(&self) -> u32 {
        self.cols.height()
    }

    /// Draw the edges of `bbox` as 1-px lines.
    ///
    /// Edges sit at `x`, `x + width`, `y` and `y + height`, one pixel past the
    /// last component pixel on the far sides. Pixels outside the raster are
    /// clipped.
    pub fn add_box(&mut self, bbox: &BoundingBox) {
        let x0 = bbox.x as f32;
        let y0 = bbox.y as f32;
        let x1 = (bbox.x + bbox.width) as f32;
        let y1 = (bbox.y + bbox.height) as f32;
        let ink = Luma([FOREGROUND]);

        draw_line_segment_mut(&mut self.cols, (x0, y0), (x1, y0), ink);
        draw_line_segment_mut(&mut self.cols, (x0, y1), (x1, y1), ink);

        draw_line_segment_mut(&mut self.rows, (x0, y0), (x0, y1), ink);
        draw_line_segment_mut(&mut self.rows, (x1, y0), (x1, y1), ink);
    }

    /// Edge pixels per column of the horizontal-edge raster.
    pub fn column_votes(&self) -> Vec<u32> {
        let (width, height) = self.cols.dimensions();
        (0..width)
            .map(|x| {
                (0..height)
                    .map(|y| self.cols.get_pixel(x, y).0[0] as u32)
                    .sum::<u32>()
                    / FOREGROUND as u32
            })
            .collect()
    }

    /// Edge pixels per row of the vertical-edge raster.
    pub fn row_votes(&self) -> Vec<u32> {
        let (width, height) = self.rows.dimensions();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| self.rows.get_pixel(x, y).0[0] as u32)
                    .sum::<u32>()
                    / FOREGROUND as u32
            })
            .collect()
    }

    /// Best line of `axis` under `tie_break`.
    pub fn best_line(&self, axis: Axis, tie_break: TieBreak) -> Option<VoteLine> {
        let votes = match axis {
            Axis::Rows => self.row_votes(),
            Axis::Columns => self.column_votes(),
        };
        best_line(&votes, tie_break)
    }

    /// Raster whose votes select lines on `axis`.
    pub fn raster(&self, axis: Axis) -> &GrayImage {
        match axis {
            Axis::Rows => &self.rows,
            Axis::Columns => &self.cols,
        }
    }

    /// Draw a full-length line at `index` on the raster of `axis`: a
    /// horizontal line across `rows` or a vertical line down `cols`.
    pub fn draw_line(&mut self, axis: Axis, index: u32) {
        let ink = Luma([FOREGROUND]);
        match axis {
            Axis::Rows => {
                let far = self.rows.width().saturating_sub(1) as f32;
                let y = index as f32;
                draw_line_segment_mut(&mut self.rows, (0.0, y), (far, y), ink);
            }
            Axis::Columns => {
                let far = self.cols.height().saturating_sub(1) as f32;
                let x = index as f32;
                draw_line_segment_mut(&mut self.cols, (x, 0.0), (x, far), ink);
            }
        }
    }
}

/// Index and count of the maximum of `votes`, `None` when empty.
pub fn best_line(votes: &[u32], tie_break: TieBreak) -> Option<VoteLine> {
    let mut best: Option<VoteLine> = None;
    for (index, &count) in votes.iter().enumerate() {
        let better = match best {
            None => true,
            Some(current) => match tie_break {
                TieBreak::FirstIndex => count > current.votes,
                TieBreak::LastIndex => count >= current.votes,
            },
        };
        if better {
            best = Some(VoteLine {
                index: index as u32,
                votes: count,
            });
        }
    }
    best
}
