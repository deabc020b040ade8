// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for annotation extraction.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates.
///
/// `width` and `height` count pixels, so a single pixel at (3, 4) has the box
/// `{ x: 3, y: 4, width: 1, height: 1 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box spanning the inclusive corner coordinates.
    pub fn from_corners(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }

    /// Shorter side in pixels.
    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }

    /// Longer side in pixels.
    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Start coordinate and extent along `axis`.
    pub fn span(&self, axis: Axis) -> (u32, u32) {
        match axis {
            Axis::Rows => (self.y, self.height),
            Axis::Columns => (self.x, self.width),
        }
    }
}

/// One row of the connected-component statistics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStats {
    /// Label in the label map (never 0, which is background).
    pub label: u32,
    /// Bounding box of the component's pixels.
    pub bbox: BoundingBox,
    /// Number of foreground pixels carrying this label.
    pub area: u32,
}

/// The axis a vote line lies on, which is also the axis the image is cut
/// along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// A horizontal line at some row; the image is cut between rows.
    Rows,
    /// A vertical line at some column; the image is cut between columns.
    Columns,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Rows => f.write_str("rows"),
            Axis::Columns => f.write_str("columns"),
        }
    }
}

/// Rectangular region of the original image kept by the crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Region covering an entire `width` x `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Region keeping `[start, end)` along `axis` and everything on the other
    /// axis.
    pub fn along(axis: Axis, start: u32, end: u32, width: u32, height: u32) -> Self {
        match axis {
            Axis::Rows => Self {
                x: 0,
                y: start,
                width,
                height: end - start,
            },
            Axis::Columns => Self {
                x: start,
                y: 0,
                width: end - start,
                height,
            },
        }
    }

    /// Whether this region covers the whole `width` x `height` image.
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        *self == Self::full(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_from_corners_is_inclusive() {
        let bbox = BoundingBox::from_corners(3, 4, 3, 4);
        assert_eq!(bbox, BoundingBox::new(3, 4, 1, 1));

        let bbox = BoundingBox::from_corners(10, 20, 24, 29);
        assert_eq!(bbox.width, 15);
        assert_eq!(bbox.height, 10);
        assert_eq!(bbox.min_side(), 10);
        assert_eq!(bbox.max_side(), 15);
    }

    #[test]
    fn bounding_box_span_per_axis() {
        let bbox = BoundingBox::new(5, 7, 11, 13);
        assert_eq!(bbox.span(Axis::Rows), (7, 13));
        assert_eq!(bbox.span(Axis::Columns), (5, 11));
    }

    #[test]
    fn crop_region_along_axis() {
        let rows = CropRegion::along(Axis::Rows, 18, 200, 300, 200);
        assert_eq!(rows, CropRegion { x: 0, y: 18, width: 300, height: 182 });

        let cols = CropRegion::along(Axis::Columns, 0, 120, 300, 200);
        assert_eq!(cols, CropRegion { x: 0, y: 0, width: 120, height: 200 });
        assert!(!cols.is_full(300, 200));
        assert!(CropRegion::full(300, 200).is_full(300, 200));
    }

    #[test]
    fn component_stats_serialization() {
        let stats = ComponentStats {
            label: 3,
            bbox: BoundingBox::new(1, 2, 15, 15),
            area: 225,
        };
        let json = serde_json::to_string(&stats).unwrap();
        let back: ComponentStats = serde_json::from_str(&json).unwrap();
        assert_eq!(stats, back);
    }
}
