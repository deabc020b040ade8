// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster helpers: loading, cropping, patch resizing and saving of in-memory
// images using the `image` crate.

pub mod ops;

pub use ops::{crop_to_region, open_scan, resize_nearest, save_image};
