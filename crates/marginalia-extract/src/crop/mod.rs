// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop inference: edge-line voting and contour-based cut selection.

pub mod locator;
pub mod votes;

pub use locator::{CropLocator, CropOutcome, Located};
pub use votes::{TieBreak, VoteLine, VoteRasters, best_line};
