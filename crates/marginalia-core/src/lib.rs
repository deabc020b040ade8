// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Marginalia: core types, configuration and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod seed;
pub mod types;

pub use config::{ExtractorConfig, SauvolaParams};
pub use error::{MarginaliaError, Result};
pub use seed::{seeded_rng, DEFAULT_SEED};
pub use types::*;
