// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Size filter applied to components before classification.

use marginalia_core::{ComponentStats, ExtractorConfig};

/// Area and bounding-box bounds a component must satisfy to be classified.
///
/// `min_area < area < max_area`, `min(width, height) > min_dim` and
/// `max(width, height) <= max_dim`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentFilter {
    pub min_area: u32,
    pub max_area: u32,
    pub min_dim: u32,
    pub max_dim: u32,
}

impl ComponentFilter {
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            min_area: config.min_area,
            max_area: config.max_area,
            min_dim: config.min_dim,
            max_dim: config.max_dim,
        }
    }

    pub fn admits(&self, component: &ComponentStats) -> bool {
        component.area > self.min_area
            && component.area < self.max_area
            && component.bbox.min_side() > self.min_dim
            && component.bbox.max_side() <= self.max_dim
    }

    /// Components of `components` that pass the filter, in input order.
    pub fn candidates<'a>(
        &'a self,
        components: &'a [ComponentStats],
    ) -> impl Iterator<Item = &'a ComponentStats> + 'a {
        components.iter().filter(move |c| self.admits(c))
    }
}
