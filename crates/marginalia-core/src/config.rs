// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MarginaliaError, Result};
use crate::seed::DEFAULT_SEED;

/// Parameters of the Sauvola local threshold
/// `T = m * (1 + k * (s / r - 1))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SauvolaParams {
    /// Side of the square neighbourhood in pixels (odd).
    pub window_size: u32,
    /// Weight of the local standard deviation.
    pub k: f64,
    /// Dynamic range of the standard deviation (half the 8-bit range).
    pub r: f64,
}

impl Default for SauvolaParams {
    fn default() -> Self {
        Self {
            window_size: 15,
            k: 0.2,
            r: 127.5,
        }
    }
}

/// Settings for one annotation extractor.
///
/// Only `num_chars` has no sensible default; use [`ExtractorConfig::new`] to
/// set it and keep the tuned defaults for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Expected number of characters on the annotation line.
    pub num_chars: u32,
    /// Components must have strictly more pixels than this.
    pub min_area: u32,
    /// Components must have strictly fewer pixels than this.
    pub max_area: u32,
    /// Shorter bounding-box side must be strictly greater than this.
    pub min_dim: u32,
    /// Longer bounding-box side must not exceed this.
    pub max_dim: u32,
    /// Fraction of each axis kept as margin; the centre is suppressed.
    pub margin_ratio: f64,
    /// Side of the square patch handed to the classifier.
    pub patch_size: u32,
    /// Probabilities above this mark a component as text/noise.
    pub decision_threshold: f32,
    /// Local threshold parameters.
    pub sauvola: SauvolaParams,
    /// Report "no annotation found" and per-step summaries at info level.
    pub verbose: bool,
    /// Accumulate the diagnostic panels.
    pub plot: bool,
    /// Seed for every RNG used during extraction.
    pub seed: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            num_chars: 1,
            min_area: 100,
            max_area: 5000,
            min_dim: 10,
            max_dim: 100,
            margin_ratio: 0.15,
            patch_size: 30,
            decision_threshold: 0.5,
            sauvola: SauvolaParams::default(),
            verbose: false,
            plot: true,
            seed: DEFAULT_SEED,
        }
    }
}

impl ExtractorConfig {
    /// Default configuration expecting `num_chars` characters per annotation.
    pub fn new(num_chars: u32) -> Self {
        Self {
            num_chars,
            ..Self::default()
        }
    }

    /// Minimum vote count a line needs before a crop is made. Each bounding
    /// box contributes two parallel edges per axis.
    pub fn required_votes(&self) -> u32 {
        self.num_chars * 2
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.num_chars == 0 {
            return Err(MarginaliaError::InvalidConfig(
                "num_chars must be at least 1".into(),
            ));
        }
        if self.min_area >= self.max_area {
            return Err(MarginaliaError::InvalidConfig(format!(
                "min_area ({}) must be below max_area ({})",
                self.min_area, self.max_area
            )));
        }
        if self.max_dim <= self.min_dim {
            return Err(MarginaliaError::InvalidConfig(format!(
                "max_dim ({}) must be above min_dim ({})",
                self.max_dim, self.min_dim
            )));
        }
        if !(self.margin_ratio > 0.0 && self.margin_ratio < 0.5) {
            return Err(MarginaliaError::InvalidConfig(format!(
                "margin_ratio must lie in (0, 0.5), got {}",
                self.margin_ratio
            )));
        }
        if self.patch_size == 0 {
            return Err(MarginaliaError::InvalidConfig(
                "patch_size must be non-zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.decision_threshold) {
            return Err(MarginaliaError::InvalidConfig(format!(
                "decision_threshold must lie in [0, 1], got {}",
                self.decision_threshold
            )));
        }
        if self.sauvola.window_size == 0 || self.sauvola.window_size % 2 == 0 {
            return Err(MarginaliaError::InvalidConfig(format!(
                "sauvola window_size must be odd, got {}",
                self.sauvola.window_size
            )));
        }
        if self.sauvola.r <= 0.0 {
            return Err(MarginaliaError::InvalidConfig(format!(
                "sauvola r must be positive, got {}",
                self.sauvola.r
            )));
        }
        Ok(())
    }

    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ExtractorConfig::new(4);
        assert!(config.validate().is_ok());
        assert_eq!(config.required_votes(), 8);
        assert_eq!(config.min_area, 100);
        assert_eq!(config.max_area, 5000);
        assert_eq!(config.min_dim, 10);
        assert_eq!(config.max_dim, 100);
        assert_eq!(config.patch_size, 30);
        assert_eq!(config.seed, DEFAULT_SEED);
    }

    #[test]
    fn zero_chars_rejected() {
        let config = ExtractorConfig::new(0);
        assert!(matches!(
            config.validate(),
            Err(MarginaliaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn inverted_area_bounds_rejected() {
        let config = ExtractorConfig {
            min_area: 500,
            max_area: 500,
            ..ExtractorConfig::new(2)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn even_window_rejected() {
        let mut config = ExtractorConfig::new(2);
        config.sauvola.window_size = 14;
        assert!(config.validate().is_err());
    }

    #[test]
    fn margin_ratio_out_of_range_rejected() {
        let config = ExtractorConfig {
            margin_ratio: 0.5,
            ..ExtractorConfig::new(2)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extractor.json");

        let config = ExtractorConfig {
            min_area: 50,
            verbose: true,
            seed: 7,
            ..ExtractorConfig::new(3)
        };
        config.to_json_file(&path).unwrap();

        let loaded = ExtractorConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_json_takes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "num_chars": 5, "plot": false }"#).unwrap();

        let loaded = ExtractorConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded.num_chars, 5);
        assert!(!loaded.plot);
        assert_eq!(loaded.max_area, 5000);
        assert_eq!(loaded.sauvola, SauvolaParams::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = ExtractorConfig::from_json_file("/nonexistent/marginalia.json");
        assert!(matches!(result, Err(MarginaliaError::Io(_))));
    }
}
