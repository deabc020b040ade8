// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Marginalia.

use thiserror::Error;

/// Top-level error type for all Marginalia operations.
#[derive(Debug, Error)]
pub enum MarginaliaError {
    // -- Input errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Classification errors --
    #[error("component classification failed: {0}")]
    ClassifierError(String),

    #[error("classifier model unavailable: {0}")]
    ModelError(String),

    // -- Persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MarginaliaError>;
