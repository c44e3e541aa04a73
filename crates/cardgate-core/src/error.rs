// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Cardgate.
//
// Validation verdicts are not errors: a blurry photo is a `ValidationOutcome`,
// not a `CardgateError`. This enum covers the faults around the engine.

use thiserror::Error;

/// Top-level error type for all Cardgate operations.
#[derive(Debug, Error)]
pub enum CardgateError {
    // -- Input errors --
    #[error("image decoding failed: {0}")]
    Decode(String),

    #[error("malformed data URL: {0}")]
    DataUrl(String),

    // -- Configuration --
    #[error("invalid validation thresholds: {0}")]
    InvalidThresholds(String),

    // -- Runtime --
    #[error("validation timed out after {0} ms")]
    Timeout(u64),

    #[error("validation worker failed: {0}")]
    Worker(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CardgateError>;
