// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cardgate-vision — Image quality and card-presence validation.
//
// Provides pixel buffers and decoding (bytes, data URLs), a bounded-size
// downsampler, the four analyzers (geometry, channel variance, Laplacian
// sharpness, Sobel edge/shape heuristic), and the orchestrator that runs
// them in a fixed order and returns a single verdict.

pub mod analysis;
pub mod image;
pub mod runtime;
pub mod validator;

// Re-export the primary structs so callers can use `cardgate_vision::CardValidator` etc.
pub use crate::image::buffer::{GrayscaleBuffer, PixelBuffer};
pub use analysis::edges::{EdgeField, ShapeAnalysis};
pub use runtime::{validate_bytes_async, validate_many_async};
pub use validator::{CardValidator, Check, ValidationReport, validate_card_image};

pub use cardgate_core::{
    CardgateError, Dimensions, ValidationFailureKind, ValidationOutcome, ValidationThresholds,
};
