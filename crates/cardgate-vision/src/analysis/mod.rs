// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Analyzers — geometry, channel variance, Laplacian sharpness, and the Sobel
// edge/shape heuristic. Each check is a pure function of its buffer and the
// thresholds and reports failure as `Err(ValidationFailureKind)`.

pub mod edges;
pub mod geometry;
pub mod sharpness;
pub mod variance;

pub use edges::{EdgeField, ShapeAnalysis, analyze_shape, check_shape};
pub use geometry::check_geometry;
pub use sharpness::{check_sharpness, laplacian_variance};
pub use variance::{ChannelVariance, channel_variance, check_variance};
