// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry checker — absolute size, then aspect ratio, of the original image.

use cardgate_core::{Dimensions, ValidationFailureKind, ValidationThresholds};
use tracing::debug;

/// Reject images below the minimum size or with extreme proportions.
pub fn check_geometry(
    dims: Dimensions,
    thresholds: &ValidationThresholds,
) -> Result<(), ValidationFailureKind> {
    if dims.shorter_side() < thresholds.min_dimension {
        debug!(%dims, min = thresholds.min_dimension, "Image below minimum dimension");
        return Err(ValidationFailureKind::TooSmall);
    }

    let ratio = dims.aspect_ratio();
    if ratio < thresholds.min_aspect_ratio || ratio > thresholds.max_aspect_ratio {
        debug!(%dims, ratio, "Aspect ratio out of bounds");
        return Err(ValidationFailureKind::BadAspectRatio);
    }

    Ok(())
}
