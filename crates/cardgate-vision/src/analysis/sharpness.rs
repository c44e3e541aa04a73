// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sharpness analyzer — variance of the 4-neighbour Laplacian response.

use cardgate_core::{ValidationFailureKind, ValidationThresholds};
use tracing::debug;

use crate::image::buffer::GrayscaleBuffer;

/// Variance of the `[[0,-1,0],[-1,4,-1],[0,-1,0]]` response over interior
/// pixels. `None` when the buffer is smaller than 3x3.
pub fn laplacian_variance(gray: &GrayscaleBuffer) -> Option<f64> {
    if !gray.has_interior() {
        return None;
    }

    let width = gray.width() as usize;
    let height = gray.height() as usize;
    let samples = gray.samples();

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for y in 1..height - 1 {
        let row = y * width;
        for x in 1..width - 1 {
            let idx = row + x;
            let centre = samples[idx];
            let response = ((centre - samples[idx - width]) as f64)
                + ((centre - samples[idx + width]) as f64)
                + ((centre - samples[idx - 1]) as f64)
                + ((centre - samples[idx + 1]) as f64);
            sum += response;
            sum_sq += response * response;
        }
    }

    let n = gray.interior_pixel_count() as f64;
    let mean = sum / n;
    let variance = (sum_sq / n - mean * mean).max(0.0);
    debug!(variance, "Laplacian variance");
    Some(variance)
}

pub fn check_sharpness(
    variance: f64,
    thresholds: &ValidationThresholds,
) -> Result<(), ValidationFailureKind> {
    if variance < thresholds.sharpness_floor {
        debug!(variance, floor = thresholds.sharpness_floor, "Image too blurry");
        return Err(ValidationFailureKind::TooBlurry);
    }
    Ok(())
}
