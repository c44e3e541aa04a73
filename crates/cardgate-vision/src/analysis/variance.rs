// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Variance analyzer — rejects blank and flat photos.

use cardgate_core::{ValidationFailureKind, ValidationThresholds};
use serde::Serialize;
use tracing::debug;

use crate::image::buffer::PixelBuffer;

/// Population variance of each colour channel, on the 8-bit scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ChannelVariance {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl ChannelVariance {
    /// Sum of the three channel variances.
    pub fn total(&self) -> f64 {
        self.red + self.green + self.blue
    }
}

/// Running sum and sum of squares of one channel.
///
/// `u64` holds 255² × 4 billion pixels before overflowing, far past any
/// working copy.
#[derive(Default)]
struct Moments {
    sum: u64,
    sum_sq: u64,
}

impl Moments {
    #[inline]
    fn push(&mut self, value: u8) {
        let v = value as u64;
        self.sum += v;
        self.sum_sq += v * v;
    }

    /// `E[x²] − E[x]²`, clamped at zero against rounding.
    fn variance(&self, count: u64) -> f64 {
        let n = count as f64;
        let mean = self.sum as f64 / n;
        let mean_sq = self.sum_sq as f64 / n;
        (mean_sq - mean * mean).max(0.0)
    }
}

/// Per-channel variance over every pixel of `buffer`, in one pass.
/// An empty buffer has zero variance.
pub fn channel_variance(buffer: &PixelBuffer) -> ChannelVariance {
    let mut red = Moments::default();
    let mut green = Moments::default();
    let mut blue = Moments::default();
    let mut count = 0u64;

    for [r, g, b] in buffer.rgb() {
        red.push(r);
        green.push(g);
        blue.push(b);
        count += 1;
    }

    if count == 0 {
        return ChannelVariance::default();
    }

    ChannelVariance {
        red: red.variance(count),
        green: green.variance(count),
        blue: blue.variance(count),
    }
}

pub fn check_variance(
    total_variance: f64,
    thresholds: &ValidationThresholds,
) -> Result<(), ValidationFailureKind> {
    if total_variance < thresholds.variance_floor {
        debug!(total_variance, floor = thresholds.variance_floor, "Image too flat");
        return Err(ValidationFailureKind::LowContrast);
    }
    Ok(())
}
