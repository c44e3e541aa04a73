// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Downsampler — bounded-size working copy so the analyzers cost roughly the
// same whatever the camera resolution.

use std::borrow::Cow;

use cardgate_core::Dimensions;
use image::imageops::{self, FilterType};
use tracing::{debug, instrument};

use super::buffer::PixelBuffer;

/// Size of the working copy for an image of `dims` when the longer side is
/// capped at `max_side`. Aspect ratio is preserved (shorter side rounded
/// down, never below 1) and nothing is ever enlarged.
pub fn working_dimensions(dims: Dimensions, max_side: u32) -> Dimensions {
    let max_side = max_side.max(1);
    if dims.longer_side() <= max_side {
        return dims;
    }

    // Integer arithmetic so the longer side lands exactly on `max_side`.
    let scale_down = |side: u32, longer: u32| -> u32 {
        let scaled = side as u64 * max_side as u64 / longer as u64;
        (scaled as u32).max(1)
    };

    if dims.width >= dims.height {
        Dimensions::new(max_side, scale_down(dims.height, dims.width))
    } else {
        Dimensions::new(scale_down(dims.width, dims.height), max_side)
    }
}

/// Nearest-neighbour downsample of `buffer` so that its longer side is at
/// most `max_side`. Returns the input unchanged (borrowed) when it already
/// fits; the input is never modified.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn downsample(buffer: &PixelBuffer, max_side: u32) -> Cow<'_, PixelBuffer> {
    let target = working_dimensions(buffer.dimensions(), max_side);
    if target == buffer.dimensions() {
        return Cow::Borrowed(buffer);
    }

    let resized = imageops::resize(
        buffer.as_rgba_image(),
        target.width,
        target.height,
        FilterType::Nearest,
    );
    debug!(
        new_w = resized.width(),
        new_h = resized.height(),
        "Working copy created"
    );
    Cow::Owned(PixelBuffer::from_image(resized))
}
