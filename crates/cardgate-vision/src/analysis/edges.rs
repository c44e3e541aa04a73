// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge/shape analyzer — decides whether the frame holds a centred,
// rectangular subject without extracting contours.
//
// ## Pipeline
//
// 1. Sobel gradient magnitude at every interior pixel
// 2. Adaptive threshold: the magnitude at the `edge_percentile` position of
//    the descending order, scaled by `edge_threshold_scale`
// 3. Strong-edge ratio over interior pixels
// 4. Split strong edges into horizontally- and vertically-dominant by
//    comparing local luminance differences with `dominance_margin`
// 5. Both axes must exceed `min_axis_share` of the strong edges
// 6. The central square must have luminance variance above
//    `center_variance_floor`
//
// The ratio bounds reject near-blank frames (low) and texture noise (high);
// the axis split looks for the straight borders of a card.

use cardgate_core::{ValidationFailureKind, ValidationThresholds};
use serde::Serialize;
use tracing::debug;

use crate::image::buffer::GrayscaleBuffer;

/// Sobel magnitude map of one grayscale buffer, with the adaptive threshold
/// and the axis-dominance counts of the pixels above it.
#[derive(Debug, Clone)]
pub struct EdgeField {
    width: u32,
    height: u32,
    /// Full-size, row-major; border pixels hold zero.
    magnitudes: Vec<f32>,
    threshold: f32,
    strong: usize,
    horizontal: usize,
    vertical: usize,
}

impl EdgeField {
    /// Build the field. `None` when the buffer has no interior pixels.
    pub fn compute(gray: &GrayscaleBuffer, thresholds: &ValidationThresholds) -> Option<Self> {
        if !gray.has_interior() {
            return None;
        }

        let width = gray.width() as usize;
        let height = gray.height() as usize;
        let g = gray.samples();

        let magnitudes = sobel_magnitudes(g, width, height);
        let interior = interior_values(&magnitudes, width, height);
        let threshold = adaptive_threshold(
            interior,
            thresholds.edge_percentile,
            thresholds.edge_threshold_scale,
        );

        let margin = thresholds.dominance_margin as f32;
        let (mut strong, mut horizontal, mut vertical) = (0usize, 0usize, 0usize);
        for y in 1..height - 1 {
            let row = y * width;
            for x in 1..width - 1 {
                let idx = row + x;
                if magnitudes[idx] <= threshold {
                    continue;
                }
                strong += 1;

                let dx = (g[idx + 1] - g[idx - 1]).abs();
                let dy = (g[idx + width] - g[idx - width]).abs();
                if dx > dy * margin {
                    horizontal += 1;
                } else if dy > dx * margin {
                    vertical += 1;
                }
            }
        }

        Some(Self {
            width: gray.width(),
            height: gray.height(),
            magnitudes,
            threshold,
            strong,
            horizontal,
            vertical,
        })
    }

    /// Gradient magnitude at `(x, y)`; zero on the border.
    pub fn magnitude(&self, x: u32, y: u32) -> f32 {
        self.magnitudes[y as usize * self.width as usize + x as usize]
    }

    /// Magnitudes strictly above this value count as strong edges.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn strong_edge_count(&self) -> usize {
        self.strong
    }

    /// Strong edges whose horizontal luminance difference dominates.
    pub fn horizontal_edges(&self) -> usize {
        self.horizontal
    }

    /// Strong edges whose vertical luminance difference dominates.
    pub fn vertical_edges(&self) -> usize {
        self.vertical
    }

    pub fn interior_pixel_count(&self) -> usize {
        (self.width as usize - 2) * (self.height as usize - 2)
    }

    /// Strong edges as a fraction of interior pixels.
    pub fn edge_ratio(&self) -> f64 {
        self.strong as f64 / self.interior_pixel_count() as f64
    }
}

/// Every number the shape verdict was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeAnalysis {
    pub edge_threshold: f32,
    pub interior_pixels: usize,
    pub strong_edge_count: usize,
    pub edge_ratio: f64,
    pub horizontal_edges: usize,
    pub vertical_edges: usize,
    pub center_variance: f64,
    pub edge_ratio_in_range: bool,
    pub has_rectangular_edges: bool,
    pub has_center_content: bool,
    pub is_likely_card: bool,
}

/// Run the shape heuristic. `None` when the buffer is smaller than 3x3.
pub fn analyze_shape(
    gray: &GrayscaleBuffer,
    thresholds: &ValidationThresholds,
) -> Option<ShapeAnalysis> {
    let field = EdgeField::compute(gray, thresholds)?;

    let strong = field.strong_edge_count() as f64;
    let axis_floor = thresholds.min_axis_share * strong;
    let has_rectangular_edges = field.horizontal_edges() as f64 > axis_floor
        && field.vertical_edges() as f64 > axis_floor;

    let edge_ratio = field.edge_ratio();
    let edge_ratio_in_range =
        (thresholds.min_edge_ratio..=thresholds.max_edge_ratio).contains(&edge_ratio);

    let center_variance = center_luminance_variance(gray, thresholds.center_region_fraction);
    let has_center_content = center_variance > thresholds.center_variance_floor;

    let analysis = ShapeAnalysis {
        edge_threshold: field.threshold(),
        interior_pixels: field.interior_pixel_count(),
        strong_edge_count: field.strong_edge_count(),
        edge_ratio,
        horizontal_edges: field.horizontal_edges(),
        vertical_edges: field.vertical_edges(),
        center_variance,
        edge_ratio_in_range,
        has_rectangular_edges,
        has_center_content,
        is_likely_card: edge_ratio_in_range && has_rectangular_edges && has_center_content,
    };
    debug!(?analysis, "Shape analysis");
    Some(analysis)
}

pub fn check_shape(analysis: &ShapeAnalysis) -> Result<(), ValidationFailureKind> {
    if analysis.is_likely_card {
        Ok(())
    } else {
        Err(ValidationFailureKind::NoCardDetected)
    }
}

// -- Helpers ------------------------------------------------------------------

/// `sqrt(Gx² + Gy²)` with the standard 3x3 Sobel kernels. Border pixels are
/// left at zero.
///
/// Each kernel is summed as differences of mirrored taps, so a flat
/// neighbourhood gives exactly zero whatever its level.
fn sobel_magnitudes(g: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut magnitudes = vec![0.0f32; width * height];
    for y in 1..height - 1 {
        let row = y * width;
        for x in 1..width - 1 {
            let idx = row + x;
            let (up, down) = (idx - width, idx + width);

            let gx = (g[up + 1] - g[up - 1])
                + 2.0 * (g[idx + 1] - g[idx - 1])
                + (g[down + 1] - g[down - 1]);
            let gy = (g[down - 1] - g[up - 1])
                + 2.0 * (g[down] - g[up])
                + (g[down + 1] - g[up + 1]);

            magnitudes[idx] = (gx * gx + gy * gy).sqrt();
        }
    }
    magnitudes
}

fn interior_values(map: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut values = Vec::with_capacity((width - 2) * (height - 2));
    for y in 1..height - 1 {
        values.extend_from_slice(&map[y * width + 1..(y + 1) * width - 1]);
    }
    values
}

/// The value at position `floor(n * percentile)` of `values` sorted
/// descending, times `scale`. Selection instead of a full sort; same value.
fn adaptive_threshold(mut values: Vec<f32>, percentile: f64, scale: f64) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let position = ((values.len() as f64 * percentile).floor() as usize).min(values.len() - 1);
    let (_, sample, _) = values.select_nth_unstable_by(position, |a, b| b.total_cmp(a));
    *sample * scale as f32
}

/// Luminance variance of the centred square whose side is `fraction` of the
/// shorter image side, clipped to the frame. An empty region yields zero.
fn center_luminance_variance(gray: &GrayscaleBuffer, fraction: f64) -> f64 {
    let (width, height) = (gray.width(), gray.height());
    let half = (gray.dimensions().shorter_side() as f64 * fraction / 2.0).floor() as u32;
    let (cx, cy) = (width / 2, height / 2);

    let (x0, x1) = (cx.saturating_sub(half), (cx + half).min(width));
    let (y0, y1) = (cy.saturating_sub(half), (cy + half).min(height));
    if x0 >= x1 || y0 >= y1 {
        return 0.0;
    }

    let region = || (y0..y1).flat_map(move |y| (x0..x1).map(move |x| gray.get(x, y) as f64));
    let count = ((x1 - x0) as u64 * (y1 - y0) as u64) as f64;
    let mean = region().sum::<f64>() / count;
    region().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count
}

// -- Tests --------------------------------------------------------------------
