// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Validation thresholds.
//
// The defaults were hand-tuned against a small set of card photos. They are
// calibration parameters, so every one of them can be overridden from JSON.

use serde::{Deserialize, Serialize};

use crate::error::{CardgateError, Result};

/// Every tunable constant used by the validation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    /// Minimum width and height of the original image, in pixels.
    pub min_dimension: u32,
    /// Smallest accepted `width / height`.
    pub min_aspect_ratio: f64,
    /// Largest accepted `width / height`.
    pub max_aspect_ratio: f64,
    /// Longest side of the working copy the analyzers run on.
    pub downsample_max_side: u32,
    /// Minimum sum of the R, G and B channel variances (8-bit scale).
    pub variance_floor: f64,
    /// Minimum variance of the Laplacian response.
    pub sharpness_floor: f64,
    /// Position, as a fraction of the descending magnitude order, of the
    /// sample the adaptive edge threshold is derived from.
    pub edge_percentile: f64,
    /// Multiplier applied to that sample to get the edge threshold.
    pub edge_threshold_scale: f64,
    /// Lowest accepted strong-edge ratio (inclusive).
    pub min_edge_ratio: f64,
    /// Highest accepted strong-edge ratio (inclusive).
    pub max_edge_ratio: f64,
    /// An edge pixel is axis-dominant when one local difference exceeds the
    /// other by this factor.
    pub dominance_margin: f64,
    /// Share of strong edges each axis must exceed.
    pub min_axis_share: f64,
    /// Side of the central square, as a fraction of the shorter image side.
    pub center_region_fraction: f64,
    /// Luminance variance the central square must exceed.
    pub center_variance_floor: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            min_dimension: 200,
            min_aspect_ratio: 1.0 / 3.0,
            max_aspect_ratio: 3.0,
            downsample_max_side: 300,
            variance_floor: 500.0,
            sharpness_floor: 5.0,
            edge_percentile: 0.1,
            edge_threshold_scale: 0.5,
            min_edge_ratio: 0.02,
            max_edge_ratio: 0.5,
            dominance_margin: 1.5,
            min_axis_share: 0.15,
            center_region_fraction: 0.6,
            center_variance_floor: 200.0,
        }
    }
}

impl ValidationThresholds {
    /// Parse thresholds from a JSON document. Missing fields keep their
    /// defaults. The result is checked before it is returned.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let thresholds: Self = serde_json::from_str(json)?;
        thresholds.check()?;
        Ok(thresholds)
    }

    /// Read and parse a JSON thresholds file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Reject values the pipeline cannot work with.
    pub fn check(&self) -> Result<()> {
        if self.min_dimension == 0 {
            return Err(invalid("min_dimension must be at least 1"));
        }
        if self.downsample_max_side == 0 {
            return Err(invalid("downsample_max_side must be at least 1"));
        }

        let finite_non_negative = [
            ("min_aspect_ratio", self.min_aspect_ratio),
            ("max_aspect_ratio", self.max_aspect_ratio),
            ("variance_floor", self.variance_floor),
            ("sharpness_floor", self.sharpness_floor),
            ("edge_threshold_scale", self.edge_threshold_scale),
            ("min_edge_ratio", self.min_edge_ratio),
            ("max_edge_ratio", self.max_edge_ratio),
            ("dominance_margin", self.dominance_margin),
            ("min_axis_share", self.min_axis_share),
            ("center_variance_floor", self.center_variance_floor),
        ];
        for (name, value) in finite_non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        if self.min_aspect_ratio <= 0.0 || self.min_aspect_ratio > self.max_aspect_ratio {
            return Err(invalid(format!(
                "aspect ratio bounds are inverted or empty: [{}, {}]",
                self.min_aspect_ratio, self.max_aspect_ratio
            )));
        }
        if self.min_edge_ratio > self.max_edge_ratio {
            return Err(invalid(format!(
                "edge ratio bounds are inverted: [{}, {}]",
                self.min_edge_ratio, self.max_edge_ratio
            )));
        }

        for (name, value) in [
            ("edge_percentile", self.edge_percentile),
            ("center_region_fraction", self.center_region_fraction),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(format!("{name} must lie in (0, 1] (got {value})")));
            }
        }

        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> CardgateError {
    CardgateError::InvalidThresholds(reason.into())
}
