// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Validation orchestrator — runs the checks in a fixed order and stops at the
// first failure.
//
// ## Order
//
// 1. Decode (bytes / data URL entry points only)
// 2. Geometry, on the original dimensions
// 3. Downsample to the working copy
// 4. Channel variance
// 5. Edge/shape heuristic
// 6. Laplacian sharpness (most tolerant, so last)
//
// An analysis that cannot run on a tiny working copy is skipped, never
// treated as a pass for the whole photo.

use ::image::DynamicImage;
use cardgate_core::{
    CardgateError, Dimensions, ValidationFailureKind, ValidationOutcome, ValidationThresholds,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::analysis::{edges, geometry, sharpness, variance};
use crate::analysis::edges::ShapeAnalysis;
use crate::image::buffer::{GrayscaleBuffer, PixelBuffer};
use crate::image::{decode, resample};

/// One stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    Decode,
    Geometry,
    Variance,
    Shape,
    Sharpness,
}

impl Check {
    /// The check that produces `kind`.
    pub fn producing(kind: ValidationFailureKind) -> Self {
        match kind {
            ValidationFailureKind::UnreadableImage => Self::Decode,
            ValidationFailureKind::TooSmall | ValidationFailureKind::BadAspectRatio => {
                Self::Geometry
            }
            ValidationFailureKind::LowContrast => Self::Variance,
            ValidationFailureKind::NoCardDetected => Self::Shape,
            ValidationFailureKind::TooBlurry => Self::Sharpness,
        }
    }

    /// Matches the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::Geometry => "geometry",
            Self::Variance => "variance",
            Self::Shape => "shape",
            Self::Sharpness => "sharpness",
        }
    }
}

/// The verdict plus every measurement taken before it was reached.
///
/// Fields for checks that never ran (because an earlier one failed) stay
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub outcome: ValidationOutcome,
    /// Original image size; `None` when decoding failed.
    pub dimensions: Option<Dimensions>,
    /// Size of the downsampled copy the analyzers ran on.
    pub working_dimensions: Option<Dimensions>,
    pub total_variance: Option<f64>,
    pub shape: Option<ShapeAnalysis>,
    pub sharpness: Option<f64>,
    /// Checks that could not run on the working copy.
    pub skipped: Vec<Check>,
}

impl ValidationReport {
    fn pending(dimensions: Option<Dimensions>) -> Self {
        Self {
            outcome: ValidationOutcome::Valid,
            dimensions,
            working_dimensions: None,
            total_variance: None,
            shape: None,
            sharpness: None,
            skipped: Vec::new(),
        }
    }

    fn unreadable() -> Self {
        Self {
            outcome: ValidationOutcome::invalid(ValidationFailureKind::UnreadableImage),
            ..Self::pending(None)
        }
    }

    /// The check that rejected the photo, if any.
    pub fn failed_check(&self) -> Option<Check> {
        self.outcome.failure_kind().map(Check::producing)
    }
}

/// Stateless photo validator. Cheap to clone and safe to share between
/// threads; each call owns its buffers.
#[derive(Debug, Clone, Default)]
pub struct CardValidator {
    thresholds: ValidationThresholds,
}

impl CardValidator {
    /// Use `thresholds` as given. Values built in code are not checked; see
    /// [`CardValidator::try_new`].
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }

    /// Like [`CardValidator::new`], but rejects thresholds that fail
    /// [`ValidationThresholds::check`].
    pub fn try_new(thresholds: ValidationThresholds) -> cardgate_core::error::Result<Self> {
        thresholds.check()?;
        Ok(Self { thresholds })
    }

    // -- Verdict-only entry points -------------------------------------------

    /// Decode `data` and validate it.
    pub fn validate_bytes(&self, data: &[u8]) -> ValidationOutcome {
        self.inspect_bytes(data).outcome
    }

    /// Validate a `data:image/...;base64,` string (or a bare base64 payload).
    pub fn validate_data_url(&self, url: &str) -> ValidationOutcome {
        self.inspect_data_url(url).outcome
    }

    /// Validate an already-decoded raster.
    pub fn validate_pixels(&self, pixels: &PixelBuffer) -> ValidationOutcome {
        self.inspect_pixels(pixels).outcome
    }

    /// Validate an `image` crate image.
    pub fn validate_image(&self, image: &DynamicImage) -> ValidationOutcome {
        self.validate_pixels(&PixelBuffer::from_dynamic(image))
    }

    // -- Report entry points --------------------------------------------------

    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn inspect_bytes(&self, data: &[u8]) -> ValidationReport {
        self.inspect_decoded(decode::decode_bytes(data))
    }

    #[instrument(skip(self, url), fields(url_len = url.len()))]
    pub fn inspect_data_url(&self, url: &str) -> ValidationReport {
        self.inspect_decoded(decode::decode_data_url(url))
    }

    /// Run every check on `pixels`, recording measurements along the way.
    #[instrument(skip_all, fields(width = pixels.width(), height = pixels.height()))]
    pub fn inspect_pixels(&self, pixels: &PixelBuffer) -> ValidationReport {
        let mut report = ValidationReport::pending(Some(pixels.dimensions()));
        if let Err(kind) = self.run_checks(pixels, &mut report) {
            report.outcome = ValidationOutcome::invalid(kind);
        }

        match &report.outcome {
            ValidationOutcome::Valid => info!("Photo accepted"),
            ValidationOutcome::Invalid { kind, .. } => warn!(%kind, "Photo rejected"),
        }
        report
    }

    fn inspect_decoded(&self, decoded: Result<PixelBuffer, CardgateError>) -> ValidationReport {
        match decoded {
            Ok(pixels) => self.inspect_pixels(&pixels),
            Err(err) => {
                warn!(error = %err, "Photo could not be decoded");
                ValidationReport::unreadable()
            }
        }
    }

    fn run_checks(
        &self,
        pixels: &PixelBuffer,
        report: &mut ValidationReport,
    ) -> Result<(), ValidationFailureKind> {
        let thresholds = &self.thresholds;

        geometry::check_geometry(pixels.dimensions(), thresholds)?;

        let working = resample::downsample(pixels, thresholds.downsample_max_side);
        report.working_dimensions = Some(working.dimensions());

        let total_variance = variance::channel_variance(&working).total();
        report.total_variance = Some(total_variance);
        debug!(total_variance, "Channel variance");
        variance::check_variance(total_variance, thresholds)?;

        let gray = GrayscaleBuffer::from_pixels(&working);

        match edges::analyze_shape(&gray, thresholds) {
            Some(shape) => {
                report.shape = Some(shape);
                edges::check_shape(&shape)?;
            }
            None => {
                warn!(dims = %gray.dimensions(), "Working copy too small for shape analysis; skipping");
                report.skipped.push(Check::Shape);
            }
        }

        match sharpness::laplacian_variance(&gray) {
            Some(laplacian) => {
                report.sharpness = Some(laplacian);
                sharpness::check_sharpness(laplacian, thresholds)?;
            }
            None => {
                warn!(dims = %gray.dimensions(), "Working copy too small for sharpness analysis; skipping");
                report.skipped.push(Check::Sharpness);
            }
        }

        Ok(())
    }
}

/// Validate encoded image bytes with the given thresholds, or the defaults.
pub fn validate_card_image(
    data: &[u8],
    thresholds: Option<&ValidationThresholds>,
) -> ValidationOutcome {
    let validator = CardValidator::new(thresholds.cloned().unwrap_or_default());
    validator.validate_bytes(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_image(RgbaImage::from_pixel(width, height, Rgba([120, 120, 120, 255])))
    }

    /// One-pixel checkerboard. Maximal variance and Laplacian response, but
    /// the Sobel kernels cancel to zero everywhere.
    fn checkerboard(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_image(RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }
        }))
    }

    #[test]
    fn undecodable_bytes_are_unreadable() {
        let report = CardValidator::default().inspect_bytes(b"\x89PNG but not really");
        assert_eq!(report.outcome.failure_kind(), Some(ValidationFailureKind::UnreadableImage));
        assert_eq!(report.failed_check(), Some(Check::Decode));
        assert_eq!(report.dimensions, None);
    }

    #[test]
    fn malformed_data_url_is_unreadable() {
        let outcome = CardValidator::default().validate_data_url("data:image/png;base64,!!!");
        assert_eq!(outcome.failure_kind(), Some(ValidationFailureKind::UnreadableImage));
    }

    #[test]
    fn geometry_failure_stops_before_downsampling() {
        let report = CardValidator::default().inspect_pixels(&solid(50, 50));
        assert_eq!(report.outcome.failure_kind(), Some(ValidationFailureKind::TooSmall));
        assert_eq!(report.working_dimensions, None);
        assert_eq!(report.total_variance, None);
    }

    #[test]
    fn flat_photo_stops_at_variance() {
        let report = CardValidator::default().inspect_pixels(&solid(400, 500));
        assert_eq!(report.outcome.failure_kind(), Some(ValidationFailureKind::LowContrast));
        assert_eq!(report.failed_check(), Some(Check::Variance));
        assert_eq!(report.total_variance, Some(0.0));
        assert_eq!(report.working_dimensions, Some(Dimensions::new(240, 300)));
        assert!(report.shape.is_none());
        assert!(report.sharpness.is_none());
    }

    #[test]
    fn shape_runs_before_sharpness() {
        let report = CardValidator::default().inspect_pixels(&checkerboard(300, 300));
        assert_eq!(report.outcome.failure_kind(), Some(ValidationFailureKind::NoCardDetected));
        assert_eq!(report.shape.map(|s| s.strong_edge_count), Some(0));
        assert!(report.sharpness.is_none());
    }

    #[test]
    fn tiny_photo_skips_pixel_analyses() {
        // A 2x2 photo has no interior; only geometry and variance can run.
        let thresholds = ValidationThresholds {
            min_dimension: 1,
            ..Default::default()
        };
        let pixels = PixelBuffer::from_rgb(2, 2, &[0, 0, 0, 255, 255, 255, 255, 255, 255, 0, 0, 0]);
        let report = CardValidator::new(thresholds).inspect_pixels(&pixels);
        assert_eq!(report.outcome, ValidationOutcome::Valid);
        assert_eq!(report.working_dimensions, Some(Dimensions::new(2, 2)));
        assert_eq!(report.skipped, vec![Check::Shape, Check::Sharpness]);
        assert!(report.shape.is_none());
    }

    #[test]
    fn checked_constructor_rejects_inverted_bounds() {
        let inverted = ValidationThresholds {
            min_aspect_ratio: 4.0,
            ..Default::default()
        };
        let err = CardValidator::try_new(inverted).expect_err("bounds are inverted");
        assert!(matches!(err, CardgateError::InvalidThresholds(_)));

        assert!(CardValidator::try_new(ValidationThresholds::default()).is_ok());
    }

    #[test]
    fn check_for_every_kind() {
        assert_eq!(Check::producing(ValidationFailureKind::BadAspectRatio), Check::Geometry);
        assert_eq!(Check::producing(ValidationFailureKind::TooBlurry), Check::Sharpness);
        assert_eq!(Check::producing(ValidationFailureKind::NoCardDetected), Check::Shape);
    }

    #[test]
    fn free_function_uses_supplied_thresholds() {
        let png = {
            let mut buffer = Vec::new();
            DynamicImage::ImageRgba8(solid(120, 120).as_rgba_image().clone())
                .write_to(&mut std::io::Cursor::new(&mut buffer), ::image::ImageFormat::Png)
                .expect("encode");
            buffer
        };
        assert_eq!(
            validate_card_image(&png, None).failure_kind(),
            Some(ValidationFailureKind::TooSmall)
        );
        let relaxed = ValidationThresholds {
            min_dimension: 100,
            ..Default::default()
        };
        assert_eq!(
            validate_card_image(&png, Some(&relaxed)).failure_kind(),
            Some(ValidationFailureKind::LowContrast)
        );
    }
}
