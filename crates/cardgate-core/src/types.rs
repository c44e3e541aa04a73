// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Cardgate validation engine.

use serde::{Deserialize, Serialize};

/// Width and height of an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width / height`.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn shorter_side(&self) -> u32 {
        self.width.min(self.height)
    }

    pub fn longer_side(&self) -> u32 {
        self.width.max(self.height)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Why a photo was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailureKind {
    /// The payload could not be decoded (corrupt bytes, unsupported codec).
    UnreadableImage,
    /// Below the minimum pixel dimensions.
    TooSmall,
    /// Width/height ratio outside tolerance.
    BadAspectRatio,
    /// Near-blank or flat image.
    LowContrast,
    /// Failed the rectangular-shape / center-content heuristic.
    NoCardDetected,
    /// Laplacian variance below the focus floor.
    TooBlurry,
}

impl ValidationFailureKind {
    /// Every failure kind, in the order the pipeline can produce them.
    pub const ALL: [Self; 6] = [
        Self::UnreadableImage,
        Self::TooSmall,
        Self::BadAspectRatio,
        Self::LowContrast,
        Self::NoCardDetected,
        Self::TooBlurry,
    ];

    /// Short user-facing message shown by the capture screen.
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnreadableImage => {
                "Could not load the image. Please try again with a different photo."
            }
            Self::TooSmall => "Image is too small. Please upload a clearer photo.",
            Self::BadAspectRatio => {
                "Image has unusual proportions. Please upload a photo of just the card."
            }
            Self::LowContrast => {
                "Image appears blank or has very low contrast. Please upload a clearer photo."
            }
            Self::NoCardDetected => {
                "No card detected in the image. Please make sure the card is clearly visible."
            }
            Self::TooBlurry => {
                "Image appears blurry. Please take a clearer photo with better focus."
            }
        }
    }

    /// Stable machine-readable name (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnreadableImage => "unreadable_image",
            Self::TooSmall => "too_small",
            Self::BadAspectRatio => "bad_aspect_ratio",
            Self::LowContrast => "low_contrast",
            Self::NoCardDetected => "no_card_detected",
            Self::TooBlurry => "too_blurry",
        }
    }
}

impl std::fmt::Display for ValidationFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of one validation call. There is no warning state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Valid,
    Invalid {
        kind: ValidationFailureKind,
        message: String,
    },
}

impl ValidationOutcome {
    /// Rejection carrying the standard message for `kind`.
    pub fn invalid(kind: ValidationFailureKind) -> Self {
        Self::Invalid {
            kind,
            message: kind.message().to_owned(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The failure kind, or `None` for a valid photo.
    pub fn failure_kind(&self) -> Option<ValidationFailureKind> {
        match self {
            Self::Valid => None,
            Self::Invalid { kind, .. } => Some(*kind),
        }
    }

    /// The user-facing message, or `None` for a valid photo.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid { message, .. } => Some(message),
        }
    }
}

impl std::fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => f.write_str("valid"),
            Self::Invalid { kind, message } => write!(f, "invalid ({kind}): {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_uses_standard_message() {
        let outcome = ValidationOutcome::invalid(ValidationFailureKind::TooBlurry);
        assert_eq!(outcome.failure_kind(), Some(ValidationFailureKind::TooBlurry));
        assert_eq!(outcome.message(), Some(ValidationFailureKind::TooBlurry.message()));
        assert!(!outcome.is_valid());
    }

    #[test]
    fn every_kind_has_a_distinct_message() {
        let mut messages: Vec<_> = ValidationFailureKind::ALL.iter().map(|k| k.message()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), ValidationFailureKind::ALL.len());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_string(&ValidationOutcome::invalid(
            ValidationFailureKind::LowContrast,
        ))
        .expect("serialize");
        assert!(json.contains(r#""status":"invalid""#));
        assert!(json.contains(r#""kind":"low_contrast""#));

        let valid = serde_json::to_string(&ValidationOutcome::Valid).expect("serialize");
        assert_eq!(valid, r#"{"status":"valid"}"#);
    }

    #[test]
    fn kind_display_matches_serde_name() {
        for kind in ValidationFailureKind::ALL {
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn dimensions_helpers() {
        let dims = Dimensions::new(600, 840);
        assert_eq!(dims.shorter_side(), 600);
        assert_eq!(dims.longer_side(), 840);
        assert_eq!(dims.to_string(), "600x840");
        assert!((dims.aspect_ratio() - 600.0 / 840.0).abs() < 1e-12);
    }
}
