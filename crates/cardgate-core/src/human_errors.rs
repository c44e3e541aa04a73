// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the capture screen and the CLI.
//
// Verdicts already carry their own message (see `ValidationFailureKind`).
// This module covers the faults around them: bad configuration, timeouts,
// unreadable files. Severity drives how the caller presents the problem.

use crate::error::CardgateError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A slow device or busy worker; trying again may work.
    Transient,
    /// The user must do something (pick another photo, fix a file).
    ActionRequired,
    /// Nothing the user can do; the installation needs attention.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same operation could succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `CardgateError` into a `HumanError`.
pub fn humanize_error(err: &CardgateError) -> HumanError {
    match err {
        // -- Input errors --
        CardgateError::Decode(_) | CardgateError::DataUrl(_) => HumanError {
            message: "We couldn't open this photo.".into(),
            suggestion: "The file may be damaged or in an unusual format. Try taking the photo again, or save it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Configuration --
        CardgateError::InvalidThresholds(detail) => HumanError {
            message: "The photo checker is misconfigured.".into(),
            suggestion: format!("Fix the thresholds file or remove it to use the defaults. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Runtime --
        CardgateError::Timeout(ms) => HumanError {
            message: "Checking the photo took too long.".into(),
            suggestion: format!("Try again. Very large photos can take longer than {ms} ms to read; a smaller photo may help."),
            retriable: true,
            severity: Severity::Transient,
        },

        CardgateError::Worker(_) => HumanError {
            message: "The photo checker stopped unexpectedly.".into(),
            suggestion: "Try again. If this keeps happening, restart the app.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Storage / persistence --
        CardgateError::Io(io) => humanize_io_error(io),

        CardgateError::Serialization(detail) => HumanError {
            message: "A settings file couldn't be read.".into(),
            suggestion: format!("The file isn't valid JSON. Check it for typos. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

fn humanize_io_error(err: &std::io::Error) -> HumanError {
    match err.kind() {
        std::io::ErrorKind::NotFound => HumanError {
            message: "The file couldn't be found.".into(),
            suggestion: "Check the file name and location, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        std::io::ErrorKind::PermissionDenied => HumanError {
            message: "We aren't allowed to read this file.".into(),
            suggestion: "Check the file's permissions, or copy it somewhere you can access.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        _ => HumanError {
            message: "The file couldn't be read.".into(),
            suggestion: format!("Try again. (Detail: {err})"),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_transient() {
        let human = humanize_error(&CardgateError::Timeout(5_000));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
        assert!(human.suggestion.contains("5000 ms"));
    }

    #[test]
    fn bad_thresholds_are_permanent() {
        let human = humanize_error(&CardgateError::InvalidThresholds("edge ratio bounds are inverted".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn decode_failure_asks_for_another_photo() {
        let human = humanize_error(&CardgateError::Decode("unexpected EOF".into()));
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = CardgateError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }
}
