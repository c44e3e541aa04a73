// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cardgate — check trading-card photos from the command line.
//
// Exit status: 0 when every photo is accepted, 1 when any is rejected, 2 on
// a usage, configuration or file error.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cardgate_core::error::Result;
use cardgate_core::human_errors::humanize_error;
use cardgate_core::{CardgateError, ValidationOutcome, ValidationThresholds};
use cardgate_vision::{CardValidator, ValidationReport};
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "cardgate")]
#[command(about = "Check that photos show a single, sharp, well-framed trading card")]
#[command(version)]
struct Cli {
    /// Photos to check (JPEG or PNG).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// JSON file overriding the default thresholds. Missing fields keep
    /// their defaults.
    #[arg(long)]
    thresholds: Option<PathBuf>,

    /// Print every measurement taken, not just the verdict.
    #[arg(long)]
    report: bool,

    /// Emit one JSON object per photo, one per line.
    #[arg(long)]
    json: bool,
}

/// Running count of verdicts across all files.
#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    accepted: usize,
    rejected: usize,
    errors: usize,
}

impl Tally {
    fn record(&mut self, outcome: &ValidationOutcome) {
        if outcome.is_valid() {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
    }

    fn exit_code(&self) -> u8 {
        if self.errors > 0 {
            2
        } else if self.rejected > 0 {
            1
        } else {
            0
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let thresholds = match load_thresholds(cli.thresholds.as_deref()) {
        Ok(thresholds) => thresholds,
        Err(err) => {
            eprintln!("{}", describe_error("thresholds", &err));
            return ExitCode::from(2);
        }
    };
    let validator = CardValidator::new(thresholds);

    let mut tally = Tally::default();
    for path in &cli.files {
        match check_file(&validator, path) {
            Ok(report) => {
                tally.record(&report.outcome);
                println!("{}", render(path, &report, cli.report, cli.json));
            }
            Err(err) => {
                tally.errors += 1;
                if cli.json {
                    println!("{}", render_error_json(path, &err));
                } else {
                    eprintln!("{}", describe_error(&path.display().to_string(), &err));
                }
            }
        }
    }

    info!(
        accepted = tally.accepted,
        rejected = tally.rejected,
        errors = tally.errors,
        "Done"
    );
    ExitCode::from(tally.exit_code())
}

fn load_thresholds(path: Option<&Path>) -> Result<ValidationThresholds> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading thresholds");
            ValidationThresholds::load(path)
        }
        None => Ok(ValidationThresholds::default()),
    }
}

fn check_file(validator: &CardValidator, path: &Path) -> Result<ValidationReport> {
    let bytes = std::fs::read(path)?;
    Ok(validator.inspect_bytes(&bytes))
}

// -- Output -------------------------------------------------------------------

fn render(path: &Path, report: &ValidationReport, full: bool, json: bool) -> String {
    let file = path.display().to_string();
    if json {
        let value = if full {
            serde_json::json!({ "file": file, "report": report })
        } else {
            serde_json::json!({ "file": file, "outcome": report.outcome })
        };
        return value.to_string();
    }

    let mut out = match &report.outcome {
        ValidationOutcome::Valid => format!("{file}: valid"),
        ValidationOutcome::Invalid { kind, message } => {
            format!("{file}: invalid [{kind}] {message}")
        }
    };
    if full {
        out.push_str(&render_measurements(report));
    }
    out
}

fn render_measurements(report: &ValidationReport) -> String {
    let mut lines = Vec::new();
    if let Some(dims) = report.dimensions {
        match report.working_dimensions {
            Some(working) => lines.push(format!("dimensions: {dims} (analyzed at {working})")),
            None => lines.push(format!("dimensions: {dims}")),
        }
    }
    if let Some(variance) = report.total_variance {
        lines.push(format!("channel variance: {variance:.1}"));
    }
    if let Some(shape) = &report.shape {
        lines.push(format!(
            "edges: ratio {:.3}, {} horizontal / {} vertical of {} strong, center variance {:.1}",
            shape.edge_ratio,
            shape.horizontal_edges,
            shape.vertical_edges,
            shape.strong_edge_count,
            shape.center_variance
        ));
    }
    if let Some(sharpness) = report.sharpness {
        lines.push(format!("sharpness: {sharpness:.2}"));
    }
    if !report.skipped.is_empty() {
        let names: Vec<_> = report.skipped.iter().map(|check| check.as_str()).collect();
        lines.push(format!("skipped: {}", names.join(", ")));
    }

    lines.iter().map(|line| format!("\n  {line}")).collect()
}

fn describe_error(subject: &str, err: &CardgateError) -> String {
    let human = humanize_error(err);
    format!("{subject}: error: {} {}", human.message, human.suggestion)
}

fn render_error_json(path: &Path, err: &CardgateError) -> String {
    let human = humanize_error(err);
    serde_json::json!({
        "file": path.display().to_string(),
        "error": human.message,
        "suggestion": human.suggestion,
        "detail": err.to_string(),
    })
    .to_string()
}
