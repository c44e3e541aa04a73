// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async wrappers — run the CPU-bound validator on tokio's blocking pool with
// a caller-imposed deadline.

use std::time::Duration;

use cardgate_core::{CardgateError, ValidationOutcome, ValidationThresholds};
use cardgate_core::error::Result;
use tracing::{info, instrument, warn};

use crate::validator::CardValidator;

/// Validate `data` on the blocking pool, giving up after `timeout`.
/// Thresholds are checked first.
///
/// A timed-out validation keeps running on its worker thread until it
/// finishes; only its result is discarded.
#[instrument(skip(data, thresholds), fields(data_len = data.len(), timeout_ms = timeout.as_millis() as u64))]
pub async fn validate_bytes_async(
    data: Vec<u8>,
    thresholds: ValidationThresholds,
    timeout: Duration,
) -> Result<ValidationOutcome> {
    let validator = CardValidator::try_new(thresholds)?;
    let worker = tokio::task::spawn_blocking(move || validator.validate_bytes(&data));

    let outcome = tokio::time::timeout(timeout, worker)
        .await
        .map_err(|_| {
            warn!("Validation exceeded its deadline");
            CardgateError::Timeout(timeout.as_millis() as u64)
        })?
        .map_err(|e| CardgateError::Worker(e.to_string()))?;

    Ok(outcome)
}

/// Validate several independent photos concurrently. Results come back in
/// the same order as `images`; one failure does not affect the others.
#[instrument(skip_all, fields(count = images.len()))]
pub async fn validate_many_async(
    images: Vec<Vec<u8>>,
    thresholds: ValidationThresholds,
    timeout: Duration,
) -> Vec<Result<ValidationOutcome>> {
    let handles: Vec<_> = images
        .into_iter()
        .map(|data| tokio::spawn(validate_bytes_async(data, thresholds.clone(), timeout)))
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(CardgateError::Worker(e.to_string())),
        };
        results.push(result);
    }

    let accepted = results
        .iter()
        .filter(|r| matches!(r, Ok(outcome) if outcome.is_valid()))
        .count();
    info!(accepted, total = results.len(), "Batch validated");
    results
}
