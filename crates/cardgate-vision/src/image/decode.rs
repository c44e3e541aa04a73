// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decoder — encoded payloads (JPEG, PNG, and the other `image` crate
// default codecs) and base64 data URLs into `PixelBuffer`s.

use base64::{Engine as _, engine::general_purpose};
use cardgate_core::error::{CardgateError, Result};
use tracing::{debug, info, instrument};

use super::buffer::PixelBuffer;

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Decode raw encoded image bytes.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_bytes(data: &[u8]) -> Result<PixelBuffer> {
    let image = image::load_from_memory(data)
        .map_err(|err| CardgateError::Decode(format!("failed to decode image: {err}")))?;
    info!(
        width = image.width(),
        height = image.height(),
        "Image decoded from bytes"
    );
    Ok(PixelBuffer::from_dynamic(&image))
}

/// Decode a `data:image/<fmt>;base64,<payload>` string, or a bare base64
/// payload, as produced by the capture screen.
#[instrument(skip(url), fields(url_len = url.len()))]
pub fn decode_data_url(url: &str) -> Result<PixelBuffer> {
    let bytes = data_url_payload(url)?;
    decode_bytes(&bytes)
}

/// Extract and base64-decode the payload of an image data URL.
///
/// Strings without a `data:` prefix are treated as a bare base64 payload.
/// ASCII whitespace inside the payload (line-wrapped encoders) is ignored.
pub fn data_url_payload(url: &str) -> Result<Vec<u8>> {
    let url = url.trim();

    let encoded = match url.strip_prefix(DATA_URL_PREFIX) {
        Some(rest) => {
            let marker = rest.find(BASE64_MARKER).ok_or_else(|| {
                CardgateError::DataUrl("missing ';base64,' marker".to_owned())
            })?;
            let media_type = &rest[..marker];
            if !media_type.to_ascii_lowercase().starts_with("image/") {
                return Err(CardgateError::DataUrl(format!(
                    "expected an image media type, got '{media_type}'"
                )));
            }
            &rest[marker + BASE64_MARKER.len()..]
        }
        None => url,
    };

    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(CardgateError::DataUrl("empty payload".to_owned()));
    }

    let bytes = general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|err| CardgateError::DataUrl(format!("base64 decoding failed: {err}")))?;
    debug!(payload_bytes = bytes.len(), "Data URL payload extracted");
    Ok(bytes)
}
