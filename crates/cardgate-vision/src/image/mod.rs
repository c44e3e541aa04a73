// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — pixel buffers, decoding, and downsampling.

pub mod buffer;
pub mod decode;
pub mod resample;

pub use buffer::{GrayscaleBuffer, PixelBuffer};
pub use decode::{data_url_payload, decode_bytes, decode_data_url};
pub use resample::{downsample, working_dimensions};
