// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffers — the RGBA raster every check reads from, and the
// luminance projection shared by the sharpness and edge analyzers.

use cardgate_core::Dimensions;
use image::{DynamicImage, RgbaImage};

/// Row-major RGBA raster owned by one validation call.
///
/// Always holds exactly `width * height * 4` samples. Constructing one from a
/// sample vector of any other length is a programming error and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Samples per pixel.
    pub const CHANNELS: usize = 4;

    // -- Construction ---------------------------------------------------------

    /// Wrap raw RGBA samples.
    ///
    /// # Panics
    ///
    /// If `samples.len() != width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, samples: Vec<u8>) -> Self {
        let expected = width as usize * height as usize * Self::CHANNELS;
        assert_eq!(
            samples.len(),
            expected,
            "RGBA buffer for {width}x{height} must hold {expected} samples"
        );
        let image = RgbaImage::from_raw(width, height, samples)
            .unwrap_or_else(|| unreachable!("sample count checked above"));
        Self { image }
    }

    /// Expand raw RGB samples to RGBA with an opaque alpha channel.
    ///
    /// # Panics
    ///
    /// If `samples.len() != width * height * 3`.
    pub fn from_rgb(width: u32, height: u32, samples: &[u8]) -> Self {
        let expected = width as usize * height as usize * 3;
        assert_eq!(
            samples.len(),
            expected,
            "RGB buffer for {width}x{height} must hold {expected} samples"
        );
        let mut rgba = Vec::with_capacity(width as usize * height as usize * Self::CHANNELS);
        for rgb in samples.chunks_exact(3) {
            rgba.extend_from_slice(rgb);
            rgba.push(u8::MAX);
        }
        Self::from_rgba(width, height, rgba)
    }

    /// Take ownership of an `image` crate RGBA raster.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Convert any decoded `DynamicImage` to RGBA.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self {
            image: image.to_rgba8(),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }

    /// The raw RGBA samples, row-major.
    pub fn samples(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Iterate over the R, G, B components of every pixel, ignoring alpha.
    pub fn rgb(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.image
            .as_raw()
            .chunks_exact(Self::CHANNELS)
            .map(|px| [px[0], px[1], px[2]])
    }

    /// Borrow the underlying `image` crate raster.
    pub fn as_rgba_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Project to luminance.
    pub fn to_grayscale(&self) -> GrayscaleBuffer {
        GrayscaleBuffer::from_pixels(self)
    }
}

/// Luminance of one pixel: `0.299R + 0.587G + 0.114B`.
///
/// Weighted in fixed point and divided once, so a gray pixel `(v, v, v)`
/// maps to exactly `v`.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    weighted as f32 / 1000.0
}

/// One `f32` luminance sample per pixel, same layout as its source.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayscaleBuffer {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl GrayscaleBuffer {
    pub fn from_pixels(pixels: &PixelBuffer) -> Self {
        let samples = pixels.rgb().map(|[r, g, b]| luminance(r, g, b)).collect();
        Self {
            width: pixels.width(),
            height: pixels.height(),
            samples,
        }
    }

    /// Wrap precomputed luminance samples.
    ///
    /// # Panics
    ///
    /// If `samples.len() != width * height`.
    pub fn from_samples(width: u32, height: u32, samples: Vec<f32>) -> Self {
        assert_eq!(
            samples.len(),
            width as usize * height as usize,
            "grayscale buffer for {width}x{height} has the wrong sample count"
        );
        Self {
            width,
            height,
            samples,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Luminance at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.samples[y as usize * self.width as usize + x as usize]
    }

    /// Whether at least one pixel has its full 3x3 neighbourhood in bounds.
    pub fn has_interior(&self) -> bool {
        self.width >= 3 && self.height >= 3
    }

    /// Number of pixels off the one-pixel border.
    pub fn interior_pixel_count(&self) -> usize {
        if !self.has_interior() {
            return 0;
        }
        (self.width as usize - 2) * (self.height as usize - 2)
    }
}
