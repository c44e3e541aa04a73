// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic photos shared by the integration tests and the benchmark.
//
// Every generator is seeded so a failing case reproduces exactly.

#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Dark table colour around the card.
pub const BACKGROUND: u8 = 30;
/// Mean brightness of the card face.
pub const CARD_FACE: u8 = 200;

/// A card photographed flat on a dark table: a bright rectangle covering the
/// middle half of each axis, textured with +/-40 of uniform noise.
pub fn card_photo(width: u32, height: u32, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let (x0, x1) = (width / 4, width - width / 4);
    let (y0, y1) = (height / 4, height - height / 4);

    RgbaImage::from_fn(width, height, |x, y| {
        let v = if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
            (CARD_FACE as i32 + rng.gen_range(-40..=40)) as u8
        } else {
            BACKGROUND
        };
        Rgba([v, v, v, 255])
    })
}

/// Gaussian blur of the luminance, as an out-of-focus camera would produce.
pub fn blurred(image: &RgbaImage, sigma: f32) -> RgbaImage {
    let gray: GrayImage = GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y)[0]])
    });
    let soft = imageproc::filter::gaussian_blur_f32(&gray, sigma);
    DynamicImage::ImageLuma8(soft).to_rgba8()
}

/// The same framing as [`card_photo`] but with a flat, untextured face on a
/// flat background of level `background`: only the outline produces edges.
pub fn blank_card_photo(width: u32, height: u32, background: u8) -> RgbaImage {
    let mut image = solid(width, height, [background; 3]);
    let face = Rect::at((width / 4) as i32, (height / 4) as i32)
        .of_size(width - 2 * (width / 4), height - 2 * (height / 4));
    draw_filled_rect_mut(&mut image, face, Rgba([220, 220, 220, 255]));
    image
}

/// A flat card face printed with a sparse dark grid, on a flat background
/// of level `background`.
pub fn ruled_card_photo(width: u32, height: u32, background: u8) -> RgbaImage {
    let (x0, x1) = (width / 4, width - width / 4);
    let (y0, y1) = (height / 4, height - height / 4);

    RgbaImage::from_fn(width, height, |x, y| {
        let inside = (x0..x1).contains(&x) && (y0..y1).contains(&y);
        let v = if inside && ((x / 6) % 12 == 0 || (y / 6) % 12 == 0) {
            60
        } else if inside {
            CARD_FACE
        } else {
            background
        };
        Rgba([v, v, v, 255])
    })
}

/// Independent uniform noise in every channel of every pixel.
pub fn noise_photo(width: u32, height: u32, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbaImage::from_fn(width, height, |_, _| Rgba([rng.r#gen(), rng.r#gen(), rng.r#gen(), 255]))
}

pub fn solid(width: u32, height: u32, colour: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([colour[0], colour[1], colour[2], 255]))
}

/// Shrink by an integer factor, averaging each `factor x factor` block.
pub fn box_downscale(image: &RgbaImage, factor: u32) -> RgbaImage {
    let area = factor * factor;
    RgbaImage::from_fn(image.width() / factor, image.height() / factor, |x, y| {
        let mut sums = [0u32; 3];
        for dy in 0..factor {
            for dx in 0..factor {
                let px = image.get_pixel(x * factor + dx, y * factor + dy);
                for (sum, channel) in sums.iter_mut().zip(px.0) {
                    *sum += channel as u32;
                }
            }
        }
        let avg = |sum: u32| ((sum + area / 2) / area) as u8;
        Rgba([avg(sums[0]), avg(sums[1]), avg(sums[2]), 255])
    })
}

pub fn encode(image: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let dynamic = match format {
        // JPEG has no alpha channel.
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image.clone()).to_rgb8()),
        _ => DynamicImage::ImageRgba8(image.clone()),
    };
    let mut buffer = Vec::new();
    dynamic
        .write_to(&mut Cursor::new(&mut buffer), format)
        .expect("encoding a synthetic photo should succeed");
    buffer
}

pub fn png(image: &RgbaImage) -> Vec<u8> {
    encode(image, ImageFormat::Png)
}
