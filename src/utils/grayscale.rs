//! Luma conversion between RGBA and single-channel buffers
//!
//! Y = round(0.299*R + 0.587*G + 0.114*B), computed in integer thousandths so
//! the result does not depend on float rounding. Rows are converted in
//! parallel with rayon; each output byte depends only on its input pixel, so
//! the result is identical to a sequential pass.

use rayon::prelude::*;

use crate::models::{Channels, GrayBuffer, PixelBuffer};

/// Luma weights in thousandths: Y = (299*R + 587*G + 114*B) / 1000
const COEF_R: u32 = 299;
const COEF_G: u32 = 587;
const COEF_B: u32 = 114;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32;
    ((sum + 500) / 1000) as u8
}

/// Convert any pixel buffer to grayscale.
///
/// Zero-area input yields an empty buffer. Luma input is copied as-is.
pub fn grayscale(image: &PixelBuffer) -> GrayBuffer {
    if image.is_empty() {
        return GrayBuffer::default();
    }

    let (width, height) = (image.width(), image.height());
    let data = match image.channels() {
        Channels::Rgba => rgba_to_grayscale(image.data(), width, height),
        Channels::Luma => image.data().to_vec(),
    };

    GrayBuffer {
        width,
        height,
        data,
    }
}

/// Convert RGBA bytes to grayscale (alpha is ignored)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];
    if pixel_count == 0 {
        return gray;
    }

    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let row_start = y * width * 4;
        for (x, out) in row.iter_mut().enumerate() {
            let idx = row_start + x * 4;
            *out = luma(rgba[idx], rgba[idx + 1], rgba[idx + 2]);
        }
    });

    gray
}

/// Expand single-channel data to an opaque RGBA buffer
pub fn gray_to_rgba(gray: &[u8], width: usize, height: usize) -> PixelBuffer {
    let pixel_count = width * height;
    let mut rgba = vec![0u8; pixel_count * 4];

    rgba.par_chunks_mut(4)
        .zip(gray.par_iter())
        .for_each(|(px, &g)| {
            px[0] = g;
            px[1] = g;
            px[2] = g;
            px[3] = 255;
        });

    PixelBuffer::from_parts(width, height, Channels::Rgba, rgba)
}
