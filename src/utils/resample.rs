//! Whole-image resampling for the multi-scale pass

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbaImage};

use crate::models::{Channels, PixelBuffer};

/// Dimensions after scaling by `factor`, floored
pub fn scaled_dimensions(width: usize, height: usize, factor: f32) -> (usize, usize) {
    let w = (width as f64 * factor as f64).floor().max(0.0) as usize;
    let h = (height as f64 * factor as f64).floor().max(0.0) as usize;
    (w, h)
}

/// Resize to exactly `new_width` x `new_height` with a triangle (bilinear) filter.
///
/// Returns `None` when either the source or the target has zero area.
pub fn resize(image: &PixelBuffer, new_width: usize, new_height: usize) -> Option<PixelBuffer> {
    if image.is_empty() || new_width == 0 || new_height == 0 {
        return None;
    }

    let (w, h) = (image.width() as u32, image.height() as u32);
    let (nw, nh) = (new_width as u32, new_height as u32);
    let data = match image.channels() {
        Channels::Rgba => {
            let src = RgbaImage::from_raw(w, h, image.data().to_vec())?;
            imageops::resize(&src, nw, nh, FilterType::Triangle).into_raw()
        }
        Channels::Luma => {
            let src = GrayImage::from_raw(w, h, image.data().to_vec())?;
            imageops::resize(&src, nw, nh, FilterType::Triangle).into_raw()
        }
    };

    Some(PixelBuffer::from_parts(
        new_width,
        new_height,
        image.channels(),
        data,
    ))
}

/// Resample by a uniform factor (see [`scaled_dimensions`])
pub fn rescale(image: &PixelBuffer, factor: f32) -> Option<PixelBuffer> {
    let (nw, nh) = scaled_dimensions(image.width(), image.height(), factor);
    resize(image, nw, nh)
}
