//! Enhancement recipes
//!
//! Each recipe turns one colour image into a binary RGBA candidate. The
//! order of [`Recipe::ALL`] is the order the search hands candidates to the
//! decoder, most effective first.

use std::fmt;

use crate::config::EnhanceParams;
use crate::models::PixelBuffer;
use crate::utils::binarization::{adaptive_threshold, otsu_binarize};
use crate::utils::filters::{contrast_stretch, sharpen};
use crate::utils::grayscale::{gray_to_rgba, grayscale};

/// One fixed enhancement procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipe {
    /// Contrast stretch, then Otsu. Best against uneven exposure.
    ContrastOtsu,
    /// Adaptive local-mean threshold. Handles strong lighting gradients.
    Adaptive,
    /// Sharpen, then Otsu. Recovers edges in blurry captures.
    SharpenOtsu,
    /// Otsu on raw grayscale. Cheap baseline for clean images.
    Otsu,
}

impl Recipe {
    /// All recipes in trial order
    pub const ALL: [Recipe; 4] = [
        Recipe::ContrastOtsu,
        Recipe::Adaptive,
        Recipe::SharpenOtsu,
        Recipe::Otsu,
    ];

    /// Stable label used in provenance and reports
    pub fn name(self) -> &'static str {
        match self {
            Recipe::ContrastOtsu => "method1",
            Recipe::Adaptive => "method2",
            Recipe::SharpenOtsu => "method3",
            Recipe::Otsu => "method4",
        }
    }

    /// Short human description
    pub fn description(self) -> &'static str {
        match self {
            Recipe::ContrastOtsu => "contrast stretch + Otsu threshold",
            Recipe::Adaptive => "adaptive threshold",
            Recipe::SharpenOtsu => "sharpen + Otsu threshold",
            Recipe::Otsu => "Otsu threshold",
        }
    }

    /// Apply this recipe to a grayscale image, returning a binary buffer
    pub fn apply(self, gray: &[u8], width: usize, height: usize, params: &EnhanceParams) -> Vec<u8> {
        match self {
            Recipe::ContrastOtsu => {
                let stretched = contrast_stretch(gray, params.stretch_min_percent, params.stretch_max_percent);
                otsu_binarize(&stretched)
            }
            Recipe::Adaptive => adaptive_threshold(
                gray,
                width,
                height,
                params.adaptive_block_size,
                params.adaptive_c,
            ),
            Recipe::SharpenOtsu => otsu_binarize(&sharpen(gray, width, height)),
            Recipe::Otsu => otsu_binarize(gray),
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Produce the four binary candidates for an image with default parameters
pub fn preprocess_image(image: &PixelBuffer) -> Vec<(PixelBuffer, Recipe)> {
    preprocess_image_with(image, &EnhanceParams::default())
}

/// Produce the four binary candidates, in [`Recipe::ALL`] order, as RGBA buffers
pub fn preprocess_image_with(image: &PixelBuffer, params: &EnhanceParams) -> Vec<(PixelBuffer, Recipe)> {
    let gray = grayscale(image);
    Recipe::ALL
        .iter()
        .map(|&recipe| {
            let binary = recipe.apply(&gray.data, gray.width, gray.height, params);
            (gray_to_rgba(&binary, gray.width, gray.height), recipe)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Channels;

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 255) / width.max(1)) as u8;
                data.extend_from_slice(&[v, v / 2, (y % 256) as u8, 255]);
            }
        }
        PixelBuffer::from_rgba(width, height, data).unwrap()
    }

    #[test]
    fn test_recipe_names_in_trial_order() {
        let names: Vec<_> = Recipe::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["method1", "method2", "method3", "method4"]);
        assert_eq!(Recipe::Adaptive.to_string(), "method2");
    }

    #[test]
    fn test_preprocess_yields_four_binary_rgba() {
        let image = gradient(64, 48);
        let candidates = preprocess_image(&image);
        assert_eq!(candidates.len(), 4);

        for ((buffer, recipe), expected) in candidates.iter().zip(Recipe::ALL) {
            assert_eq!(*recipe, expected);
            assert_eq!(buffer.channels(), Channels::Rgba);
            assert_eq!((buffer.width(), buffer.height()), (64, 48));
            for px in buffer.data().chunks(4) {
                assert!(px[0] == 0 || px[0] == 255);
                assert_eq!(px[0], px[1]);
                assert_eq!(px[1], px[2]);
                assert_eq!(px[3], 255);
            }
        }
    }

    #[test]
    fn test_preprocess_does_not_touch_input() {
        let image = gradient(16, 16);
        let copy = image.clone();
        let _ = preprocess_image(&image);
        assert_eq!(image, copy);
    }

    #[test]
    fn test_preprocess_empty_image() {
        let candidates = preprocess_image(&PixelBuffer::empty(Channels::Rgba));
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|(b, _)| b.is_empty()));
    }
}
