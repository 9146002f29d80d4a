//! Pixel-level image processing
//!
//! - Grayscale conversion (RGBA to luma and back)
//! - Binarization (Otsu and adaptive local mean)
//! - Filters (sharpening, contrast stretching)
//! - Resampling (uniform rescale for the multi-scale pass)

pub mod binarization;
pub mod filters;
pub mod grayscale;
pub mod resample;
