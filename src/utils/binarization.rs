//! Global (Otsu) and local (adaptive mean) thresholding
//!
//! All outputs are binary buffers: 255 where the pixel is brighter than its
//! threshold, 0 otherwise.

/// Images with fewer pixels than this use the exact sliding-window mean;
/// larger ones fall back to one mean per tile.
pub const SLIDING_WINDOW_MAX_PIXELS: usize = 50_000;

/// Calculate Otsu's optimal global threshold.
///
/// Scans split points in ascending order and keeps the first one that
/// maximises between-class variance. Empty or single-valued input returns 0.
pub fn otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total = gray.len() as u64;
    let sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_b = 0.0f64;
    let mut weight_b = 0u64;
    let mut max_variance = 0.0f64;
    let mut threshold = 0u8;

    for (i, &count) in histogram.iter().enumerate() {
        weight_b += count;
        if weight_b == 0 {
            continue;
        }
        let weight_f = total - weight_b;
        if weight_f == 0 {
            break;
        }

        sum_b += i as f64 * count as f64;
        let mean_b = sum_b / weight_b as f64;
        let mean_f = (sum - sum_b) / weight_f as f64;
        let diff = mean_b - mean_f;
        let variance = weight_b as f64 * weight_f as f64 * diff * diff;

        if variance > max_variance {
            max_variance = variance;
            threshold = i as u8;
        }
    }

    threshold
}

/// Binarize against a fixed threshold: values above it become white
pub fn threshold(gray: &[u8], threshold: u8) -> Vec<u8> {
    gray.iter()
        .map(|&v| if v > threshold { 255 } else { 0 })
        .collect()
}

/// Otsu threshold followed by binarization
pub fn otsu_binarize(gray: &[u8]) -> Vec<u8> {
    threshold(gray, otsu_threshold(gray))
}

/// Local mean thresholding.
///
/// A pixel becomes white when `value > local_mean - c`. Images under
/// [`SLIDING_WINDOW_MAX_PIXELS`] use a `block_size` window centred on each
/// pixel (shrunk at the borders); larger images use non-overlapping
/// `block_size` x `block_size` tiles sharing one mean.
pub fn adaptive_threshold(
    gray: &[u8],
    width: usize,
    height: usize,
    block_size: usize,
    c: i32,
) -> Vec<u8> {
    let block_size = block_size.max(1);
    if width * height < SLIDING_WINDOW_MAX_PIXELS {
        adaptive_sliding(gray, width, height, block_size, c)
    } else {
        adaptive_tiled(gray, width, height, block_size, c)
    }
}

/// White iff value > sum/count - c, evaluated exactly in integers
#[inline]
fn above_local_mean(value: u8, sum: u64, count: u64, c: i32) -> bool {
    (value as i64 + c as i64) * count as i64 > sum as i64
}

/// Summed-area table with a zero border: `table[(y+1)*(w+1) + (x+1)]` is the
/// sum of all pixels in `[0..=x] x [0..=y]`.
fn integral_image(gray: &[u8], width: usize, height: usize) -> Vec<u64> {
    let stride = width + 1;
    let mut table = vec![0u64; stride * (height + 1)];
    for y in 0..height {
        let mut row_sum = 0u64;
        for x in 0..width {
            row_sum += gray[y * width + x] as u64;
            table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + row_sum;
        }
    }
    table
}

fn adaptive_sliding(gray: &[u8], width: usize, height: usize, block_size: usize, c: i32) -> Vec<u8> {
    let mut result = vec![0u8; gray.len()];
    let half = block_size / 2;
    let table = integral_image(gray, width, height);
    let stride = width + 1;

    for y in 0..height {
        let y0 = y.saturating_sub(half);
        let y1 = (y + half + 1).min(height);
        for x in 0..width {
            let x0 = x.saturating_sub(half);
            let x1 = (x + half + 1).min(width);

            let sum = table[y1 * stride + x1] + table[y0 * stride + x0]
                - table[y0 * stride + x1]
                - table[y1 * stride + x0];
            let count = ((y1 - y0) * (x1 - x0)) as u64;

            let idx = y * width + x;
            if above_local_mean(gray[idx], sum, count, c) {
                result[idx] = 255;
            }
        }
    }

    result
}

fn adaptive_tiled(gray: &[u8], width: usize, height: usize, block_size: usize, c: i32) -> Vec<u8> {
    let mut result = vec![0u8; gray.len()];

    for by in (0..height).step_by(block_size) {
        let y_end = (by + block_size).min(height);
        for bx in (0..width).step_by(block_size) {
            let x_end = (bx + block_size).min(width);

            let mut sum = 0u64;
            for y in by..y_end {
                sum += gray[y * width + bx..y * width + x_end]
                    .iter()
                    .map(|&v| v as u64)
                    .sum::<u64>();
            }
            let count = ((y_end - by) * (x_end - bx)) as u64;

            for y in by..y_end {
                for x in bx..x_end {
                    let idx = y * width + x;
                    if above_local_mean(gray[idx], sum, count, c) {
                        result[idx] = 255;
                    }
                }
            }
        }
    }

    result
}
