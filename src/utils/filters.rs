//! Intensity filters: Laplacian sharpening and percentile contrast stretch

/// 3x3 sharpening kernel, row-major
const SHARPEN_KERNEL: [i32; 9] = [0, -1, 0, -1, 5, -1, 0, -1, 0];

/// Sharpen interior pixels with a Laplacian-style kernel.
///
/// The outermost rows and columns are copied unchanged; results are clamped
/// to [0, 255].
pub fn sharpen(gray: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut result = gray.to_vec();
    if width < 3 || height < 3 {
        return result;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sum = 0i32;
            for ky in 0..3 {
                let row = (y + ky - 1) * width;
                for kx in 0..3 {
                    sum += gray[row + x + kx - 1] as i32 * SHARPEN_KERNEL[ky * 3 + kx];
                }
            }
            result[y * width + x] = sum.clamp(0, 255) as u8;
        }
    }

    result
}

/// Value at sorted position `floor(len * percent / 100)`, read from a
/// cumulative histogram instead of a sorted copy.
fn percentile(histogram: &[u64; 256], len: usize, percent: f64) -> u8 {
    let index = ((len as f64 * percent) / 100.0).floor().max(0.0) as u64;
    let index = index.min(len as u64 - 1);

    let mut seen = 0u64;
    for (value, &count) in histogram.iter().enumerate() {
        seen += count;
        if seen > index {
            return value as u8;
        }
    }
    255
}

/// Linearly remap intensities so the `min_percent` percentile maps to 0 and
/// the `max_percent` percentile maps to 255.
///
/// Flat or empty input is returned unchanged.
pub fn contrast_stretch(gray: &[u8], min_percent: f64, max_percent: f64) -> Vec<u8> {
    if gray.is_empty() {
        return Vec::new();
    }

    let mut histogram = [0u64; 256];
    for &v in gray {
        histogram[v as usize] += 1;
    }

    let low = percentile(&histogram, gray.len(), min_percent);
    let high = percentile(&histogram, gray.len(), max_percent);
    if low == high {
        return gray.to_vec();
    }

    let low = low as f64;
    let range = high as f64 - low;
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        let stretched = (v as f64 - low) / range * 255.0;
        *out = stretched.round().clamp(0.0, 255.0) as u8;
    }

    gray.iter().map(|&v| lut[v as usize]).collect()
}
