#![allow(dead_code)]

use qrscout::PixelBuffer;
use qrscout::tools::{bench_limit_from_env, dataset_iter, dataset_root_from_env, load_rgba, smoke_from_env};

/// Load the benchmark dataset (possibly empty) at most 1200px on a side
pub fn load_dataset_images() -> Vec<PixelBuffer> {
    let root = dataset_root_from_env();
    dataset_iter(&root, bench_limit_from_env(), smoke_from_env())
        .filter_map(|path| load_rgba(path, Some(1200)).ok())
        .collect()
}

/// Deterministic photo-like test image: a lighting ramp with a
/// checkerboard patch in the lower right
pub fn synthetic_scene(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height * 4);
    let (x0, y0) = (width * 3 / 5, height * 3 / 5);
    for y in 0..height {
        for x in 0..width {
            let base = (40 + x * 160 / width.max(1)) as u8;
            let v = if x >= x0 && y >= y0 && x < width * 9 / 10 && y < height * 9 / 10 {
                if ((x - x0) / 8 + (y - y0) / 8) % 2 == 0 { base / 3 } else { base.saturating_add(50) }
            } else {
                base
            };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    PixelBuffer::from_rgba(width, height, data).unwrap()
}
