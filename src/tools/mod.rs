//! Dataset helpers shared by the `qrscout` binary and the benches

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;

use crate::models::{Channels, PixelBuffer};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

fn env_flag(name: &str) -> bool {
    matches!(
        env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

/// Load an image file synchronously as RGBA, shrinking it so the longer
/// side is at most `max_dim` when one is given.
pub fn load_rgba<P: AsRef<Path>>(path: P, max_dim: Option<u32>) -> Result<PixelBuffer, image::ImageError> {
    let img = image::open(path)?;
    let img = match max_dim {
        Some(max_dim) if img.width().max(img.height()) > max_dim => {
            img.resize(max_dim, max_dim, FilterType::Triangle)
        }
        _ => img,
    };
    let rgba = img.to_rgba8();
    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    Ok(PixelBuffer::from_parts(width, height, Channels::Rgba, rgba.into_raw()))
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
    /// Fraction of pixels that are exactly 0, in thousandths
    pub black_permille: u16,
}

/// Compute min/max/avg and the share of black pixels
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    if gray.is_empty() {
        return GrayStats {
            min: 0,
            max: 0,
            avg: 0,
            black_permille: 0,
        };
    }

    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    let mut black = 0usize;
    for &v in gray {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
        black += (v == 0) as usize;
    }
    GrayStats {
        min,
        max,
        avg: (sum / gray.len() as u64) as u8,
        black_permille: (black * 1000 / gray.len()) as u16,
    }
}

/// Dataset root from `QR_DATASET_ROOT`, defaulting to `benches/images`
pub fn dataset_root_from_env() -> PathBuf {
    env::var("QR_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("benches/images"))
}

/// Image limit from `QR_BENCH_LIMIT`; unset or `0` means the full dataset
pub fn bench_limit_from_env() -> Option<usize> {
    env::var("QR_BENCH_LIMIT")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&v| v > 0)
}

/// Smoke-run flag from `QR_SMOKE`
pub fn smoke_from_env() -> bool {
    env_flag("QR_SMOKE")
}

/// Whether a dataset image is labelled as containing a QR code.
///
/// A sibling `.txt` file with at least one non-comment line marks the
/// image as positive; a missing label file marks it negative.
pub fn expects_qr(image_path: &Path) -> bool {
    fs::read_to_string(image_path.with_extension("txt"))
        .map(|content| {
            content
                .lines()
                .map(str::trim)
                .any(|line| !line.is_empty() && !line.starts_with('#'))
        })
        .unwrap_or(false)
}

/// Iterate dataset image paths with optional smoke list and limit.
///
/// In smoke mode `_smoke.txt` under the root lists the images to use, one
/// per line; without it the whole tree is used.
pub fn dataset_iter<P: AsRef<Path>>(root: P, limit: Option<usize>, smoke: bool) -> impl Iterator<Item = PathBuf> {
    let root = root.as_ref();
    let mut images = if smoke {
        load_smoke_list(root).unwrap_or_else(|| collect_images(root))
    } else {
        collect_images(root)
    };

    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn load_smoke_list(root: &Path) -> Option<Vec<PathBuf>> {
    let contents = fs::read_to_string(root.join("_smoke.txt")).ok()?;
    let paths: Vec<PathBuf> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| root.join(line))
        .filter(|path| path.exists())
        .collect();
    if paths.is_empty() { None } else { Some(paths) }
}

/// Every image file under `root`, recursively
pub fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let is_image = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
            if is_image {
                images.push(path);
            }
        }
    }

    images
}
