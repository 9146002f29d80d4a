//! Search, enhancement and acquisition settings
//!
//! Every struct defaults to the tuned values; `from_env` applies `QR_*`
//! environment overrides on top of the defaults.

use crate::decoder::Inversion;

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
}

fn parse_env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name).as_deref().map(str::trim) {
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES") => true,
        Ok("0") | Ok("false") | Ok("FALSE") | Ok("no") | Ok("NO") => false,
        _ => default,
    }
}

fn parse_env_list(name: &str) -> Option<Vec<f32>> {
    let raw = std::env::var(name).ok()?;
    let values: Vec<f32> = raw
        .split(',')
        .filter_map(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    if values.is_empty() { None } else { Some(values) }
}

/// Parameters shared by the enhancement recipes
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceParams {
    /// Neighbourhood / tile size for adaptive thresholding
    pub adaptive_block_size: usize,
    /// Constant subtracted from the local mean
    pub adaptive_c: i32,
    /// Lower percentile mapped to 0 by contrast stretching
    pub stretch_min_percent: f64,
    /// Upper percentile mapped to 255 by contrast stretching
    pub stretch_max_percent: f64,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            adaptive_block_size: 15,
            adaptive_c: 10,
            stretch_min_percent: 2.0,
            stretch_max_percent: 98.0,
        }
    }
}

/// Region search settings
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Sliding window size as a fraction of each image dimension
    pub window_fraction: f32,
    /// Sliding window step as a fraction of each image dimension
    pub step_fraction: f32,
    /// Whole-image scale factors, tried in order
    pub scales: Vec<f32>,
    /// Rescaled images smaller than this on either axis are skipped
    pub min_scaled_dimension: usize,
    /// Inversion mode requested from the decoder
    pub inversion: Inversion,
    /// Run the bottom-right sliding window pass
    pub sliding_window: bool,
    /// Run the named region pass
    pub named_regions: bool,
    /// Run the multi-scale pass
    pub multi_scale: bool,
    /// Recipe parameters
    pub enhance: EnhanceParams,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            window_fraction: 0.25,
            step_fraction: 0.15,
            scales: vec![1.5, 2.0, 0.75, 0.5],
            min_scaled_dimension: 100,
            inversion: Inversion::AttemptBoth,
            sliding_window: true,
            named_regions: true,
            multi_scale: true,
            enhance: EnhanceParams::default(),
        }
    }
}

impl SearchConfig {
    /// Defaults with environment overrides.
    ///
    /// Recognised variables: `QR_WINDOW_FRACTION`, `QR_STEP_FRACTION`,
    /// `QR_SCALES` (comma separated), `QR_MIN_SCALED_DIM`,
    /// `QR_SKIP_SLIDING_WINDOW`, `QR_SKIP_REGIONS`, `QR_SKIP_MULTISCALE`,
    /// `QR_ADAPTIVE_BLOCK`, `QR_ADAPTIVE_C`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let enhance = EnhanceParams {
            adaptive_block_size: parse_env::<usize>("QR_ADAPTIVE_BLOCK")
                .filter(|&v| v > 0)
                .unwrap_or(defaults.enhance.adaptive_block_size),
            adaptive_c: parse_env("QR_ADAPTIVE_C").unwrap_or(defaults.enhance.adaptive_c),
            ..defaults.enhance.clone()
        };

        Self {
            window_fraction: parse_env::<f32>("QR_WINDOW_FRACTION")
                .filter(|v| *v > 0.0 && *v <= 1.0)
                .unwrap_or(defaults.window_fraction),
            step_fraction: parse_env::<f32>("QR_STEP_FRACTION")
                .filter(|v| *v > 0.0 && *v <= 1.0)
                .unwrap_or(defaults.step_fraction),
            scales: parse_env_list("QR_SCALES").unwrap_or(defaults.scales),
            min_scaled_dimension: parse_env("QR_MIN_SCALED_DIM")
                .unwrap_or(defaults.min_scaled_dimension),
            inversion: defaults.inversion,
            sliding_window: !parse_env_bool("QR_SKIP_SLIDING_WINDOW", false),
            named_regions: !parse_env_bool("QR_SKIP_REGIONS", false),
            multi_scale: !parse_env_bool("QR_SKIP_MULTISCALE", false),
            enhance,
        }
    }
}

/// Image acquisition settings
#[derive(Debug, Clone, PartialEq)]
pub struct AcquireConfig {
    /// Largest accepted payload in bytes
    pub max_bytes: u64,
    /// Whole-request timeout for URL loads, in milliseconds
    pub timeout_ms: u64,
    /// Downscale loaded images so the longer side is at most this (0 = off)
    pub max_dimension: u32,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            max_bytes: 32 * 1024 * 1024,
            timeout_ms: 15_000,
            max_dimension: 0,
        }
    }
}

impl AcquireConfig {
    /// Defaults with `QR_MAX_BYTES`, `QR_TIMEOUT_MS` and `QR_MAX_DIM` overrides
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_bytes: parse_env("QR_MAX_BYTES").unwrap_or(defaults.max_bytes),
            timeout_ms: parse_env("QR_TIMEOUT_MS").unwrap_or(defaults.timeout_ms),
            max_dimension: parse_env("QR_MAX_DIM").unwrap_or(defaults.max_dimension),
        }
    }
}
