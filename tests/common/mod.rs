//! Synthetic images and stand-in decoders shared by the integration tests
#![allow(dead_code)]

use qrscout::{DecodedSymbol, DecoderError, Inversion, Location, PixelBuffer, SymbolDecoder};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build an RGBA image whose gray level at (x, y) is `f(x, y)`
pub fn synth(width: usize, height: usize, f: impl Fn(usize, usize) -> u8) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let v = f(x, y);
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    PixelBuffer::from_rgba(width, height, data).unwrap()
}

/// Whether (x, y) lies on a dark cell of a checkerboard starting at `origin`
/// with `cells` cells of `cell` pixels per side
pub fn on_dark_cell(x: usize, y: usize, origin: usize, cells: usize, cell: usize) -> Option<bool> {
    let end = origin + cells * cell;
    if x < origin || y < origin || x >= end || y >= end {
        return None;
    }
    let (i, j) = ((x - origin) / cell, (y - origin) / cell);
    Some((i + j) % 2 == 0)
}

/// Stand-in for a real QR decoder that "decodes" a checkerboard.
///
/// A row matches when it holds at least `min_runs` consecutive dark/light
/// runs whose lengths are all within two pixels of `module`. A buffer decodes
/// when at least `module` rows match; the reported corners are the bounding
/// box of the matching segments. Only the red channel is read, dark < 128.
pub struct CheckerboardDecoder {
    module: usize,
    min_runs: usize,
    calls: AtomicUsize,
}

impl CheckerboardDecoder {
    pub fn new(module: usize) -> Self {
        Self {
            module,
            min_runs: 8,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Longest qualifying run sequence in a row, as (start, end) columns
    fn row_segment(&self, row: &[u8]) -> Option<(usize, usize)> {
        let lo = self.module.saturating_sub(2);
        let hi = self.module + 2;

        let mut runs = Vec::new();
        let mut start = 0;
        for x in 1..=row.len() {
            if x == row.len() || (row[x] < 128) != (row[start] < 128) {
                runs.push((start, x - start));
                start = x;
            }
        }

        let mut best: Option<(usize, usize, usize)> = None;
        let mut seq_start = 0;
        let mut seq_len = 0;
        for &(run_start, len) in &runs {
            if (lo..=hi).contains(&len) {
                if seq_len == 0 {
                    seq_start = run_start;
                }
                seq_len += 1;
                if seq_len >= self.min_runs && best.is_none_or(|(_, _, n)| seq_len > n) {
                    best = Some((seq_start, run_start + len, seq_len));
                }
            } else {
                seq_len = 0;
            }
        }
        best.map(|(s, e, _)| (s, e))
    }
}

impl SymbolDecoder for CheckerboardDecoder {
    fn decode(
        &self,
        rgba: &[u8],
        width: usize,
        height: usize,
        _inversion: Inversion,
    ) -> Result<Option<DecodedSymbol>, DecoderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if rgba.len() != width * height * 4 {
            return Err(DecoderError::Failed("bad buffer".into()));
        }

        let mut red = vec![0u8; width];
        let mut rows = 0;
        let (mut x0, mut y0, mut x1, mut y1) = (usize::MAX, usize::MAX, 0, 0);
        for y in 0..height {
            for (x, px) in rgba[y * width * 4..(y + 1) * width * 4].chunks_exact(4).enumerate() {
                red[x] = px[0];
            }
            if let Some((s, e)) = self.row_segment(&red) {
                rows += 1;
                x0 = x0.min(s);
                x1 = x1.max(e);
                y0 = y0.min(y);
                y1 = y1.max(y + 1);
            }
        }

        if rows < self.module {
            return Ok(None);
        }
        Ok(Some(
            DecodedSymbol::new("checkerboard")
                .with_format("QR Code")
                .with_location(Location::from_rect(x0 as f32, y0 as f32, x1 as f32, y1 as f32)),
        ))
    }
}

/// Reports the bounding box of all dark pixels, or nothing for a blank buffer
#[derive(Default)]
pub struct MarkerDecoder;

impl SymbolDecoder for MarkerDecoder {
    fn decode(
        &self,
        rgba: &[u8],
        width: usize,
        height: usize,
        _inversion: Inversion,
    ) -> Result<Option<DecodedSymbol>, DecoderError> {
        Ok(dark_bounds(rgba, width, height).map(|location| DecodedSymbol::new("marker").with_location(location)))
    }
}

/// Bounding box of pixels whose red channel is below 128
pub fn dark_bounds(rgba: &[u8], width: usize, height: usize) -> Option<Location> {
    let (mut x0, mut y0, mut x1, mut y1) = (usize::MAX, usize::MAX, 0, 0);
    for y in 0..height {
        for x in 0..width {
            if rgba[(y * width + x) * 4] < 128 {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x + 1);
                y1 = y1.max(y + 1);
            }
        }
    }
    (x0 != usize::MAX).then(|| Location::from_rect(x0 as f32, y0 as f32, x1 as f32, y1 as f32))
}

/// Always reports the capability as missing
pub struct UnavailableDecoder {
    pub calls: AtomicUsize,
}

impl UnavailableDecoder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl SymbolDecoder for UnavailableDecoder {
    fn decode(&self, _: &[u8], _: usize, _: usize, _: Inversion) -> Result<Option<DecodedSymbol>, DecoderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DecoderError::Unavailable("decoder library failed to load".into()))
    }
}
