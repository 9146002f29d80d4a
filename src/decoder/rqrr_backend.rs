use rqrr::PreparedImage;
use tracing::trace;

use super::{Inversion, SymbolDecoder};
use crate::error::DecoderError;
use crate::models::{DecodedSymbol, Location, Point};
use crate::utils::grayscale::rgba_to_grayscale;

/// [`SymbolDecoder`] backed by the `rqrr` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }

    fn decode_gray(gray: &[u8], width: usize, height: usize) -> Option<DecodedSymbol> {
        let mut prepared = PreparedImage::prepare_from_greyscale(width, height, |x, y| gray[y * width + x]);
        let grids = prepared.detect_grids();
        trace!(grids = grids.len(), "rqrr grid detection");

        grids.into_iter().find_map(|grid| {
            let content = match grid.decode() {
                Ok((_, content)) => content,
                Err(err) => {
                    trace!(%err, "rqrr grid failed to decode");
                    return None;
                }
            };
            // rqrr reports corners clockwise from the top-left
            let [tl, tr, br, bl] = grid.bounds.map(|p| Point::new(p.x as f32, p.y as f32));
            Some(
                DecodedSymbol::new(content)
                    .with_format("QR Code")
                    .with_location(Location::new(tl, tr, bl, br)),
            )
        })
    }
}

impl SymbolDecoder for RqrrDecoder {
    fn decode(
        &self,
        rgba: &[u8],
        width: usize,
        height: usize,
        inversion: Inversion,
    ) -> Result<Option<DecodedSymbol>, DecoderError> {
        if rgba.len() != width * height * 4 {
            return Err(DecoderError::Failed(format!(
                "expected {} RGBA bytes, got {}",
                width * height * 4,
                rgba.len()
            )));
        }
        if width == 0 || height == 0 {
            return Ok(None);
        }

        let gray = rgba_to_grayscale(rgba, width, height);
        for &inverted in inversion.passes() {
            let found = if inverted {
                let flipped: Vec<u8> = gray.iter().map(|&v| 255 - v).collect();
                Self::decode_gray(&flipped, width, height)
            } else {
                Self::decode_gray(&gray, width, height)
            };
            if found.is_some() {
                return Ok(found);
            }
        }

        Ok(None)
    }
}
