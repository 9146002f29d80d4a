//! Phase C: the whole image at several scales

use tracing::debug;

use super::{Halt, Trial};
use crate::models::{DecodedSymbol, PixelBuffer, Provenance};
use crate::utils::resample::{rescale, scaled_dimensions};

impl Trial<'_> {
    /// Resample the full image by each configured factor and try it.
    ///
    /// Factors whose floored output falls under the minimum dimension on
    /// either axis are skipped. Corners of a hit are divided by the factor.
    pub(super) fn scan_scales(&mut self, image: &PixelBuffer) -> Result<Option<DecodedSymbol>, Halt> {
        let min = self.config.min_scaled_dimension;
        let scales = self.config.scales.clone();

        for scale in scales {
            if !(scale.is_finite() && scale > 0.0) {
                debug!(scale, "skipping invalid scale");
                continue;
            }

            let (w, h) = scaled_dimensions(image.width(), image.height(), scale);
            if w < min || h < min {
                debug!(scale, w, h, "scaled image below minimum size");
                continue;
            }

            let Some(scaled) = rescale(image, scale) else {
                continue;
            };
            debug!(scale, w, h, "trying scale");

            if let Some((symbol, recipe)) = self.try_candidate(&scaled)? {
                return Ok(Some(symbol.unscaled(scale).with_provenance(Provenance {
                    region: None,
                    recipe: Some(recipe),
                    scale: Some(scale),
                })));
            }
        }

        Ok(None)
    }
}
