//! Region search controller
//!
//! Decides which crops and rescalings of the source image to try, runs each
//! one through the enhancement recipes and the injected decoder, and stops at
//! the first hit. Phases run in a fixed order:
//!
//! 1. a fine sliding window over the bottom-right quadrant,
//! 2. six coarse named regions,
//! 3. the whole image at several scales.
//!
//! Hits are returned as new [`DecodedSymbol`] records whose corners are in
//! the coordinate space of the original image.

mod multiscale;
pub mod regions;

use tracing::{debug, error, info, instrument, warn};

use crate::config::SearchConfig;
use crate::decoder::SymbolDecoder;
use crate::enhancer::{Recipe, preprocess_image_with};
use crate::error::{DecoderError, ScanError};
use crate::models::{DecodedSymbol, PixelBuffer, Provenance};

pub use regions::{NAMED_REGIONS, Rect, Region, SLIDING_WINDOW_NAME, sliding_windows};

/// Something noteworthy that happened during a search without failing it
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// No decoder was supplied, or it reported that it cannot run
    DecoderUnavailable(String),
    /// A single decode attempt errored; the search moved on
    DecodeFailed {
        /// Recipe whose candidate was being decoded
        recipe: Recipe,
        /// Decoder message
        message: String,
    },
}

/// Result of a completed search
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchOutcome {
    /// The first symbol found, in original-image coordinates
    pub symbol: Option<DecodedSymbol>,
    /// Number of decoder invocations
    pub attempts: usize,
    /// Non-fatal events, in the order they occurred
    pub diagnostics: Vec<Diagnostic>,
}

impl SearchOutcome {
    /// True when a symbol was found
    pub fn is_found(&self) -> bool {
        self.symbol.is_some()
    }

    /// True when the search could not run because the decoder was unavailable
    pub fn decoder_unavailable(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::DecoderUnavailable(_)))
    }

    /// Take the symbol out of the outcome
    pub fn into_symbol(self) -> Option<DecodedSymbol> {
        self.symbol
    }
}

/// Signal that the decoder went away mid-search
struct Halt;

/// Per-search state: the decoder, the settings and the running counters
struct Trial<'a> {
    decoder: &'a dyn SymbolDecoder,
    config: &'a SearchConfig,
    attempts: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Trial<'a> {
    fn new(decoder: &'a dyn SymbolDecoder, config: &'a SearchConfig) -> Self {
        Self {
            decoder,
            config,
            attempts: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Enhance one candidate and try each recipe's output in order
    fn try_candidate(&mut self, candidate: &PixelBuffer) -> Result<Option<(DecodedSymbol, Recipe)>, Halt> {
        if candidate.is_empty() {
            return Ok(None);
        }

        for (enhanced, recipe) in preprocess_image_with(candidate, &self.config.enhance) {
            if enhanced.is_empty() {
                continue;
            }

            self.attempts += 1;
            match self.decoder.decode(
                enhanced.data(),
                enhanced.width(),
                enhanced.height(),
                self.config.inversion,
            ) {
                Ok(Some(symbol)) => return Ok(Some((symbol, recipe))),
                Ok(None) => {}
                Err(DecoderError::Unavailable(reason)) => {
                    error!(%reason, "QR decoder unavailable, abandoning search");
                    self.diagnostics.push(Diagnostic::DecoderUnavailable(reason));
                    return Err(Halt);
                }
                Err(DecoderError::Failed(message)) => {
                    warn!(%recipe, %message, "decode attempt failed");
                    self.diagnostics.push(Diagnostic::DecodeFailed { recipe, message });
                }
            }
        }

        Ok(None)
    }

    /// Try a crop of the source and map any hit back by the crop offset
    fn try_rect(
        &mut self,
        image: &PixelBuffer,
        rect: Rect,
        name: &'static str,
    ) -> Result<Option<DecodedSymbol>, Halt> {
        if rect.is_empty() {
            debug!(region = name, "skipping zero-area region");
            return Ok(None);
        }

        debug!(region = name, x = rect.x, y = rect.y, w = rect.width, h = rect.height, "trying region");
        let crop = image.crop(rect.x, rect.y, rect.width, rect.height);
        Ok(self.try_candidate(&crop)?.map(|(symbol, recipe)| {
            symbol
                .translated(rect.x as f32, rect.y as f32)
                .with_provenance(Provenance {
                    region: Some(name),
                    recipe: Some(recipe),
                    scale: None,
                })
        }))
    }

    /// Phase A: fine windows over the bottom-right quadrant
    fn scan_sliding_window(&mut self, image: &PixelBuffer) -> Result<Option<DecodedSymbol>, Halt> {
        let windows = sliding_windows(
            image.width(),
            image.height(),
            self.config.window_fraction,
            self.config.step_fraction,
        );
        for rect in windows {
            if let Some(symbol) = self.try_rect(image, rect, SLIDING_WINDOW_NAME)? {
                return Ok(Some(symbol));
            }
        }
        Ok(None)
    }

    /// Phase B: coarse named regions
    fn scan_regions(&mut self, image: &PixelBuffer) -> Result<Option<DecodedSymbol>, Halt> {
        for region in &NAMED_REGIONS {
            let rect = region.resolve(image.width(), image.height());
            if let Some(symbol) = self.try_rect(image, rect, region.name)? {
                return Ok(Some(symbol));
            }
        }
        Ok(None)
    }

    fn run(&mut self, image: &PixelBuffer) -> Result<Option<DecodedSymbol>, Halt> {
        if self.config.sliding_window {
            if let Some(symbol) = self.scan_sliding_window(image)? {
                return Ok(Some(symbol));
            }
        }
        if self.config.named_regions {
            if let Some(symbol) = self.scan_regions(image)? {
                return Ok(Some(symbol));
            }
        }
        if self.config.multi_scale {
            if let Some(symbol) = self.scan_scales(image)? {
                return Ok(Some(symbol));
            }
        }
        Ok(None)
    }
}

/// Search an image for a QR code.
///
/// Returns `Err` only for unusable input (zero area). A missing decoder or
/// an exhausted search both yield `Ok` with `symbol == None`; the former is
/// also recorded as [`Diagnostic::DecoderUnavailable`] and logged at error
/// level.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn search(
    image: &PixelBuffer,
    decoder: Option<&dyn SymbolDecoder>,
    config: &SearchConfig,
) -> Result<SearchOutcome, ScanError> {
    if image.is_empty() {
        return Err(ScanError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }

    let Some(decoder) = decoder else {
        let reason = "no QR decoder was provided".to_string();
        error!(%reason, "QR decoder unavailable, search skipped");
        return Ok(SearchOutcome {
            symbol: None,
            attempts: 0,
            diagnostics: vec![Diagnostic::DecoderUnavailable(reason)],
        });
    };

    let mut trial = Trial::new(decoder, config);
    let symbol = trial.run(image).unwrap_or(None);

    match &symbol {
        Some(found) => info!(
            attempts = trial.attempts,
            region = found.provenance.region,
            recipe = found.provenance.recipe.map(Recipe::name),
            scale = found.provenance.scale,
            "QR code found"
        ),
        None => debug!(attempts = trial.attempts, "no QR code found"),
    }

    Ok(SearchOutcome {
        symbol,
        attempts: trial.attempts,
        diagnostics: trial.diagnostics,
    })
}
