//! Decoder capability
//!
//! The search never decodes symbols itself. It hands binary RGBA candidates
//! to a [`SymbolDecoder`] supplied by the caller.

#[cfg(feature = "rqrr")]
mod rqrr_backend;

#[cfg(feature = "rqrr")]
pub use rqrr_backend::RqrrDecoder;

pub use crate::error::DecoderError;
use crate::models::DecodedSymbol;

/// Which polarities the decoder should try
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inversion {
    /// Dark modules on a light background only
    DontInvert,
    /// Light modules on a dark background only
    OnlyInvert,
    /// Normal first, then inverted
    #[default]
    AttemptBoth,
}

impl Inversion {
    /// Polarities to try, in order (`false` = as given, `true` = inverted)
    pub fn passes(self) -> &'static [bool] {
        match self {
            Inversion::DontInvert => &[false],
            Inversion::OnlyInvert => &[true],
            Inversion::AttemptBoth => &[false, true],
        }
    }
}

/// A QR symbol locator and decoder.
///
/// `rgba` holds `width * height` pixels, 4 bytes each. Returned corner points
/// are in the coordinate space of that buffer. `Ok(None)` means the attempt
/// ran and found nothing; [`DecoderError::Unavailable`] means the capability
/// cannot run at all and the search should stop.
pub trait SymbolDecoder {
    /// Attempt to decode one symbol from the buffer
    fn decode(
        &self,
        rgba: &[u8],
        width: usize,
        height: usize,
        inversion: Inversion,
    ) -> Result<Option<DecodedSymbol>, DecoderError>;
}

impl<D: SymbolDecoder + ?Sized> SymbolDecoder for &D {
    fn decode(
        &self,
        rgba: &[u8],
        width: usize,
        height: usize,
        inversion: Inversion,
    ) -> Result<Option<DecodedSymbol>, DecoderError> {
        (**self).decode(rgba, width, height, inversion)
    }
}

impl<D: SymbolDecoder + ?Sized> SymbolDecoder for Box<D> {
    fn decode(
        &self,
        rgba: &[u8],
        width: usize,
        height: usize,
        inversion: Inversion,
    ) -> Result<Option<DecodedSymbol>, DecoderError> {
        (**self).decode(rgba, width, height, inversion)
    }
}
