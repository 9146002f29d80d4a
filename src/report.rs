//! Human-readable summaries of a search outcome

use std::fmt;

use crate::models::DecodedSymbol;
use crate::search::SearchOutcome;

/// Format label used when the decoder did not report one
pub const DEFAULT_FORMAT: &str = "QR Code";

/// Which pass produced a hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    /// A crop of the original image
    Region(&'static str),
    /// The whole image resampled by a factor
    Scale(f32),
    /// The decoder was called directly, outside the search
    Direct,
}

impl Method {
    /// Derive the method from a symbol's provenance
    pub fn of(symbol: &DecodedSymbol) -> Self {
        match (symbol.provenance.region, symbol.provenance.scale) {
            (Some(region), _) => Method::Region(region),
            (None, Some(scale)) => Method::Scale(scale),
            (None, None) => Method::Direct,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Region(name) => write!(f, "multi-region scan ({name})"),
            Method::Scale(scale) => write!(f, "multi-scale scan (scale: {scale})"),
            Method::Direct => f.write_str("direct decode"),
        }
    }
}

/// Display adapter over a [`SearchOutcome`]
pub struct Report<'a> {
    outcome: &'a SearchOutcome,
}

impl<'a> Report<'a> {
    /// Wrap an outcome for display
    pub fn new(outcome: &'a SearchOutcome) -> Self {
        Self { outcome }
    }

    /// One-line method description, or `None` when nothing was found
    pub fn method_line(&self) -> Option<String> {
        let symbol = self.outcome.symbol.as_ref()?;
        let mut line = Method::of(symbol).to_string();
        if let Some(recipe) = symbol.provenance.recipe {
            line.push_str(&format!(" ({})", recipe.name()));
        }
        Some(line)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(symbol) = &self.outcome.symbol else {
            if self.outcome.decoder_unavailable() {
                return f.write_str("QR decoder unavailable; no scan was performed.");
            }
            return f.write_str("No QR code found. Tried region scan and multi-scale scan.");
        };

        writeln!(f, "Decoded successfully")?;
        if let Some(method) = self.method_line() {
            writeln!(f, "Method:   {method}")?;
        }
        writeln!(f, "Content:  {}", symbol.text)?;
        write!(f, "Format:   {}", symbol.format.as_deref().unwrap_or(DEFAULT_FORMAT))?;
        if let Some(location) = &symbol.location {
            let [tl, tr, bl, br] = location.corners();
            write!(
                f,
                "\nCorners:  ({:.1}, {:.1}) ({:.1}, {:.1}) ({:.1}, {:.1}) ({:.1}, {:.1})",
                tl.x, tl.y, tr.x, tr.y, bl.x, bl.y, br.x, br.y
            )?;
        }
        Ok(())
    }
}
