use super::Point;
use crate::enhancer::Recipe;

/// Four corners of a located symbol
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    /// Top-left corner
    pub top_left: Point,
    /// Top-right corner
    pub top_right: Point,
    /// Bottom-left corner
    pub bottom_left: Point,
    /// Bottom-right corner
    pub bottom_right: Point,
}

impl Location {
    /// Create a location from its corners
    pub fn new(top_left: Point, top_right: Point, bottom_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// Axis-aligned rectangle spanning (x0, y0) to (x1, y1)
    pub fn from_rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x0, y1),
            Point::new(x1, y1),
        )
    }

    /// Corners in the order top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }

    fn map(&self, f: impl Fn(&Point) -> Point) -> Self {
        Self {
            top_left: f(&self.top_left),
            top_right: f(&self.top_right),
            bottom_left: f(&self.bottom_left),
            bottom_right: f(&self.bottom_right),
        }
    }
}

/// How a symbol was found
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Provenance {
    /// Name of the search region that contained the symbol
    pub region: Option<&'static str>,
    /// Enhancement recipe whose output decoded
    pub recipe: Option<Recipe>,
    /// Resampling factor applied to the whole image
    pub scale: Option<f32>,
}

/// Result of a successful decode
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSymbol {
    /// Decoded text payload
    pub text: String,
    /// Symbology label reported by the decoder
    pub format: Option<String>,
    /// Corner points, in the coordinate space of the buffer last mapped into
    pub location: Option<Location>,
    /// Search metadata
    pub provenance: Provenance,
}

impl DecodedSymbol {
    /// A symbol with text only
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: None,
            location: None,
            provenance: Provenance::default(),
        }
    }

    /// Attach a format label
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Attach corner points
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// New record with corners shifted by a crop offset
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            location: self.location.map(|l| l.map(|p| p.translate(dx, dy))),
            ..self
        }
    }

    /// New record with corners mapped out of a buffer resampled by `factor`
    pub fn unscaled(self, factor: f32) -> Self {
        Self {
            location: self.location.map(|l| l.map(|p| p.unscale(factor))),
            ..self
        }
    }

    /// New record carrying the given provenance
    pub fn with_provenance(self, provenance: Provenance) -> Self {
        Self { provenance, ..self }
    }
}
