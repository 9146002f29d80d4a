pub mod buffer;
pub mod point;
pub mod symbol;

pub use buffer::{Channels, GrayBuffer, PixelBuffer};
pub use point::Point;
pub use symbol::{DecodedSymbol, Location, Provenance};
