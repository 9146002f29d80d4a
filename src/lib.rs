//! qrscout - find QR codes in difficult photographs
//!
//! Small, off-center, skewed or badly lit QR codes often defeat a decoder
//! that only sees the whole frame once. qrscout decides *where* to look
//! (a sliding window over the bottom-right quadrant, six named regions,
//! several whole-image scales) and *how* to clean up each candidate (four
//! binarization recipes) before handing it to a [`SymbolDecoder`].
//!
//! ```no_run
//! # async fn run() -> Result<(), qrscout::ScanError> {
//! let scanner = qrscout::Scanner::new();
//! let outcome = scanner.scan_path("photo.jpg").await?;
//! if let Some(symbol) = outcome.symbol {
//!     println!("{}", symbol.text);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Loading images from files, URLs and bytes
pub mod acquire;
/// Search, enhancement and acquisition settings
pub mod config;
/// Decoder capability trait and backends
pub mod decoder;
/// Fixed enhancement recipes
pub mod enhancer;
/// Error types
pub mod error;
/// Core data structures (PixelBuffer, DecodedSymbol, Point, etc.)
pub mod models;
/// Text summaries of search outcomes
pub mod report;
/// Region search controller
pub mod search;
/// Dataset helpers shared by the CLI and benches
pub mod tools;
/// Pixel transforms (grayscale, binarization, filters, resampling)
pub mod utils;

use std::path::Path;

use tracing::instrument;

pub use config::{AcquireConfig, EnhanceParams, SearchConfig};
pub use decoder::{Inversion, SymbolDecoder};
#[cfg(feature = "rqrr")]
pub use decoder::RqrrDecoder;
pub use enhancer::{Recipe, preprocess_image};
pub use error::{AcquireError, DecoderError, ScanError};
pub use models::{DecodedSymbol, Location, PixelBuffer, Point, Provenance};
pub use report::Report;
pub use search::{Diagnostic, SearchOutcome, search};

/// Load an image file and search it
pub async fn scan_path(
    path: impl AsRef<Path>,
    decoder: Option<&dyn SymbolDecoder>,
    search_config: &SearchConfig,
    acquire_config: &AcquireConfig,
) -> Result<SearchOutcome, ScanError> {
    let image = acquire::load_from_path(path, acquire_config).await?;
    search(&image, decoder, search_config)
}

/// Download an image and search it
pub async fn scan_url(
    url: &str,
    decoder: Option<&dyn SymbolDecoder>,
    search_config: &SearchConfig,
    acquire_config: &AcquireConfig,
) -> Result<SearchOutcome, ScanError> {
    let image = acquire::load_from_url(url, acquire_config).await?;
    search(&image, decoder, search_config)
}

/// Scanner holding a decoder and settings for repeated use
pub struct Scanner {
    decoder: Option<Box<dyn SymbolDecoder + Send + Sync>>,
    search: SearchConfig,
    acquire: AcquireConfig,
}

impl Scanner {
    /// Create a scanner with the built-in decoder (if compiled in) and default settings
    pub fn new() -> Self {
        Self {
            decoder: default_decoder(),
            search: SearchConfig::default(),
            acquire: AcquireConfig::default(),
        }
    }

    /// Create a scanner configured from `QR_*` environment variables
    pub fn from_env() -> Self {
        Self {
            decoder: default_decoder(),
            search: SearchConfig::from_env(),
            acquire: AcquireConfig::from_env(),
        }
    }

    /// Replace the decoder
    pub fn with_decoder(mut self, decoder: impl SymbolDecoder + Send + Sync + 'static) -> Self {
        self.decoder = Some(Box::new(decoder));
        self
    }

    /// Remove the decoder; every scan then reports it as unavailable
    pub fn without_decoder(mut self) -> Self {
        self.decoder = None;
        self
    }

    /// Replace the search settings
    pub fn with_search_config(mut self, config: SearchConfig) -> Self {
        self.search = config;
        self
    }

    /// Replace the acquisition settings
    pub fn with_acquire_config(mut self, config: AcquireConfig) -> Self {
        self.acquire = config;
        self
    }

    /// Current search settings
    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    fn decoder(&self) -> Option<&dyn SymbolDecoder> {
        self.decoder.as_deref().map(|d| d as &dyn SymbolDecoder)
    }

    /// Search an already loaded image
    pub fn scan(&self, image: &PixelBuffer) -> Result<SearchOutcome, ScanError> {
        search(image, self.decoder(), &self.search)
    }

    /// Search raw RGBA bytes
    pub fn scan_rgba(&self, rgba: Vec<u8>, width: usize, height: usize) -> Result<SearchOutcome, ScanError> {
        let image = PixelBuffer::from_rgba(width, height, rgba)?;
        self.scan(&image)
    }

    /// Load an image file and search it
    #[instrument(skip_all)]
    pub async fn scan_path(&self, path: impl AsRef<Path>) -> Result<SearchOutcome, ScanError> {
        let image = acquire::load_from_path(path, &self.acquire).await?;
        self.scan(&image)
    }

    /// Download an image and search it
    #[instrument(skip(self))]
    pub async fn scan_url(&self, url: &str) -> Result<SearchOutcome, ScanError> {
        let image = acquire::load_from_url(url, &self.acquire).await?;
        self.scan(&image)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "rqrr")]
fn default_decoder() -> Option<Box<dyn SymbolDecoder + Send + Sync>> {
    Some(Box::new(RqrrDecoder::new()))
}

#[cfg(not(feature = "rqrr"))]
fn default_decoder() -> Option<Box<dyn SymbolDecoder + Send + Sync>> {
    None
}
