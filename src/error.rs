//! Error types for acquisition, input validation and decoder capability

use thiserror::Error;

/// Errors surfaced to callers of the search entrypoints.
///
/// "No QR code found" is not an error; see [`crate::SearchOutcome`].
#[derive(Debug, Error)]
pub enum ScanError {
    /// The image has zero width or zero height
    #[error("image has zero area ({width}x{height})")]
    EmptyImage {
        /// Image width in pixels
        width: usize,
        /// Image height in pixels
        height: usize,
    },

    /// The pixel data does not match the declared dimensions
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// Bytes implied by width, height and channel count
        expected: usize,
        /// Bytes actually supplied
        actual: usize,
    },

    /// The source image could not be loaded
    #[error(transparent)]
    Acquire(#[from] AcquireError),
}

/// Errors raised while loading an image into a pixel buffer.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Reading the file failed
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a decodable image
    #[error("malformed image: {0}")]
    Decode(#[from] image::ImageError),

    /// The URL could not be parsed or uses an unsupported scheme
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Transport failure or non-success HTTP status
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-image content type
    #[error("not an image (content type {0})")]
    UnsupportedContent(String),

    /// The payload exceeds the configured size limit
    #[error("image too large: {size} bytes (limit {limit})")]
    TooLarge {
        /// Reported or received size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// The caller cancelled the load
    #[error("image load cancelled")]
    Cancelled,
}

/// Errors a [`crate::decoder::SymbolDecoder`] may report.
///
/// A decode attempt that simply finds nothing returns `Ok(None)` instead.
#[derive(Debug, Clone, Error)]
pub enum DecoderError {
    /// The decoding capability is not loaded or cannot run at all
    #[error("decoder unavailable: {0}")]
    Unavailable(String),

    /// A single attempt failed in a way other than "nothing found"
    #[error("decode attempt failed: {0}")]
    Failed(String),
}
