//! Image acquisition
//!
//! Loads a file, a URL or an in-memory byte slice into an RGBA
//! [`PixelBuffer`]. Failures here are [`AcquireError`]s and are never
//! confused with "no QR code in the image".

use std::path::Path;
use std::time::Duration;

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::{debug, info, instrument};

use crate::config::AcquireConfig;
use crate::error::AcquireError;
use crate::models::{Channels, PixelBuffer};

const BUFFER_INITIAL_CAPACITY: usize = 64 * 1024;

/// Decode encoded image bytes (PNG, JPEG, GIF, BMP, ...) into RGBA pixels
pub fn load_from_bytes(bytes: &[u8], config: &AcquireConfig) -> Result<PixelBuffer, AcquireError> {
    if bytes.len() as u64 > config.max_bytes {
        return Err(AcquireError::TooLarge {
            size: bytes.len() as u64,
            limit: config.max_bytes,
        });
    }

    let img = image::load_from_memory(bytes)?;
    Ok(into_pixel_buffer(img, config.max_dimension))
}

/// Read and decode an image file
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_from_path(
    path: impl AsRef<Path>,
    config: &AcquireConfig,
) -> Result<PixelBuffer, AcquireError> {
    let path = path.as_ref();
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > config.max_bytes {
        return Err(AcquireError::TooLarge {
            size: metadata.len(),
            limit: config.max_bytes,
        });
    }

    let bytes = tokio::fs::read(path).await?;
    debug!(bytes = bytes.len(), "file read");
    load_from_bytes(&bytes, config)
}

/// Download and decode an image over HTTP(S)
pub async fn load_from_url(url: &str, config: &AcquireConfig) -> Result<PixelBuffer, AcquireError> {
    load_from_url_with_cancel(url, config, || false).await
}

/// Download and decode an image, polling `is_cancelled` between chunks.
///
/// The scheme must be `http` or `https`. A non-success status, a non-image
/// content type, or a body over `config.max_bytes` is rejected before the
/// bytes reach the image decoder.
#[instrument(skip(config, is_cancelled))]
pub async fn load_from_url_with_cancel<C>(
    url: &str,
    config: &AcquireConfig,
    is_cancelled: C,
) -> Result<PixelBuffer, AcquireError>
where
    C: Fn() -> bool + Send + Sync,
{
    let parsed = validate_url(url)?;
    if is_cancelled() {
        return Err(AcquireError::Cancelled);
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
        .map_err(|e| AcquireError::Network(e.to_string()))?;

    info!("downloading image");
    let mut response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| AcquireError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AcquireError::Network(format!("HTTP {}", status.as_u16())));
    }

    if let Some(ct) = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !is_image_content_type(ct) {
            return Err(AcquireError::UnsupportedContent(ct.to_string()));
        }
    }

    let declared = response.content_length();
    if let Some(size) = declared {
        if size > config.max_bytes {
            return Err(AcquireError::TooLarge {
                size,
                limit: config.max_bytes,
            });
        }
    }

    let capacity = declared
        .map(|len| len.min(config.max_bytes) as usize)
        .filter(|len| *len > 0)
        .unwrap_or(BUFFER_INITIAL_CAPACITY);
    let mut buffer = Vec::with_capacity(capacity);

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| AcquireError::Network(e.to_string()))?
    {
        if is_cancelled() {
            return Err(AcquireError::Cancelled);
        }
        let size = (buffer.len() + chunk.len()) as u64;
        if size > config.max_bytes {
            return Err(AcquireError::TooLarge {
                size,
                limit: config.max_bytes,
            });
        }
        buffer.extend_from_slice(&chunk);
    }

    debug!(bytes = buffer.len(), "download complete");
    load_from_bytes(&buffer, config)
}

fn validate_url(url: &str) -> Result<reqwest::Url, AcquireError> {
    let parsed = reqwest::Url::parse(url.trim()).map_err(|e| AcquireError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(AcquireError::InvalidUrl(format!("unsupported scheme `{other}`"))),
    }
}

fn is_image_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("image/") || mime == "application/octet-stream"
}

fn into_pixel_buffer(img: DynamicImage, max_dimension: u32) -> PixelBuffer {
    let img = if max_dimension > 0 && img.width().max(img.height()) > max_dimension {
        img.resize(max_dimension, max_dimension, FilterType::Triangle)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    PixelBuffer::from_parts(width, height, Channels::Rgba, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, _| {
            if x % 2 == 0 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img).write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_bytes_decode_to_rgba() {
        let buffer = load_from_bytes(&png_bytes(6, 4), &AcquireConfig::default()).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (6, 4));
        assert_eq!(buffer.data().len(), 6 * 4 * 4);
        assert_eq!(&buffer.data()[..8], &[0, 0, 0, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_corrupt_bytes_rejected() {
        let err = load_from_bytes(b"definitely not a png", &AcquireConfig::default()).unwrap_err();
        assert!(matches!(err, AcquireError::Decode(_)));
    }

    #[test]
    fn test_size_limit() {
        let config = AcquireConfig {
            max_bytes: 10,
            ..AcquireConfig::default()
        };
        let err = load_from_bytes(&png_bytes(6, 4), &config).unwrap_err();
        assert!(matches!(err, AcquireError::TooLarge { limit: 10, .. }));
    }

    #[test]
    fn test_max_dimension_downscales() {
        let config = AcquireConfig {
            max_dimension: 50,
            ..AcquireConfig::default()
        };
        let buffer = load_from_bytes(&png_bytes(200, 100), &config).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (50, 25));
    }

    #[tokio::test]
    async fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pattern.png");
        std::fs::write(&path, png_bytes(8, 3)).unwrap();

        let buffer = load_from_path(&path, &AcquireConfig::default()).await.unwrap();
        assert_eq!((buffer.width(), buffer.height()), (8, 3));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(dir.path().join("absent.png"), &AcquireConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AcquireError::Io(_)));
    }

    #[tokio::test]
    async fn test_url_scheme_rejected() {
        for url in ["ftp://example.com/a.png", "file:///tmp/a.png", "not a url"] {
            let err = load_from_url(url, &AcquireConfig::default()).await.unwrap_err();
            assert!(matches!(err, AcquireError::InvalidUrl(_)), "{url}");
        }
    }

    #[tokio::test]
    async fn test_cancel_before_request() {
        let err = load_from_url_with_cancel("http://127.0.0.1:9/a.png", &AcquireConfig::default(), || true)
            .await
            .unwrap_err();
        assert!(matches!(err, AcquireError::Cancelled));
    }

    #[test]
    fn test_content_types() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("IMAGE/JPEG; charset=binary"));
        assert!(!is_image_content_type("text/html; charset=utf-8"));
    }
}
