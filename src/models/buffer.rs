use crate::error::ScanError;

/// Pixel layout of a [`PixelBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// 4 bytes per pixel (red, green, blue, alpha)
    Rgba,
    /// 1 byte per pixel (grayscale or binary intensity)
    Luma,
}

impl Channels {
    /// Bytes per pixel
    pub fn count(self) -> usize {
        match self {
            Channels::Rgba => 4,
            Channels::Luma => 1,
        }
    }
}

/// Rectangular, immutable pixel array.
///
/// Every transform in this crate borrows a buffer and returns a new one, so a
/// single source image can back any number of concurrent searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: Channels,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap RGBA bytes (4 per pixel, row-major)
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ScanError> {
        Self::new(width, height, Channels::Rgba, data)
    }

    /// Wrap single-channel intensity bytes (row-major)
    pub fn from_luma(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ScanError> {
        Self::new(width, height, Channels::Luma, data)
    }

    /// Wrap bytes with an explicit layout, validating the length
    pub fn new(
        width: usize,
        height: usize,
        channels: Channels,
        data: Vec<u8>,
    ) -> Result<Self, ScanError> {
        let expected = width * height * channels.count();
        if data.len() != expected {
            return Err(ScanError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// A zero-area buffer
    pub fn empty(channels: Channels) -> Self {
        Self {
            width: 0,
            height: 0,
            channels,
            data: Vec::new(),
        }
    }

    /// Constructor for internal transforms whose output length is correct by construction
    pub(crate) fn from_parts(width: usize, height: usize, channels: Channels, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * channels.count());
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel layout
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Raw channel bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its bytes
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// True when width or height is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Copy out the rectangle at (x, y) of size w x h, clipped to the image.
    ///
    /// A rectangle lying entirely outside the image yields an empty buffer.
    pub fn crop(&self, x: usize, y: usize, w: usize, h: usize) -> PixelBuffer {
        let x_end = (x.saturating_add(w)).min(self.width);
        let y_end = (y.saturating_add(h)).min(self.height);
        if x >= x_end || y >= y_end {
            return PixelBuffer::empty(self.channels);
        }

        let cw = x_end - x;
        let ch = y_end - y;
        let bpp = self.channels.count();
        let row_bytes = cw * bpp;
        let mut data = Vec::with_capacity(row_bytes * ch);
        for row in y..y_end {
            let start = (row * self.width + x) * bpp;
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }

        PixelBuffer::from_parts(cw, ch, self.channels, data)
    }
}

/// Single-channel luma image (1 byte per pixel, `data.len() == width * height`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GrayBuffer {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Intensities, row-major
    pub data: Vec<u8>,
}

impl GrayBuffer {
    /// True when the buffer holds no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
