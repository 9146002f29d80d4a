//! Candidate rectangles: the bottom-right sliding window and the named regions

/// Name attached to hits from the sliding window pass
pub const SLIDING_WINDOW_NAME: &str = "bottom-right sliding window";

/// Integer pixel rectangle inside an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge
    pub x: usize,
    /// Top edge
    pub y: usize,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl Rect {
    /// True when the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A named sub-rectangle expressed in fractions of the image size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Label reported in provenance
    pub name: &'static str,
    /// Left edge as a fraction of the width
    pub x: f32,
    /// Top edge as a fraction of the height
    pub y: f32,
    /// Width as a fraction of the width
    pub w: f32,
    /// Height as a fraction of the height
    pub h: f32,
}

impl Region {
    const fn new(name: &'static str, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { name, x, y, w, h }
    }

    /// Pixel bounds for an image, each component floored
    pub fn resolve(&self, width: usize, height: usize) -> Rect {
        Rect {
            x: fraction_of(width, self.x),
            y: fraction_of(height, self.y),
            width: fraction_of(width, self.w),
            height: fraction_of(height, self.h),
        }
    }
}

/// Coarse regions in trial order
pub const NAMED_REGIONS: [Region; 6] = [
    Region::new("bottom-right", 0.5, 0.5, 0.5, 0.5),
    Region::new("top-right", 0.5, 0.0, 0.5, 0.5),
    Region::new("bottom-left", 0.0, 0.5, 0.5, 0.5),
    Region::new("top-left", 0.0, 0.0, 0.5, 0.5),
    Region::new("center", 0.25, 0.25, 0.5, 0.5),
    Region::new("full image", 0.0, 0.0, 1.0, 1.0),
];

fn fraction_of(dim: usize, fraction: f32) -> usize {
    (dim as f64 * fraction as f64).floor().max(0.0) as usize
}

/// Window positions for the fine scan of the bottom-right quadrant.
///
/// Windows start flush with the bottom-right corner and step left, then up,
/// never starting above or left of the image centre. A step that floors to
/// zero is raised to one pixel; a window that floors to zero yields nothing.
pub fn sliding_windows(
    width: usize,
    height: usize,
    window_fraction: f32,
    step_fraction: f32,
) -> Vec<Rect> {
    let win_w = fraction_of(width, window_fraction);
    let win_h = fraction_of(height, window_fraction);
    if win_w == 0 || win_h == 0 || win_w > width || win_h > height {
        return Vec::new();
    }

    let step_x = fraction_of(width, step_fraction).max(1) as i64;
    let step_y = fraction_of(height, step_fraction).max(1) as i64;
    let start_x = (width / 2) as i64;
    let start_y = (height / 2) as i64;

    let mut windows = Vec::new();
    let mut y = (height - win_h) as i64;
    while y >= start_y {
        let mut x = (width - win_w) as i64;
        while x >= start_x {
            let rect = Rect {
                x: x as usize,
                y: y as usize,
                width: win_w.min(width - x as usize),
                height: win_h.min(height - y as usize),
            };
            if !rect.is_empty() {
                windows.push(rect);
            }
            x -= step_x;
        }
        y -= step_y;
    }

    windows
}
