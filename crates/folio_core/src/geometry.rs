//! Layout geometry shared by the viewport and the page layout

/// Computed bounds of a laid-out element, in page coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    /// X position (absolute, after layout)
    pub x: f32,
    /// Y position (absolute, after layout)
    pub y: f32,
    /// Computed width
    pub width: f32,
    /// Computed height
    pub height: f32,
}

impl Bounds {
    /// Create new bounds
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds spanning the full width at a vertical offset
    pub fn row(y: f32, width: f32, height: f32) -> Self {
        Self::new(0.0, y, width, height)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if a point is inside the bounds
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.bottom()
    }

    /// Check if the vertical extent meets `[top, top + height]`
    ///
    /// Edges are inclusive, so an element touching the band counts, and so
    /// does a zero-height element inside it.
    pub fn overlaps_band(&self, top: f32, height: f32) -> bool {
        self.y <= top + height && self.bottom() >= top
    }
}
