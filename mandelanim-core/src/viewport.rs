use serde::{Deserialize, Serialize};

/// Viewport in fractal space.
///
/// - `center_x`, `center_y`: center of the view
/// - `scale`: half the visible height; the visible width is `3 * scale`
///   and the visible height is `2 * scale`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
}

impl Viewport {
    pub fn new(center_x: f64, center_y: f64, scale: f64) -> Self {
        Self {
            center_x,
            center_y,
            scale,
        }
    }

    /// Fractal coordinate of the top-left pixel.
    pub fn origin(&self) -> (f64, f64) {
        (
            self.center_x - 1.5 * self.scale,
            self.center_y - self.scale,
        )
    }

    /// Distance in fractal space between adjacent pixels for a surface of the
    /// given size, as `(dx, dy)`.
    pub fn pixel_step(&self, width: u32, height: u32) -> (f64, f64) {
        (
            3.0 * self.scale / width.max(1) as f64,
            2.0 * self.scale / height.max(1) as f64,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(-0.5, 0.0, 1.0)
    }
}
