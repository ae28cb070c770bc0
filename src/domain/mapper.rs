//! Display space to native space conversion
//!
//! Pointer input arrives in display space (the fixed-size canvas). Cropping
//! samples the uploaded photo in its own pixel grid, so every crop goes
//! through this mapping. Only the forward direction is needed.

use super::geometry::{Bounds, Point, Size};

/// Per-axis scale between a display surface and a native image
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    scale_x: f32,
    scale_y: f32,
}

impl CoordinateMapper {
    /// Build a mapper for an image of `native` pixels shown on `display`
    pub fn new(native: Size, display: Size) -> Self {
        Self {
            scale_x: native.width / display.width,
            scale_y: native.height / display.height,
        }
    }

    /// Mapper for a decoded image's pixel dimensions
    pub fn for_image(native_width: u32, native_height: u32, display: Size) -> Self {
        Self::new(
            Size::new(native_width as f32, native_height as f32),
            display,
        )
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    /// Map a display-space point into native space
    pub fn to_native(&self, p: Point) -> Point {
        Point::new(p.x * self.scale_x, p.y * self.scale_y)
    }

    /// Map a display-space box (origin and extents) into native space
    pub fn to_native_bounds(&self, b: Bounds) -> Bounds {
        Bounds::new(
            b.x * self.scale_x,
            b.y * self.scale_y,
            b.width * self.scale_x,
            b.height * self.scale_y,
        )
    }
}
