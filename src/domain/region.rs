//! Region shapes marked on a photo
//!
//! All shapes store display-space coordinates. Native resolution only comes
//! into play when a shape is cropped.

use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Point};
use crate::config::ShapeTool;

/// Minimum number of points for a closed polyline
pub const MIN_POLYLINE_POINTS: usize = 3;

/// A committed (or previewed) region of an image
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RegionShape {
    /// Top-left corner plus extents
    Rectangle {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Center plus radius
    Circle { x: f32, y: f32, radius: f32 },
    /// Closed free-form polygon
    Polyline { points: Vec<Point> },
}

impl RegionShape {
    pub fn rectangle(bounds: Bounds) -> Self {
        RegionShape::Rectangle {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
        }
    }

    pub fn circle(center: Point, radius: f32) -> Self {
        RegionShape::Circle {
            x: center.x,
            y: center.y,
            radius,
        }
    }

    pub fn polyline(points: Vec<Point>) -> Self {
        RegionShape::Polyline { points }
    }

    /// The tool that produces this kind of shape
    pub fn tool(&self) -> ShapeTool {
        match self {
            RegionShape::Rectangle { .. } => ShapeTool::Rectangle,
            RegionShape::Circle { .. } => ShapeTool::Circle,
            RegionShape::Polyline { .. } => ShapeTool::Polyline,
        }
    }

    /// Check the shape invariants a committed region must hold
    pub fn is_committable(&self) -> bool {
        match self {
            RegionShape::Rectangle { width, height, .. } => *width > 0.0 && *height > 0.0,
            RegionShape::Circle { radius, .. } => *radius > 0.0,
            RegionShape::Polyline { points } => points.len() >= MIN_POLYLINE_POINTS,
        }
    }

    /// Axis-aligned display-space box around the shape
    pub fn bounds(&self) -> Bounds {
        match self {
            RegionShape::Rectangle {
                x,
                y,
                width,
                height,
            } => Bounds::new(*x, *y, *width, *height),
            RegionShape::Circle { x, y, radius } => {
                Bounds::new(x - radius, y - radius, radius * 2.0, radius * 2.0)
            }
            RegionShape::Polyline { points } => Bounds::enclosing(points).unwrap_or_default(),
        }
    }
}
