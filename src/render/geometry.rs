//! Path construction shared by canvas drawing and crop clipping

use tiny_skia::{Path, PathBuilder};

use crate::domain::{Point, RegionShape};

/// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
pub const BEZIER_K: f32 = 0.552_284_8;

/// Build a circle path using cubic bezier curves
pub fn circle_path(cx: f32, cy: f32, r: f32) -> Option<Path> {
    let k = r * BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - r);

    // Top to right
    pb.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);

    // Right to bottom
    pb.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);

    // Bottom to left
    pb.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);

    // Left to top
    pb.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);

    pb.close();
    pb.finish()
}

/// Build a rectangle path from origin and extents
pub fn rect_path(x: f32, y: f32, width: f32, height: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(x, y);
    pb.line_to(x + width, y);
    pb.line_to(x + width, y + height);
    pb.line_to(x, y + height);
    pb.close();
    pb.finish()
}

/// Build a polygon through `points`, shifted by `-offset`
///
/// The path is closed once it has at least three points; shorter inputs stay
/// open so an in-progress trace still shows its segment.
pub fn polygon_path(points: &[Point], offset: Point) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x - offset.x, first.y - offset.y);
    for p in rest {
        pb.line_to(p.x - offset.x, p.y - offset.y);
    }
    if points.len() >= 3 {
        pb.close();
    }
    pb.finish()
}

/// Outline of a shape in display space, `None` if it has no area to draw
pub fn shape_path(shape: &RegionShape) -> Option<Path> {
    match shape {
        RegionShape::Rectangle {
            x,
            y,
            width,
            height,
        } => rect_path(*x, *y, *width, *height),
        RegionShape::Circle { x, y, radius } => circle_path(*x, *y, *radius),
        RegionShape::Polyline { points } => polygon_path(points, Point::default()),
    }
}
