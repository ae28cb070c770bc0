//! Display surface replay
//!
//! The surface is a plain bitmap, so a single region can never be erased on
//! its own. Every change repaints everything from the authoritative tag list:
//! clear, base image, committed regions in insertion order, then the preview.

use anyhow::Context;
use image::RgbaImage;
use tiny_skia::{
    Color, FillRule, FilterQuality, LineCap, LineJoin, Paint, Pixmap, PixmapPaint, Stroke,
    Transform,
};

use super::geometry::shape_path;
use super::image::rgba_from_pixmap;
use crate::config::TaggerConfig;
use crate::domain::{RegionShape, Size};
use crate::photo::SourceImage;

/// Fill and stroke used for every region, committed or preview
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
    pub fill: [u8; 4],
    pub stroke: [u8; 4],
    pub stroke_width: f32,
}

impl RenderStyle {
    pub fn from_config(config: &TaggerConfig) -> Self {
        Self {
            fill: config.fill_color.to_rgba_u8(config.fill_opacity),
            stroke: config.stroke_color.to_rgba_u8(1.0),
            stroke_width: config.stroke_width,
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from_config(&TaggerConfig::default())
    }
}

/// Fixed-size display surface
#[derive(Clone, Debug)]
pub struct Canvas {
    surface: Pixmap,
    size: Size,
}

impl Canvas {
    pub fn new(size: Size) -> anyhow::Result<Self> {
        let (width, height) = size.pixel_dimensions();
        let surface = Pixmap::new(width, height).context("Failed to allocate display surface")?;
        Ok(Self { surface, size })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.surface
    }

    /// Current surface contents as straight-alpha pixels
    pub fn snapshot(&self) -> RgbaImage {
        rgba_from_pixmap(&self.surface)
    }

    /// Repaint the entire surface
    pub fn render<'a>(
        &mut self,
        base: Option<&SourceImage>,
        committed: impl IntoIterator<Item = &'a RegionShape>,
        preview: Option<&RegionShape>,
        style: &RenderStyle,
    ) {
        self.surface.fill(Color::TRANSPARENT);

        if let Some(image) = base {
            self.draw_base(image);
        }

        for shape in committed {
            draw_shape(&mut self.surface, shape, style);
        }

        if let Some(shape) = preview {
            draw_shape(&mut self.surface, shape, style);
        }
    }

    /// Draw the photo stretched to the display size
    fn draw_base(&mut self, image: &SourceImage) {
        let transform = Transform::from_scale(
            self.size.width / image.width() as f32,
            self.size.height / image.height() as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        self.surface
            .draw_pixmap(0, 0, image.pixmap.as_ref(), &paint, transform, None);
    }
}

/// Translucent fill plus outline
fn draw_shape(pixmap: &mut Pixmap, shape: &RegionShape, style: &RenderStyle) {
    let Some(path) = shape_path(shape) else {
        return;
    };

    let [r, g, b, a] = style.fill;
    let mut fill = Paint::default();
    fill.set_color_rgba8(r, g, b, a);
    fill.anti_alias = true;
    pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);

    let [r, g, b, a] = style.stroke;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: style.stroke_width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}
