//! Region cropping
//!
//! A crop is allocated at the shape's display-space size, but its pixels are
//! sampled from the native-resolution photo: the native-scaled source region
//! is drawn scaled down into the display-sized raster. Non-rectangular shapes
//! are clipped with a mask before sampling.

use std::sync::Arc;

use anyhow::{Context, bail};
use tiny_skia::{FillRule, FilterQuality, Mask, Path, Pixmap, PixmapPaint, Transform};

use super::geometry::{circle_path, polygon_path};
use super::image::encode_crop;
use crate::domain::{Bounds, CoordinateMapper, CroppedImage, Point, RegionShape, Size};
use crate::photo::SourceImage;

/// Everything needed to rasterize one crop
#[derive(Clone, Debug)]
pub struct CropPlan {
    /// Region of the native image to sample
    pub source: Bounds,
    /// Display-space extents the source region is scaled into
    pub target: Size,
    /// Clip in raster coordinates, `None` for a plain rectangle
    pub clip: Option<Path>,
}

impl CropPlan {
    /// Pixel dimensions of the output raster
    pub fn raster_size(&self) -> (u32, u32) {
        self.target.pixel_dimensions()
    }
}

/// Work out the source region, raster size and clip for a shape
pub fn plan_crop(shape: &RegionShape, mapper: &CoordinateMapper) -> anyhow::Result<CropPlan> {
    if !shape.is_committable() {
        bail!("Region {:?} has no area to crop", shape.tool());
    }

    let bounds = shape.bounds();
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        bail!("Region {:?} has a degenerate bounding box", shape.tool());
    }

    let clip = match shape {
        RegionShape::Rectangle { .. } => None,
        RegionShape::Circle { radius, .. } => {
            Some(circle_path(*radius, *radius, *radius).context("Failed to build circle clip")?)
        }
        RegionShape::Polyline { points } => Some(
            polygon_path(points, Point::new(bounds.x, bounds.y))
                .context("Failed to build polygon clip")?,
        ),
    };

    Ok(CropPlan {
        source: mapper.to_native_bounds(bounds),
        target: bounds.size(),
        clip,
    })
}

/// Draw the planned source region of `image` into a fresh raster
pub fn rasterize_crop(image: &SourceImage, plan: &CropPlan) -> anyhow::Result<Pixmap> {
    let (width, height) = plan.raster_size();
    let mut raster = Pixmap::new(width, height).context("Failed to allocate crop raster")?;

    let mask = match &plan.clip {
        Some(path) => {
            let mut mask = Mask::new(width, height).context("Failed to allocate crop mask")?;
            mask.fill_path(path, FillRule::Winding, true, Transform::identity());
            Some(mask)
        }
        None => None,
    };

    // native source rect -> (0, 0, target.width, target.height)
    let transform = Transform::from_scale(
        plan.target.width / plan.source.width,
        plan.target.height / plan.source.height,
    )
    .pre_translate(-plan.source.x, -plan.source.y);

    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };
    raster.draw_pixmap(
        0,
        0,
        image.pixmap.as_ref(),
        &paint,
        transform,
        mask.as_ref(),
    );

    Ok(raster)
}

/// Crop a display-space shape out of `image` and encode it
pub fn crop_region(
    image: &SourceImage,
    shape: &RegionShape,
    display: Size,
) -> anyhow::Result<CroppedImage> {
    let mapper = CoordinateMapper::for_image(image.width(), image.height(), display);
    let plan = plan_crop(shape, &mapper)?;

    // Shapes drawn on the surface never span more than twice its diagonal
    let limit = 2.0 * display.width.hypot(display.height);
    if plan.target.width > limit || plan.target.height > limit {
        bail!(
            "Region {:?} of {}x{} exceeds the {}x{} display",
            shape.tool(),
            plan.target.width,
            plan.target.height,
            display.width,
            display.height
        );
    }

    let raster = rasterize_crop(image, &plan)?;
    log::debug!(
        "Cropped {:?} from native {:?} into {}x{}",
        shape.tool(),
        plan.source,
        raster.width(),
        raster.height()
    );
    encode_crop(&raster)
}

/// Run [`crop_region`] on the blocking pool
pub async fn crop_region_async(
    image: Arc<SourceImage>,
    shape: RegionShape,
    display: Size,
) -> anyhow::Result<CroppedImage> {
    tokio::task::spawn_blocking(move || crop_region(&image, &shape, display)).await?
}
