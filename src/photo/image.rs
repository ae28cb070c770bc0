//! Uploaded photo resources and their decoded form

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;
use uuid::Uuid;

use crate::render::image::pixmap_from_rgba;

/// Stable identity of an uploaded image, independent of its position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An uploaded image as handed over by the upload step: opaque encoded bytes
#[derive(Clone, Debug)]
pub struct ImageResource {
    id: ImageId,
    name: String,
    bytes: Arc<[u8]>,
}

impl ImageResource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id: ImageId::new(),
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encoded file contents
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode off the async thread
    pub async fn decode(&self) -> anyhow::Result<SourceImage> {
        let bytes = Arc::clone(&self.bytes);
        let name = self.name.clone();
        tokio::task::spawn_blocking(move || {
            SourceImage::from_bytes(&bytes)
                .with_context(|| format!("Failed to decode image {name}"))
        })
        .await?
    }
}

/// A decoded photo, held only as a premultiplied pixmap
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub pixmap: Pixmap,
}

impl SourceImage {
    pub fn new(rgba: RgbaImage) -> anyhow::Result<Self> {
        let pixmap = pixmap_from_rgba(&rgba)?;
        log::debug!(
            "SourceImage decoded: {}x{} pixels",
            pixmap.width(),
            pixmap.height()
        );
        Ok(Self { pixmap })
    }

    /// Decode any format the image crate recognizes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let decoded = image::load_from_memory(bytes).context("Unrecognized image data")?;
        Self::new(decoded.to_rgba8())
    }

    /// Get the native width of the image
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Get the native height of the image
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        let mut out = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[tokio::test]
    async fn test_decode_png_resource() {
        let resource = ImageResource::new("front.png", png_bytes(12, 8));
        let decoded = resource.decode().await.unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 8));
        assert_eq!((decoded.pixmap.width(), decoded.pixmap.height()), (12, 8));
    }

    #[tokio::test]
    async fn test_decode_garbage_fails() {
        let resource = ImageResource::new("broken.png", vec![1u8, 2, 3, 4]);
        let err = resource.decode().await.unwrap_err();
        assert!(format!("{err:#}").contains("broken.png"));
    }

    #[test]
    fn test_resources_get_distinct_ids() {
        let a = ImageResource::new("a", vec![0u8]);
        let b = ImageResource::new("a", vec![0u8]);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }
}
