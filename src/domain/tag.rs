//! Committed tags: a named region plus its cropped raster

use std::fmt;

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::region::RegionShape;
use crate::photo::ImageId;

/// Prefix of the data URL every crop is encoded as
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Generated identifier of a committed tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagId(Uuid);

impl TagId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TagId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// PNG crop encoded as a base64 data URL
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CroppedImage(String);

impl CroppedImage {
    /// Wrap raw PNG bytes
    pub fn from_png_bytes(png: &[u8]) -> Self {
        Self(format!("{PNG_DATA_URL_PREFIX}{}", BASE64.encode(png)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the data URL back to PNG bytes
    pub fn to_png_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let payload = self
            .0
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .context("Crop is not a PNG data URL")?;
        BASE64
            .decode(payload)
            .context("Crop data URL is not valid base64")
    }

    /// Decode the crop into pixels
    pub fn decode(&self) -> anyhow::Result<RgbaImage> {
        let bytes = self.to_png_bytes()?;
        let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .context("Crop is not a decodable PNG")?;
        Ok(img.to_rgba8())
    }
}

/// A user-named region committed together with its crop
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaggedElement {
    pub id: TagId,
    pub name: String,
    /// Position of the image in the current image set
    pub image_index: usize,
    /// Stable identity of the image, survives reordering
    pub image_id: ImageId,
    pub shape: RegionShape,
    pub cropped_image: CroppedImage,
}
