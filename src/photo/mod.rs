//! Uploaded photos
//!
//! Resources arrive as encoded bytes from the upload step and are decoded
//! lazily, off the async thread, when first shown or cropped.

pub mod image;

pub use self::image::{ImageId, ImageResource, SourceImage};
