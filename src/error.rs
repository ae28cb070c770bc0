//! Error types for tagging sessions
//!
//! Raster and decode plumbing works with `anyhow`; anything surfaced to the
//! caller of a session operation is a [`TagError`].

use thiserror::Error;

use crate::domain::TagId;

/// Errors returned by tagging session operations
#[derive(Error, Debug)]
pub enum TagError {
    /// Requested image is outside the loaded set
    #[error("Image index {index} out of range for {len} loaded images")]
    ImageIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of loaded images.
        len: usize,
    },

    /// No image is loaded
    #[error("No image is active")]
    NoActiveImage,

    /// Tag name was empty or whitespace
    #[error("Tag name must not be empty")]
    EmptyName,

    /// A name was supplied but no drawn shape is waiting for one
    #[error("No shape is waiting for a name")]
    NothingPending,

    /// Tag id not present in the store
    #[error("Tag {0} not found")]
    TagNotFound(TagId),

    /// Tag id already present in the store
    #[error("Tag {0} already exists")]
    DuplicateTag(TagId),

    /// The display surface could not be allocated
    #[error("Failed to set up display surface: {0:#}")]
    Surface(anyhow::Error),

    /// Cropping the region failed
    #[error("Failed to crop region: {0:#}")]
    Crop(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TagError>;
