//! Region rendering module
//!
//! This module contains:
//! - Path construction shared between surface drawing and crop clipping
//! - Canvas replay onto the fixed-size display surface
//! - Native-resolution region cropping
//! - Pixmap and PNG conversions

pub mod canvas;
pub mod crop;
pub mod geometry;
pub mod image;
