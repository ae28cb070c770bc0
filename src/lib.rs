//! Region tagging and cropping for uniform reference photos
//!
//! An operator marks regions (a collar, a badge, a pocket) on uploaded photos
//! with rectangles, circles or free-form polygons drawn on a fixed-size
//! display surface. Each committed region is cropped out of the photo at its
//! native resolution and kept, with its name, in an ordered tag list that the
//! display surface is always repainted from.
//!
//! [`TaggingSession`] is the entry point; [`handle_draw_msg`] routes front-end
//! messages to it.

pub mod annotations;
pub mod config;
pub mod domain;
pub mod error;
pub mod photo;
pub mod render;
pub mod session;

pub use annotations::drawing::{DrawOutcome, DrawState, ShapeDrawer};
pub use annotations::handlers::handle_draw_msg;
pub use config::{ShapeColor, ShapeTool, TaggerConfig};
pub use domain::{
    Bounds, CoordinateMapper, CroppedImage, Point, RegionShape, Size, TagId, TaggedElement,
};
pub use error::TagError;
pub use photo::{ImageId, ImageResource, SourceImage};
pub use render::canvas::{Canvas, RenderStyle};
pub use session::messages::{DrawAction, DrawMsg};
pub use session::tagging::{CropJob, CropOutcome, CropTicket, TaggingSession, TagsListener};
