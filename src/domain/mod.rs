//! Pure domain types with minimal dependencies
//!
//! Types here know nothing about the session or rendering pipeline so they
//! can be shared by both without circular dependencies.

pub mod geometry;
pub mod mapper;
pub mod region;
pub mod tag;

pub use geometry::*;
pub use mapper::*;
pub use region::*;
pub use tag::*;
