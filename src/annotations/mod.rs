//! Region drawing and message handlers
//!
//! This module provides:
//! - The shape drawing state machine (rectangle, circle, polyline)
//! - Message handlers for DrawMsg

pub mod drawing;
pub mod handlers;
