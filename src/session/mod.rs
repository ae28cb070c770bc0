//! Tagging session management module
//!
//! This module contains:
//! - The image set and tag store
//! - The session controller that drives drawing, cropping and replay
//! - Message types for session input

pub mod messages;
pub mod state;
pub mod tagging;
