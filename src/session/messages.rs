//! Message types for a tagging session
//!
//! Front ends translate their input events into these and feed them to
//! [`crate::annotations::handlers::handle_draw_msg`].

use crate::config::ShapeTool;
use crate::domain::{Point, TagId};

/// Pointer input in display coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawAction {
    /// Pointer pressed at position
    Press(Point),
    /// Pointer moved to position
    Drag(Point),
    /// Pointer released at position
    Release(Point),
}

/// All drawing/tagging messages
#[derive(Debug, Clone, PartialEq)]
pub enum DrawMsg {
    /// Pointer input for the active tool
    Pointer(DrawAction),
    /// Close the traced polyline (double-click or a finish button)
    FinishShape,
    /// Name the pending shape and commit it
    ConfirmName(String),
    /// Drop the current draft
    Cancel,
    /// Switch drawing tool
    SetTool(ShapeTool),
    /// Cycle to the next drawing tool
    CycleTool,
    /// Make another image active
    SelectImage(usize),
    /// Delete one tag
    DeleteTag(TagId),
    /// Delete every tag on one image
    ClearImage(usize),
}
