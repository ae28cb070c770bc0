//! Tagging message handlers
//!
//! Routes a [`DrawMsg`] to the session operation it stands for.

use crate::error::Result;
use crate::session::messages::{DrawAction, DrawMsg};
use crate::session::tagging::TaggingSession;

/// Handle a DrawMsg, modifying session state
///
/// Errors from the underlying operation are returned unchanged; a failed
/// commit or out-of-range selection leaves the session as it was.
pub async fn handle_draw_msg(session: &mut TaggingSession, msg: DrawMsg) -> Result<()> {
    match msg {
        DrawMsg::Pointer(action) => handle_pointer(session, action),
        DrawMsg::FinishShape => {
            session.finish_shape();
        }
        DrawMsg::ConfirmName(name) => {
            session.commit(&name).await?;
        }
        DrawMsg::Cancel => {
            session.cancel();
        }
        DrawMsg::SetTool(tool) => session.set_tool(tool),
        DrawMsg::CycleTool => session.cycle_tool(),
        DrawMsg::SelectImage(index) => session.select_image(index).await?,
        DrawMsg::DeleteTag(id) => {
            session.remove_tag(id)?;
        }
        DrawMsg::ClearImage(index) => {
            session.clear_image_tags(index)?;
        }
    }
    Ok(())
}

fn handle_pointer(session: &mut TaggingSession, action: DrawAction) {
    match action {
        DrawAction::Press(p) => session.pointer_down(p),
        DrawAction::Drag(p) => session.pointer_move(p),
        DrawAction::Release(p) => session.pointer_up(p),
    };
}
