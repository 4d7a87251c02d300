use anyhow::Result;

use crate::subsystem::SubsystemFactory;

use super::ctx::{FrameCtx, RenderCtx, WorldCtx};

/// Demo contract implemented by higher layers.
///
/// The factory half supplies the collaborators; the hooks below own the
/// demo-specific world content.
pub trait App: SubsystemFactory {
    /// Demo state created after every collaborator initialized.
    type World;

    fn create_world(&mut self, ctx: &mut WorldCtx<'_>) -> Result<Self::World>;

    /// Called once at shutdown, before collaborators are torn down.
    fn destroy_world(&mut self, world: Self::World) {
        drop(world);
    }

    /// Per-frame update, after the Input collaborator saw the new snapshot and
    /// before the Scene update.
    fn frame_move(&mut self, world: &mut Self::World, ctx: &mut FrameCtx<'_>);

    /// Produces and presents a frame.
    fn render_world(&mut self, world: &mut Self::World, ctx: &mut RenderCtx<'_>);
}
