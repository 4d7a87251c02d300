use crate::input::InputSnapshot;
use crate::present::{PresentError, PresentResult, Presenter};
use crate::subsystem::Subsystems;

use super::state::AppState;

/// Context for [`App::create_world`](super::App::create_world).
///
/// All collaborators exist at this point.
pub struct WorldCtx<'a> {
    pub state:      &'a AppState,
    pub subsystems: &'a mut Subsystems,
}

/// Per-frame context passed to [`App::frame_move`](super::App::frame_move).
pub struct FrameCtx<'a> {
    pub state: &'a AppState,
    pub input: &'a InputSnapshot,
    quit_requested: bool,
}

impl<'a> FrameCtx<'a> {
    pub(crate) fn new(state: &'a AppState, input: &'a InputSnapshot) -> Self {
        Self {
            state,
            input,
            quit_requested: false,
        }
    }

    /// Asks the platform to quit. The loop stops at the next event check,
    /// after the current frame completes.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

/// Per-frame context passed to [`App::render_world`](super::App::render_world).
pub struct RenderCtx<'a> {
    pub state:      &'a AppState,
    pub subsystems: &'a mut Subsystems,
    presenter:      &'a mut dyn Presenter,
}

impl<'a> RenderCtx<'a> {
    pub(crate) fn new(
        state: &'a AppState,
        subsystems: &'a mut Subsystems,
        presenter: &'a mut dyn Presenter,
    ) -> Self {
        Self {
            state,
            subsystems,
            presenter,
        }
    }

    /// Presents the Graphics collaborator's current render target.
    ///
    /// Failures are reported through the debug diagnostics and returned; the
    /// frame is not retried.
    pub fn present(&mut self) -> PresentResult {
        let Some(graphics) = self.subsystems.graphics() else {
            return Err(PresentError::InvalidState);
        };
        self.presenter.present(graphics.render_target())
    }

    /// Visible surface size in pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        self.presenter.surface_size()
    }
}
