//! Minimal collaborators for the demo.
//!
//! Only Graphics does real work: it owns the float render target the bubble
//! is drawn into. The rest log their lifecycle and otherwise stay idle.

use anyhow::{ensure, Result};

use lumen_engine::config::CreationFlags;
use lumen_engine::core::AppState;
use lumen_engine::input::InputSnapshot;
use lumen_engine::subsystem::{FileIo, Graphics, Input, ResourceManager, Scene};
use lumen_engine::surface::{ColorBuffer, RenderTarget, SurfaceFormat};

const LOG_TARGET: &str = "bubble";

#[derive(Default)]
pub struct PointerInput {
    pointer: Option<(f32, f32)>,
}

impl PointerInput {
    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }
}

impl Input for PointerInput {
    fn initialize(&mut self) -> Result<()> {
        log::debug!(target: LOG_TARGET, "input ready");
        Ok(())
    }

    fn update(&mut self, snapshot: &InputSnapshot) {
        self.pointer = snapshot.pointer_pos();
    }
}

impl Drop for PointerInput {
    fn drop(&mut self) {
        log::debug!(target: LOG_TARGET, "input released");
    }
}

/// No assets to load; present for lifecycle completeness.
pub struct NullFileIo;

impl FileIo for NullFileIo {
    fn initialize(&mut self) -> Result<()> {
        log::debug!(target: LOG_TARGET, "file io ready");
        Ok(())
    }
}

pub struct NullResources;

impl ResourceManager for NullResources {
    fn initialize(&mut self) -> Result<()> {
        log::debug!(target: LOG_TARGET, "resource manager ready");
        Ok(())
    }
}

#[derive(Default)]
pub struct FlatScene {
    last_frame: u64,
}

impl Scene for FlatScene {
    fn initialize(&mut self) -> Result<()> {
        log::debug!(target: LOG_TARGET, "scene ready");
        Ok(())
    }

    fn frame_move(&mut self, state: &AppState) {
        debug_assert!(state.frame_id() > self.last_frame);
        self.last_frame = state.frame_id();
    }
}

/// Software rasterizer front: one RGB float color buffer sized to the window.
#[derive(Default)]
pub struct SoftwareGraphics {
    target: Option<RenderTarget>,
}

impl Graphics for SoftwareGraphics {
    fn initialize(&mut self, flags: &CreationFlags) -> Result<()> {
        ensure!(self.target.is_none(), "graphics already initialized");

        let buffer = ColorBuffer::new(flags.width(), flags.height(), SurfaceFormat::R32G32B32F);
        self.target = Some(RenderTarget::with_color_buffer(buffer));
        log::debug!(
            target: LOG_TARGET,
            "graphics ready: {}x{} {:?}",
            flags.width(),
            flags.height(),
            SurfaceFormat::R32G32B32F
        );
        Ok(())
    }

    fn render_target(&self) -> Option<&RenderTarget> {
        self.target.as_ref()
    }
}
