use anyhow::Result;

use crate::config::CreationFlags;
use crate::core::AppState;
use crate::input::InputSnapshot;
use crate::surface::RenderTarget;

/// Input devices. Receives the latest snapshot once per frame.
pub trait Input {
    fn initialize(&mut self) -> Result<()>;

    fn update(&mut self, snapshot: &InputSnapshot);
}

/// File access layer.
pub trait FileIo {
    fn initialize(&mut self) -> Result<()>;
}

/// Rasterizer front end. Owns the render target frames are drawn into.
pub trait Graphics {
    fn initialize(&mut self, flags: &CreationFlags) -> Result<()>;

    /// Target the next frame is presented from. `None` before initialization.
    fn render_target(&self) -> Option<&RenderTarget>;
}

/// Resource loading and caching.
pub trait ResourceManager {
    fn initialize(&mut self) -> Result<()>;
}

/// Scene graph. Only its per-frame update is driven by the kernel.
pub trait Scene {
    fn initialize(&mut self) -> Result<()>;

    fn frame_move(&mut self, state: &AppState);
}

/// Constructs the collaborator set.
///
/// Each method only constructs; the kernel calls `initialize` on the result
/// before constructing the next one.
pub trait SubsystemFactory {
    fn create_input(&mut self) -> Result<Box<dyn Input>>;
    fn create_file_io(&mut self) -> Result<Box<dyn FileIo>>;
    fn create_graphics(&mut self) -> Result<Box<dyn Graphics>>;
    fn create_resource_manager(&mut self) -> Result<Box<dyn ResourceManager>>;
    fn create_scene(&mut self) -> Result<Box<dyn Scene>>;
}
