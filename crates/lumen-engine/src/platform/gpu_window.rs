use anyhow::Result;
use ouroboros::self_referencing;
use winit::window::Window;

use crate::device::{Gpu, GpuInit};

/// A window plus the GPU context whose surface borrows it.
#[self_referencing]
pub(crate) struct GpuWindow {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl GpuWindow {
    /// Binds a GPU context to `window`. Blocks on adapter/device requests.
    pub(crate) fn create(window: Window, init: GpuInit) -> Result<Self> {
        GpuWindowTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, init)),
        }
        .try_build()
    }

    pub(crate) fn window(&self) -> &Window {
        self.borrow_window()
    }

    pub(crate) fn gpu_mut<R>(&mut self, f: impl FnOnce(&mut Gpu<'_>) -> R) -> R {
        self.with_gpu_mut(|gpu| f(gpu))
    }

    /// Size color buffers must have to be presented.
    pub(crate) fn present_size(&self) -> (u32, u32) {
        self.borrow_gpu().present_size()
    }
}
