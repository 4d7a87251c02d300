//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - presenting float color buffers through a fullscreen draw, letting the
//!   GPU do the float to 8-bit conversion

mod blit;
mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
