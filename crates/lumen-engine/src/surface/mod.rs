//! Render surfaces.
//!
//! A [`RenderTarget`] aggregates the buffers a frame is rendered into; the
//! [`ColorBuffer`] holds floating-point pixels that presenters convert for
//! display.

mod color_buffer;
mod format;
mod target;

pub use color_buffer::ColorBuffer;
pub use format::SurfaceFormat;
pub use target::RenderTarget;
