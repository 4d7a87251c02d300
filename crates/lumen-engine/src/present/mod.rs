//! Frame presentation.
//!
//! Presenters take the render target produced by the Graphics collaborator
//! and make it visible. Every presenter runs the same validation
//! ([`validate_target`]) and reports failures through [`PresentError`].
//!
//! - [`SoftwarePresenter`] converts float pixels to BGR24 on the CPU.
//! - `device::Gpu` uploads the float buffer and converts while drawing.

mod convert;
mod error;
mod software;

pub use convert::{convert_bgr24, float_to_u8, validate_target};
pub use error::{PresentError, PresentResult};
pub use software::SoftwarePresenter;

use crate::surface::RenderTarget;

/// Something that can show a render target on a platform surface.
pub trait Presenter {
    /// Presents `target`. `None` models a caller passing no target at all.
    fn present(&mut self, target: Option<&RenderTarget>) -> PresentResult;

    /// Visible surface size in pixels.
    fn surface_size(&self) -> (u32, u32);
}
