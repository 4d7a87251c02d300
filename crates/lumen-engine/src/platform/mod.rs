//! Platform backends.
//!
//! Each backend owns a window (or display), translates its native events into
//! [`PlatformSignal`]s, supplies the frame clock and presents render targets.
//! The [`Application`](crate::core::Application) only talks to the
//! [`Backend`] contract; which backend runs is picked at startup.
//!
//! - [`NativeBackend`]: desktop window, GPU presentation.
//! - [`LibraryBackend`]: windowed only, CPU conversion through a software surface.
//! - [`DisplayBackend`]: best-fit display mode with a shared-desktop fallback.
//! - [`HeadlessBackend`]: no window, scripted; for tests and dry runs.

pub mod display;
mod gpu_window;
mod headless;
mod kind;
mod library;
mod lifecycle;
mod native;
mod pump;
mod signal;

use std::time::Duration;

use anyhow::Result;

use crate::config::CreationFlags;
use crate::present::Presenter;
use crate::time::Clock;

pub use display::DisplayBackend;
pub use headless::HeadlessBackend;
pub use kind::{BackendKind, UnknownBackend};
pub use library::LibraryBackend;
pub use lifecycle::{BackendState, Lifecycle};
pub use native::NativeBackend;
pub use signal::{LoopControl, PlatformSignal, PumpMode};

/// Window, event and timing contract shared by all backends.
///
/// Call order: `initialize` once, `begin_running` once, then
/// `check_messages` per loop iteration until it returns
/// [`LoopControl::Stop`], then `destroy`. `destroy` is idempotent and also
/// runs on drop.
pub trait Backend: Presenter {
    fn kind(&self) -> BackendKind;

    fn state(&self) -> BackendState;

    /// Acquires the clock and creates the window or display surface.
    ///
    /// On error every platform resource acquired so far has been released.
    fn initialize(&mut self, flags: &CreationFlags) -> Result<()>;

    /// Makes the window visible and focused; enters `Running`.
    fn begin_running(&mut self);

    /// Pumps native events, appending translated signals to `signals`.
    ///
    /// Returns [`LoopControl::Stop`] exactly when a quit was observed.
    fn check_messages(&mut self, mode: PumpMode, signals: &mut Vec<PlatformSignal>)
        -> LoopControl;

    /// Queues a quit; the next `check_messages` reports it.
    fn post_quit(&mut self);

    fn clock(&self) -> &dyn Clock;

    /// Pause between frames so a continuously running loop does not
    /// saturate a core.
    fn frame_yield(&self) -> Duration;

    /// Releases window, display and timer resources in reverse acquisition
    /// order.
    fn destroy(&mut self);
}
