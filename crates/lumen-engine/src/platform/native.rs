use std::time::Duration;

use anyhow::{ensure, Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::window::{CursorIcon, Fullscreen, Window, WindowAttributes};

use crate::config::CreationFlags;
use crate::device::GpuInit;
use crate::input::translate_window_event;
use crate::present::{PresentError, PresentResult, Presenter};
use crate::surface::RenderTarget;
use crate::time::{Clock, MonotonicClock};

use super::gpu_window::GpuWindow;
use super::lifecycle::{BackendState, Lifecycle};
use super::pump::{EventPump, WindowHost};
use super::signal::{LoopControl, PlatformSignal, PumpMode};
use super::{Backend, BackendKind};

const FRAME_YIELD: Duration = Duration::from_millis(1);

/// How the native backend answers one window event.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NativeResponse {
    Signal(PlatformSignal),
    /// Windowed mode: the surface follows the new size.
    Resize(PhysicalSize<u32>),
    /// Fullscreen mode: a size/move request that must not take effect. A
    /// resize still reconfigures the surface to what the compositor reports.
    Suppress { surface: Option<PhysicalSize<u32>> },
    Ignore,
}

/// Maps a window event to the native backend's response.
pub(crate) fn translate(event: &WindowEvent, windowed: bool) -> NativeResponse {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
            NativeResponse::Signal(PlatformSignal::Quit)
        }
        WindowEvent::Focused(focused) => {
            NativeResponse::Signal(PlatformSignal::Activated(*focused))
        }
        // A fully covered or minimized window is treated as inactive.
        WindowEvent::Occluded(occluded) => {
            NativeResponse::Signal(PlatformSignal::Activated(!*occluded))
        }
        WindowEvent::Resized(size) if !windowed => NativeResponse::Suppress {
            surface: Some(*size),
        },
        WindowEvent::Moved(_) if !windowed => NativeResponse::Suppress { surface: None },
        WindowEvent::Resized(size) => NativeResponse::Resize(*size),
        other => match translate_window_event(other) {
            Some(input) => NativeResponse::Signal(PlatformSignal::Input(input)),
            None => NativeResponse::Ignore,
        },
    }
}

/// Desktop window backend presenting through the GPU.
///
/// The window starts hidden with a busy cursor and is shown and focused when
/// the loop starts. In fullscreen the cursor is hidden while active and
/// size/move changes are reverted.
pub struct NativeBackend {
    lifecycle:   Lifecycle,
    clock:       MonotonicClock,
    gpu_init:    GpuInit,
    host:        Option<WindowHost<GpuWindow>>,
    pump:        Option<EventPump>,
    windowed:    bool,
    quit_posted: bool,
}

impl NativeBackend {
    pub fn new() -> Self {
        Self::with_gpu_init(GpuInit::default())
    }

    pub fn with_gpu_init(gpu_init: GpuInit) -> Self {
        Self {
            lifecycle: Lifecycle::new("native"),
            clock: MonotonicClock::new(),
            gpu_init,
            host: None,
            pump: None,
            windowed: true,
            quit_posted: false,
        }
    }

    fn open(&mut self, flags: &CreationFlags) -> Result<()> {
        self.clock = MonotonicClock::new();
        self.windowed = flags.is_windowed();

        let mut pump = EventPump::new()?;

        let attrs = window_attributes(flags);
        let init = self.gpu_init.clone();
        let image = (flags.width(), flags.height());
        let mut host = WindowHost::new(move |event_loop| {
            let window = event_loop
                .create_window(attrs)
                .context("failed to create window")?;
            window.set_cursor(CursorIcon::Wait);
            let mut gpu_window = GpuWindow::create(window, init)?;
            // Fullscreen surfaces take the monitor size; the image stays at the
            // requested size, centered.
            gpu_window.gpu_mut(|gpu| gpu.set_present_size(Some(image)));
            Ok(gpu_window)
        });

        pump.start(&mut host)?;

        // Event loop must outlive the window: host is dropped first.
        self.pump = Some(pump);
        self.host = Some(host);
        Ok(())
    }

    fn window(&self) -> Option<&Window> {
        self.host.as_ref()?.target().map(GpuWindow::window)
    }

    fn apply_activation(&self, active: bool) {
        if self.windowed {
            return;
        }
        if let Some(window) = self.window() {
            window.set_cursor_visible(!active);
        }
    }
}

impl Default for NativeBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn window_attributes(flags: &CreationFlags) -> WindowAttributes {
    let fullscreen = (!flags.is_windowed()).then_some(Fullscreen::Borderless(None));
    Window::default_attributes()
        .with_title(flags.title())
        .with_inner_size(PhysicalSize::new(flags.width(), flags.height()))
        .with_resizable(false)
        .with_visible(false)
        .with_window_icon(flags.icon().cloned())
        .with_fullscreen(fullscreen)
}

impl Presenter for NativeBackend {
    fn present(&mut self, target: Option<&RenderTarget>) -> PresentResult {
        let Some(gpu_window) = self.host.as_mut().and_then(WindowHost::target_mut) else {
            return Err(PresentError::InvalidState);
        };
        gpu_window.window().pre_present_notify();
        gpu_window.gpu_mut(|gpu| gpu.present(target))
    }

    fn surface_size(&self) -> (u32, u32) {
        self.host
            .as_ref()
            .and_then(WindowHost::target)
            .map_or((0, 0), GpuWindow::present_size)
    }
}

impl Backend for NativeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    fn state(&self) -> BackendState {
        self.lifecycle.state()
    }

    fn initialize(&mut self, flags: &CreationFlags) -> Result<()> {
        ensure!(
            self.lifecycle.advance(BackendState::Initializing),
            "native backend cannot initialize from {}",
            self.lifecycle.state()
        );

        let result = self.open(flags);
        if result.is_err() {
            self.destroy();
        }
        result
    }

    fn begin_running(&mut self) {
        if !self.lifecycle.advance(BackendState::Running) {
            return;
        }
        if let Some(window) = self.window() {
            window.set_visible(true);
            window.focus_window();
            window.set_cursor(CursorIcon::Default);
        }
        self.apply_activation(true);
    }

    fn check_messages(&mut self, mode: PumpMode, signals: &mut Vec<PlatformSignal>) -> LoopControl {
        let start = signals.len();

        if std::mem::take(&mut self.quit_posted) {
            signals.push(PlatformSignal::Quit);
        }

        let mode = if signals.len() > start { PumpMode::Poll } else { mode };

        match (self.pump.as_mut(), self.host.as_mut()) {
            (Some(pump), Some(host)) => {
                if !pump.pump(mode, host) {
                    signals.push(PlatformSignal::Quit);
                }
                for event in host.take_events() {
                    match translate(&event, self.windowed) {
                        NativeResponse::Signal(signal) => signals.push(signal),
                        NativeResponse::Resize(size) => {
                            if let Some(w) = host.target_mut() {
                                w.gpu_mut(|gpu| gpu.resize(size));
                            }
                        }
                        NativeResponse::Suppress { surface } => {
                            if let (Some(size), Some(w)) = (surface, host.target_mut()) {
                                w.gpu_mut(|gpu| gpu.resize(size));
                            }
                            let window = host.target().map(GpuWindow::window);
                            if let Some(window) = window.filter(|w| w.fullscreen().is_none()) {
                                log::debug!(target: "platform", "native: restoring fullscreen");
                                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                            }
                        }
                        NativeResponse::Ignore => {}
                    }
                }
            }
            _ => signals.push(PlatformSignal::Quit),
        }

        let mut control = LoopControl::Continue;
        for signal in &signals[start..] {
            match signal {
                PlatformSignal::Quit => control = LoopControl::Stop,
                PlatformSignal::Activated(active) => self.apply_activation(*active),
                PlatformSignal::Input(_) => {}
            }
        }

        if control == LoopControl::Stop {
            self.lifecycle.advance(BackendState::Terminating);
        }
        control
    }

    fn post_quit(&mut self) {
        self.quit_posted = true;
    }

    fn clock(&self) -> &dyn Clock {
        &self.clock
    }

    fn frame_yield(&self) -> Duration {
        FRAME_YIELD
    }

    fn destroy(&mut self) {
        if self.lifecycle.is(BackendState::Destroyed) {
            return;
        }
        // Window and GPU surface before the event loop.
        if let Some(mut host) = self.host.take() {
            drop(host.release());
        }
        self.pump = None;
        self.lifecycle.advance(BackendState::Destroyed);
    }
}

impl Drop for NativeBackend {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;

    #[test]
    fn close_and_destroy_quit() {
        assert_eq!(
            translate(&WindowEvent::CloseRequested, true),
            NativeResponse::Signal(PlatformSignal::Quit)
        );
        assert_eq!(
            translate(&WindowEvent::Destroyed, false),
            NativeResponse::Signal(PlatformSignal::Quit)
        );
    }

    #[test]
    fn focus_and_occlusion_toggle_activation() {
        assert_eq!(
            translate(&WindowEvent::Focused(false), true),
            NativeResponse::Signal(PlatformSignal::Activated(false))
        );
        assert_eq!(
            translate(&WindowEvent::Occluded(true), true),
            NativeResponse::Signal(PlatformSignal::Activated(false))
        );
        assert_eq!(
            translate(&WindowEvent::Occluded(false), false),
            NativeResponse::Signal(PlatformSignal::Activated(true))
        );
    }

    #[test]
    fn size_and_move_are_suppressed_in_fullscreen() {
        let resized = WindowEvent::Resized(PhysicalSize::new(10, 10));
        let moved = WindowEvent::Moved(PhysicalPosition::new(5, 5));
        assert_eq!(translate(&moved, false), NativeResponse::Suppress { surface: None });

        assert_eq!(translate(&resized, true), NativeResponse::Resize(PhysicalSize::new(10, 10)));
        assert_eq!(translate(&moved, true), NativeResponse::Ignore);
    }

    #[test]
    fn suppressed_resize_still_carries_the_surface_size() {
        let resized = WindowEvent::Resized(PhysicalSize::new(1920, 1080));
        assert_eq!(
            translate(&resized, false),
            NativeResponse::Suppress {
                surface: Some(PhysicalSize::new(1920, 1080))
            }
        );
    }

    #[test]
    fn uninitialized_backend_quits_and_cannot_present() {
        let mut b = NativeBackend::new();
        let mut signals = Vec::new();
        assert_eq!(b.check_messages(PumpMode::Poll, &mut signals), LoopControl::Stop);
        assert_eq!(signals, [PlatformSignal::Quit]);
        assert_eq!(b.present(None), Err(PresentError::InvalidState));
        assert_eq!(b.surface_size(), (0, 0));
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut b = NativeBackend::new();
        b.destroy();
        b.destroy();
        assert_eq!(b.state(), BackendState::Destroyed);
    }
}
