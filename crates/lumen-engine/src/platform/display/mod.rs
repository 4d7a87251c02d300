//! Display-mode backend.
//!
//! Fullscreen requests take over a monitor in the best-fit video mode (a
//! "custom screen"); when none fits or it cannot be opened, the window goes
//! onto the shared desktop instead. Screen acquisition is expressed against
//! [`DisplayServer`] so the release order can be checked without a display.

mod acquire;

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::monitor::{MonitorHandle, VideoModeHandle};
use winit::window::{Fullscreen, Window};

use crate::config::CreationFlags;
use crate::device::GpuInit;
use crate::input::{map_mouse_button, InputEvent};
use crate::present::{PresentError, PresentResult, Presenter};
use crate::surface::RenderTarget;
use crate::time::{Clock, MonotonicClock};

use super::gpu_window::GpuWindow;
use super::lifecycle::{BackendState, Lifecycle};
use super::pump::{EventPump, WindowHost};
use super::signal::{LoopControl, PlatformSignal, PumpMode};
use super::{Backend, BackendKind};

pub use acquire::{
    acquire_display, best_fit, DisplayLease, DisplayServer, ModeInfo, WindowSpec, MIN_BIT_DEPTH,
};

const FRAME_YIELD: Duration = Duration::from_micros(100);

/// Screen held by the winit display server.
pub(crate) enum WinitScreen {
    /// Exclusive fullscreen in a specific video mode.
    Custom(VideoModeHandle),
    /// Shared desktop on a monitor, if the platform reports one.
    Public(Option<MonitorHandle>),
}

impl Drop for WinitScreen {
    fn drop(&mut self) {
        let kind = match self {
            WinitScreen::Custom(_) => "custom",
            WinitScreen::Public(_) => "public",
        };
        log::debug!(target: "platform", "display: released {kind} screen");
    }
}

/// [`DisplayServer`] over an active winit event loop.
struct WinitDisplay<'a> {
    event_loop: &'a ActiveEventLoop,
    modes:      Vec<VideoModeHandle>,
    gpu_init:   GpuInit,
}

impl<'a> WinitDisplay<'a> {
    fn new(event_loop: &'a ActiveEventLoop, gpu_init: GpuInit) -> Self {
        let modes = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .map(|m| m.video_modes().collect())
            .unwrap_or_default();
        Self {
            event_loop,
            modes,
            gpu_init,
        }
    }
}

impl DisplayServer for WinitDisplay<'_> {
    type Screen = WinitScreen;
    type Window = GpuWindow;

    fn modes(&self) -> Vec<ModeInfo> {
        self.modes
            .iter()
            .map(|m| ModeInfo {
                width: m.size().width,
                height: m.size().height,
                bit_depth: m.bit_depth(),
                refresh_millihertz: m.refresh_rate_millihertz(),
            })
            .collect()
    }

    fn open_screen(&mut self, mode: usize) -> Result<WinitScreen> {
        let mode = self
            .modes
            .get(mode)
            .cloned()
            .with_context(|| format!("display mode {mode} out of range"))?;
        log::info!(
            target: "platform",
            "display: custom screen {}x{} {}-bit",
            mode.size().width,
            mode.size().height,
            mode.bit_depth()
        );
        Ok(WinitScreen::Custom(mode))
    }

    fn lock_public_screen(&mut self) -> Result<WinitScreen> {
        Ok(WinitScreen::Public(self.event_loop.primary_monitor()))
    }

    fn open_window(&mut self, screen: &WinitScreen, spec: &WindowSpec) -> Result<GpuWindow> {
        let mut attrs = Window::default_attributes()
            .with_title(spec.title.clone())
            .with_inner_size(PhysicalSize::new(spec.width, spec.height))
            .with_resizable(false)
            .with_decorations(!spec.borderless)
            .with_window_icon(spec.icon.clone());

        if let WinitScreen::Custom(mode) = screen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Exclusive(mode.clone())));
        }

        let window = self
            .event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        let mut gpu_window = GpuWindow::create(window, self.gpu_init.clone())?;

        // A custom screen or the window manager may size the surface
        // differently from the request; keep the image 1:1.
        gpu_window.gpu_mut(|gpu| gpu.set_present_size(Some((spec.width, spec.height))));
        Ok(gpu_window)
    }
}

/// Maps a window event for the display backend: quit, focus and the left
/// and right mouse buttons.
pub(crate) fn translate(event: &WindowEvent) -> Option<PlatformSignal> {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(PlatformSignal::Quit),
        WindowEvent::Focused(focused) => Some(PlatformSignal::Activated(*focused)),
        WindowEvent::MouseInput { state, button, .. }
            if matches!(button, WinitMouseButton::Left | WinitMouseButton::Right) =>
        {
            Some(PlatformSignal::Input(InputEvent::Button {
                button: map_mouse_button(*button),
                pressed: *state == ElementState::Pressed,
            }))
        }
        _ => None,
    }
}

type WinitLease = DisplayLease<GpuWindow, WinitScreen>;

/// Display-mode backend presenting through the GPU.
pub struct DisplayBackend {
    lifecycle:   Lifecycle,
    clock:       MonotonicClock,
    gpu_init:    GpuInit,
    host:        Option<WindowHost<WinitLease>>,
    pump:        Option<EventPump>,
    quit_posted: bool,
}

impl DisplayBackend {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::new("display"),
            clock: MonotonicClock::new(),
            gpu_init: GpuInit::default(),
            host: None,
            pump: None,
            quit_posted: false,
        }
    }

    fn open(&mut self, flags: &CreationFlags) -> Result<()> {
        self.clock = MonotonicClock::new();
        let mut pump = EventPump::new()?;

        let flags = flags.clone();
        let gpu_init = self.gpu_init.clone();
        let mut host = WindowHost::new(move |event_loop| {
            let mut server = WinitDisplay::new(event_loop, gpu_init);
            acquire_display(&mut server, &flags)
        });

        pump.start(&mut host)?;

        self.pump = Some(pump);
        self.host = Some(host);
        Ok(())
    }

    fn lease(&self) -> Option<&WinitLease> {
        self.host.as_ref().and_then(WindowHost::target)
    }
}

impl Default for DisplayBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for DisplayBackend {
    fn present(&mut self, target: Option<&RenderTarget>) -> PresentResult {
        let Some(lease) = self.host.as_mut().and_then(WindowHost::target_mut) else {
            return Err(PresentError::InvalidState);
        };
        lease.window.window().pre_present_notify();
        lease.window.gpu_mut(|gpu| gpu.present(target))
    }

    fn surface_size(&self) -> (u32, u32) {
        self.lease().map_or((0, 0), |lease| lease.window.present_size())
    }
}

impl Backend for DisplayBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Display
    }

    fn state(&self) -> BackendState {
        self.lifecycle.state()
    }

    fn initialize(&mut self, flags: &CreationFlags) -> Result<()> {
        ensure!(
            self.lifecycle.advance(BackendState::Initializing),
            "display backend cannot initialize from {}",
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
        if let Some(lease) = self.lease() {
            lease.window.window().focus_window();
        }
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
                    signals.extend(translate(&event));
                }
            }
            _ => signals.push(PlatformSignal::Quit),
        }

        if signals[start..].contains(&PlatformSignal::Quit) {
            self.lifecycle.advance(BackendState::Terminating);
            return LoopControl::Stop;
        }
        LoopControl::Continue
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
        // Lease drops window then screen; both before the event loop.
        if let Some(mut host) = self.host.take() {
            drop(host.release());
        }
        self.pump = None;
        self.lifecycle.advance(BackendState::Destroyed);
    }
}

impl Drop for DisplayBackend {
    fn drop(&mut self) {
        self.destroy();
    }
}
