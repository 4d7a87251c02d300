use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, ensure, Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::config::CreationFlags;
use crate::input::translate_window_event;
use crate::logging;
use crate::present::{PresentError, PresentResult, Presenter, SoftwarePresenter};
use crate::surface::RenderTarget;
use crate::time::{Clock, MonotonicClock};

use super::lifecycle::{BackendState, Lifecycle};
use super::pump::{EventPump, WindowHost};
use super::signal::{LoopControl, PlatformSignal, PumpMode};
use super::{Backend, BackendKind};

const FRAME_YIELD: Duration = Duration::from_millis(1);

/// Window plus the software surface blitted to it.
struct SoftwareWindow {
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
    _context: softbuffer::Context<Rc<Window>>,
    window: Rc<Window>,
    /// Size the surface was last configured with.
    size: (u32, u32),
}

impl SoftwareWindow {
    fn create(window: Window) -> Result<Self> {
        let window = Rc::new(window);
        let context = softbuffer::Context::new(Rc::clone(&window))
            .map_err(|e| anyhow!("failed to create software display context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, Rc::clone(&window))
            .map_err(|e| anyhow!("failed to create software surface: {e}"))?;

        let mut sw = Self {
            surface,
            _context: context,
            window,
            size: (0, 0),
        };
        let size = sw.window.inner_size();
        sw.resize(size)?;
        Ok(sw)
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            // Minimized; keep the previous buffer.
            return Ok(());
        };
        self.surface
            .resize(w, h)
            .map_err(|e| anyhow!("failed to resize software surface to {w}x{h}: {e}"))?;
        self.size = (size.width, size.height);
        Ok(())
    }
}

/// Maps a window event for the library backend. Only quit, focus and input
/// are of interest.
pub(crate) fn translate(event: &WindowEvent) -> Option<PlatformSignal> {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(PlatformSignal::Quit),
        WindowEvent::Focused(focused) => Some(PlatformSignal::Activated(*focused)),
        other => translate_window_event(other).map(PlatformSignal::Input),
    }
}

/// Windowing-library backend.
///
/// Windowed only. Float color buffers are converted on the CPU
/// ([`SoftwarePresenter`], sized from the creation flags) and blitted through
/// a software surface, which alone follows window resizes.
pub struct LibraryBackend {
    lifecycle:   Lifecycle,
    clock:       MonotonicClock,
    presenter:   Option<SoftwarePresenter>,
    host:        Option<WindowHost<SoftwareWindow>>,
    pump:        Option<EventPump>,
    quit_posted: bool,
}

impl LibraryBackend {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::new("library"),
            clock: MonotonicClock::new(),
            presenter: None,
            host: None,
            pump: None,
            quit_posted: false,
        }
    }

    fn open(&mut self, flags: &CreationFlags) -> Result<()> {
        ensure!(
            flags.is_windowed(),
            "library backend supports windowed mode only"
        );
        self.clock = MonotonicClock::new();

        let mut pump = EventPump::new()?;

        let attrs = Window::default_attributes()
            .with_title(flags.title())
            .with_inner_size(PhysicalSize::new(flags.width(), flags.height()))
            .with_resizable(false);
        let mut host = WindowHost::new(move |event_loop| {
            let window = event_loop
                .create_window(attrs)
                .context("failed to create window")?;
            SoftwareWindow::create(window)
        });

        pump.start(&mut host)?;

        let presenter = SoftwarePresenter::new(flags.width(), flags.height())
            .map_err(|e| anyhow!("failed to allocate backbuffer: {e}"))?;

        self.presenter = Some(presenter);
        self.pump = Some(pump);
        self.host = Some(host);
        Ok(())
    }
}

impl Default for LibraryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for LibraryBackend {
    fn present(&mut self, target: Option<&RenderTarget>) -> PresentResult {
        let (Some(presenter), Some(sw)) = (
            self.presenter.as_mut(),
            self.host.as_mut().and_then(WindowHost::target_mut),
        ) else {
            return Err(PresentError::InvalidState);
        };

        presenter.convert(target)?;

        let mut buffer = sw.surface.buffer_mut().map_err(|e| {
            logging::failing("present", format_args!("software surface buffer: {e}"));
            PresentError::Unknown
        })?;
        presenter.blit_xrgb(&mut buffer, sw.size.0, sw.size.1);

        sw.window.pre_present_notify();
        buffer.present().map_err(|e| {
            logging::failing("present", format_args!("software surface present: {e}"));
            PresentError::Unknown
        })
    }

    fn surface_size(&self) -> (u32, u32) {
        self.presenter
            .as_ref()
            .map_or((0, 0), SoftwarePresenter::surface_size)
    }
}

impl Backend for LibraryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Library
    }

    fn state(&self) -> BackendState {
        self.lifecycle.state()
    }

    fn initialize(&mut self, flags: &CreationFlags) -> Result<()> {
        ensure!(
            self.lifecycle.advance(BackendState::Initializing),
            "library backend cannot initialize from {}",
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
        if let Some(sw) = self.host.as_ref().and_then(WindowHost::target) {
            sw.window.focus_window();
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
                    if let WindowEvent::Resized(size) = event {
                        if let Some(sw) = host.target_mut() {
                            if let Err(err) = sw.resize(size) {
                                logging::failing("library", format_args!("{err:#}"));
                            }
                        }
                        continue;
                    }
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
        self.presenter = None;
        if let Some(mut host) = self.host.take() {
            drop(host.release());
        }
        self.pump = None;
        self.lifecycle.advance(BackendState::Destroyed);
    }
}

impl Drop for LibraryBackend {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_quit_and_focus() {
        assert_eq!(translate(&WindowEvent::CloseRequested), Some(PlatformSignal::Quit));
        assert_eq!(
            translate(&WindowEvent::Focused(true)),
            Some(PlatformSignal::Activated(true))
        );
        assert_eq!(translate(&WindowEvent::Occluded(true)), None);
    }

    #[test]
    fn fullscreen_is_rejected_and_backend_released() {
        let mut b = LibraryBackend::new();
        let flags = CreationFlags::new("T").windowed(false);
        let err = b.initialize(&flags).unwrap_err();
        assert!(err.to_string().contains("windowed mode only"));
        assert_eq!(b.state(), BackendState::Destroyed);
        assert_eq!(b.surface_size(), (0, 0));
    }
}
