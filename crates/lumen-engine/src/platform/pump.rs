use std::time::Duration;

use anyhow::{bail, Context, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::WindowId;

use super::signal::PumpMode;

/// Upper bound on pumps while waiting for the first `resumed` callback.
const STARTUP_PUMPS: usize = 64;

type CreateFn<T> = Box<dyn FnOnce(&ActiveEventLoop) -> Result<T>>;

/// Event handler handed to winit on each pump.
///
/// Holds everything a callback needs, so no global state is involved: the
/// window target is built from `create` on the first `resumed`, and window
/// events are queued for the owning backend to translate after the pump.
pub(crate) struct WindowHost<T> {
    create: Option<CreateFn<T>>,
    target: Option<T>,
    error:  Option<anyhow::Error>,
    events: Vec<WindowEvent>,
}

impl<T> WindowHost<T> {
    pub(crate) fn new(create: impl FnOnce(&ActiveEventLoop) -> Result<T> + 'static) -> Self {
        Self {
            create: Some(Box::new(create)),
            target: None,
            error: None,
            events: Vec::new(),
        }
    }

    pub(crate) fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub(crate) fn target_mut(&mut self) -> Option<&mut T> {
        self.target.as_mut()
    }

    /// Drops the window target. Later pumps only collect events.
    pub(crate) fn release(&mut self) -> Option<T> {
        self.create = None;
        self.target.take()
    }

    pub(crate) fn take_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.events)
    }
}

impl<T> ApplicationHandler for WindowHost<T> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(create) = self.create.take() else { return };
        match create(event_loop) {
            Ok(target) => self.target = Some(target),
            Err(err) => self.error = Some(err),
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        self.events.push(event);
    }
}

/// Non-blocking driver over a winit event loop.
pub(crate) struct EventPump {
    event_loop: EventLoop<()>,
}

impl EventPump {
    pub(crate) fn new() -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        Ok(Self { event_loop })
    }

    /// Dispatches pending events to `host`. Returns `false` once winit
    /// reports the loop exited.
    pub(crate) fn pump<T>(&mut self, mode: PumpMode, host: &mut WindowHost<T>) -> bool {
        let timeout = match mode {
            PumpMode::Poll => Some(Duration::ZERO),
            PumpMode::Wait => None,
        };
        match self.event_loop.pump_app_events(timeout, host) {
            PumpStatus::Continue => true,
            PumpStatus::Exit(code) => {
                log::debug!(target: "platform", "event loop exited with {code}");
                false
            }
        }
    }

    /// Pumps until `host` has built its window target.
    pub(crate) fn start<T>(&mut self, host: &mut WindowHost<T>) -> Result<()> {
        for _ in 0..STARTUP_PUMPS {
            let alive = self.pump(PumpMode::Poll, host);
            if let Some(err) = host.error.take() {
                return Err(err);
            }
            if host.target.is_some() {
                return Ok(());
            }
            if !alive {
                bail!("event loop exited before the window was created");
            }
        }
        bail!("window was not created after {STARTUP_PUMPS} event pumps")
    }
}
