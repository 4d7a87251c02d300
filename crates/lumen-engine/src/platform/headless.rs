use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{anyhow, bail, ensure, Result};

use crate::config::CreationFlags;
use crate::present::{PresentError, PresentResult, Presenter, SoftwarePresenter};
use crate::surface::RenderTarget;
use crate::time::{Clock, ManualClock};

use super::lifecycle::{BackendState, Lifecycle};
use super::signal::{LoopControl, PlatformSignal, PumpMode};
use super::{Backend, BackendKind};

/// Clock advance per event check when no script step is left.
pub const DEFAULT_STEP: Duration = Duration::from_millis(16);

/// Windowless backend driven by a script.
///
/// Each event check advances a [`ManualClock`] by the next scripted step
/// (then [`DEFAULT_STEP`]) and replays the next batch of scripted signals.
/// Because the step lands before the frame starts, the first frame measures
/// a zero delta and frame `k > 1` measures step `k`.
///
/// Presentation runs the CPU conversion so render targets are validated
/// exactly as on a real surface.
pub struct HeadlessBackend {
    lifecycle:    Lifecycle,
    clock:        ManualClock,
    steps:        VecDeque<Duration>,
    script:       VecDeque<Vec<PlatformSignal>>,
    quit_after:   Option<u64>,
    checks:       u64,
    init_failure: Option<String>,
    presenter:    Option<SoftwarePresenter>,
    presented:    u64,
    last_present: Option<PresentResult>,
    quit_posted:  bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::new("headless"),
            clock: ManualClock::new(),
            steps: VecDeque::new(),
            script: VecDeque::new(),
            quit_after: None,
            checks: 0,
            init_failure: None,
            presenter: None,
            presented: 0,
            last_present: None,
            quit_posted: false,
        }
    }

    /// Clock advances for successive event checks.
    pub fn with_steps(mut self, steps: impl IntoIterator<Item = Duration>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Signals delivered by successive event checks, one batch per check.
    pub fn with_script(mut self, batches: impl IntoIterator<Item = Vec<PlatformSignal>>) -> Self {
        self.script.extend(batches);
        self
    }

    /// Quits at the event check following frame `frames`.
    pub fn quit_after(mut self, frames: u64) -> Self {
        self.quit_after = Some(frames);
        self
    }

    /// Makes `initialize` fail with `reason`, as a missing display would.
    pub fn fail_initialize(mut self, reason: impl Into<String>) -> Self {
        self.init_failure = Some(reason.into());
        self
    }

    /// Shared handle to the backend clock.
    pub fn clock_handle(&self) -> ManualClock {
        self.clock.clone()
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    pub fn last_present(&self) -> Option<PresentResult> {
        self.last_present
    }

    /// Last successfully converted frame as BGR24.
    pub fn last_frame(&self) -> Option<&[u8]> {
        self.presenter.as_ref().map(SoftwarePresenter::bgr)
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for HeadlessBackend {
    fn present(&mut self, target: Option<&RenderTarget>) -> PresentResult {
        let result = match self.presenter.as_mut() {
            Some(presenter) => presenter.convert(target),
            None => Err(PresentError::InvalidState),
        };
        if result.is_ok() {
            self.presented += 1;
        }
        self.last_present = Some(result);
        result
    }

    fn surface_size(&self) -> (u32, u32) {
        self.presenter
            .as_ref()
            .map_or((0, 0), SoftwarePresenter::surface_size)
    }
}

impl Backend for HeadlessBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Headless
    }

    fn state(&self) -> BackendState {
        self.lifecycle.state()
    }

    fn initialize(&mut self, flags: &CreationFlags) -> Result<()> {
        ensure!(
            self.lifecycle.advance(BackendState::Initializing),
            "headless backend cannot initialize from {}",
            self.lifecycle.state()
        );

        if let Some(reason) = self.init_failure.take() {
            self.destroy();
            bail!("{reason}");
        }

        match SoftwarePresenter::new(flags.width(), flags.height()) {
            Ok(presenter) => {
                self.presenter = Some(presenter);
                Ok(())
            }
            Err(err) => {
                self.destroy();
                Err(anyhow!("failed to allocate backbuffer: {err}"))
            }
        }
    }

    fn begin_running(&mut self) {
        self.lifecycle.advance(BackendState::Running);
    }

    fn check_messages(&mut self, _mode: PumpMode, signals: &mut Vec<PlatformSignal>) -> LoopControl {
        let start = signals.len();

        let step = self.steps.pop_front().unwrap_or(DEFAULT_STEP);
        self.clock.advance(step);

        if std::mem::take(&mut self.quit_posted) {
            signals.push(PlatformSignal::Quit);
        }
        if let Some(batch) = self.script.pop_front() {
            signals.extend(batch);
        }
        if self.quit_after.is_some_and(|n| self.checks >= n) {
            signals.push(PlatformSignal::Quit);
        }
        self.checks += 1;

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
        Duration::ZERO
    }

    fn destroy(&mut self) {
        if self.lifecycle.is(BackendState::Destroyed) {
            return;
        }
        self.presenter = None;
        self.lifecycle.advance(BackendState::Destroyed);
    }
}
