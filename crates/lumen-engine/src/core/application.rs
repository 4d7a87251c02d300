use anyhow::{Context, Result};

use crate::config::CreationFlags;
use crate::input::InputSnapshot;
use crate::platform::{Backend, LoopControl, PlatformSignal, PumpMode};
use crate::subsystem::{Stage, Subsystems};
use crate::time::FrameTimer;

use super::app::App;
use super::ctx::{FrameCtx, RenderCtx, WorldCtx};
use super::state::AppState;

const LOG_TARGET: &str = "lumen::app";

/// Exit status of [`Application::run`] when startup never completed.
pub const EXIT_INIT_FAILURE: i32 = 1;

/// The kernel: one backend, one demo, the collaborators and the frame loop.
///
/// Lifecycle: [`initialize`](Self::initialize) brings up the backend, the
/// collaborators and the world in that order; [`run`](Self::run) drives
/// frames until the platform quits; teardown happens in reverse on shutdown,
/// on startup failure and on drop.
pub struct Application<B: Backend, A: App> {
    backend:    B,
    app:        A,
    state:      AppState,
    subsystems: Subsystems,
    world:      Option<A::World>,
    input:      InputSnapshot,
    timer:      FrameTimer,
    signals:    Vec<PlatformSignal>,
    ready:      bool,
}

impl<B: Backend, A: App> Application<B, A> {
    pub fn new(backend: B, app: A) -> Self {
        Self {
            backend,
            app,
            state: AppState::default(),
            subsystems: Subsystems::new(),
            world: None,
            input: InputSnapshot::new(),
            timer: FrameTimer::new(),
            signals: Vec::new(),
            ready: false,
        }
    }

    /// Creates the platform surface, the collaborators and the world.
    ///
    /// On failure everything created so far is torn down and the frame loop
    /// stays unreachable.
    pub fn initialize(&mut self, flags: &CreationFlags) -> Result<()> {
        self.state = AppState::from_flags(flags);
        log::info!(
            target: LOG_TARGET,
            "initializing \"{}\" {}x{} ({}) on {} backend",
            flags.title(),
            flags.width(),
            flags.height(),
            if flags.is_windowed() { "windowed" } else { "fullscreen" },
            self.backend.kind()
        );

        if let Err(err) = self.create_all(flags) {
            self.shutdown();
            return Err(err);
        }

        self.ready = true;
        Ok(())
    }

    fn create_all(&mut self, flags: &CreationFlags) -> Result<()> {
        self.backend
            .initialize(flags)
            .context("platform initialization failed")?;

        self.subsystems.create(&mut self.app, flags)?;

        let mut ctx = WorldCtx {
            state: &self.state,
            subsystems: &mut self.subsystems,
        };
        let world = self
            .app
            .create_world(&mut ctx)
            .with_context(|| format!("{} initialization failed", Stage::World))?;
        self.world = Some(world);
        Ok(())
    }

    /// Runs the frame loop until the platform reports a quit.
    ///
    /// Returns 0 on normal termination and [`EXIT_INIT_FAILURE`] when called
    /// without a successful [`initialize`](Self::initialize).
    pub fn run(&mut self) -> i32 {
        if !self.ready {
            log::error!(target: LOG_TARGET, "run called before successful initialization");
            return EXIT_INIT_FAILURE;
        }

        self.backend.begin_running();
        self.set_active(true);

        while self.check_messages() == LoopControl::Continue {
            self.begin_frame();
            self.render_world();
            self.end_frame();

            let pause = self.backend.frame_yield();
            if !pause.is_zero() {
                std::thread::sleep(pause);
            }
        }

        log::info!(
            target: LOG_TARGET,
            "quit after {} frames, {:.3}s",
            self.state.frame_id(),
            self.state.elapsed()
        );
        self.shutdown();
        0
    }

    /// Drains pending platform signals. Polls while active, blocks while not;
    /// a frame follows every check that does not stop the loop.
    fn check_messages(&mut self) -> LoopControl {
        let mode = if self.state.is_active() {
            PumpMode::Poll
        } else {
            PumpMode::Wait
        };

        self.signals.clear();
        let mut control = self.backend.check_messages(mode, &mut self.signals);

        for signal in self.signals.drain(..) {
            match signal {
                PlatformSignal::Quit => control = LoopControl::Stop,
                PlatformSignal::Activated(active) => {
                    self.state.set_active(active);
                    self.input.set_focused(active);
                }
                PlatformSignal::Input(event) => self.input.apply(&event),
            }
        }

        control
    }

    fn set_active(&mut self, active: bool) {
        self.state.set_active(active);
        self.input.set_focused(active);
    }

    fn begin_frame(&mut self) {
        self.timer.begin(self.backend.clock().now());
        self.state.next_frame();

        if let Some(input) = self.subsystems.input_mut() {
            input.update(&self.input);
        }

        if let Some(world) = self.world.as_mut() {
            let mut ctx = FrameCtx::new(&self.state, &self.input);
            self.app.frame_move(world, &mut ctx);
            if ctx.quit_requested() {
                log::debug!(target: LOG_TARGET, "quit requested at frame {}", self.state.frame_id());
                self.backend.post_quit();
            }
        }

        if let Some(scene) = self.subsystems.scene_mut() {
            scene.frame_move(&self.state);
        }
    }

    fn render_world(&mut self) {
        let Some(world) = self.world.as_mut() else { return };
        let mut ctx = RenderCtx::new(&self.state, &mut self.subsystems, &mut self.backend);
        self.app.render_world(world, &mut ctx);
    }

    fn end_frame(&mut self) {
        let time = self.timer.end(self.backend.clock().now());
        self.state.record(&time);
        log::trace!(
            target: LOG_TARGET,
            "frame {} dt={:?} fps={:.1}",
            self.state.frame_id(),
            time.delta,
            time.fps
        );
    }

    /// Destroys world, collaborators and platform resources, in that order.
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(world) = self.world.take() {
            self.app.destroy_world(world);
            log::debug!(target: LOG_TARGET, "destroyed {}", Stage::World);
        }
        self.subsystems.teardown();
        self.backend.destroy();
        self.ready = false;
        self.state.set_active(false);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn subsystems(&self) -> &Subsystems {
        &self.subsystems
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn has_world(&self) -> bool {
        self.world.is_some()
    }
}

impl<B: Backend, A: App> Drop for Application<B, A> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Initializes and runs `app` on `backend`, returning the process exit code.
pub fn launch<B: Backend, A: App>(backend: B, app: A, flags: &CreationFlags) -> i32 {
    let mut application = Application::new(backend, app);
    if let Err(err) = application.initialize(flags) {
        log::error!(target: LOG_TARGET, "{err:#}");
        return EXIT_INIT_FAILURE;
    }
    application.run()
}
