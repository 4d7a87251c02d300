use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Result};

use lumen_engine::config::CreationFlags;
use lumen_engine::core::{
    launch, App, AppState, Application, FrameCtx, RenderCtx, WorldCtx, EXIT_INIT_FAILURE,
};
use lumen_engine::input::{InputEvent, InputSnapshot, Key};
use lumen_engine::platform::{Backend, BackendState, HeadlessBackend, PlatformSignal};
use lumen_engine::present::{PresentError, Presenter};
use lumen_engine::subsystem::{FileIo, Graphics, Input, ResourceManager, Scene, Stage, SubsystemFactory};
use lumen_engine::surface::{ColorBuffer, RenderTarget, SurfaceFormat};

type Journal = Rc<RefCell<Vec<String>>>;

fn note(journal: &Journal, entry: impl Into<String>) {
    journal.borrow_mut().push(entry.into());
}

struct Stub {
    name:    &'static str,
    journal: Journal,
}

impl Drop for Stub {
    fn drop(&mut self) {
        note(&self.journal, format!("drop {}", self.name));
    }
}

impl Input for Stub {
    fn initialize(&mut self) -> Result<()> {
        note(&self.journal, "init input");
        Ok(())
    }

    fn update(&mut self, snapshot: &InputSnapshot) {
        if snapshot.key_down(Key::Space) {
            note(&self.journal, "space held");
        }
    }
}

impl FileIo for Stub {
    fn initialize(&mut self) -> Result<()> {
        note(&self.journal, "init file io");
        Ok(())
    }
}

impl ResourceManager for Stub {
    fn initialize(&mut self) -> Result<()> {
        note(&self.journal, "init resource manager");
        Ok(())
    }
}

impl Scene for Stub {
    fn initialize(&mut self) -> Result<()> {
        note(&self.journal, "init scene");
        Ok(())
    }

    fn frame_move(&mut self, state: &AppState) {
        note(&self.journal, format!("scene {}", state.frame_id()));
    }
}

struct TestGraphics {
    stub:  Stub,
    target: Option<RenderTarget>,
}

impl Graphics for TestGraphics {
    fn initialize(&mut self, flags: &CreationFlags) -> Result<()> {
        note(&self.stub.journal, format!("init graphics {}x{}", flags.width(), flags.height()));
        let buffer = ColorBuffer::new(flags.width(), flags.height(), SurfaceFormat::R32G32B32F);
        self.target = Some(RenderTarget::with_color_buffer(buffer));
        Ok(())
    }

    fn render_target(&self) -> Option<&RenderTarget> {
        self.target.as_ref()
    }
}

#[derive(Default)]
struct Recorded {
    frames:   Vec<u64>,
    elapsed:  Vec<f64>,
    presents: Vec<Result<(), PresentError>>,
}

struct TestApp {
    journal:       Journal,
    fail_at:       Option<Stage>,
    quit_at_frame: Option<u64>,
    recorded:      Rc<RefCell<Recorded>>,
}

impl TestApp {
    fn new() -> Self {
        Self {
            journal: Journal::default(),
            fail_at: None,
            quit_at_frame: None,
            recorded: Rc::default(),
        }
    }

    fn failing_at(stage: Stage) -> Self {
        Self { fail_at: Some(stage), ..Self::new() }
    }

    fn stub(&mut self, stage: Stage, name: &'static str) -> Result<Stub> {
        note(&self.journal, format!("create {name}"));
        if self.fail_at == Some(stage) {
            bail!("{name} unavailable");
        }
        Ok(Stub { name, journal: self.journal.clone() })
    }

    fn entries(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }
}

impl SubsystemFactory for TestApp {
    fn create_input(&mut self) -> Result<Box<dyn Input>> {
        Ok(Box::new(self.stub(Stage::Input, "input")?))
    }

    fn create_file_io(&mut self) -> Result<Box<dyn FileIo>> {
        Ok(Box::new(self.stub(Stage::FileIo, "file io")?))
    }

    fn create_graphics(&mut self) -> Result<Box<dyn Graphics>> {
        let stub = self.stub(Stage::Graphics, "graphics")?;
        Ok(Box::new(TestGraphics { stub, target: None }))
    }

    fn create_resource_manager(&mut self) -> Result<Box<dyn ResourceManager>> {
        Ok(Box::new(self.stub(Stage::ResourceManager, "resource manager")?))
    }

    fn create_scene(&mut self) -> Result<Box<dyn Scene>> {
        Ok(Box::new(self.stub(Stage::Scene, "scene")?))
    }
}

impl App for TestApp {
    type World = Stub;

    fn create_world(&mut self, _ctx: &mut WorldCtx<'_>) -> Result<Stub> {
        self.stub(Stage::World, "world")
    }

    fn frame_move(&mut self, _world: &mut Stub, ctx: &mut FrameCtx<'_>) {
        self.recorded.borrow_mut().frames.push(ctx.state.frame_id());
        if self.quit_at_frame == Some(ctx.state.frame_id()) {
            ctx.request_quit();
        }
    }

    fn render_world(&mut self, _world: &mut Stub, ctx: &mut RenderCtx<'_>) {
        let result = ctx.present();
        let mut rec = self.recorded.borrow_mut();
        rec.presents.push(result);
        rec.elapsed.push(ctx.state.elapsed());
    }
}

fn flags() -> CreationFlags {
    CreationFlags::new("Lifecycle").with_size(320, 240)
}

#[test]
fn collaborators_are_created_in_order_and_torn_down_in_reverse() {
    let mut app = Application::new(HeadlessBackend::new().quit_after(1), TestApp::new());
    app.initialize(&flags()).unwrap();
    assert!(app.subsystems().is_complete());
    assert!(app.has_world());
    assert_eq!(app.run(), 0);

    let journal = app.app().entries();
    let order: Vec<&str> = journal
        .iter()
        .map(String::as_str)
        .filter(|e| e.starts_with("create") || e.starts_with("drop"))
        .collect();
    assert_eq!(
        order,
        [
            "create input",
            "create file io",
            "create graphics",
            "create resource manager",
            "create scene",
            "create world",
            "drop world",
            "drop scene",
            "drop resource manager",
            "drop graphics",
            "drop file io",
            "drop input",
        ]
    );
    assert_eq!(app.backend().state(), BackendState::Destroyed);
}

#[test]
fn each_collaborator_is_initialized_before_the_next_is_created() {
    let mut app = Application::new(HeadlessBackend::new(), TestApp::new());
    app.initialize(&flags()).unwrap();

    let journal = app.app().entries();
    let pos = |entry: &str| journal.iter().position(|e| e == entry).unwrap();
    assert!(pos("init input") < pos("create file io"));
    assert!(pos("init file io") < pos("create graphics"));
    assert!(pos("init graphics 320x240") < pos("create resource manager"));
    assert!(pos("init resource manager") < pos("create scene"));
    assert!(pos("init scene") < pos("create world"));
}

#[test]
fn failure_at_any_stage_stops_creation_and_releases_earlier_ones() {
    for (k, failing) in Stage::ORDER.iter().copied().enumerate() {
        let mut app = Application::new(HeadlessBackend::new(), TestApp::failing_at(failing));
        let err = app.initialize(&flags()).unwrap_err();
        assert!(
            format!("{err:#}").contains(&format!("{failing} initialization failed")),
            "unexpected error for {failing}: {err:#}"
        );

        let journal = app.app().entries();
        let created = journal.iter().filter(|e| e.starts_with("create")).count();
        let dropped = journal.iter().filter(|e| e.starts_with("drop")).count();
        assert_eq!(created, k + 1, "stage {failing}");
        assert_eq!(dropped, k, "stage {failing}");

        assert!(!app.has_world());
        assert!(Stage::ORDER.iter().all(|s| !app.subsystems().is_created(*s)));
        assert_eq!(app.backend().state(), BackendState::Destroyed);
        assert_eq!(app.run(), EXIT_INIT_FAILURE);
    }
}

#[test]
fn launch_reports_init_failure_as_exit_code_one() {
    let code = launch(HeadlessBackend::new(), TestApp::failing_at(Stage::Graphics), &flags());
    assert_eq!(code, EXIT_INIT_FAILURE);

    let code = launch(HeadlessBackend::new().fail_initialize("no display"), TestApp::new(), &flags());
    assert_eq!(code, EXIT_INIT_FAILURE);
}

#[test]
fn platform_failure_creates_no_collaborators() {
    let mut app = Application::new(HeadlessBackend::new().fail_initialize("no display"), TestApp::new());
    let err = app.initialize(&flags()).unwrap_err();
    assert!(format!("{err:#}").contains("platform initialization failed"));
    assert!(app.app().entries().is_empty());
}

#[test]
fn graphics_sees_clamped_dimensions() {
    let mut app = Application::new(HeadlessBackend::new(), TestApp::new());
    app.initialize(&CreationFlags::new("T").with_size(3000, 50)).unwrap();
    assert!(app.app().entries().contains(&"init graphics 1600x160".to_owned()));
    assert_eq!((app.state().width(), app.state().height()), (1600, 160));
    assert_eq!(app.backend().surface_size(), (1600, 160));
}

#[test]
fn frames_are_numbered_consecutively_and_presented() {
    let mut app = Application::new(HeadlessBackend::new().quit_after(5), TestApp::new());
    app.initialize(&flags()).unwrap();
    assert_eq!(app.run(), 0);

    let rec = app.app().recorded.borrow();
    assert_eq!(rec.frames, [1, 2, 3, 4, 5]);
    assert!(rec.presents.iter().all(Result::is_ok));
    assert_eq!(app.backend().frames_presented(), 5);
    assert_eq!(app.state().frame_id(), 5);
}

#[test]
fn scene_update_follows_each_frame() {
    let mut app = Application::new(HeadlessBackend::new().quit_after(2), TestApp::new());
    app.initialize(&flags()).unwrap();
    app.run();

    let scenes: Vec<String> = app
        .app()
        .entries()
        .into_iter()
        .filter(|e| e.starts_with("scene "))
        .collect();
    assert_eq!(scenes, ["scene 1", "scene 2"]);
}

#[test]
fn elapsed_time_accumulates_and_survives_a_zero_delta() {
    let ms = Duration::from_millis;
    let backend = HeadlessBackend::new()
        .with_steps([ms(0), ms(16), ms(33), ms(8), ms(0)])
        .quit_after(5);
    let mut app = Application::new(backend, TestApp::new());
    app.initialize(&flags()).unwrap();
    app.run();

    // Elapsed is sampled during rendering, so it trails by one frame.
    let rec = app.app().recorded.borrow();
    assert!(rec.elapsed.windows(2).all(|w| w[0] <= w[1]));
    assert!((app.state().elapsed() - 0.057).abs() < 1e-9);
    assert!(app.state().fps().is_finite());
    assert!(app.state().fps() > 0.0);
}

#[test]
fn quit_request_ends_the_loop_after_the_current_frame() {
    let mut test_app = TestApp::new();
    test_app.quit_at_frame = Some(3);
    let mut app = Application::new(HeadlessBackend::new(), test_app);
    app.initialize(&flags()).unwrap();
    assert_eq!(app.run(), 0);

    assert_eq!(app.app().recorded.borrow().frames, [1, 2, 3]);
    assert_eq!(app.app().recorded.borrow().presents.len(), 3);
}

#[test]
fn every_continuing_check_runs_a_frame_even_while_inactive() {
    let backend = HeadlessBackend::new().with_script([
        vec![PlatformSignal::Activated(false)],
        vec![],
        vec![],
        vec![],
        vec![PlatformSignal::Quit],
    ]);
    let mut app = Application::new(backend, TestApp::new());
    app.initialize(&flags()).unwrap();
    assert_eq!(app.run(), 0);

    assert_eq!(app.app().recorded.borrow().frames, [1, 2, 3, 4]);
    assert_eq!(app.state().frame_id(), 4);
    assert_eq!(app.backend().frames_presented(), 4);
}

#[test]
fn reactivation_keeps_frame_ids_consecutive() {
    let backend = HeadlessBackend::new().with_script([
        vec![],
        vec![PlatformSignal::Activated(false)],
        vec![PlatformSignal::Activated(true)],
        vec![PlatformSignal::Quit],
    ]);
    let mut app = Application::new(backend, TestApp::new());
    app.initialize(&flags()).unwrap();
    app.run();

    assert_eq!(app.app().recorded.borrow().frames, [1, 2, 3]);
}

#[test]
fn input_collaborator_sees_translated_events() {
    let press = PlatformSignal::Input(InputEvent::Key { key: Key::Space, pressed: true });
    let release = PlatformSignal::Input(InputEvent::Key { key: Key::Space, pressed: false });
    let backend = HeadlessBackend::new().with_script([vec![press], vec![], vec![release]]).quit_after(3);
    let mut app = Application::new(backend, TestApp::new());
    app.initialize(&flags()).unwrap();
    app.run();

    let held = app.app().entries().iter().filter(|e| *e == "space held").count();
    assert_eq!(held, 2);
}

#[test]
fn presenting_without_a_color_buffer_reports_invalid_state() {
    struct BareGraphics(RenderTarget);

    impl Graphics for BareGraphics {
        fn initialize(&mut self, _flags: &CreationFlags) -> Result<()> {
            Ok(())
        }

        fn render_target(&self) -> Option<&RenderTarget> {
            Some(&self.0)
        }
    }

    struct Bare(TestApp);

    impl SubsystemFactory for Bare {
        fn create_input(&mut self) -> Result<Box<dyn Input>> {
            self.0.create_input()
        }
        fn create_file_io(&mut self) -> Result<Box<dyn FileIo>> {
            self.0.create_file_io()
        }
        fn create_graphics(&mut self) -> Result<Box<dyn Graphics>> {
            Ok(Box::new(BareGraphics(RenderTarget::new())))
        }
        fn create_resource_manager(&mut self) -> Result<Box<dyn ResourceManager>> {
            self.0.create_resource_manager()
        }
        fn create_scene(&mut self) -> Result<Box<dyn Scene>> {
            self.0.create_scene()
        }
    }

    impl App for Bare {
        type World = ();

        fn create_world(&mut self, _ctx: &mut WorldCtx<'_>) -> Result<()> {
            Ok(())
        }

        fn frame_move(&mut self, _world: &mut (), _ctx: &mut FrameCtx<'_>) {}

        fn render_world(&mut self, _world: &mut (), ctx: &mut RenderCtx<'_>) {
            let result = ctx.present();
            self.0.recorded.borrow_mut().presents.push(result);
        }
    }

    let mut app = Application::new(HeadlessBackend::new().quit_after(1), Bare(TestApp::new()));
    app.initialize(&flags()).unwrap();
    app.run();

    assert_eq!(app.app().0.recorded.borrow().presents, [Err(PresentError::InvalidState)]);
    assert_eq!(app.backend().frames_presented(), 0);
}
