use anyhow::{Context, Result};

use crate::config::CreationFlags;

use super::stage::Stage;
use super::traits::{FileIo, Graphics, Input, ResourceManager, Scene, SubsystemFactory};

const LOG_TARGET: &str = "lumen::subsystem";

/// Ownership list of the collaborators.
///
/// Slots stay `None` until their collaborator has been constructed and
/// initialized. Teardown empties them in reverse creation order, both on
/// shutdown and when startup stops part-way.
#[derive(Default)]
pub struct Subsystems {
    input:            Option<Box<dyn Input>>,
    file_io:          Option<Box<dyn FileIo>>,
    graphics:         Option<Box<dyn Graphics>>,
    resource_manager: Option<Box<dyn ResourceManager>>,
    scene:            Option<Box<dyn Scene>>,
}

impl Subsystems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and initializes every collaborator in order.
    ///
    /// Stops at the first failure: later collaborators are not constructed
    /// and the error names the failing stage. Already created ones are left
    /// in place for the caller's teardown.
    pub fn create<F>(&mut self, factory: &mut F, flags: &CreationFlags) -> Result<()>
    where
        F: SubsystemFactory + ?Sized,
    {
        self.input = Some(stage(Stage::Input, || {
            let mut s = factory.create_input()?;
            s.initialize()?;
            Ok(s)
        })?);

        self.file_io = Some(stage(Stage::FileIo, || {
            let mut s = factory.create_file_io()?;
            s.initialize()?;
            Ok(s)
        })?);

        self.graphics = Some(stage(Stage::Graphics, || {
            let mut s = factory.create_graphics()?;
            s.initialize(flags)?;
            Ok(s)
        })?);

        self.resource_manager = Some(stage(Stage::ResourceManager, || {
            let mut s = factory.create_resource_manager()?;
            s.initialize()?;
            Ok(s)
        })?);

        self.scene = Some(stage(Stage::Scene, || {
            let mut s = factory.create_scene()?;
            s.initialize()?;
            Ok(s)
        })?);

        Ok(())
    }

    /// Drops every collaborator, last created first.
    pub fn teardown(&mut self) {
        if self.scene.take().is_some() {
            log::debug!(target: LOG_TARGET, "destroyed {}", Stage::Scene);
        }
        if self.resource_manager.take().is_some() {
            log::debug!(target: LOG_TARGET, "destroyed {}", Stage::ResourceManager);
        }
        if self.graphics.take().is_some() {
            log::debug!(target: LOG_TARGET, "destroyed {}", Stage::Graphics);
        }
        if self.file_io.take().is_some() {
            log::debug!(target: LOG_TARGET, "destroyed {}", Stage::FileIo);
        }
        if self.input.take().is_some() {
            log::debug!(target: LOG_TARGET, "destroyed {}", Stage::Input);
        }
    }

    /// Whether the collaborator for `stage` exists. Always `false` for
    /// [`Stage::World`], which the application owns.
    pub fn is_created(&self, stage: Stage) -> bool {
        match stage {
            Stage::Input => self.input.is_some(),
            Stage::FileIo => self.file_io.is_some(),
            Stage::Graphics => self.graphics.is_some(),
            Stage::ResourceManager => self.resource_manager.is_some(),
            Stage::Scene => self.scene.is_some(),
            Stage::World => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        Stage::ORDER
            .iter()
            .filter(|s| **s != Stage::World)
            .all(|s| self.is_created(*s))
    }

    pub fn input_mut(&mut self) -> Option<&mut dyn Input> {
        self.input.as_deref_mut().map(|s| s as &mut dyn Input)
    }

    pub fn graphics(&self) -> Option<&dyn Graphics> {
        self.graphics.as_deref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut dyn Scene> {
        self.scene.as_deref_mut().map(|s| s as &mut dyn Scene)
    }
}

impl Drop for Subsystems {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn stage<T>(stage: Stage, build: impl FnOnce() -> Result<T>) -> Result<T> {
    let out = build().with_context(|| format!("{stage} initialization failed"))?;
    log::debug!(target: LOG_TARGET, "created {stage}");
    Ok(out)
}
