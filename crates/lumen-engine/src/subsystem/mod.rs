//! Collaborator contracts and their ownership list.
//!
//! The kernel never implements Input, FileIO, Graphics, ResourceManager or
//! Scene itself. It constructs them through a [`SubsystemFactory`] in a fixed
//! order and owns them in [`Subsystems`].

mod set;
mod stage;
mod traits;

pub use set::Subsystems;
pub use stage::Stage;
pub use traits::{FileIo, Graphics, Input, ResourceManager, Scene, SubsystemFactory};
