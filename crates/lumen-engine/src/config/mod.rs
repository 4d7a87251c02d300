//! Startup configuration.
//!
//! `CreationFlags` is the immutable value every backend and the Graphics
//! collaborator are created from; `LaunchArgs` is the command-line front for it.

mod cli;
mod flags;

pub use cli::LaunchArgs;
pub use flags::{
    clamp_height, clamp_width, CreationFlags, WindowIcon, DEFAULT_HEIGHT, DEFAULT_WIDTH,
    HEIGHT_RANGE, WIDTH_RANGE,
};
