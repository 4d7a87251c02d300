//! Input subsystem.
//!
//! Public API is platform-agnostic. Backends translate window-system events
//! into [`InputEvent`]s (see [`translate_window_event`] for winit) and the
//! application folds them into an [`InputSnapshot`].

mod translate;
mod snapshot;
mod types;

pub use snapshot::InputSnapshot;
pub use translate::{map_key, map_mouse_button, translate_window_event};
pub use types::{InputEvent, Key, MouseButton};
