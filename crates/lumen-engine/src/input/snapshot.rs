use std::collections::HashSet;

use super::types::{InputEvent, Key, MouseButton};

/// Latest device state, as handed to the Input collaborator each frame.
///
/// Held keys and buttons are tracked as sets; the pointer position is the
/// last reported one, `None` while outside the client area.
#[derive(Debug, Default, Clone)]
pub struct InputSnapshot {
    focused:      bool,
    pointer_pos:  Option<(f32, f32)>,
    keys_down:    HashSet<Key>,
    buttons_down: HashSet<MouseButton>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates focus. Losing focus clears held keys and buttons so nothing
    /// stays stuck down while another window owns the input.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.keys_down.clear();
            self.buttons_down.clear();
        }
    }

    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((x, y)),
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::Button { button, pressed } => {
                if pressed {
                    self.buttons_down.insert(button);
                } else {
                    self.buttons_down.remove(&button);
                }
            }
            InputEvent::Key { key, pressed } => {
                if pressed {
                    self.keys_down.insert(key);
                } else {
                    self.keys_down.remove(&key);
                }
            }
        }
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn pointer_pos(&self) -> Option<(f32, f32)> {
        self.pointer_pos
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}
