use std::fmt;

/// Keyboard key identifier.
///
/// Only the keys demos react to get their own variant. Everything else maps
/// to `Key::Unknown`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,

    /// Letter keys, uppercase ASCII.
    Letter(char),
    /// Top-row digits 0-9.
    Digit(u8),
    /// Function keys F1-F12.
    Function(u8),

    /// Platform-dependent key not represented here.
    Unknown,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Platform-agnostic input events produced by the backends.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer position in physical pixels relative to the client area.
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
    Button { button: MouseButton, pressed: bool },
    Key { key: Key, pressed: bool },
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Letter(c) => write!(f, "{c}"),
            Key::Digit(d) => write!(f, "{d}"),
            Key::Function(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}
