use crate::input::InputEvent;

/// Platform-neutral signal produced by a backend's event check.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PlatformSignal {
    /// The platform asked the application to terminate.
    Quit,
    /// The window gained (`true`) or lost (`false`) activation.
    Activated(bool),
    Input(InputEvent),
}

/// Result of one event check.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// How an event check waits for platform events.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PumpMode {
    /// Return immediately with whatever is pending.
    Poll,
    /// Block until at least one event arrives.
    Wait,
}
