use std::fmt;

/// Backend lifecycle.
///
/// `Uninitialized -> Initializing -> Running -> Terminating -> Destroyed`,
/// with a direct jump to `Destroyed` from any earlier state when startup
/// fails or the backend is dropped early.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BackendState {
    Uninitialized,
    Initializing,
    Running,
    Terminating,
    Destroyed,
}

impl BackendState {
    pub fn can_advance_to(self, next: BackendState) -> bool {
        use BackendState::*;
        matches!(
            (self, next),
            (Uninitialized, Initializing)
                | (Initializing, Running)
                | (Running, Terminating)
                | (Uninitialized | Initializing | Running | Terminating, Destroyed)
        )
    }
}

impl fmt::Display for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Tracks a backend's [`BackendState`] and rejects out-of-order transitions.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    name:  &'static str,
    state: BackendState,
}

impl Lifecycle {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: BackendState::Uninitialized,
        }
    }

    pub fn state(&self) -> BackendState {
        self.state
    }

    pub fn is(&self, state: BackendState) -> bool {
        self.state == state
    }

    /// Moves to `next` if the transition is legal. Returns whether it moved.
    pub fn advance(&mut self, next: BackendState) -> bool {
        if !self.state.can_advance_to(next) {
            if self.state != next {
                log::warn!(
                    target: "platform",
                    "{}: ignoring transition {} -> {}",
                    self.name,
                    self.state,
                    next
                );
            }
            return false;
        }
        log::debug!(target: "platform", "{}: {} -> {}", self.name, self.state, next);
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BackendState::*;

    #[test]
    fn full_lifecycle_in_order() {
        let mut l = Lifecycle::new("test");
        for next in [Initializing, Running, Terminating, Destroyed] {
            assert!(l.advance(next), "{next}");
        }
        assert!(l.is(Destroyed));
    }

    #[test]
    fn failed_startup_goes_straight_to_destroyed() {
        let mut l = Lifecycle::new("test");
        l.advance(Initializing);
        assert!(l.advance(Destroyed));
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut l = Lifecycle::new("test");
        assert!(!l.advance(Running));
        assert!(!l.advance(Terminating));
        assert!(l.is(Uninitialized));

        l.advance(Destroyed);
        assert!(!l.advance(Initializing));
        assert!(!l.advance(Destroyed));
    }
}
