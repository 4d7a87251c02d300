use crate::present::PresentError;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM).
    Fatal,
}

impl From<SurfaceErrorAction> for PresentError {
    fn from(action: SurfaceErrorAction) -> Self {
        match action {
            SurfaceErrorAction::Fatal => PresentError::OutOfMemory,
            SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                PresentError::Unknown
            }
        }
    }
}
