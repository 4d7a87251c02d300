use std::fmt;

/// Per-frame presentation failure.
///
/// Success is `Ok(())` in [`PresentResult`]. None of these are retried; the
/// frame is dropped and the loop carries on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PresentError {
    /// Unclassified failure (lock contention, transient surface loss).
    Unknown,
    /// No render target was supplied.
    InvalidParameters,
    /// Staging storage or the device ran out of memory.
    OutOfMemory,
    /// The color buffer does not carry at least three channels.
    InvalidFormat,
    /// The target is not presentable as is: no color buffer, or a size that
    /// differs from the visible surface.
    InvalidState,
}

pub type PresentResult = Result<(), PresentError>;

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PresentError::Unknown => "unknown presentation failure",
            PresentError::InvalidParameters => "invalid parameters",
            PresentError::OutOfMemory => "out of memory",
            PresentError::InvalidFormat => "invalid color buffer format",
            PresentError::InvalidState => "invalid render target state",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for PresentError {}
