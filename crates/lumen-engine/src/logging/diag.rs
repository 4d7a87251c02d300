use std::fmt::Display;

/// Log target for diagnostic traces.
pub const DIAG_TARGET: &str = "lumen::diag";

/// Reports a failed check along with its call site context.
///
/// Emitted only in debug builds; release builds compile this to nothing
/// observable.
pub fn failing(context: &str, detail: impl Display) {
    if cfg!(debug_assertions) {
        log::warn!(target: DIAG_TARGET, "FAILED {context}: {detail}");
    }
}

/// Reports a notable but non-fatal event (fallbacks, retries).
pub fn notify(context: &str, detail: impl Display) {
    if cfg!(debug_assertions) {
        log::info!(target: DIAG_TARGET, "{context}: {detail}");
    }
}
