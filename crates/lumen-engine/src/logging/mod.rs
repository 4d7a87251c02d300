//! Logging utilities.
//!
//! Logger initialization plus the debug-only diagnostic helpers used on
//! failure paths (`failing`) and fallbacks (`notify`). Everything goes
//! through the `log` facade.

mod diag;
mod init;

pub use diag::{failing, notify, DIAG_TARGET};
pub use init::{init_logging, LoggingConfig};
