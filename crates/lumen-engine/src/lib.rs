//! Lumen engine crate.
//!
//! Application kernel for software-rendered real-time demos: an ordered
//! collaborator lifecycle, a fixed frame loop, frame timing and swappable
//! platform backends that present floating-point render targets.

pub mod config;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod platform;
pub mod present;
pub mod subsystem;
pub mod surface;
pub mod time;
