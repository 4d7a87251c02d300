//! Application kernel.
//!
//! Ties a platform backend, the collaborator set and a demo's hooks into the
//! ordered startup / frame loop / reverse teardown lifecycle.

mod app;
mod application;
mod ctx;
mod state;

pub use app::App;
pub use application::{launch, Application, EXIT_INIT_FAILURE};
pub use ctx::{FrameCtx, RenderCtx, WorldCtx};
pub use state::AppState;
