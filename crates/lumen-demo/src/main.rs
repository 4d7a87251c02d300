mod bubble;
mod subsystems;

use clap::Parser;

use lumen_engine::config::LaunchArgs;
use lumen_engine::core::launch;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::platform::{
    BackendKind, DisplayBackend, HeadlessBackend, LibraryBackend, NativeBackend,
};

use bubble::BubbleApp;

/// Frames a headless run lasts when `--frames` is not given.
const HEADLESS_FRAMES: u64 = 120;

fn main() {
    let args = LaunchArgs::parse();
    init_logging(LoggingConfig::with_filter(args.log_filter.clone()));

    let flags = args.creation_flags("Bubble");
    log::info!(target: "bubble", "starting on {} backend", args.backend);

    let code = match args.backend {
        BackendKind::Native => launch(NativeBackend::new(), BubbleApp, &flags),
        BackendKind::Library => launch(LibraryBackend::new(), BubbleApp, &flags),
        BackendKind::Display => launch(DisplayBackend::new(), BubbleApp, &flags),
        BackendKind::Headless => {
            let frames = args.frames.unwrap_or(HEADLESS_FRAMES);
            launch(HeadlessBackend::new().quit_after(frames), BubbleApp, &flags)
        }
    };

    std::process::exit(code);
}
