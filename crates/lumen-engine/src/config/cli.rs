use clap::Parser;

use crate::platform::BackendKind;

use super::flags::{CreationFlags, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Command-line surface shared by demo binaries.
///
/// Width and height are taken as raw strings: a malformed value falls back to
/// the default for that axis instead of aborting the launch.
#[derive(Debug, Clone, Parser)]
#[command(version, about = "Software-rendered real-time demo")]
pub struct LaunchArgs {
    /// Surface width in pixels (clamped to 160..=1600).
    #[arg(allow_hyphen_values = true)]
    pub width: Option<String>,

    /// Surface height in pixels (clamped to 160..=1280).
    #[arg(allow_hyphen_values = true)]
    pub height: Option<String>,

    /// Platform backend driving the window and event loop.
    #[arg(long, value_enum, default_value_t = BackendKind::platform_default())]
    pub backend: BackendKind,

    /// Request a fullscreen display instead of a window.
    #[arg(long)]
    pub fullscreen: bool,

    /// Number of frames to run before quitting (headless backend only).
    #[arg(long)]
    pub frames: Option<u64>,

    /// Log filter in `env_logger` syntax, e.g. "lumen_engine=debug".
    #[arg(long = "log")]
    pub log_filter: Option<String>,
}

impl LaunchArgs {
    /// Parses from an explicit argument list (first item is the program name).
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    pub fn width(&self) -> i64 {
        parse_dimension(self.width.as_deref(), DEFAULT_WIDTH)
    }

    pub fn height(&self) -> i64 {
        parse_dimension(self.height.as_deref(), DEFAULT_HEIGHT)
    }

    /// Builds clamped creation flags for `title`.
    pub fn creation_flags(&self, title: impl Into<String>) -> CreationFlags {
        CreationFlags::new(title)
            .with_size(self.width(), self.height())
            .windowed(!self.fullscreen)
    }
}

fn parse_dimension(raw: Option<&str>, default: u32) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(i64::from(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> LaunchArgs {
        let mut all = vec!["lumen-demo"];
        all.extend_from_slice(list);
        LaunchArgs::from_args(all).unwrap()
    }

    #[test]
    fn no_arguments_use_defaults() {
        let f = args(&[]).creation_flags("Bubble");
        assert_eq!((f.width(), f.height()), (400, 300));
        assert!(f.is_windowed());
    }

    #[test]
    fn positional_dimensions_are_clamped() {
        let f = args(&["3000", "50"]).creation_flags("T");
        assert_eq!((f.width(), f.height()), (1600, 160));

        let f = args(&["640", "480"]).creation_flags("T");
        assert_eq!((f.width(), f.height()), (640, 480));
    }

    #[test]
    fn malformed_dimension_falls_back_per_axis() {
        let f = args(&["wide", "720"]).creation_flags("T");
        assert_eq!((f.width(), f.height()), (400, 720));

        let f = args(&["800", "1.5"]).creation_flags("T");
        assert_eq!((f.width(), f.height()), (800, 300));
    }

    #[test]
    fn negative_dimensions_are_accepted_and_clamped() {
        let f = args(&["-5", "-100"]).creation_flags("T");
        assert_eq!((f.width(), f.height()), (160, 160));
    }

    #[test]
    fn only_width_given() {
        let f = args(&["1024"]).creation_flags("T");
        assert_eq!((f.width(), f.height()), (1024, 300));
    }

    #[test]
    fn flags_select_backend_and_mode() {
        let a = args(&["--backend", "headless", "--frames", "12", "--fullscreen"]);
        assert_eq!(a.backend, BackendKind::Headless);
        assert_eq!(a.frames, Some(12));
        assert!(!a.creation_flags("T").is_windowed());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(LaunchArgs::from_args(["lumen-demo", "--backend", "amiga"]).is_err());
    }
}
