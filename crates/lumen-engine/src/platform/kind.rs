use std::fmt;
use std::str::FromStr;

/// Selectable platform backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum BackendKind {
    /// Native desktop window with GPU presentation.
    Native,
    /// Windowing-library window with CPU conversion to an 8-bit surface.
    Library,
    /// Display-mode driven screen with a windowed fallback.
    Display,
    /// No window; scripted events and a manual clock.
    Headless,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [
        BackendKind::Native,
        BackendKind::Library,
        BackendKind::Display,
        BackendKind::Headless,
    ];

    /// Native on Windows, the library backend elsewhere.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            BackendKind::Native
        } else {
            BackendKind::Library
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Native => "native",
            BackendKind::Library => "library",
            BackendKind::Display => "display",
            BackendKind::Headless => "headless",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown backend name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownBackend(pub String);

impl fmt::Display for UnknownBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown backend \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownBackend {}

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownBackend(s.to_owned()))
    }
}
