use std::cmp::Reverse;

use anyhow::{Context, Result};

use crate::config::{CreationFlags, WindowIcon};
use crate::logging;

/// Minimum color depth for a custom screen mode.
pub const MIN_BIT_DEPTH: u16 = 24;

/// One display mode offered by a [`DisplayServer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ModeInfo {
    pub width:              u32,
    pub height:             u32,
    pub bit_depth:          u16,
    pub refresh_millihertz: u32,
}

/// Parameters for the window opened on an acquired screen.
#[derive(Debug, Clone)]
pub struct WindowSpec {
    pub title:      String,
    pub width:      u32,
    pub height:     u32,
    /// No decorations; set when the window sits on a custom screen.
    pub borderless: bool,
    pub icon:       Option<WindowIcon>,
}

impl WindowSpec {
    fn new(flags: &CreationFlags, borderless: bool) -> Self {
        Self {
            title: flags.title().to_owned(),
            width: flags.width(),
            height: flags.height(),
            borderless,
            icon: flags.icon().cloned(),
        }
    }
}

/// Screen and window provider.
///
/// `Screen` values are released when dropped. A custom screen is exclusive to
/// this process; a public screen is shared and only needed while the window
/// is being opened on it.
pub trait DisplayServer {
    type Screen;
    type Window;

    fn modes(&self) -> Vec<ModeInfo>;

    /// Opens a custom screen in `modes()[mode]`.
    fn open_screen(&mut self, mode: usize) -> Result<Self::Screen>;

    fn lock_public_screen(&mut self) -> Result<Self::Screen>;

    fn open_window(&mut self, screen: &Self::Screen, spec: &WindowSpec) -> Result<Self::Window>;
}

/// Window plus the custom screen it lives on.
///
/// Field order matters: the window is released before its screen.
pub struct DisplayLease<W, S> {
    pub window: W,
    /// `Some` only for a custom screen.
    pub screen: Option<S>,
}

impl<W, S> DisplayLease<W, S> {
    pub fn is_custom_screen(&self) -> bool {
        self.screen.is_some()
    }
}

/// Index of the mode that best fits `width` x `height`.
///
/// An exact size match wins; otherwise the smallest mode containing the
/// requested size. Modes below [`MIN_BIT_DEPTH`] are never chosen. Ties go
/// to the higher refresh rate.
pub fn best_fit(modes: &[ModeInfo], width: u32, height: u32) -> Option<usize> {
    modes
        .iter()
        .enumerate()
        .filter(|(_, m)| m.bit_depth >= MIN_BIT_DEPTH && m.width >= width && m.height >= height)
        .min_by_key(|(_, m)| {
            let exact = m.width == width && m.height == height;
            let area = u64::from(m.width) * u64::from(m.height);
            (!exact, area, Reverse(m.refresh_millihertz))
        })
        .map(|(i, _)| i)
}

/// Acquires a screen and opens the window on it.
///
/// Fullscreen requests first try a custom screen in the best-fit mode and
/// fall back to the public screen. A public screen is released as soon as
/// the window is open. If the window cannot be opened, the screen acquired
/// for it is released before the error is returned.
pub fn acquire_display<D: DisplayServer>(
    server: &mut D,
    flags: &CreationFlags,
) -> Result<DisplayLease<D::Window, D::Screen>> {
    let custom = if flags.is_windowed() {
        None
    } else {
        open_custom_screen(server, flags)
    };
    let is_custom = custom.is_some();

    let screen = match custom {
        Some(screen) => screen,
        None => server
            .lock_public_screen()
            .context("couldn't lock public screen")?,
    };

    let spec = WindowSpec::new(flags, is_custom);
    let window = match server.open_window(&screen, &spec) {
        Ok(window) => window,
        Err(err) => {
            drop(screen);
            return Err(err.context("couldn't open window"));
        }
    };

    let screen = if is_custom {
        Some(screen)
    } else {
        drop(screen);
        None
    };

    Ok(DisplayLease { window, screen })
}

fn open_custom_screen<D: DisplayServer>(server: &mut D, flags: &CreationFlags) -> Option<D::Screen> {
    let modes = server.modes();
    let Some(mode) = best_fit(&modes, flags.width(), flags.height()) else {
        logging::notify(
            "display",
            format_args!(
                "no {}-bit mode fits {}x{}, falling back to window mode",
                MIN_BIT_DEPTH,
                flags.width(),
                flags.height()
            ),
        );
        return None;
    };

    match server.open_screen(mode) {
        Ok(screen) => Some(screen),
        Err(err) => {
            logging::notify(
                "display",
                format_args!("couldn't open custom screen ({err:#}), falling back to window mode"),
            );
            None
        }
    }
}
