use std::ops::RangeInclusive;

use winit::window::Icon;

/// Accepted window widths in pixels.
pub const WIDTH_RANGE: RangeInclusive<u32> = 160..=1600;

/// Accepted window heights in pixels.
pub const HEIGHT_RANGE: RangeInclusive<u32> = 160..=1280;

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 300;

/// Platform icon attached to the window on creation.
pub type WindowIcon = Icon;

/// Startup configuration handed to the backend and to `Graphics::initialize`.
///
/// Dimensions are clamped on construction, so every holder of a
/// `CreationFlags` sees values inside [`WIDTH_RANGE`] x [`HEIGHT_RANGE`].
#[derive(Debug, Clone)]
pub struct CreationFlags {
    title:    String,
    width:    u32,
    height:   u32,
    windowed: bool,
    icon:     Option<WindowIcon>,
}

impl CreationFlags {
    /// Windowed flags with the default 400x300 size.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title:    title.into(),
            width:    DEFAULT_WIDTH,
            height:   DEFAULT_HEIGHT,
            windowed: true,
            icon:     None,
        }
    }

    /// Sets the surface size. Each axis is clamped independently.
    ///
    /// Takes signed values so raw user input (including negatives) can be
    /// passed straight through.
    pub fn with_size(mut self, width: i64, height: i64) -> Self {
        self.width = clamp_width(width);
        self.height = clamp_height(height);
        self
    }

    pub fn windowed(mut self, windowed: bool) -> Self {
        self.windowed = windowed;
        self
    }

    pub fn with_icon(mut self, icon: WindowIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_windowed(&self) -> bool {
        self.windowed
    }

    pub fn icon(&self) -> Option<&WindowIcon> {
        self.icon.as_ref()
    }
}

impl Default for CreationFlags {
    fn default() -> Self {
        Self::new("lumen")
    }
}

pub fn clamp_width(width: i64) -> u32 {
    clamp_to(width, &WIDTH_RANGE)
}

pub fn clamp_height(height: i64) -> u32 {
    clamp_to(height, &HEIGHT_RANGE)
}

fn clamp_to(value: i64, range: &RangeInclusive<u32>) -> u32 {
    let lo = i64::from(*range.start());
    let hi = i64::from(*range.end());
    // Bounded by a u32 range, so the cast is lossless.
    value.clamp(lo, hi) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_windowed_400_by_300() {
        let f = CreationFlags::default();
        assert_eq!((f.width(), f.height()), (400, 300));
        assert!(f.is_windowed());
        assert!(f.icon().is_none());
    }

    #[test]
    fn oversized_and_undersized_dimensions_are_clamped() {
        let f = CreationFlags::new("T").with_size(3000, 50);
        assert_eq!(f.width(), 1600);
        assert_eq!(f.height(), 160);
    }

    #[test]
    fn axes_clamp_independently() {
        let f = CreationFlags::new("T").with_size(100, 5000);
        assert_eq!((f.width(), f.height()), (160, 1280));

        let f = CreationFlags::new("T").with_size(800, 600);
        assert_eq!((f.width(), f.height()), (800, 600));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(clamp_width(160), 160);
        assert_eq!(clamp_width(1600), 1600);
        assert_eq!(clamp_height(160), 160);
        assert_eq!(clamp_height(1280), 1280);
    }

    #[test]
    fn negative_and_extreme_values_clamp() {
        assert_eq!(clamp_width(-20), 160);
        assert_eq!(clamp_height(i64::MIN), 160);
        assert_eq!(clamp_width(i64::MAX), 1600);
    }

    #[test]
    fn windowed_flag_and_title_are_kept() {
        let f = CreationFlags::new("Bubble").windowed(false);
        assert_eq!(f.title(), "Bubble");
        assert!(!f.is_windowed());
    }
}
