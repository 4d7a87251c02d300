use crate::config::CreationFlags;
use crate::time::FrameTime;

/// Application-wide state, exposed read-only to collaborators and hooks.
///
/// Owned by the [`Application`](super::Application). The frame id starts at 0
/// and increases by exactly one per frame; elapsed time never decreases.
#[derive(Debug, Clone)]
pub struct AppState {
    title:    String,
    width:    u32,
    height:   u32,
    windowed: bool,
    active:   bool,
    frame_id: u64,
    elapsed:  f64,
    fps:      f32,
    inv_fps:  f32,
}

impl AppState {
    pub fn from_flags(flags: &CreationFlags) -> Self {
        Self {
            title:    flags.title().to_owned(),
            width:    flags.width(),
            height:   flags.height(),
            windowed: flags.is_windowed(),
            active:   false,
            frame_id: 0,
            elapsed:  0.0,
            fps:      0.0,
            inv_fps:  0.0,
        }
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

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Seconds accumulated over all completed frames.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Seconds per frame, `1 / fps`.
    pub fn inv_fps(&self) -> f32 {
        self.inv_fps
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn next_frame(&mut self) {
        self.frame_id = self.frame_id.wrapping_add(1);
    }

    pub(crate) fn record(&mut self, time: &FrameTime) {
        self.elapsed = time.elapsed;
        self.fps = time.fps;
        self.inv_fps = time.inv_fps;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_flags(&CreationFlags::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn starts_inactive_at_frame_zero_with_clamped_size() {
        let s = AppState::from_flags(&CreationFlags::new("T").with_size(3000, 50));
        assert_eq!((s.width(), s.height()), (1600, 160));
        assert_eq!(s.frame_id(), 0);
        assert!(!s.is_active());
        assert!(s.is_windowed());
        assert_eq!(s.title(), "T");
    }

    #[test]
    fn record_copies_timing() {
        let mut s = AppState::default();
        s.next_frame();
        s.record(&FrameTime {
            delta: Duration::from_millis(20),
            elapsed: 1.5,
            fps: 50.0,
            inv_fps: 0.02,
        });
        assert_eq!(s.frame_id(), 1);
        assert_eq!(s.elapsed(), 1.5);
        assert_eq!(s.fps(), 50.0);
        assert_eq!(s.inv_fps(), 0.02);
    }
}
