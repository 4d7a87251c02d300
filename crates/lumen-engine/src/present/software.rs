use crate::logging;
use crate::surface::RenderTarget;

use super::convert::{convert_bgr24, validate_target};
use super::error::{PresentError, PresentResult};

/// Converts float color buffers into a BGR24 backbuffer on the CPU.
///
/// Used by backends whose surface only accepts 8-bit pixels. The backbuffer
/// keeps the size it was created with; window surfaces of another size get
/// the image centered and clipped by [`blit_xrgb`](Self::blit_xrgb).
#[derive(Debug)]
pub struct SoftwarePresenter {
    width:      u32,
    height:     u32,
    backbuffer: Vec<u8>,
}

impl SoftwarePresenter {
    /// Allocates a `width * height` BGR24 backbuffer.
    pub fn new(width: u32, height: u32) -> Result<Self, PresentError> {
        let len = width as usize * height as usize * 3;
        let mut backbuffer = Vec::new();
        backbuffer.try_reserve_exact(len).map_err(|e| {
            logging::failing("present", format_args!("backbuffer {width}x{height}: {e}"));
            PresentError::OutOfMemory
        })?;
        backbuffer.resize(len, 0);
        Ok(Self {
            width,
            height,
            backbuffer,
        })
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Validates `target` and converts its color buffer into the backbuffer.
    ///
    /// The color buffer is read-locked only for the duration of the
    /// conversion; both the lock and the acquired reference are released on
    /// every return path.
    pub fn convert(&mut self, target: Option<&RenderTarget>) -> PresentResult {
        let color = validate_target(target, self.surface_size())?;

        let texels = color.lock().inspect_err(|_| {
            logging::failing("present", "color buffer is locked for writing");
        })?;
        convert_bgr24(&texels, color.format().floats(), &mut self.backbuffer);
        Ok(())
    }

    /// Last converted frame, three bytes per pixel in B, G, R order.
    pub fn bgr(&self) -> &[u8] {
        &self.backbuffer
    }

    /// Writes the backbuffer as `0x00RRGGBB` words into a `dst_width` x
    /// `dst_height` window surface, centered and clipped. Uncovered surface
    /// pixels are cleared to black.
    pub fn blit_xrgb(&self, dst: &mut [u32], dst_width: u32, dst_height: u32) {
        dst.fill(0);

        let (src_x, dst_x, cols) = centered_span(self.width, dst_width);
        let (src_y, dst_y, rows) = centered_span(self.height, dst_height);
        let src_pitch = self.width as usize * 3;
        let dst_pitch = dst_width as usize;

        for row in 0..rows {
            let src_start = (src_y + row) * src_pitch + src_x * 3;
            let dst_start = (dst_y + row) * dst_pitch + dst_x;
            let src_row = self.backbuffer.get(src_start..src_start + cols * 3);
            let dst_row = dst.get_mut(dst_start..dst_start + cols);
            let (Some(src_row), Some(dst_row)) = (src_row, dst_row) else { return };

            for (px, out) in src_row.chunks_exact(3).zip(dst_row) {
                let (b, g, r) = (px[0] as u32, px[1] as u32, px[2] as u32);
                *out = (r << 16) | (g << 8) | b;
            }
        }
    }
}

/// Offsets into source and destination plus the overlapping length when a
/// `src`-long span is centered in a `dst`-long one.
fn centered_span(src: u32, dst: u32) -> (usize, usize, usize) {
    let (src, dst) = (src as usize, dst as usize);
    if dst >= src {
        (0, (dst - src) / 2, src)
    } else {
        ((src - dst) / 2, 0, dst)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::surface::{ColorBuffer, SurfaceFormat};

    fn target(w: u32, h: u32, format: SurfaceFormat) -> (RenderTarget, Rc<ColorBuffer>) {
        let cb = ColorBuffer::new(w, h, format);
        (RenderTarget::with_color_buffer(Rc::clone(&cb)), cb)
    }

    /// After any outcome the presenter must hold no reference and no lock.
    fn assert_released(cb: &Rc<ColorBuffer>) {
        assert_eq!(Rc::strong_count(cb), 2, "render target + test handle only");
        assert!(cb.lock_mut().is_ok());
    }

    #[test]
    fn failure_table() {
        let mut p = SoftwarePresenter::new(4, 2).unwrap();

        assert_eq!(p.convert(None), Err(PresentError::InvalidParameters));
        assert_eq!(p.convert(Some(&RenderTarget::new())), Err(PresentError::InvalidState));

        let cases = [
            (3, 2, SurfaceFormat::R32G32B32F, PresentError::InvalidState),
            (4, 3, SurfaceFormat::R32G32B32F, PresentError::InvalidState),
            (4, 2, SurfaceFormat::R32G32F, PresentError::InvalidFormat),
            (4, 2, SurfaceFormat::R32F, PresentError::InvalidFormat),
            // Size is checked before format.
            (5, 5, SurfaceFormat::R32G32F, PresentError::InvalidState),
        ];
        for (w, h, format, expected) in cases {
            let (rt, cb) = target(w, h, format);
            assert_eq!(p.convert(Some(&rt)), Err(expected), "{w}x{h} {format:?}");
            assert_released(&cb);
        }
    }

    #[test]
    fn write_locked_buffer_is_unknown_and_released() {
        let mut p = SoftwarePresenter::new(1, 1).unwrap();
        let (rt, cb) = target(1, 1, SurfaceFormat::R32G32B32F);
        {
            let _writer = cb.lock_mut().unwrap();
            assert_eq!(p.convert(Some(&rt)), Err(PresentError::Unknown));
            assert_eq!(Rc::strong_count(&cb), 2);
        }
        assert_released(&cb);
    }

    #[test]
    fn success_writes_bgr_bytes_and_releases() {
        let mut p = SoftwarePresenter::new(2, 1).unwrap();
        let (rt, cb) = target(2, 1, SurfaceFormat::R32G32B32F);
        cb.lock_mut()
            .unwrap()
            .copy_from_slice(&[1.0, 0.25, -1.0, 0.4, 0.8, 2.0]);

        assert_eq!(p.convert(Some(&rt)), Ok(()));
        assert_eq!(p.bgr(), &[0, 64, 255, 255, 204, 102]);
        assert_released(&cb);

        let mut words = [0u32; 2];
        p.blit_xrgb(&mut words, 2, 1);
        assert_eq!(words, [0x00FF_4000, 0x0066_CCFF]);
    }

    #[test]
    fn rgba_buffers_are_presentable() {
        let mut p = SoftwarePresenter::new(1, 1).unwrap();
        let (rt, cb) = target(1, 1, SurfaceFormat::R32G32B32A32F);
        cb.lock_mut().unwrap().copy_from_slice(&[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(p.convert(Some(&rt)), Ok(()));
        assert_eq!(p.bgr(), &[255, 0, 0]);
    }

    fn filled(w: u32, h: u32) -> SoftwarePresenter {
        let mut p = SoftwarePresenter::new(w, h).unwrap();
        let (rt, cb) = target(w, h, SurfaceFormat::R32G32B32F);
        {
            let mut texels = cb.lock_mut().unwrap();
            for (i, px) in texels.chunks_exact_mut(3).enumerate() {
                // Pixel index in the blue channel, as 1..=n.
                px[2] = (i + 1) as f32 / 255.0;
            }
        }
        p.convert(Some(&rt)).unwrap();
        p
    }

    #[test]
    fn blit_centers_in_a_larger_surface() {
        let p = filled(2, 2);
        let mut words = [0xDEADu32; 4 * 3];
        p.blit_xrgb(&mut words, 4, 3);
        #[rustfmt::skip]
        assert_eq!(words, [
            0, 1, 2, 0,
            0, 3, 4, 0,
            0, 0, 0, 0,
        ]);
    }

    #[test]
    fn blit_clips_in_a_smaller_surface_keeping_rows_aligned() {
        let p = filled(4, 3);
        let mut words = [0u32; 2];
        p.blit_xrgb(&mut words, 2, 1);
        // Middle row, middle two columns.
        assert_eq!(words, [6, 7]);
    }

    #[test]
    fn size_is_fixed_at_creation() {
        let p = SoftwarePresenter::new(3, 1).unwrap();
        assert_eq!(p.surface_size(), (3, 1));
        assert_eq!(p.bgr().len(), 9);
    }
}
