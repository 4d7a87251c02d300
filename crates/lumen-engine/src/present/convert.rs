use std::rc::Rc;

use crate::logging;
use crate::surface::{ColorBuffer, RenderTarget};

use super::error::PresentError;

/// Quantizes one channel: clamp to [0, 1], scale by 255, round to nearest.
#[inline]
pub fn float_to_u8(v: f32) -> u8 {
    // NaN clamps to NaN and casts to 0.
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Converts float pixels to packed BGR24.
///
/// `src` holds `floats_per_pixel` channels per pixel in R, G, B(, ...) order;
/// channels past the third are ignored. `dst` receives three bytes per
/// pixel in B, G, R order. Converts as many pixels as both slices hold.
pub fn convert_bgr24(src: &[f32], floats_per_pixel: usize, dst: &mut [u8]) {
    debug_assert!(floats_per_pixel >= 3);
    for (px, out) in src.chunks_exact(floats_per_pixel).zip(dst.chunks_exact_mut(3)) {
        out[0] = float_to_u8(px[2]);
        out[1] = float_to_u8(px[1]);
        out[2] = float_to_u8(px[0]);
    }
}

/// Checks a render target against the visible surface and acquires its
/// color buffer.
///
/// Checks run in a fixed order and the first failure wins. The returned
/// `Rc` is the only reference acquired here; on failure it has already been
/// released.
pub fn validate_target(
    target: Option<&RenderTarget>,
    surface_size: (u32, u32),
) -> Result<Rc<ColorBuffer>, PresentError> {
    let Some(target) = target else {
        logging::failing("present", "no render target");
        return Err(PresentError::InvalidParameters);
    };

    let Some(color) = target.color_buffer() else {
        logging::failing("present", "render target has no color buffer");
        return Err(PresentError::InvalidState);
    };

    if (color.width(), color.height()) != surface_size {
        logging::failing(
            "present",
            format_args!(
                "color buffer is {}x{}, surface is {}x{}",
                color.width(),
                color.height(),
                surface_size.0,
                surface_size.1
            ),
        );
        return Err(PresentError::InvalidState);
    }

    if !color.format().has_rgb() {
        logging::failing(
            "present",
            format_args!("unsupported color buffer format {:?}", color.format()),
        );
        return Err(PresentError::InvalidFormat);
    }

    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantization_clamps_and_rounds() {
        assert_eq!(float_to_u8(0.0), 0);
        assert_eq!(float_to_u8(1.0), 255);
        assert_eq!(float_to_u8(0.5), 128);
        assert_eq!(float_to_u8(0.2), 51);
        assert_eq!(float_to_u8(-3.0), 0);
        assert_eq!(float_to_u8(7.5), 255);
        assert_eq!(float_to_u8(f32::NAN), 0);
    }

    #[test]
    fn channels_are_written_in_reverse_order() {
        let src = [1.0, 0.5, 0.0, 0.0, 0.0, 1.0];
        let mut dst = [0u8; 6];
        convert_bgr24(&src, 3, &mut dst);
        assert_eq!(dst, [0, 128, 255, 255, 0, 0]);
    }

    #[test]
    fn alpha_channel_is_skipped() {
        let src = [0.2, 0.4, 0.6, 0.9, 1.0, 1.0, 1.0, 0.0];
        let mut dst = [0u8; 6];
        convert_bgr24(&src, 4, &mut dst);
        assert_eq!(dst, [153, 102, 51, 255, 255, 255]);
    }
}
