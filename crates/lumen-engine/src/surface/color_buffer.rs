use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::present::PresentError;

use super::format::SurfaceFormat;

/// Floating-point pixel storage for one frame.
///
/// Shared through `Rc`: the render target holds one reference, presenters
/// acquire another for the duration of a conversion. The texel store sits
/// behind a `RefCell`, so a read lock held by a presenter rejects concurrent
/// writers instead of aliasing.
#[derive(Debug)]
pub struct ColorBuffer {
    width:  u32,
    height: u32,
    format: SurfaceFormat,
    texels: RefCell<Vec<f32>>,
}

impl ColorBuffer {
    /// Zero-filled buffer of `width * height` pixels.
    pub fn new(width: u32, height: u32, format: SurfaceFormat) -> Rc<Self> {
        let len = width as usize * height as usize * format.floats();
        Rc::new(Self {
            width,
            height,
            format,
            texels: RefCell::new(vec![0.0; len]),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> SurfaceFormat {
        self.format
    }

    /// Floats per row.
    pub fn pitch(&self) -> usize {
        self.width as usize * self.format.floats()
    }

    /// Scoped read lock over the texels; released when the guard drops.
    pub fn lock(&self) -> Result<Ref<'_, [f32]>, PresentError> {
        self.texels
            .try_borrow()
            .map(|v| Ref::map(v, Vec::as_slice))
            .map_err(|_| PresentError::Unknown)
    }

    /// Scoped write lock over the texels.
    pub fn lock_mut(&self) -> Result<RefMut<'_, [f32]>, PresentError> {
        self.texels
            .try_borrow_mut()
            .map(|v| RefMut::map(v, Vec::as_mut_slice))
            .map_err(|_| PresentError::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_matches_dimensions_and_format() {
        let cb = ColorBuffer::new(4, 3, SurfaceFormat::R32G32B32F);
        assert_eq!(cb.pitch(), 12);
        assert_eq!(cb.lock().unwrap().len(), 36);
    }

    #[test]
    fn read_lock_blocks_writers_until_released() {
        let cb = ColorBuffer::new(2, 2, SurfaceFormat::R32F);
        {
            let _read = cb.lock().unwrap();
            assert_eq!(cb.lock_mut().unwrap_err(), PresentError::Unknown);
            assert!(cb.lock().is_ok());
        }
        cb.lock_mut().unwrap()[0] = 1.0;
        assert_eq!(cb.lock().unwrap()[0], 1.0);
    }
}
