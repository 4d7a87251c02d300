use std::rc::Rc;

use super::color_buffer::ColorBuffer;

/// Destination of a rendered frame.
///
/// Aggregates the buffers a frame is drawn into. Only the color buffer is
/// modelled; it may be detached, in which case presenting the target fails.
#[derive(Debug, Default, Clone)]
pub struct RenderTarget {
    color_buffer: Option<Rc<ColorBuffer>>,
}

impl RenderTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color_buffer(color_buffer: Rc<ColorBuffer>) -> Self {
        Self {
            color_buffer: Some(color_buffer),
        }
    }

    pub fn detach_color_buffer(&mut self) -> Option<Rc<ColorBuffer>> {
        self.color_buffer.take()
    }

    /// Acquires a new reference to the attached color buffer.
    ///
    /// The reference is released when the returned `Rc` is dropped.
    pub fn color_buffer(&self) -> Option<Rc<ColorBuffer>> {
        self.color_buffer.clone()
    }

    /// Borrows the attached color buffer without acquiring a reference.
    pub fn color_buffer_ref(&self) -> Option<&ColorBuffer> {
        self.color_buffer.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceFormat;

    #[test]
    fn acquire_and_release_track_strong_count() {
        let cb = ColorBuffer::new(1, 1, SurfaceFormat::R32G32B32F);
        let rt = RenderTarget::with_color_buffer(Rc::clone(&cb));
        assert_eq!(Rc::strong_count(&cb), 2);
        {
            let acquired = rt.color_buffer().unwrap();
            assert_eq!(Rc::strong_count(&acquired), 3);
        }
        assert_eq!(Rc::strong_count(&cb), 2);
    }

    #[test]
    fn detach_leaves_target_empty() {
        let mut rt = RenderTarget::with_color_buffer(ColorBuffer::new(1, 1, SurfaceFormat::R32F));
        assert!(rt.detach_color_buffer().is_some());
        assert!(rt.color_buffer().is_none());
    }
}
