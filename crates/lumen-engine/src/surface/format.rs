/// Texel layout of a floating-point color buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SurfaceFormat {
    R32F,
    R32G32F,
    R32G32B32F,
    R32G32B32A32F,
}

impl SurfaceFormat {
    /// Number of `f32` channels per pixel.
    pub const fn floats(self) -> usize {
        match self {
            SurfaceFormat::R32F => 1,
            SurfaceFormat::R32G32F => 2,
            SurfaceFormat::R32G32B32F => 3,
            SurfaceFormat::R32G32B32A32F => 4,
        }
    }

    /// Whether the format carries at least an RGB triple.
    pub const fn has_rgb(self) -> bool {
        self.floats() >= 3
    }
}
