/// Surface and device parameters for the hardware presentation path.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Off by default: color buffers hold display-referred values already.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Requested from the adapter. The blit pipeline only needs downlevel
    /// limits and no optional features.
    pub required_limits: wgpu::Limits,

    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}
