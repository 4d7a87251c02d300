/// Surface texture acquired for one presented color buffer.
///
/// Must be handed back to `Gpu::submit` before the next acquisition.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
