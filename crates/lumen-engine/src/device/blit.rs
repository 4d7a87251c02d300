use crate::present::PresentError;

/// Channels per texel in the upload texture.
const UPLOAD_CHANNELS: usize = 4;

/// Float color buffer upload + fullscreen draw.
///
/// The color buffer is expanded to RGBA and written into an `Rgba32Float`
/// texture, which the fragment stage reads texel-for-texel across the
/// viewport. The texture is
/// recreated only when the buffer size changes.
pub(crate) struct ColorBlit {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    upload: Option<UploadTexture>,
    staging: Vec<f32>,
}

struct UploadTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl ColorBlit {
    pub(crate) fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lumen present shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/present.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen present bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    // Rgba32Float is not filterable without an extra feature;
                    // the shader only uses textureLoad.
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen present pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen present pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
            upload: None,
            staging: Vec::new(),
        }
    }

    /// Expands `texels` to RGBA and writes them into the upload texture.
    pub(crate) fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texels: &[f32],
        floats_per_pixel: usize,
        width: u32,
        height: u32,
    ) -> Result<(), PresentError> {
        expand_rgba(texels, floats_per_pixel, &mut self.staging)?;
        self.ensure_texture(device, width, height);

        let Some(upload) = self.upload.as_ref() else {
            return Err(PresentError::Unknown);
        };

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &upload.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&self.staging),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * (UPLOAD_CHANNELS * size_of::<f32>()) as u32),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );
        Ok(())
    }

    /// Records the draw into `encoder`, targeting `view`.
    ///
    /// `viewport` is `(x, y, width, height)` in surface pixels; `None` covers
    /// the whole surface. The area outside the viewport is cleared to black.
    pub(crate) fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        viewport: Option<(u32, u32, u32, u32)>,
    ) {
        let Some(upload) = self.upload.as_ref() else { return };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen present pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if let Some((x, y, w, h)) = viewport {
            rpass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &upload.bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }

    fn ensure_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self
            .upload
            .as_ref()
            .is_some_and(|u| u.width == width && u.height == height)
        {
            return;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen color upload"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen present bind group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            }],
        });

        log::debug!(target: "lumen::present", "upload texture {width}x{height}");
        self.upload = Some(UploadTexture { texture, bind_group, width, height });
    }
}

/// Expands 3- or 4-channel float pixels to RGBA, filling alpha with 1.
fn expand_rgba(src: &[f32], floats_per_pixel: usize, dst: &mut Vec<f32>) -> Result<(), PresentError> {
    let pixels = src.len() / floats_per_pixel.max(1);
    dst.clear();
    dst.try_reserve_exact(pixels * UPLOAD_CHANNELS)
        .map_err(|_| PresentError::OutOfMemory)?;

    for px in src.chunks_exact(floats_per_pixel) {
        let a = px.get(3).copied().unwrap_or(1.0);
        dst.extend_from_slice(&[px[0], px[1], px[2], a]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_pixels_get_opaque_alpha() {
        let mut out = Vec::new();
        expand_rgba(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6], 3, &mut out).unwrap();
        assert_eq!(out, vec![0.1, 0.2, 0.3, 1.0, 0.4, 0.5, 0.6, 1.0]);
    }

    #[test]
    fn rgba_pixels_keep_alpha() {
        let mut out = vec![9.0; 3];
        expand_rgba(&[1.0, 0.0, 0.0, 0.25], 4, &mut out).unwrap();
        assert_eq!(out, vec![1.0, 0.0, 0.0, 0.25]);
    }
}
