use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::logging;
use crate::present::{validate_target, PresentResult};
use crate::surface::RenderTarget;

use super::blit::ColorBlit;
use super::surface;
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// Hardware presentation path for one window.
///
/// Uploads float color buffers into a texture and converts them to the
/// surface format while drawing a fullscreen triangle.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    device:  wgpu::Device,
    queue:   wgpu::Queue,
    config:  wgpu::SurfaceConfiguration,

    /// Drawable size in physical pixels.
    size: PhysicalSize<u32>,

    /// Size of the presented image when it is smaller than the surface.
    present_size: Option<(u32, u32)>,

    blit: ColorBlit,
}

impl<'w> Gpu<'w> {
    /// Binds a surface to `window` and builds the blit pipeline.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lumen device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .context("no supported surface formats")?;

        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        let blit = ColorBlit::new(&device, format);

        let info = adapter.get_info();
        log::info!(
            target: "platform",
            "gpu: {} ({:?}), surface {:?} {}x{}",
            info.name,
            info.backend,
            format,
            size.width,
            size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            present_size: None,
            blit,
        })
    }

    /// Presents images of `size` centered on the surface instead of
    /// stretched over it. `None` restores surface-sized presentation.
    pub fn set_present_size(&mut self, size: Option<(u32, u32)>) {
        self.present_size = size;
    }

    /// Size color buffers must have to be presented.
    pub fn present_size(&self) -> (u32, u32) {
        self.present_size
            .unwrap_or((self.size.width, self.size.height))
    }

    /// Reconfigures the surface after a resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    /// Acquires the next surface texture and creates an encoder.
    fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands for the given frame.
    fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action.
    fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }

    /// Uploads the target's color buffer and draws it onto the next frame.
    ///
    /// Validation matches the software path. The color buffer reference and
    /// its read lock are released before the surface frame is acquired.
    pub fn present(&mut self, target: Option<&RenderTarget>) -> PresentResult {
        {
            let color = validate_target(target, self.present_size())?;
            let texels = color.lock().inspect_err(|_| {
                logging::failing("present", "color buffer is locked for writing");
            })?;
            self.blit.upload(
                &self.device,
                &self.queue,
                &texels,
                color.format().floats(),
                color.width(),
                color.height(),
            )?;
        }

        let mut frame = match self.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                logging::failing("present", format_args!("surface error: {err}"));
                let action = self.handle_surface_error(err);
                log::debug!(target: "lumen::present", "surface error handled: {action:?}");
                return Err(action.into());
            }
        };

        let surface = (self.size.width, self.size.height);
        let viewport = self.present_size.map(|image| centered_viewport(surface, image));
        self.blit.draw(&mut frame.encoder, &frame.view, viewport);
        self.submit(frame);
        Ok(())
    }
}

/// `(x, y, width, height)` of an `image`-sized viewport centered on a
/// `surface`-sized target, clipped to the target.
fn centered_viewport(surface: (u32, u32), image: (u32, u32)) -> (u32, u32, u32, u32) {
    let x = surface.0.saturating_sub(image.0) / 2;
    let y = surface.1.saturating_sub(image.1) / 2;
    (x, y, image.0.min(surface.0), image.1.min(surface.1))
}
