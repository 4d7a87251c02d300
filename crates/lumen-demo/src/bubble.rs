use anyhow::Result;

use lumen_engine::core::{App, FrameCtx, RenderCtx, WorldCtx};
use lumen_engine::input::{Key, MouseButton};
use lumen_engine::subsystem::{FileIo, Graphics, Input, ResourceManager, Scene, SubsystemFactory};
use lumen_engine::surface::ColorBuffer;

use crate::subsystems::{FlatScene, NullFileIo, NullResources, PointerInput, SoftwareGraphics};

const LOG_TARGET: &str = "bubble";

/// Pixels per second.
const SPEED: f32 = 120.0;

/// Fraction of the gap to the pointer closed per second while dragging.
const FOLLOW: f32 = 6.0;

/// A shaded bubble drifting across a slowly shifting background.
#[derive(Debug, Clone)]
pub struct Bubble {
    pos:     (f32, f32),
    vel:     (f32, f32),
    radius:  f32,
    bounds:  (f32, f32),
    dropped: u64,
}

impl Bubble {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            pos: (w * 0.5, h * 0.5),
            vel: (SPEED, SPEED * 0.6),
            radius: w.min(h) * 0.2,
            bounds: (w, h),
            dropped: 0,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        self.pos
    }

    /// Advances by `dt` seconds, bouncing off the edges.
    pub fn step(&mut self, dt: f32) {
        self.pos.0 += self.vel.0 * dt;
        self.pos.1 += self.vel.1 * dt;
        bounce(&mut self.pos.0, &mut self.vel.0, self.radius, self.bounds.0);
        bounce(&mut self.pos.1, &mut self.vel.1, self.radius, self.bounds.1);
    }

    /// Pulls the bubble towards `target`.
    pub fn follow(&mut self, target: (f32, f32), dt: f32) {
        let t = (FOLLOW * dt).min(1.0);
        self.pos.0 += (target.0 - self.pos.0) * t;
        self.pos.1 += (target.1 - self.pos.1) * t;
    }

    /// Rasterizes into an RGB float buffer of `bounds` size.
    pub fn draw(&self, texels: &mut [f32], floats_per_pixel: usize, time: f32) {
        let width = self.bounds.0 as usize;
        let r2 = self.radius * self.radius;

        for (i, px) in texels.chunks_exact_mut(floats_per_pixel).enumerate() {
            let x = (i % width) as f32 + 0.5;
            let y = (i / width) as f32 + 0.5;
            let v = y / self.bounds.1;

            let mut rgb = [
                0.1 + 0.05 * (time * 0.7).sin(),
                0.15 + 0.1 * v,
                0.35 + 0.15 * v + 0.05 * (time * 0.3).cos(),
            ];

            let (dx, dy) = (x - self.pos.0, y - self.pos.1);
            let d2 = dx * dx + dy * dy;
            if d2 < r2 {
                // Thin film: bright rim, faint body, highlight towards the top left.
                let edge = (d2 / r2).sqrt();
                let rim = edge.powi(6);
                let hx = dx / self.radius + 0.35;
                let hy = dy / self.radius + 0.35;
                let spot = (1.0 - (hx * hx + hy * hy) * 12.0).max(0.0);
                let film = 0.5 + 0.5 * (edge * 9.0 + time * 2.0).sin();

                rgb[0] += rim * (0.4 + 0.4 * film) + spot;
                rgb[1] += rim * 0.7 + spot;
                rgb[2] += rim * (0.8 - 0.3 * film) + spot;
            }

            px[..3].copy_from_slice(&rgb);
        }
    }
}

fn bounce(pos: &mut f32, vel: &mut f32, radius: f32, extent: f32) {
    if *pos < radius {
        *pos = radius;
        *vel = vel.abs();
    } else if *pos > extent - radius {
        *pos = extent - radius;
        *vel = -vel.abs();
    }
}

/// The demo: stub collaborators plus the bubble world.
#[derive(Default)]
pub struct BubbleApp;

impl SubsystemFactory for BubbleApp {
    fn create_input(&mut self) -> Result<Box<dyn Input>> {
        Ok(Box::new(PointerInput::default()))
    }

    fn create_file_io(&mut self) -> Result<Box<dyn FileIo>> {
        Ok(Box::new(NullFileIo))
    }

    fn create_graphics(&mut self) -> Result<Box<dyn Graphics>> {
        Ok(Box::new(SoftwareGraphics::default()))
    }

    fn create_resource_manager(&mut self) -> Result<Box<dyn ResourceManager>> {
        Ok(Box::new(NullResources))
    }

    fn create_scene(&mut self) -> Result<Box<dyn Scene>> {
        Ok(Box::new(FlatScene::default()))
    }
}

impl App for BubbleApp {
    type World = Bubble;

    fn create_world(&mut self, ctx: &mut WorldCtx<'_>) -> Result<Bubble> {
        Ok(Bubble::new(ctx.state.width(), ctx.state.height()))
    }

    fn destroy_world(&mut self, world: Bubble) {
        if world.dropped > 0 {
            log::info!(target: LOG_TARGET, "{} frames failed to present", world.dropped);
        }
    }

    fn frame_move(&mut self, world: &mut Bubble, ctx: &mut FrameCtx<'_>) {
        if ctx.input.key_down(Key::Escape) {
            ctx.request_quit();
            return;
        }

        let dt = ctx.state.inv_fps();
        match ctx.input.pointer_pos() {
            Some(pointer) if ctx.input.button_down(MouseButton::Left) => world.follow(pointer, dt),
            _ => world.step(dt),
        }
    }

    fn render_world(&mut self, world: &mut Bubble, ctx: &mut RenderCtx<'_>) {
        let time = ctx.state.elapsed() as f32;
        let drawn = ctx
            .subsystems
            .graphics()
            .and_then(|g| g.render_target())
            .and_then(|t| t.color_buffer_ref())
            .map(|color| draw_into(world, color, time))
            .unwrap_or(false);

        if !drawn || ctx.present().is_err() {
            world.dropped += 1;
        }
    }
}

fn draw_into(world: &Bubble, color: &ColorBuffer, time: f32) -> bool {
    let fpp = color.format().floats();
    match color.lock_mut() {
        Ok(mut texels) => {
            world.draw(&mut texels, fpp, time);
            true
        }
        Err(_) => false,
    }
}
