//! Textured ball bouncing around the window.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use glint_bounce::{BallSimulation, BounceParams, Bounds, BALL_RADIUS};
use glint_engine::coords::Rect;
use glint_engine::core::{App, AppControl, FrameCtx};
use glint_engine::device::GpuInit;
use glint_engine::paint::Color;
use glint_engine::render::{GpuTexture, Sprite, SpriteRenderer, TextureImage, TextureSampling};
use glint_engine::window::{Runtime, RuntimeConfig};

pub const WINDOW_TITLE: &str = "2D Rendering";
pub const SCREEN: Bounds = Bounds::new(800, 600);
pub const DEFAULT_TEXTURE: &str = "Assets/ball.png";
pub const CLEAR_COLOR: Color = Color::WHITE;

/// Extra delay between frames on top of vsync.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(10);

/// Owns everything the bounce demo mutates: the simulation, the sprite
/// texture and its renderer. Dropping the app releases the GPU resources.
pub struct BounceApp {
    sim: BallSimulation,
    image: TextureImage,
    texture: Option<GpuTexture>,
    sprites: SpriteRenderer,
}

impl BounceApp {
    pub fn new(image: TextureImage, now: Instant) -> Self {
        Self {
            sim: BallSimulation::new(SCREEN, BALL_RADIUS, BounceParams::default(), now),
            image,
            texture: None,
            sprites: SpriteRenderer::new(),
        }
    }

    pub fn simulation(&self) -> &BallSimulation {
        &self.sim
    }

    /// Runs one simulation tick and returns where the sprite goes this frame.
    pub fn advance(&mut self, now: Instant) -> Rect {
        self.sim.tick(now);
        Rect::from_pixels(self.sim.body().sprite_rect())
    }
}

impl App for BounceApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let rect = self.advance(ctx.time.now);

        let texture = self.texture.get_or_insert_with(|| {
            GpuTexture::upload_for(ctx.gpu, &self.image, TextureSampling::SPRITE)
        });
        let sprites = &mut self.sprites;

        ctx.render(CLEAR_COLOR, |rctx, target| {
            sprites.render(rctx, target, &[Sprite::new(texture, rect)]);
        })
    }
}

/// Loads the ball texture, opens the window and animates until it is closed.
pub fn run(texture_path: &Path) -> Result<()> {
    let image = TextureImage::open(texture_path).context("failed to load ball texture")?;

    let config = RuntimeConfig::fixed(WINDOW_TITLE, SCREEN.width as f64, SCREEN.height as f64)
        .with_frame_interval(FRAME_INTERVAL);

    Runtime::run(config, GpuInit::default(), BounceApp::new(image, Instant::now()))
}

#[cfg(test)]
mod tests {
    use glint_bounce::IVec2;

    use super::*;

    fn app(now: Instant) -> BounceApp {
        let image = TextureImage::from_rgba8("ball", 2, 2, vec![255; 16]).unwrap();
        BounceApp::new(image, now)
    }

    #[test]
    fn ball_starts_centered() {
        let app = app(Instant::now());
        assert_eq!(app.simulation().body().position(), IVec2::new(400, 300));
        assert_eq!(app.simulation().bounds(), SCREEN);
    }

    #[test]
    fn first_frame_moves_ball_and_sizes_sprite() {
        let t0 = Instant::now();
        let mut app = app(t0);
        let rect = app.advance(t0 + Duration::from_millis(16));
        assert_eq!(rect, Rect::new(405.0, 301.0, 72.0, 72.0));
    }

    #[test]
    fn ball_reverses_after_three_seconds_of_frames() {
        let t0 = Instant::now();
        let mut app = app(t0);

        let mut now = t0;
        while now.duration_since(t0) <= Duration::from_millis(3000) {
            app.advance(now);
            now += FRAME_INTERVAL;
        }
        let dx_before = app.simulation().body().velocity().x;
        let flips_before = app.simulation().body().last_direction_flip();

        app.advance(now);
        assert_eq!(app.simulation().body().velocity().x, -dx_before);
        assert_eq!(app.simulation().body().last_direction_flip(), now);
        assert_ne!(flips_before, now);
    }

    #[test]
    fn texture_uploads_lazily() {
        let app = app(Instant::now());
        assert!(app.texture.is_none());
    }
}
