//! Static textured triangle.

use std::path::Path;

use anyhow::{Context, Result};
use glint_engine::core::{App, AppControl, FrameCtx};
use glint_engine::device::GpuInit;
use glint_engine::paint::Color;
use glint_engine::render::{GpuTexture, MeshRenderer, MeshVertex, TextureImage, TextureSampling};
use glint_engine::window::{Runtime, RuntimeConfig};

pub const WINDOW_TITLE: &str = "Pyramid";
pub const WINDOW_SIZE: (f64, f64) = (800.0, 800.0);
pub const DEFAULT_TEXTURE: &str = "container.jpg";
pub const CLEAR_COLOR: Color = Color::rgb(0.07, 0.13, 0.17);

/// Equilateral triangle centered on the origin, in NDC.
///
/// Texture coordinates put v = 0 on the base, so the image's first row lands
/// along the bottom edge.
pub fn pyramid_vertices() -> Vec<MeshVertex> {
    let s3 = 3f64.sqrt();
    let base = (-0.5 * s3 / 3.0) as f32;
    let apex = (0.5 * s3 * 2.0 / 3.0) as f32;

    vec![
        MeshVertex::new([-0.5, base, 0.0], [0.0, 0.0]),
        MeshVertex::new([0.5, base, 0.0], [1.0, 0.0]),
        MeshVertex::new([0.0, apex, 0.0], [0.5, 1.0]),
    ]
}

pub struct PyramidApp {
    image: TextureImage,
    texture: Option<GpuTexture>,
    mesh: MeshRenderer,
}

impl PyramidApp {
    pub fn new(image: TextureImage) -> Self {
        Self {
            image,
            texture: None,
            mesh: MeshRenderer::new(pyramid_vertices()),
        }
    }
}

impl App for PyramidApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let texture = self.texture.get_or_insert_with(|| {
            GpuTexture::upload_for(ctx.gpu, &self.image, TextureSampling::REPEAT_LINEAR)
        });
        let mesh = &mut self.mesh;

        ctx.render(CLEAR_COLOR, |rctx, target| mesh.render(rctx, target, texture))
    }
}

/// Loads the texture, opens the window and renders until it is closed.
pub fn run(texture_path: &Path) -> Result<()> {
    let image = TextureImage::open(texture_path).context("failed to load pyramid texture")?;

    let (w, h) = WINDOW_SIZE;
    Runtime::run(
        RuntimeConfig::fixed(WINDOW_TITLE, w, h),
        GpuInit::default(),
        PyramidApp::new(image),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn triangle_is_equilateral_around_origin() {
        let v = pyramid_vertices();
        assert_eq!(v.len(), 3);

        assert!(close(v[0].pos[1], -0.288_675_13));
        assert!(close(v[1].pos[1], v[0].pos[1]));
        assert!(close(v[2].pos[1], 0.577_350_3));
        assert_eq!(v[2].pos[0], 0.0);

        let side = |a: &MeshVertex, b: &MeshVertex| {
            ((a.pos[0] - b.pos[0]).powi(2) + (a.pos[1] - b.pos[1]).powi(2)).sqrt()
        };
        assert!(close(side(&v[0], &v[1]), 1.0));
        assert!((side(&v[1], &v[2]) - 1.0).abs() < 1e-5);
        assert!((side(&v[2], &v[0]) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn texture_coordinates_span_the_image() {
        let uvs: Vec<[f32; 2]> = pyramid_vertices().iter().map(|v| v.uv).collect();
        assert_eq!(uvs, vec![[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]]);
    }

    #[test]
    fn missing_texture_fails_before_window_opens() {
        let err = run(Path::new("definitely-missing-container.jpg")).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.starts_with("failed to load pyramid texture"), "{msg}");
        assert!(msg.contains("definitely-missing-container.jpg"), "{msg}");
    }

    #[test]
    fn app_holds_one_triangle_before_upload() {
        let image = TextureImage::from_rgba8("checker", 1, 1, vec![255; 4]).unwrap();
        let app = PyramidApp::new(image);
        assert!(app.texture.is_none());
        assert_eq!(app.mesh.draw_count(), 3);
    }
}
