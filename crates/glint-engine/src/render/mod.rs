//! GPU rendering.
//!
//! Each renderer owns its GPU resources (pipelines, buffers) and creates them
//! lazily on first use, rebuilding when the surface format changes.
//!
//! Convention:
//! - sprite geometry is in logical pixels (top-left origin, +Y down); the
//!   vertex shader converts to NDC using a viewport uniform
//! - mesh geometry is given directly in NDC

mod common;
mod ctx;
pub mod mesh;
pub mod sprite;
pub mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{MeshRenderer, MeshVertex};
pub use sprite::{Sprite, SpriteRenderer};
pub use texture::{GpuTexture, TextureImage, TextureLoadError, TextureSampling};
