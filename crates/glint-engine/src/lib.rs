//! glint engine crate.
//!
//! Platform + GPU runtime for the glint demos: a single winit window with a
//! wgpu surface, a paced frame loop, texture loading, and two renderers
//! (screen-space sprites and static NDC meshes).

pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;
