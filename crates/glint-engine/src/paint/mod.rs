//! Color model shared between renderers and demos.

pub mod color;

pub use color::Color;
