//! Bounce simulation for the glint sprite demo.
//!
//! One circular body moves inside a fixed rectangular region. Each rendered
//! frame calls [`BallSimulation::tick`] once; the renderer then reads the
//! body's position back through [`BallSimulation::body`].
//!
//! All quantities are integers in window pixels (top-left origin, +Y down).

mod body;
mod bounds;
mod params;
mod simulation;
mod vec2;

pub use body::Body;
pub use bounds::Bounds;
pub use params::BounceParams;
pub use simulation::{tick, BallSimulation, BALL_RADIUS, INITIAL_VELOCITY};
pub use vec2::IVec2;
