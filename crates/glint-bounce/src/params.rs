use std::time::Duration;

/// Tuning constants for the bounce update rule.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BounceParams {
    /// Added to the vertical velocity every tick.
    pub gravity: i32,

    /// Horizontal velocity is forcibly reversed once more than this much
    /// time (in whole milliseconds) has passed since the last reversal.
    pub direction_flip_interval: Duration,

    /// After a vertical bounce, speeds below this snap the body onto the floor.
    pub rest_speed: i32,
}

impl Default for BounceParams {
    fn default() -> Self {
        Self {
            gravity: 1,
            direction_flip_interval: Duration::from_millis(3000),
            rest_speed: 3,
        }
    }
}
