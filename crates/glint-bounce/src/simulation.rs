use std::time::Instant;

use crate::{Body, BounceParams, Bounds, IVec2};

/// Radius (and sprite edge length) of the demo ball, in pixels.
pub const BALL_RADIUS: i32 = 72;

/// Velocity the ball is spawned with.
pub const INITIAL_VELOCITY: IVec2 = IVec2::new(5, 0);

/// Advances `body` by one frame inside `bounds`.
///
/// Steps, in order:
/// 1. reverse `dx` when more than `direction_flip_interval` has elapsed since
///    the last reversal
/// 2. add gravity to `dy` when `y > 0 || y + radius < height`
/// 3. integrate position by velocity
/// 4. reverse `dx` on a left/right wall hit (position is not clamped)
/// 5. reverse `dy` on a top/bottom wall hit; slow bounces snap onto the floor
///
/// The step 2 condition holds in every state with a positive radius, so
/// gravity is effectively unconditional.
pub fn tick(body: &mut Body, bounds: Bounds, params: &BounceParams, now: Instant) {
    let elapsed = now.saturating_duration_since(body.last_direction_flip);
    if elapsed.as_millis() > params.direction_flip_interval.as_millis() {
        body.velocity.x = -body.velocity.x;
        body.last_direction_flip = now;
    }

    if body.position.y > 0 || body.bottom() < bounds.height {
        body.velocity.y += params.gravity;
    }

    body.position += body.velocity;

    if body.position.x < 0 || body.right() > bounds.width {
        body.velocity.x = -body.velocity.x;
    }

    if body.position.y < 0 || body.bottom() > bounds.height {
        body.velocity.y = -body.velocity.y;
        log::debug!("vertical bounce at y = {}", body.position.y);

        if body.velocity.y.abs() < params.rest_speed {
            body.position.y = bounds.height - body.radius();
        }
    }
}

/// Owns the body together with the region and tuning it is simulated under.
#[derive(Debug, Clone)]
pub struct BallSimulation {
    body: Body,
    bounds: Bounds,
    params: BounceParams,
}

impl BallSimulation {
    /// Spawns a body of `radius` at the center of `bounds`, moving with
    /// [`INITIAL_VELOCITY`].
    pub fn new(bounds: Bounds, radius: i32, params: BounceParams, now: Instant) -> Self {
        debug_assert!(radius <= bounds.min_extent(), "body does not fit in bounds");
        let body = Body::new(bounds.center(), INITIAL_VELOCITY, radius, now);
        Self::with_body(body, bounds, params)
    }

    pub fn with_body(body: Body, bounds: Bounds, params: BounceParams) -> Self {
        Self { body, bounds, params }
    }

    /// Runs one update step. Call once per rendered frame.
    pub fn tick(&mut self, now: Instant) {
        tick(&mut self.body, self.bounds, &self.params, now);
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const WINDOW: Bounds = Bounds::new(800, 600);

    fn body_at(x: i32, y: i32, dx: i32, dy: i32, t0: Instant) -> Body {
        Body::new(IVec2::new(x, y), IVec2::new(dx, dy), BALL_RADIUS, t0)
    }

    fn step(body: &mut Body, now: Instant) {
        tick(body, WINDOW, &BounceParams::default(), now);
    }

    // ── integration ───────────────────────────────────────────────────────

    #[test]
    fn free_flight_adds_velocity_and_gravity() {
        let t0 = Instant::now();
        let mut body = body_at(100, 100, 5, 0, t0);
        step(&mut body, t0);
        assert_eq!(body.position(), IVec2::new(105, 101));
        assert_eq!(body.velocity(), IVec2::new(5, 1));
    }

    #[test]
    fn gravity_applies_every_tick() {
        let t0 = Instant::now();
        let mut sim = BallSimulation::new(WINDOW, BALL_RADIUS, BounceParams::default(), t0);

        for frame in 0..2_000u64 {
            let now = t0 + Duration::from_millis(frame * 10);
            let before = sim.body().velocity().y;
            sim.tick(now);
            // A vertical bounce negates dy after gravity, so compare magnitudes.
            assert_eq!(sim.body().velocity().y.abs(), (before + 1).abs(), "frame {frame}");
        }
    }

    // ── periodic direction flip ───────────────────────────────────────────

    #[test]
    fn zero_elapsed_never_flips() {
        let t0 = Instant::now();
        let mut body = body_at(100, 100, 5, 0, t0);
        step(&mut body, t0);
        assert_eq!(body.velocity().x, 5);
        assert_eq!(body.last_direction_flip(), t0);
    }

    #[test]
    fn flip_interval_boundary_is_exclusive() {
        let t0 = Instant::now();
        let mut body = body_at(100, 100, 5, 0, t0);
        step(&mut body, t0 + Duration::from_millis(3000));
        assert_eq!(body.velocity().x, 5);
        assert_eq!(body.last_direction_flip(), t0);
    }

    #[test]
    fn flip_after_interval_reverses_and_resets_timer() {
        let t0 = Instant::now();
        let later = t0 + Duration::from_millis(3001);
        let mut body = body_at(100, 100, 5, 0, t0);
        step(&mut body, later);
        assert_eq!(body.velocity().x, -5);
        assert_eq!(body.position().x, 95);
        assert_eq!(body.last_direction_flip(), later);

        // Timer restarted: the next few seconds keep the new direction.
        step(&mut body, later + Duration::from_millis(2999));
        assert_eq!(body.velocity().x, -5);
    }

    #[test]
    fn sub_millisecond_excess_does_not_flip() {
        let t0 = Instant::now();
        let mut body = body_at(100, 100, 5, 0, t0);
        step(&mut body, t0 + Duration::from_micros(3_000_900));
        assert_eq!(body.velocity().x, 5);
    }

    #[test]
    fn timestamp_before_last_flip_counts_as_zero_elapsed() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(10);
        let mut body = body_at(100, 100, 5, 0, t1);
        step(&mut body, t0);
        assert_eq!(body.velocity().x, 5);
    }

    // ── walls ─────────────────────────────────────────────────────────────

    #[test]
    fn right_wall_reverses_without_clamping() {
        let t0 = Instant::now();
        let mut body = body_at(725, 100, 5, 0, t0);
        step(&mut body, t0);
        assert_eq!(body.position().x, 730);
        assert_eq!(body.velocity().x, -5);

        step(&mut body, t0);
        assert_eq!(body.position().x, 725);
        assert_eq!(body.velocity().x, -5);
    }

    #[test]
    fn left_wall_reverses() {
        let t0 = Instant::now();
        let mut body = body_at(2, 100, -5, 0, t0);
        step(&mut body, t0);
        assert_eq!(body.position().x, -3);
        assert_eq!(body.velocity().x, 5);
    }

    #[test]
    fn ceiling_reverses_fast_bounce_without_snap() {
        let t0 = Instant::now();
        let mut body = body_at(100, 5, 0, -10, t0);
        step(&mut body, t0);
        assert_eq!(body.position().y, -4);
        assert_eq!(body.velocity().y, 9);
    }

    #[test]
    fn slow_ceiling_hit_snaps_to_floor() {
        // The rest snap keys on |dy| alone, so a slow ceiling contact lands on the floor too.
        let t0 = Instant::now();
        let mut body = body_at(100, 1, 0, -3, t0);
        step(&mut body, t0);
        assert_eq!(body.position(), IVec2::new(100, 600 - BALL_RADIUS));
        assert_eq!(body.velocity(), IVec2::new(0, 2));
    }

    #[test]
    fn floor_reverses_fast_bounce_without_snap() {
        let t0 = Instant::now();
        let mut body = body_at(100, 520, 0, 9, t0);
        step(&mut body, t0);
        assert_eq!(body.position().y, 530);
        assert_eq!(body.velocity().y, -10);
    }

    #[test]
    fn slow_floor_bounce_snaps_to_rest() {
        let t0 = Instant::now();
        let mut body = body_at(100, 527, 0, 1, t0);
        step(&mut body, t0);
        assert_eq!(body.velocity().y, -2);
        assert_eq!(body.position().y, 600 - BALL_RADIUS);
    }

    #[test]
    fn resting_is_not_sticky() {
        let t0 = Instant::now();
        let mut body = body_at(100, 527, 0, 1, t0);
        step(&mut body, t0);
        assert_eq!(body.position().y, 528);

        step(&mut body, t0);
        assert_eq!(body.velocity().y, -1);
        assert_eq!(body.position().y, 527);
    }

    // ── simulation wrapper ────────────────────────────────────────────────

    #[test]
    fn spawns_at_center_with_initial_velocity() {
        let t0 = Instant::now();
        let sim = BallSimulation::new(WINDOW, BALL_RADIUS, BounceParams::default(), t0);
        assert_eq!(sim.body().position(), IVec2::new(400, 300));
        assert_eq!(sim.body().velocity(), INITIAL_VELOCITY);
        assert_eq!(sim.body().radius(), BALL_RADIUS);
        assert_eq!(sim.body().last_direction_flip(), t0);
    }

    #[test]
    fn radius_is_constant_across_ticks() {
        let t0 = Instant::now();
        let mut sim = BallSimulation::new(WINDOW, BALL_RADIUS, BounceParams::default(), t0);
        for frame in 0..500u64 {
            sim.tick(t0 + Duration::from_millis(frame * 16));
            assert_eq!(sim.body().radius(), BALL_RADIUS);
        }
    }

    #[test]
    fn custom_gravity_is_honored() {
        let t0 = Instant::now();
        let params = BounceParams { gravity: 3, ..BounceParams::default() };
        let mut sim = BallSimulation::with_body(body_at(100, 100, 0, 0, t0), WINDOW, params);
        sim.tick(t0);
        assert_eq!(sim.body().velocity().y, 3);
        assert_eq!(sim.body().position().y, 103);
    }
}
