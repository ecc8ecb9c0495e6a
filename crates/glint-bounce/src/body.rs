use std::time::Instant;

use crate::IVec2;

/// The single bouncing entity.
///
/// Position and velocity have no public setters: [`crate::tick`] is the only
/// writer once the body exists. The radius is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub(crate) position: IVec2,
    pub(crate) velocity: IVec2,
    radius: i32,
    pub(crate) last_direction_flip: Instant,
}

impl Body {
    /// Creates a body; `now` seeds the periodic direction-flip timer.
    pub fn new(position: IVec2, velocity: IVec2, radius: i32, now: Instant) -> Self {
        debug_assert!(radius >= 0, "negative body radius");
        Self {
            position,
            velocity,
            radius,
            last_direction_flip: now,
        }
    }

    #[inline]
    pub fn position(&self) -> IVec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> IVec2 {
        self.velocity
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    #[inline]
    pub fn last_direction_flip(&self) -> Instant {
        self.last_direction_flip
    }

    /// Screen rectangle `(x, y, w, h)` the sprite is drawn into.
    ///
    /// The sprite's edge length equals the radius, anchored at the top-left
    /// corner given by the position. Collision checks use the same extent.
    pub fn sprite_rect(&self) -> (i32, i32, i32, i32) {
        (self.position.x, self.position.y, self.radius, self.radius)
    }

    #[inline]
    pub(crate) fn right(&self) -> i32 {
        self.position.x + self.radius
    }

    #[inline]
    pub(crate) fn bottom(&self) -> i32 {
        self.position.y + self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_rect_uses_radius_as_edge() {
        let body = Body::new(IVec2::new(10, 20), IVec2::zero(), 72, Instant::now());
        assert_eq!(body.sprite_rect(), (10, 20, 72, 72));
    }

    #[test]
    fn edges_follow_position() {
        let body = Body::new(IVec2::new(-5, 530), IVec2::zero(), 72, Instant::now());
        assert_eq!(body.right(), 67);
        assert_eq!(body.bottom(), 602);
    }
}
