use crate::IVec2;

/// Fixed rectangular region the body bounces inside.
///
/// The region spans `[0, width] x [0, height]` in window pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Integer center of the region (rounded toward the origin).
    #[inline]
    pub const fn center(self) -> IVec2 {
        IVec2::new(self.width / 2, self.height / 2)
    }

    #[inline]
    pub fn min_extent(self) -> i32 {
        self.width.min(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_window() {
        assert_eq!(Bounds::new(800, 600).center(), IVec2::new(400, 300));
    }

    #[test]
    fn center_truncates_odd_extents() {
        assert_eq!(Bounds::new(801, 599).center(), IVec2::new(400, 299));
    }

    #[test]
    fn min_extent_picks_shorter_side() {
        assert_eq!(Bounds::new(800, 600).min_extent(), 600);
        assert_eq!(Bounds::new(300, 800).min_extent(), 300);
    }
}
