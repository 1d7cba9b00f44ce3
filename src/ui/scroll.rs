//! Smooth scrolling of the content slot.
//!
//! Input moves a target offset; each frame the rendered offset eases toward it
//! by a fixed fraction (`LERP`). Reduced motion snaps straight to the target.

/// Fraction of the remaining distance covered per frame.
pub const LERP: f32 = 0.1;

/// Rows per mouse wheel notch.
pub const WHEEL_ROWS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothScroll {
    current: f32,
    target: f32,
    limit: f32,
}

impl SmoothScroll {
    /// Rendered offset in whole rows.
    pub fn offset(&self) -> u16 {
        self.current.round().clamp(0.0, f32::from(u16::MAX)) as u16
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Scroll progress through the scrollable range, 0..=1.
    pub fn progress(&self) -> f32 {
        if self.limit <= 0.0 {
            0.0
        } else {
            (self.current / self.limit).clamp(0.0, 1.0)
        }
    }

    /// Set the maximum offset and clamp both positions into it.
    pub fn set_limit(&mut self, limit: u16) {
        self.limit = f32::from(limit);
        self.target = self.target.clamp(0.0, self.limit);
        self.current = self.current.clamp(0.0, self.limit);
    }

    pub fn scroll_by(&mut self, rows: f32) {
        self.target = (self.target + rows).clamp(0.0, self.limit.max(0.0));
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
        self.target = 0.0;
    }

    /// Advance one frame.
    pub fn tick(&mut self, reduced: bool) {
        if reduced {
            self.current = self.target;
            return;
        }
        self.current += (self.target - self.current) * LERP;
        if (self.target - self.current).abs() < 0.05 {
            self.current = self.target;
        }
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroller(limit: u16) -> SmoothScroll {
        let mut scroll = SmoothScroll::default();
        scroll.set_limit(limit);
        scroll
    }

    #[test]
    fn test_scroll_is_clamped_to_limit() {
        let mut scroll = scroller(10);
        scroll.scroll_by(50.0);
        assert_eq!(scroll.target(), 10.0);
        scroll.scroll_by(-100.0);
        assert_eq!(scroll.target(), 0.0);
    }

    #[test]
    fn test_tick_eases_toward_target() {
        let mut scroll = scroller(100);
        scroll.scroll_by(10.0);
        scroll.tick(false);
        assert_eq!(scroll.offset(), 1);
        assert!(!scroll.is_settled());
        for _ in 0..200 {
            scroll.tick(false);
        }
        assert!(scroll.is_settled());
        assert_eq!(scroll.offset(), 10);
    }

    #[test]
    fn test_reduced_motion_snaps() {
        let mut scroll = scroller(100);
        scroll.scroll_by(42.0);
        scroll.tick(true);
        assert_eq!(scroll.offset(), 42);
        assert!(scroll.is_settled());
    }

    #[test]
    fn test_shrinking_limit_pulls_offset_back() {
        let mut scroll = scroller(100);
        scroll.scroll_by(80.0);
        scroll.tick(true);
        scroll.set_limit(20);
        assert_eq!(scroll.offset(), 20);
        assert_eq!(scroll.progress(), 1.0);
    }

    #[test]
    fn test_progress_without_range_is_zero() {
        let scroll = scroller(0);
        assert_eq!(scroll.progress(), 0.0);
    }
}
