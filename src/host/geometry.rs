//! Window geometry and screen placement

use serde::{Deserialize, Serialize};

/// Window rectangle in screen pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge, saturating at `i32::MAX`
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Whether `other` lies entirely inside `self`
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// A rect of `width` x `height` centred on `self`
    pub fn centered(&self, width: i32, height: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(self.width.saturating_sub(width) / 2),
            self.y.saturating_add(self.height.saturating_sub(height) / 2),
            width,
            height,
        )
    }
}

/// Screens attached to the host, the first one being primary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screens {
    screens: Vec<Rect>,
}

impl Default for Screens {
    fn default() -> Self {
        Self::single(Rect::new(0, 0, 1920, 1080))
    }
}

impl Screens {
    pub fn single(primary: Rect) -> Self {
        Self {
            screens: vec![primary],
        }
    }

    /// Build from a list whose first element is the primary screen
    ///
    /// An empty list falls back to the default screen.
    pub fn new(screens: Vec<Rect>) -> Self {
        if screens.is_empty() {
            Self::default()
        } else {
            Self { screens }
        }
    }

    pub fn primary(&self) -> Rect {
        self.screens[0]
    }

    pub fn all(&self) -> &[Rect] {
        &self.screens
    }

    /// Whether `rect` is fully visible on one of the screens
    ///
    /// An empty rect is never visible.
    pub fn is_on_screen(&self, rect: &Rect) -> bool {
        !rect.is_empty() && self.screens.iter().any(|s| s.contains_rect(rect))
    }

    /// Move `rect` onto the primary screen unless it is already fully visible
    ///
    /// The rect is shrunk to the primary screen when it is larger, then
    /// clamped inside it. Any input is accepted, including rects at the
    /// edge of the `i32` range and a degenerate primary screen.
    pub fn reposition(&self, rect: Rect) -> Rect {
        if self.is_on_screen(&rect) {
            return rect;
        }

        let primary = self.primary();
        let width = rect.width.clamp(1, primary.width.max(1));
        let height = rect.height.clamp(1, primary.height.max(1));
        let x = clamp_start(rect.x, primary.x, primary.right(), width);
        let y = clamp_start(rect.y, primary.y, primary.bottom(), height);

        tracing::debug!(?rect, ?primary, "moving window onto the primary screen");
        Rect::new(x, y, width, height)
    }
}

/// Clamp the start of a span of `len` into `[lo, hi]`, keeping `lo` when
/// the span does not fit
fn clamp_start(start: i32, lo: i32, hi: i32, len: i32) -> i32 {
    let max = hi.saturating_sub(len).max(lo);
    start.clamp(lo, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_rect() {
        let outer = Rect::new(0, 0, 100, 100);
        assert!(outer.contains_rect(&Rect::new(10, 10, 50, 50)));
        assert!(outer.contains_rect(&outer));
        assert!(!outer.contains_rect(&Rect::new(60, 60, 50, 50)));
    }

    #[test]
    fn test_reposition_keeps_visible_window() {
        let screens = Screens::new(vec![
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1920, 0, 1280, 1024),
        ]);
        let on_second = Rect::new(2000, 100, 400, 300);
        assert_eq!(screens.reposition(on_second), on_second);
    }

    #[test]
    fn test_reposition_unplugged_screen() {
        let screens = Screens::single(Rect::new(0, 0, 1920, 1080));
        let moved = screens.reposition(Rect::new(2500, 200, 400, 300));
        assert_eq!(moved, Rect::new(1520, 200, 400, 300));
        assert!(screens.is_on_screen(&moved));
    }

    #[test]
    fn test_reposition_shrinks_oversized_window() {
        let screens = Screens::single(Rect::new(0, 0, 800, 600));
        let moved = screens.reposition(Rect::new(-50, -50, 1000, 700));
        assert_eq!(moved, Rect::new(0, 0, 800, 600));
    }

    #[test]
    fn test_edges_saturate() {
        let far = Rect::new(i32::MAX - 10, i32::MIN, 400, 300);
        assert_eq!(far.right(), i32::MAX);
        assert_eq!(far.bottom(), i32::MIN + 300);
        assert!(!Rect::new(0, 0, 1920, 1080).contains_rect(&far));
        assert!(!Rect::new(0, 0, 1920, 1080).intersects(&far));
    }

    #[test]
    fn test_reposition_extreme_coordinates() {
        let screens = Screens::single(Rect::new(0, 0, 1920, 1080));
        for rect in [
            Rect::new(i32::MAX - 10, 0, 400, 300),
            Rect::new(i32::MIN, i32::MIN, 400, 300),
            Rect::new(0, i32::MAX, i32::MAX, i32::MAX),
            Rect::new(100, 100, -20, 0),
        ] {
            let moved = screens.reposition(rect);
            assert!(screens.is_on_screen(&moved), "{:?} -> {:?}", rect, moved);
        }
    }

    #[test]
    fn test_reposition_degenerate_primary() {
        let screens = Screens::single(Rect::new(10, 20, 0, -5));
        let moved = screens.reposition(Rect::new(500, 500, 400, 300));
        assert_eq!(moved, Rect::new(10, 20, 1, 1));
    }

    #[test]
    fn test_centered() {
        let screen = Rect::new(0, 0, 1000, 800);
        assert_eq!(screen.centered(200, 100), Rect::new(400, 350, 200, 100));
    }
}
