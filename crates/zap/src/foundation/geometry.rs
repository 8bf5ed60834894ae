//! Integer screen geometry
//!
//! Window and display rectangles live in virtual-desktop coordinates: the
//! origin is the top-left corner of the primary display and other displays
//! may sit at negative offsets.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in virtual-desktop pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (`x + width`)
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (`y + height`)
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Top-left corner
    pub const fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Width and height
    pub const fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Point containment with inclusive edges on all four sides
    ///
    /// A point on the shared edge of two adjacent rectangles is contained by
    /// both of them.
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        self.x <= x && x <= self.right() && self.y <= y && y <= self.bottom()
    }

    /// Area shared with `other`, 0 when they only touch or are disjoint
    pub fn overlap_area(&self, other: &Self) -> i64 {
        let width = i64::from(self.right().min(other.right())) - i64::from(self.x.max(other.x));
        let height = i64::from(self.bottom().min(other.bottom())) - i64::from(self.y.max(other.y));
        if width <= 0 || height <= 0 {
            0
        } else {
            width * height
        }
    }

    /// A rectangle of `width` x `height` centred inside `self`
    ///
    /// When the inner size exceeds the outer one the result starts left of
    /// (or above) `self`.
    pub const fn centered(&self, width: i32, height: i32) -> Self {
        Self {
            x: self.x + (self.width - width) / 2,
            y: self.y + (self.height - height) / 2,
            width,
            height,
        }
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(x={}, y={}, w={}, h={})", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point_is_inclusive() {
        let rect = Rect::new(0, 0, 100, 50);

        assert!(rect.contains_point(0, 0));
        assert!(rect.contains_point(100, 50));
        assert!(rect.contains_point(42, 17));
        assert!(!rect.contains_point(101, 10));
        assert!(!rect.contains_point(-1, 10));
    }

    #[test]
    fn test_contains_point_with_negative_origin() {
        let left_monitor = Rect::new(-1920, 0, 1920, 1080);

        assert!(left_monitor.contains_point(-1000, 500));
        assert!(left_monitor.contains_point(0, 0)); // shared edge with the primary
        assert!(!left_monitor.contains_point(1, 0));
    }

    #[test]
    fn test_centered_accounts_for_origin() {
        let display = Rect::new(1920, 0, 2560, 1440);
        let centered = display.centered(800, 600);

        assert_eq!(centered, Rect::new(1920 + 880, 420, 800, 600));
    }

    #[test]
    fn test_overlap_area() {
        let primary = Rect::new(0, 0, 1920, 1080);

        assert_eq!(primary.overlap_area(&Rect::new(1820, 980, 200, 200)), 100 * 100);
        assert_eq!(primary.overlap_area(&Rect::new(1920, 0, 800, 600)), 0);
        assert_eq!(primary.overlap_area(&Rect::new(-5000, -5000, 10, 10)), 0);
        assert_eq!(primary.overlap_area(&primary), 1920 * 1080);
    }

    #[test]
    fn test_edges() {
        let rect = Rect::new(10, 20, 30, 40);
        assert_eq!(rect.right(), 40);
        assert_eq!(rect.bottom(), 60);
        assert_eq!(rect.origin(), (10, 20));
        assert_eq!(rect.size(), (30, 40));
    }
}
