//! Axis-aligned rectangle geometry
//!
//! Screen space: origin at the top-left, y grows downward.

use glam::Vec2;

/// An axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Overlap against `other` shrunk by `inset` on every edge.
    ///
    /// This is the forgiving hitbox: the two boxes must overlap past the
    /// margin before it counts as a hit.
    pub fn intersects_inset(&self, other: &Rect, inset: f32) -> bool {
        self.left() < other.right() - inset
            && self.right() > other.left() + inset
            && self.top() < other.bottom() - inset
            && self.bottom() > other.top() + inset
    }
}
