// Math utilities and helper functions

use glam::Vec2;

/// An axis-aligned integer rectangle in screen pixels.
///
/// Half-open on the right and bottom edges: a pixel (x, y) is inside
/// when `left <= x < right` and `top <= y < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle from a float position and size (truncating)
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self {
            x: position.x as i32,
            y: position.y as i32,
            w: size.x as i32,
            h: size.y as i32,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Check whether this rectangle has no area
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check whether two rectangles overlap (shared area, not just a shared edge)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// The overlapping region of two rectangles.
    ///
    /// Returns an empty rectangle when they do not overlap.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}
