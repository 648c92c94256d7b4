//! Axis-aligned rectangle geometry for platforms, items, enemies and the player
//!
//! World space: x grows right, y grows DOWN. Climbing means y decreases.
//! - x, y: top-left corner (integer pixels)
//! - w, h: extent

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An integer axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle anchored at a float position, snapped down to whole pixels
    #[inline]
    pub fn at(pos: Vec2, w: i32, h: i32) -> Self {
        Self::new(pos.x.floor() as i32, pos.y.floor() as i32, w, h)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    #[inline]
    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    /// Center as a float point (for particle bursts)
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x() as f32, self.center_y() as f32)
    }

    /// Strict overlap test: touching edges do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() <= other.left()
            || self.left() >= other.right()
            || self.bottom() <= other.top()
            || self.top() >= other.bottom())
    }

    /// Whether the horizontal spans overlap (ignores y)
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.right() > other.left() && self.left() < other.right()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let r = Rect::new(10, 20, 30, 41);
        assert_eq!(r.left(), 10);
        assert_eq!(r.right(), 40);
        assert_eq!(r.top(), 20);
        assert_eq!(r.bottom(), 61);
        assert_eq!(r.center_x(), 25);
        assert_eq!(r.center_y(), 40);
    }

    #[test]
    fn test_overlap_excludes_touching_edges() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.overlaps(&Rect::new(5, 5, 10, 10)));
        assert!(!a.overlaps(&Rect::new(10, 0, 10, 10)));
        assert!(!a.overlaps(&Rect::new(0, 10, 10, 10)));
        assert!(!a.overlaps(&Rect::new(-10, 0, 10, 10)));
    }

    #[test]
    fn test_at_floors_negative_coordinates() {
        let r = Rect::at(Vec2::new(-0.5, -10.2), 4, 4);
        assert_eq!((r.x, r.y), (-1, -11));
        let r = Rect::at(Vec2::new(3.9, 7.0), 4, 4);
        assert_eq!((r.x, r.y), (3, 7));
    }

    #[test]
    fn test_overlaps_x() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.overlaps_x(&Rect::new(9, 500, 5, 5)));
        assert!(!a.overlaps_x(&Rect::new(10, 0, 5, 5)));
    }
}
