//! Collision geometry in lane units
//!
//! Everything collides as axis-aligned rectangles. Footprints are inset by a
//! per-operation padding so that grazing contact does not count.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (x grows right, y grows rearward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// One full grid cell with its top-left corner at `pos`
    pub fn cell(pos: Vec2) -> Self {
        Self::new(pos, Vec2::ONE)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Shrink by `padding` on every side (never below zero size)
    pub fn inset(&self, padding: f32) -> Self {
        let size = (self.size - Vec2::splat(padding * 2.0)).max(Vec2::ZERO);
        Self::new(self.min + Vec2::splat(padding), size)
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// Overlap test between two footprints after insetting each by its own padding
pub fn padded_overlap(a: &Rect, a_padding: f32, b: &Rect, b_padding: f32) -> bool {
    a.inset(a_padding).overlaps(&b.inset(b_padding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = Rect::new(Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::cell(Vec2::new(0.0, 0.0));
        let b = Rect::cell(Vec2::new(1.0, 0.0));
        assert!(!a.overlaps(&b));
        let c = Rect::cell(Vec2::new(0.0, 1.0));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_inset_shrinks_both_sides() {
        let r = Rect::cell(Vec2::new(2.0, 3.0)).inset(0.125);
        assert!((r.min.x - 2.125).abs() < 1e-6);
        assert!((r.max().y - 3.875).abs() < 1e-6);
    }

    #[test]
    fn test_inset_never_negative() {
        let r = Rect::new(Vec2::ZERO, Vec2::new(0.1, 0.1)).inset(1.0);
        assert_eq!(r.size, Vec2::ZERO);
    }

    #[test]
    fn test_padding_forgives_grazing_contact() {
        let player = Rect::cell(Vec2::new(0.0, 0.0));
        let car = Rect::new(Vec2::new(0.9, 0.0), Vec2::new(0.9, 0.6));
        assert!(player.overlaps(&car));
        assert!(!padded_overlap(&player, 0.125, &car, 0.075));
    }
}
