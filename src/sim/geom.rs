//! Axis-aligned rectangles
//!
//! Every box in the game is stored by its top-left corner and size, in world
//! pixels with y pointing down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from a top-left position and a size
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test; touching edges do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Strict point containment, used for projectile hits
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.right() && p.y > self.y && p.y < self.bottom()
    }

    /// Penetration depth of `self` into `other` along each axis
    ///
    /// Only meaningful when the two rectangles overlap.
    pub fn overlap_depth(&self, other: &Rect) -> Vec2 {
        Vec2::new(
            (self.right() - other.x).min(other.right() - self.x),
            (self.bottom() - other.y).min(other.bottom() - self.y),
        )
    }
}
