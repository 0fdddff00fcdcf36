//! Viewport collaborator
//!
//! The session tells the view where the player is once per frame (step two of
//! the frame procedure). What the view does with it is up to the front end;
//! [`FollowCamera`] is the usual choice.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::lerp;

/// Default easing toward the focus point per frame
pub const CAMERA_EASE: f32 = 0.08;

pub trait Viewport {
    /// Track `focus` (the player's box) inside a world of size `world`
    fn follow(&mut self, focus: Rect, world: Vec2);
}

/// Headless sessions have no view
impl Viewport for () {
    fn follow(&mut self, _focus: Rect, _world: Vec2) {}
}

/// Camera that eases toward the player centre and stays inside the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowCamera {
    /// Top-left of the visible area in world space
    pub pos: Vec2,
    /// Visible area size
    pub size: Vec2,
    pub ease: f32,
}

impl FollowCamera {
    pub fn new(size: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            size,
            ease: CAMERA_EASE,
        }
    }

    /// Jump straight to `focus` without easing, e.g. at level start
    pub fn snap_to(&mut self, focus: Rect, world: Vec2) {
        self.pos = focus.center() - self.size / 2.0;
        self.clamp(world);
    }

    fn clamp(&mut self, world: Vec2) {
        let max = world - self.size;
        self.pos.x = self.pos.x.min(max.x).max(0.0);
        self.pos.y = self.pos.y.min(max.y).max(0.0);
    }

    /// Screen-space point (e.g. the mouse) to world space
    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.pos
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.pos
    }

    /// Visible world rectangle
    pub fn visible(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

impl Viewport for FollowCamera {
    fn follow(&mut self, focus: Rect, world: Vec2) {
        let target = focus.center() - self.size / 2.0;
        self.pos.x = lerp(self.pos.x, target.x, self.ease);
        self.pos.y = lerp(self.pos.y, target.y, self.ease);
        self.clamp(world);
    }
}
