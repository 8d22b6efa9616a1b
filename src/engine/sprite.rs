// Sprite transform and visual state
//
// Drawing itself is the rendering layer's job; the core tracks the
// state a renderer would consume (position, rotation, scale, tint,
// visibility) because animations mutate it and collision reads it.

use crate::core::math::Rect;
use glam::Vec2;

/// Visual state of one entity
#[derive(Debug, Clone)]
pub struct SpriteState {
    /// Position relative to the zero point
    pub local: Vec2,
    /// Base vector the local position is measured from (formation anchor)
    pub zero_point: Vec2,
    /// Absolute draw-position override, used while an animation is running
    pub position_override: Option<Vec2>,
    /// Rotation/scale anchor in local pixels
    pub origin: Vec2,
    pub scale: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Brightness multiplier, 1.0 = full color
    pub tint: f32,
    pub visible: bool,
    /// Shape size in pixels, matching the entity's pixel buffer
    pub size: Vec2,
}

impl SpriteState {
    pub fn new(size: Vec2) -> Self {
        Self {
            local: Vec2::ZERO,
            zero_point: Vec2::ZERO,
            position_override: None,
            origin: size / 2.0,
            scale: Vec2::ONE,
            rotation: 0.0,
            tint: 1.0,
            visible: true,
            size,
        }
    }

    pub fn at(size: Vec2, local: Vec2) -> Self {
        Self {
            local,
            ..Self::new(size)
        }
    }

    /// Current top-left location on screen
    pub fn current_location(&self) -> Vec2 {
        self.zero_point + self.local
    }

    /// Screen-space bounding rectangle used for collision
    pub fn shape_rect(&self) -> Rect {
        Rect::from_position_size(self.current_location(), self.size)
    }

    /// Rebase the sprite on a new zero point
    pub fn set_zero_point(&mut self, zero_point: Vec2) {
        self.zero_point = zero_point;
    }

    /// Capture the transform fields an animation may overwrite
    pub fn snapshot(&self) -> TransformSnapshot {
        TransformSnapshot {
            origin: self.origin,
            position_override: self.position_override,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Restore a previously captured transform
    pub fn restore(&mut self, snapshot: &TransformSnapshot) {
        self.origin = snapshot.origin;
        self.position_override = snapshot.position_override;
        self.rotation = snapshot.rotation;
        self.scale = snapshot.scale;
    }
}

/// Pre-animation transform state, restored when an animation resets
#[derive(Debug, Clone, Copy)]
pub struct TransformSnapshot {
    pub origin: Vec2,
    pub position_override: Option<Vec2>,
    pub rotation: f32,
    pub scale: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_location_includes_zero_point() {
        let mut sprite = SpriteState::at(Vec2::new(32.0, 32.0), Vec2::new(10.0, 20.0));
        sprite.set_zero_point(Vec2::new(100.0, 0.0));
        assert_eq!(sprite.current_location(), Vec2::new(110.0, 20.0));
    }

    #[test]
    fn test_shape_rect() {
        let sprite = SpriteState::at(Vec2::new(32.0, 16.0), Vec2::new(5.0, 6.0));
        assert_eq!(sprite.shape_rect(), Rect::new(5, 6, 32, 16));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut sprite = SpriteState::new(Vec2::new(32.0, 32.0));
        let snapshot = sprite.snapshot();

        sprite.rotation = 1.5;
        sprite.scale = Vec2::splat(0.25);
        sprite.position_override = Some(Vec2::new(4.0, 4.0));

        sprite.restore(&snapshot);
        assert_eq!(sprite.rotation, 0.0);
        assert_eq!(sprite.scale, Vec2::ONE);
        assert!(sprite.position_override.is_none());
    }
}
