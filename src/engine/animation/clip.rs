// Single animation clip
//
// A clip is a countdown that mutates sprite state every tick while it
// runs. A zero duration means the clip runs until paused by hand and
// never reports a finish on its own.

use crate::core::time::FrameTime;
use crate::engine::sprite::{SpriteState, TransformSnapshot};
use glam::Vec2;
use std::f32::consts::TAU;

use super::set::AnimationSet;

/// What a clip does to the sprite while it runs
#[derive(Debug, Clone)]
pub enum ClipKind {
    /// Rotate around an anchor at a fixed rate
    Spin {
        revolutions_per_second: f32,
        origin: Vec2,
    },
    /// Scale down linearly to zero over the duration
    Shrink,
    /// Fade the tint linearly to zero over the duration
    FadeOut { original_tint: f32 },
    /// Toggle visibility at a fixed rate
    Blink {
        blinks_per_second: f32,
        finish_visible: bool,
        last_toggle: Option<f64>,
    },
    /// A whole nested animation set driven as one member
    Group(AnimationSet),
}

/// One named effect with its own countdown and lifecycle
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Total run time in seconds, 0.0 = indefinite
    duration: f32,
    time_left: f32,
    running: bool,
    enabled: bool,
    just_finished: bool,
    snapshot: Option<TransformSnapshot>,
    pub kind: ClipKind,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32, kind: ClipKind) -> Self {
        Self {
            name: name.into(),
            duration,
            time_left: duration,
            running: false,
            enabled: true,
            just_finished: false,
            snapshot: None,
            kind,
        }
    }

    pub fn spin(
        name: impl Into<String>,
        duration: f32,
        revolutions_per_second: f32,
        origin: Vec2,
    ) -> Self {
        Self::new(
            name,
            duration,
            ClipKind::Spin {
                revolutions_per_second,
                origin,
            },
        )
    }

    pub fn shrink(name: impl Into<String>, duration: f32) -> Self {
        Self::new(name, duration, ClipKind::Shrink)
    }

    pub fn fade_out(name: impl Into<String>, duration: f32) -> Self {
        Self::new(name, duration, ClipKind::FadeOut { original_tint: 1.0 })
    }

    pub fn blink(
        name: impl Into<String>,
        duration: f32,
        blinks_per_second: f32,
        finish_visible: bool,
    ) -> Self {
        Self::new(
            name,
            duration,
            ClipKind::Blink {
                blinks_per_second,
                finish_visible,
                last_toggle: None,
            },
        )
    }

    /// Wrap a whole set so it can run as a catalog-bound member
    pub fn group(name: impl Into<String>, set: AnimationSet) -> Self {
        let duration = set.duration();
        Self::new(name, duration, ClipKind::Group(set))
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    pub fn is_running(&self) -> bool {
        match &self.kind {
            ClipKind::Group(set) => set.is_running(),
            _ => self.running,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Change the total duration; ignored while the clip is running
    pub fn set_duration(&mut self, duration: f32) {
        if self.is_running() {
            return;
        }
        self.duration = duration;
        self.time_left = duration;
        if let ClipKind::Group(set) = &mut self.kind {
            set.set_duration(duration);
        }
    }

    /// Capture the sprite state the clip will restore on reset
    pub fn initialize(&mut self, sprite: &SpriteState) {
        self.snapshot = Some(sprite.snapshot());
        if let ClipKind::FadeOut { original_tint } = &mut self.kind {
            *original_tint = sprite.tint;
        }
        if let ClipKind::Group(set) = &mut self.kind {
            set.initialize(sprite);
        }
    }

    /// Begin running from the full duration
    pub fn start(&mut self) {
        self.time_left = self.duration;
        self.running = true;
        self.enabled = true;
        self.just_finished = false;
        if let ClipKind::Blink { last_toggle, .. } = &mut self.kind {
            *last_toggle = None;
        }
        if let ClipKind::Group(set) = &mut self.kind {
            set.start();
        }
    }

    /// Stop without restoring the sprite transform
    pub fn pause(&mut self, sprite: &mut SpriteState) {
        self.running = false;
        if let ClipKind::Blink {
            finish_visible,
            last_toggle,
            ..
        } = &mut self.kind
        {
            sprite.visible = *finish_visible;
            *last_toggle = None;
        }
        if let ClipKind::Group(set) = &mut self.kind {
            set.pause(sprite);
        }
    }

    /// Stop, restore the captured transform, and rewind the countdown
    pub fn reset(&mut self, sprite: &mut SpriteState) {
        self.pause(sprite);
        if let Some(snapshot) = &self.snapshot {
            sprite.restore(snapshot);
        }
        self.time_left = self.duration;
        if let ClipKind::Group(set) = &mut self.kind {
            set.reset(sprite);
        }
    }

    /// Advance the countdown and apply the effect
    pub fn update(&mut self, time: FrameTime, sprite: &mut SpriteState) {
        if let ClipKind::Group(set) = &mut self.kind {
            set.update(time, sprite);
            if set.take_finished() {
                self.just_finished = true;
                self.enabled = false;
            }
            return;
        }
        if !self.running {
            return;
        }
        self.time_left -= time.delta;
        if self.time_left > 0.0 || self.duration == 0.0 {
            self.apply(time, sprite);
        } else {
            self.pause(sprite);
            self.just_finished = true;
            self.enabled = false;
        }
    }

    /// True exactly once after the countdown expires
    pub fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.just_finished)
    }

    /// A stopped copy with the same configuration
    pub fn fresh(&self) -> Self {
        let kind = match &self.kind {
            ClipKind::Blink {
                blinks_per_second,
                finish_visible,
                ..
            } => ClipKind::Blink {
                blinks_per_second: *blinks_per_second,
                finish_visible: *finish_visible,
                last_toggle: None,
            },
            ClipKind::Group(set) => ClipKind::Group(set.fresh()),
            other => other.clone(),
        };
        Self {
            name: self.name.clone(),
            duration: self.duration,
            time_left: self.duration,
            running: false,
            enabled: true,
            just_finished: false,
            snapshot: None,
            kind,
        }
    }

    fn apply(&mut self, time: FrameTime, sprite: &mut SpriteState) {
        let elapsed = self.duration - self.time_left;
        match &mut self.kind {
            ClipKind::Spin {
                revolutions_per_second,
                origin,
            } => {
                sprite.origin = *origin;
                sprite.rotation = elapsed * *revolutions_per_second * TAU;
                sprite.position_override = Some(sprite.current_location() + *origin);
            }
            ClipKind::Shrink => {
                let factor = if self.duration > 0.0 {
                    self.time_left / self.duration
                } else {
                    1.0
                };
                sprite.scale = Vec2::splat(factor);
                sprite.position_override = Some(sprite.current_location() + sprite.origin);
            }
            ClipKind::FadeOut { .. } => {
                sprite.tint = if self.duration > 0.0 {
                    self.time_left / self.duration
                } else {
                    1.0
                };
            }
            ClipKind::Blink {
                blinks_per_second,
                last_toggle,
                ..
            } => match last_toggle {
                None => *last_toggle = Some(time.total),
                Some(last) => {
                    if time.total - *last >= 1.0 / f64::from(*blinks_per_second) {
                        sprite.visible = !sprite.visible;
                        *last_toggle = Some(time.total);
                    }
                }
            },
            ClipKind::Group(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tick(clip: &mut AnimationClip, sprite: &mut SpriteState, delta: f32, total: f64) {
        clip.update(FrameTime::new(delta, total), sprite);
    }

    #[test]
    fn test_clip_finishes_exactly_once() {
        let mut sprite = SpriteState::new(Vec2::splat(32.0));
        let mut clip = AnimationClip::shrink("dying", 0.1);
        clip.initialize(&sprite);
        clip.start();

        tick(&mut clip, &mut sprite, 0.05, 0.05);
        assert!(!clip.take_finished());
        tick(&mut clip, &mut sprite, 0.1, 0.15);
        assert!(clip.take_finished());
        assert!(!clip.take_finished());
        assert!(!clip.is_running());
        assert!(!clip.is_enabled());
    }

    #[test]
    fn test_zero_duration_never_finishes() {
        let mut sprite = SpriteState::new(Vec2::splat(32.0));
        let mut clip = AnimationClip::spin("forever", 0.0, 1.0, Vec2::splat(16.0));
        clip.initialize(&sprite);
        clip.start();

        for step in 0..600 {
            tick(&mut clip, &mut sprite, 1.0, f64::from(step));
        }
        assert!(clip.is_running());
        assert!(!clip.take_finished());
    }

    #[test]
    fn test_spin_rotation_rate() {
        let mut sprite = SpriteState::new(Vec2::splat(32.0));
        let mut clip = AnimationClip::spin("spin", 2.0, 0.25, Vec2::splat(16.0));
        clip.initialize(&sprite);
        clip.start();

        // Quarter revolution per second, so a half turn after two half-steps
        tick(&mut clip, &mut sprite, 1.0, 1.0);
        tick(&mut clip, &mut sprite, 0.9, 1.9);
        assert_relative_eq!(sprite.rotation, 1.9 * 0.25 * TAU, epsilon = 1e-5);
        assert!(sprite.position_override.is_some());
    }

    #[test]
    fn test_shrink_scales_down() {
        let mut sprite = SpriteState::new(Vec2::splat(32.0));
        let mut clip = AnimationClip::shrink("shrink", 1.0);
        clip.initialize(&sprite);
        clip.start();

        tick(&mut clip, &mut sprite, 0.25, 0.25);
        assert_relative_eq!(sprite.scale.x, 0.75, epsilon = 1e-5);
        tick(&mut clip, &mut sprite, 0.5, 0.75);
        assert_relative_eq!(sprite.scale.x, 0.25, epsilon = 1e-5);
    }

    #[test]
    fn test_fade_out_drops_tint() {
        let mut sprite = SpriteState::new(Vec2::splat(32.0));
        let mut clip = AnimationClip::fade_out("fade", 2.0);
        clip.initialize(&sprite);
        clip.start();

        tick(&mut clip, &mut sprite, 1.0, 1.0);
        assert_relative_eq!(sprite.tint, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_blink_toggles_and_lands_on_finish_visibility() {
        let mut sprite = SpriteState::new(Vec2::splat(32.0));
        let mut clip = AnimationClip::blink("blink", 1.0, 4.0, true);
        clip.initialize(&sprite);
        clip.start();

        // First tick only arms the toggle timer
        tick(&mut clip, &mut sprite, 0.1, 0.1);
        assert!(sprite.visible);
        tick(&mut clip, &mut sprite, 0.3, 0.4);
        assert!(!sprite.visible);
        // Run past the duration
        tick(&mut clip, &mut sprite, 1.0, 1.4);
        assert!(clip.take_finished());
        assert!(sprite.visible);
    }

    #[test]
    fn test_reset_restores_transform() {
        let mut sprite = SpriteState::new(Vec2::splat(32.0));
        let mut clip = AnimationClip::spin("spin", 1.0, 2.0, Vec2::splat(16.0));
        clip.initialize(&sprite);
        clip.start();

        tick(&mut clip, &mut sprite, 0.4, 0.4);
        assert!(sprite.rotation != 0.0);

        clip.reset(&mut sprite);
        assert_eq!(sprite.rotation, 0.0);
        assert!(sprite.position_override.is_none());
        assert_relative_eq!(clip.time_left(), 1.0);
    }

    #[test]
    fn test_fresh_copy_runs_independently() {
        let mut sprite = SpriteState::new(Vec2::splat(32.0));
        let mut original = AnimationClip::shrink("shrink", 1.0);
        original.initialize(&sprite);
        original.start();
        tick(&mut original, &mut sprite, 0.5, 0.5);

        let copy = original.fresh();
        assert!(!copy.is_running());
        assert_relative_eq!(copy.time_left(), 1.0);
        assert_relative_eq!(original.time_left(), 0.5);
    }

    #[test]
    fn test_set_duration_ignored_while_running() {
        let mut clip = AnimationClip::shrink("shrink", 1.0);
        clip.start();
        clip.set_duration(5.0);
        assert_relative_eq!(clip.duration(), 1.0);
    }
}
