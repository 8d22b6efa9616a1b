// Named collection of clips driven as one animation
//
// The set carries its own countdown on top of its members, so it can
// cut every member off when its own duration expires. Adding a member
// under an existing name replaces it.

use crate::core::time::FrameTime;
use crate::engine::sprite::SpriteState;
use std::collections::HashMap;

use super::clip::AnimationClip;

#[derive(Debug, Clone)]
pub struct AnimationSet {
    pub name: String,
    /// Overall cutoff in seconds, 0.0 = no cutoff of its own
    duration: f32,
    time_left: f32,
    running: bool,
    just_finished: bool,
    members: HashMap<String, AnimationClip>,
}

impl AnimationSet {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            time_left: duration,
            running: false,
            just_finished: false,
            members: HashMap::new(),
        }
    }

    /// Insert a clip, replacing any member with the same name
    pub fn add(&mut self, clip: AnimationClip) {
        self.members.insert(clip.name.clone(), clip);
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.members.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AnimationClip> {
        self.members.get_mut(name)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// True while the set's own countdown or any member is running
    pub fn is_running(&self) -> bool {
        self.running || self.members.values().any(AnimationClip::is_running)
    }

    /// Change the cutoff and every member's duration; ignored while running
    pub fn set_duration(&mut self, duration: f32) {
        if self.is_running() {
            return;
        }
        self.duration = duration;
        self.time_left = duration;
        for member in self.members.values_mut() {
            member.set_duration(duration);
        }
    }

    pub fn initialize(&mut self, sprite: &SpriteState) {
        for member in self.members.values_mut() {
            member.initialize(sprite);
        }
    }

    pub fn start(&mut self) {
        for member in self.members.values_mut() {
            member.start();
        }
        self.time_left = self.duration;
        self.running = true;
        self.just_finished = false;
    }

    pub fn pause(&mut self, sprite: &mut SpriteState) {
        for member in self.members.values_mut() {
            member.pause(sprite);
        }
        self.running = false;
    }

    pub fn reset(&mut self, sprite: &mut SpriteState) {
        for member in self.members.values_mut() {
            member.reset(sprite);
        }
        self.running = false;
        self.time_left = self.duration;
    }

    pub fn update(&mut self, time: FrameTime, sprite: &mut SpriteState) {
        if !self.is_running() {
            return;
        }
        if self.running {
            self.time_left -= time.delta;
            if self.time_left <= 0.0 && self.duration > 0.0 {
                self.pause(sprite);
                self.just_finished = true;
                return;
            }
        }
        // Members may replace themselves during ticks, so walk a key snapshot
        let names: Vec<String> = self.members.keys().cloned().collect();
        for name in names {
            if let Some(member) = self.members.get_mut(&name) {
                if member.is_enabled() {
                    member.update(time, sprite);
                }
            }
        }
    }

    /// True exactly once after the set's own countdown expires
    pub fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.just_finished)
    }

    /// True exactly once after the named member finishes
    pub fn member_finished(&mut self, name: &str) -> bool {
        self.members
            .get_mut(name)
            .map(AnimationClip::take_finished)
            .unwrap_or(false)
    }

    /// A stopped copy with the same members, all in their fresh state
    pub fn fresh(&self) -> Self {
        let members = self
            .members
            .iter()
            .map(|(name, member)| (name.clone(), member.fresh()))
            .collect();
        Self {
            name: self.name.clone(),
            duration: self.duration,
            time_left: self.duration,
            running: false,
            just_finished: false,
            members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn tick(set: &mut AnimationSet, sprite: &mut SpriteState, delta: f32, total: f64) {
        set.update(FrameTime::new(delta, total), sprite);
    }

    #[test]
    fn test_add_replaces_same_name() {
        let mut set = AnimationSet::new("dying", 1.0);
        set.add(AnimationClip::shrink("effect", 1.0));
        set.add(AnimationClip::fade_out("effect", 2.0));
        assert_relative_eq!(set.get("effect").unwrap().duration(), 2.0);
    }

    #[test]
    fn test_running_while_any_member_runs() {
        let mut sprite = SpriteState::new(Vec2::splat(32.0));
        let mut set = AnimationSet::new("dying", 0.0);
        set.add(AnimationClip::shrink("shrink", 0.2));
        set.add(AnimationClip::fade_out("fade", 1.0));
        set.initialize(&sprite);
        set.start();
        // The header has no cutoff of its own, so pause it right away
        set.running = false;

        tick(&mut set, &mut sprite, 0.5, 0.5);
        assert!(set.member_finished("shrink"));
        assert!(set.is_running());

        tick(&mut set, &mut sprite, 1.0, 1.5);
        assert!(set.member_finished("fade"));
        assert!(!set.is_running());
    }

    #[test]
    fn test_own_cutoff_pauses_members() {
        let mut sprite = SpriteState::new(Vec2::splat(32.0));
        let mut set = AnimationSet::new("dying", 0.5);
        set.add(AnimationClip::spin("spin", 0.0, 1.0, Vec2::splat(16.0)));
        set.initialize(&sprite);
        set.start();

        tick(&mut set, &mut sprite, 0.3, 0.3);
        assert!(set.is_running());
        tick(&mut set, &mut sprite, 0.3, 0.6);
        assert!(!set.is_running());
        assert!(set.take_finished());
        assert!(!set.take_finished());
    }

    #[test]
    fn test_set_duration_propagates_when_stopped() {
        let mut set = AnimationSet::new("dying", 1.0);
        set.add(AnimationClip::shrink("shrink", 1.0));
        set.set_duration(2.5);
        assert_relative_eq!(set.duration(), 2.5);
        assert_relative_eq!(set.get("shrink").unwrap().duration(), 2.5);
    }

    #[test]
    fn test_set_duration_ignored_while_running() {
        let mut set = AnimationSet::new("dying", 1.0);
        set.add(AnimationClip::shrink("shrink", 1.0));
        set.start();
        set.set_duration(2.5);
        assert_relative_eq!(set.duration(), 1.0);
    }

    #[test]
    fn test_fresh_copy_independent_of_original() {
        let mut sprite = SpriteState::new(Vec2::splat(32.0));
        let mut original = AnimationSet::new("dying", 1.0);
        original.add(AnimationClip::shrink("shrink", 1.0));
        original.initialize(&sprite);
        original.start();
        tick(&mut original, &mut sprite, 0.4, 0.4);

        let mut copy = original.fresh();
        assert!(!copy.is_running());
        assert_relative_eq!(copy.get("shrink").unwrap().time_left(), 1.0);

        copy.start();
        tick(&mut copy, &mut sprite, 0.2, 0.6);
        assert_relative_eq!(original.get("shrink").unwrap().time_left(), 0.6);
    }
}
