// Combat state shared by everything that can take damage

use crate::engine::audio::Sound;
use crate::game::team::{HurtPolicy, Team};

#[derive(Debug, Clone)]
pub struct Combat {
    pub team: Team,
    /// Hits left before death
    pub souls: i32,
    pub policy: HurtPolicy,
    /// Points awarded to the attacker for a kill
    pub score_value: i32,
    /// Finite entities despawn on death instead of lingering hidden
    pub finite: bool,
    pub attacked_sound: Sound,
    /// Guards the killed notification so it fires once per death
    pub killed_fired: bool,
}

impl Combat {
    pub fn new(team: Team, souls: i32, policy: HurtPolicy) -> Self {
        Self {
            team,
            souls,
            policy,
            score_value: 0,
            finite: false,
            attacked_sound: Sound::BarrierHit,
            killed_fired: false,
        }
    }

    pub fn with_score(mut self, score_value: i32) -> Self {
        self.score_value = score_value;
        self
    }

    pub fn finite(mut self) -> Self {
        self.finite = true;
        self
    }

    pub fn with_sound(mut self, sound: Sound) -> Self {
        self.attacked_sound = sound;
        self
    }

    pub fn is_dead(&self) -> bool {
        self.souls <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_at_zero_souls() {
        let mut combat = Combat::new(Team::Enemy, 1, HurtPolicy::ATTACK);
        assert!(!combat.is_dead());
        combat.souls -= 1;
        assert!(combat.is_dead());
    }
}
