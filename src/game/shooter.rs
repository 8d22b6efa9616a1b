// Concurrent-fire limiter
//
// A shooter owns a fixed number of bullet slots and a fire interval
// shared across all slots. A shot succeeds only when the interval has
// elapsed and a slot is free; the slot is vacated when the bullet's
// removal is reported back.

use crate::engine::scene::EntityId;

#[derive(Debug, Clone)]
pub struct Shooter {
    slots: Vec<Option<EntityId>>,
    /// Minimum seconds between any two shots
    interval: f32,
    last_shot: f64,
}

impl Shooter {
    pub fn new(capacity: usize, interval: f32) -> Self {
        Self {
            slots: vec![None; capacity],
            interval,
            last_shot: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn live_bullets(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Try to claim a slot for a new bullet
    pub fn shoot(&mut self, now: f64, bullet: EntityId) -> bool {
        if now - self.last_shot < f64::from(self.interval) {
            return false;
        }
        for slot in &mut self.slots {
            if slot.is_none() {
                *slot = Some(bullet);
                self.last_shot = now;
                return true;
            }
        }
        false
    }

    /// Vacate the slot held by a removed bullet
    pub fn release(&mut self, bullet: EntityId) {
        for slot in &mut self.slots {
            if *slot == Some(bullet) {
                *slot = None;
            }
        }
    }
}
