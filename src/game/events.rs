// Game event queue
//
// Entities and formations push notifications here during the frame;
// the stage routes them after every entity has updated.

use crate::engine::scene::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// An entity lost its last soul, fired once per death
    Killed(EntityId),
    /// A ship's death reaction has fully played out
    OutOfSouls(EntityId),
    /// A bullet reached the end of its flight
    Arrived(EntityId),
    /// Score change for the owning ship
    Score { ship: EntityId, delta: i32 },
    /// The marching grid has no live enemies left
    AllEnemiesDead,
    /// The grid reached the defenders' line
    EnemiesReachedBottom,
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::AllEnemiesDead);
        assert_eq!(queue.drain(), vec![GameEvent::AllEnemiesDead]);
        assert!(queue.is_empty());
    }
}
