// Sound triggering
//
// The core only requests sounds; actual playback lives behind the
// SoundPlayer trait so the simulation stays headless and testable.

/// Every sound effect the game can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    ShipGunShot,
    EnemyGunShot,
    EnemyKill,
    MothershipKill,
    BarrierHit,
    LifeDie,
}

/// Playback backend for sound requests
pub trait SoundPlayer {
    fn play(&mut self, sound: Sound);
}

/// Discards every request, for headless runs
#[derive(Debug, Default)]
pub struct NullSoundPlayer;

impl SoundPlayer for NullSoundPlayer {
    fn play(&mut self, _sound: Sound) {}
}

/// Records every request in order, for tests
#[derive(Debug, Default)]
pub struct RecordingSoundPlayer {
    pub played: Vec<Sound>,
}

impl SoundPlayer for RecordingSoundPlayer {
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }
}
