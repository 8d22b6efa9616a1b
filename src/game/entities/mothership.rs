// Mothership
//
// Crosses the top of the screen at fixed speed, worth a big bonus.
// It never despawns: off-screen or killed it goes invisible, waits a
// random delay, and re-enters from the left with a fresh soul.

use crate::engine::audio::Sound;
use crate::engine::sprite::SpriteState;
use crate::engine::texture::PixelBuffer;
use crate::game::combat::Combat;
use crate::game::team::{HurtPolicy, Team};
use glam::Vec2;
use rand::Rng;

use super::{Entity, EntityKind, UpdateCtx, MOTHERSHIP_ATTACKED};

pub const MOTHERSHIP_SIZE: Vec2 = Vec2::new(48.0, 24.0);
pub const MOTHERSHIP_SPEED: f32 = 95.0;
pub const MOTHERSHIP_SCORE: i32 = 600;

/// Minimum seconds between departures and re-entries
const SPAWN_DELAY_BASE: f64 = 5.0;
/// Random extra seconds on top of the base delay
const SPAWN_DELAY_JITTER: f64 = 10.0;

const HULL_COLOR: crate::engine::texture::Color = [220, 64, 64, 255];

#[derive(Debug, Clone)]
pub struct MothershipState {
    /// Absolute time of the next entry, None until scheduled
    next_spawn: Option<f64>,
}

/// A mothership waiting off-screen for its first pass
pub fn spawn() -> Entity {
    let mut entity = Entity::new(
        EntityKind::Mothership(MothershipState { next_spawn: None }),
        SpriteState::new(MOTHERSHIP_SIZE),
        PixelBuffer::solid(
            MOTHERSHIP_SIZE.x as u32,
            MOTHERSHIP_SIZE.y as u32,
            HULL_COLOR,
        ),
    )
    .with_combat(
        Combat::new(Team::Enemy, 1, HurtPolicy::ATTACK)
            .with_score(MOTHERSHIP_SCORE)
            .with_sound(Sound::MothershipKill),
    )
    .with_exit_clip(MOTHERSHIP_ATTACKED);
    entity.sprite.visible = false;
    entity
}

pub(super) fn tick(
    state: &mut MothershipState,
    sprite: &mut SpriteState,
    combat: &mut Option<Combat>,
    animating: bool,
    ctx: &mut UpdateCtx,
) {
    if sprite.visible {
        if animating {
            return;
        }
        sprite.local.x += MOTHERSHIP_SPEED * ctx.time.delta;
        if sprite.local.x > ctx.bounds.x {
            sprite.visible = false;
        }
        return;
    }
    match state.next_spawn {
        None => {
            state.next_spawn =
                Some(ctx.time.total + SPAWN_DELAY_BASE + ctx.rng.gen::<f64>() * SPAWN_DELAY_JITTER);
        }
        Some(at) if ctx.time.total >= at => {
            state.next_spawn = None;
            if let Some(combat) = combat {
                combat.souls = 1;
                combat.killed_fired = false;
            }
            sprite.local.x = -sprite.size.x;
            sprite.tint = 1.0;
            sprite.visible = true;
        }
        Some(_) => {}
    }
}
