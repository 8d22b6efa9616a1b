// Player spaceship
//
// Steering and firing come in as a command that the owning session
// sets each frame. Getting hit resets the ship to the left edge,
// costs score, and plays a blink reaction that doubles as
// invulnerability; on the last soul the reaction becomes the death
// throes.

use crate::engine::audio::Sound;
use crate::engine::scene::EntityId;
use crate::engine::sprite::SpriteState;
use crate::engine::texture::PixelBuffer;
use crate::game::combat::Combat;
use crate::game::shooter::Shooter;
use crate::game::team::{HurtPolicy, Team};
use glam::Vec2;

use super::{bullet, Entity, EntityKind, UpdateCtx, SPACESHIP_ATTACKED};

pub const SPACESHIP_SIZE: Vec2 = Vec2::new(32.0, 32.0);
pub const SPACESHIP_SPEED: f32 = 140.0;
pub const SPACESHIP_SOULS: i32 = 3;
/// Score lost on every hit
pub const HIT_PENALTY: i32 = -600;

const SHOOTER_CAPACITY: usize = 2;
const SHOT_INTERVAL: f32 = 0.5;

const HULL_COLOR: crate::engine::texture::Color = [64, 220, 64, 255];

/// Per-frame control input
#[derive(Debug, Clone, Copy, Default)]
pub struct ShipCommand {
    /// Horizontal steering in [-1, 1]
    pub steer: f32,
    pub fire: bool,
}

#[derive(Debug, Clone)]
pub struct SpaceshipState {
    pub ship_index: usize,
    pub score: i32,
    pub shooter: Shooter,
    pub command: ShipCommand,
}

/// A fresh ship for the given player slot
pub fn spawn(ship_index: usize) -> Entity {
    let state = SpaceshipState {
        ship_index,
        score: 0,
        shooter: Shooter::new(SHOOTER_CAPACITY, SHOT_INTERVAL),
        command: ShipCommand::default(),
    };
    Entity::new(
        EntityKind::Spaceship(state),
        SpriteState::new(SPACESHIP_SIZE),
        PixelBuffer::solid(
            SPACESHIP_SIZE.x as u32,
            SPACESHIP_SIZE.y as u32,
            HULL_COLOR,
        ),
    )
    .with_combat(
        Combat::new(
            Team::Player,
            SPACESHIP_SOULS,
            HurtPolicy::ATTACK | HurtPolicy::TOUCH,
        )
        .with_sound(Sound::LifeDie),
    )
    .with_exit_clip(SPACESHIP_ATTACKED)
}

pub(super) fn tick(
    state: &mut SpaceshipState,
    id: EntityId,
    sprite: &mut SpriteState,
    animating: bool,
    ctx: &mut UpdateCtx,
) {
    let command = std::mem::take(&mut state.command);
    if animating {
        return;
    }
    sprite.local.x += command.steer.clamp(-1.0, 1.0) * SPACESHIP_SPEED * ctx.time.delta;
    let max_x = ctx.bounds.x - sprite.size.x;
    sprite.local.x = sprite.local.x.clamp(0.0, max_x);

    if command.fire {
        let muzzle = sprite.current_location()
            + Vec2::new(
                sprite.size.x / 2.0 - bullet::BULLET_SIZE.x / 2.0,
                -bullet::BULLET_SIZE.y,
            );
        let shot = ctx.scene.insert(bullet::spawn_player(id, muzzle));
        if state.shooter.shoot(ctx.time.total, shot) {
            ctx.sounds.play(Sound::ShipGunShot);
        } else {
            ctx.scene.discard(shot);
        }
    }
}
