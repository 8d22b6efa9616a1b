// Bullets
//
// Player bullets fly up, enemy bullets fly down. Player bullets are
// themselves hurtable, so an enemy shot can intercept them on the way;
// intercepting one has a 70% chance of consuming the enemy bullet too.

use crate::engine::animation::AnimationCatalog;
use crate::engine::audio::SoundPlayer;
use crate::engine::scene::EntityId;
use crate::engine::sprite::SpriteState;
use crate::engine::texture::PixelBuffer;
use crate::game::combat::Combat;
use crate::game::events::{EventQueue, GameEvent};
use crate::game::team::{HurtPolicy, Team};
use glam::{IVec2, Vec2};
use rand::rngs::StdRng;
use rand::Rng;

use super::{Entity, EntityKind, UpdateCtx};

pub const BULLET_SPEED: f32 = 140.0;
pub const BULLET_SIZE: Vec2 = Vec2::new(4.0, 8.0);

/// Chance that killing a hurtable bullet also consumes the attacker
const INTERCEPT_LOSS_CHANCE: f32 = 0.7;

const BULLET_COLOR: crate::engine::texture::Color = [255, 255, 255, 255];

#[derive(Debug, Clone)]
pub struct BulletState {
    pub team: Team,
    /// Ship credited with kills made by this bullet
    pub owner: Option<EntityId>,
    /// Hurtable bullets can be shot down themselves
    pub hurtable: bool,
}

impl BulletState {
    pub fn new(team: Team, owner: Option<EntityId>, hurtable: bool) -> Self {
        Self {
            team,
            owner,
            hurtable,
        }
    }
}

/// A player bullet fired by the given ship; hurtable, so enemy fire can
/// intercept it mid-flight
pub fn spawn_player(owner: EntityId, position: Vec2) -> Entity {
    Entity::new(
        EntityKind::Bullet(BulletState::new(Team::Player, Some(owner), true)),
        SpriteState::at(BULLET_SIZE, position),
        PixelBuffer::solid(BULLET_SIZE.x as u32, BULLET_SIZE.y as u32, BULLET_COLOR),
    )
    .with_combat(
        Combat::new(
            Team::Player,
            1,
            HurtPolicy::ATTACK | HurtPolicy::TOUCH,
        )
        .finite(),
    )
}

/// An enemy bullet
pub fn spawn_enemy(position: Vec2) -> Entity {
    Entity::new(
        EntityKind::Bullet(BulletState::new(Team::Enemy, None, false)),
        SpriteState::at(BULLET_SIZE, position),
        PixelBuffer::solid(BULLET_SIZE.x as u32, BULLET_SIZE.y as u32, BULLET_COLOR),
    )
}

pub(super) fn tick(
    state: &BulletState,
    id: EntityId,
    sprite: &mut SpriteState,
    despawned: &mut bool,
    ctx: &mut UpdateCtx,
) {
    let direction = match state.team {
        Team::Player => -1.0,
        _ => 1.0,
    };
    sprite.local.y += direction * BULLET_SPEED * ctx.time.delta;
    let rect = sprite.shape_rect();
    if rect.bottom() < 0 || rect.top() > ctx.bounds.y as i32 {
        *despawned = true;
        ctx.events.push(GameEvent::Arrived(id));
    }
}

/// Consume a bullet, crediting its owner with a score delta
pub fn destroy(entity: &mut Entity, score: i32, events: &mut EventQueue) {
    if entity.despawned {
        return;
    }
    entity.despawned = true;
    events.push(GameEvent::Arrived(entity.id));
    if score != 0 {
        if let EntityKind::Bullet(state) = &entity.kind {
            if let Some(owner) = state.owner {
                events.push(GameEvent::Score {
                    ship: owner,
                    delta: score,
                });
            }
        }
    }
}

/// A hurtable bullet dies silently to any contact
pub(super) fn absorb_hit(entity: &mut Entity, events: &mut EventQueue) {
    if entity.despawned {
        return;
    }
    if let Some(combat) = &mut entity.combat {
        combat.souls = 0;
        if !combat.killed_fired {
            combat.killed_fired = true;
            events.push(GameEvent::Killed(entity.id));
        }
    }
    destroy(entity, 0, events);
}

/// Resolve an attacker bullet hitting a hurtable target.
///
/// The target takes the hit; if it was a hurtable bullet, the attacker
/// is consumed with a 70% chance instead of flying on.
#[allow(clippy::too_many_arguments)]
pub fn kill(
    attacker: &mut Entity,
    target: &mut Entity,
    points: &[IVec2],
    catalog: &AnimationCatalog,
    sounds: &mut dyn SoundPlayer,
    events: &mut EventQueue,
    rng: &mut StdRng,
) {
    let intercepted_bullet = matches!(&target.kind, EntityKind::Bullet(state) if state.hurtable);
    target.got_hurt(attacker, points, catalog, sounds, events);
    if intercepted_bullet && rng.gen::<f32>() < INTERCEPT_LOSS_CHANCE {
        destroy(attacker, 0, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FrameTime;
    use crate::engine::audio::RecordingSoundPlayer;
    use crate::engine::scene::Scene;
    use crate::game::collision::CollisionResolver;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn ctx_parts() -> (Scene, CollisionResolver, AnimationCatalog, RecordingSoundPlayer, EventQueue, StdRng)
    {
        (
            Scene::new(),
            CollisionResolver::new(),
            AnimationCatalog::new(),
            RecordingSoundPlayer::default(),
            EventQueue::new(),
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_player_bullet_flies_up() {
        let (mut scene, resolver, catalog, mut sounds, mut events, mut rng) = ctx_parts();
        let mut bullet = spawn_player(EntityId(1), Vec2::new(50.0, 100.0));
        let mut ctx = UpdateCtx {
            time: FrameTime::new(0.5, 0.5),
            bounds: Vec2::new(320.0, 240.0),
            alive_enemies: 0,
            scene: &mut scene,
            resolver: &resolver,
            catalog: &catalog,
            sounds: &mut sounds,
            events: &mut events,
            rng: &mut rng,
        };
        bullet.update(&mut ctx);
        assert_relative_eq!(bullet.sprite.local.y, 100.0 - 0.5 * BULLET_SPEED);
        assert!(!bullet.despawned);
    }

    #[test]
    fn test_bullet_despawns_off_screen() {
        let (mut scene, resolver, catalog, mut sounds, mut events, mut rng) = ctx_parts();
        let mut bullet = spawn_player(EntityId(1), Vec2::new(50.0, 5.0));
        let mut ctx = UpdateCtx {
            time: FrameTime::new(0.5, 0.5),
            bounds: Vec2::new(320.0, 240.0),
            alive_enemies: 0,
            scene: &mut scene,
            resolver: &resolver,
            catalog: &catalog,
            sounds: &mut sounds,
            events: &mut events,
            rng: &mut rng,
        };
        bullet.update(&mut ctx);
        assert!(bullet.despawned);
        assert!(events
            .drain()
            .iter()
            .any(|event| matches!(event, GameEvent::Arrived(_))));
    }

    #[test]
    fn test_destroy_credits_owner_once() {
        let mut events = EventQueue::new();
        let mut bullet = spawn_player(EntityId(3), Vec2::ZERO);
        bullet.id = EntityId(9);
        destroy(&mut bullet, 300, &mut events);
        destroy(&mut bullet, 300, &mut events);
        let drained = events.drain();
        assert_eq!(
            drained,
            vec![
                GameEvent::Arrived(EntityId(9)),
                GameEvent::Score {
                    ship: EntityId(3),
                    delta: 300
                }
            ]
        );
    }

    #[test]
    fn test_intercepted_bullet_dies_and_fires_killed_once() {
        let (_, _, catalog, mut sounds, mut events, mut rng) = ctx_parts();
        let mut attacker = spawn_enemy(Vec2::ZERO);
        let mut target = spawn_player(EntityId(1), Vec2::ZERO);
        target.id = EntityId(5);

        kill(
            &mut attacker,
            &mut target,
            &[],
            &catalog,
            &mut sounds,
            &mut events,
            &mut rng,
        );
        assert!(target.despawned);
        let killed: Vec<_> = events
            .drain()
            .into_iter()
            .filter(|event| matches!(event, GameEvent::Killed(EntityId(5))))
            .collect();
        assert_eq!(killed.len(), 1);
    }
}
