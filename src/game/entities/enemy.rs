// Grid enemies
//
// An enemy's movement belongs to the formation that owns it; the
// entity itself only handles firing. Each enemy carries a one-slot
// shooter and schedules its next shot randomly, spacing shots further
// apart while many enemies are still alive.

use crate::engine::audio::Sound;
use crate::engine::sprite::SpriteState;
use crate::engine::texture::PixelBuffer;
use crate::game::combat::Combat;
use crate::game::shooter::Shooter;
use crate::game::team::{HurtPolicy, Team};
use glam::Vec2;
use rand::Rng;

use super::{bullet, Entity, EntityKind, UpdateCtx, ENEMY_DYING};

pub const ENEMY_SIZE: Vec2 = Vec2::new(32.0, 32.0);

/// Base pause before an enemy may fire again
const SHOT_DELAY: f64 = 1.0;
/// Extra random pause per live enemy
const SHOT_JITTER_PER_ENEMY: f64 = 0.5;

const HULL_COLOR: crate::engine::texture::Color = [220, 220, 220, 255];

#[derive(Debug, Clone)]
pub struct EnemyState {
    /// Row kind, 0 is the top (most valuable) row
    pub index: usize,
    pub shooter: Shooter,
    /// Absolute time of the next allowed shot, 0.0 = not yet scheduled
    next_shot: f64,
}

/// A grid enemy of the given row kind and kill value
pub fn spawn(index: usize, score_value: i32) -> Entity {
    let state = EnemyState {
        index,
        shooter: Shooter::new(1, 0.0),
        next_shot: 0.0,
    };
    Entity::new(
        EntityKind::Enemy(state),
        SpriteState::new(ENEMY_SIZE),
        PixelBuffer::solid(ENEMY_SIZE.x as u32, ENEMY_SIZE.y as u32, HULL_COLOR),
    )
    .with_combat(
        Combat::new(Team::Enemy, 1, HurtPolicy::ATTACK)
            .with_score(score_value)
            .finite()
            .with_sound(Sound::EnemyKill),
    )
    .with_exit_clip(ENEMY_DYING)
}

pub(super) fn tick(
    state: &mut EnemyState,
    sprite: &mut SpriteState,
    combat: &mut Option<Combat>,
    ctx: &mut UpdateCtx,
) {
    if combat.as_ref().is_some_and(|combat| combat.is_dead()) || !sprite.visible {
        return;
    }
    let now = ctx.time.total;
    if state.next_shot == 0.0 {
        state.next_shot = now + next_delay(ctx);
        return;
    }
    if now < state.next_shot {
        return;
    }
    state.next_shot = now + next_delay(ctx);
    let muzzle = sprite.current_location()
        + Vec2::new(
            sprite.size.x / 2.0 - bullet::BULLET_SIZE.x / 2.0,
            sprite.size.y,
        );
    let shot = ctx.scene.insert(bullet::spawn_enemy(muzzle));
    if state.shooter.shoot(now, shot) {
        ctx.sounds.play(Sound::EnemyGunShot);
    } else {
        ctx.scene.discard(shot);
    }
}

fn next_delay(ctx: &mut UpdateCtx) -> f64 {
    SHOT_DELAY + ctx.rng.gen::<f64>() * SHOT_JITTER_PER_ENEMY * ctx.alive_enemies as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FrameTime;
    use crate::engine::animation::AnimationCatalog;
    use crate::engine::audio::RecordingSoundPlayer;
    use crate::engine::scene::Scene;
    use crate::game::collision::CollisionResolver;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn step(enemy: &mut Entity, scene: &mut Scene, total: f64, alive: usize) {
        let resolver = CollisionResolver::new();
        let catalog = AnimationCatalog::new();
        let mut sounds = RecordingSoundPlayer::default();
        let mut events = crate::game::events::EventQueue::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut ctx = UpdateCtx {
            time: FrameTime::new(0.016, total),
            bounds: Vec2::new(320.0, 240.0),
            alive_enemies: alive,
            scene,
            resolver: &resolver,
            catalog: &catalog,
            sounds: &mut sounds,
            events: &mut events,
            rng: &mut rng,
        };
        enemy.update(&mut ctx);
    }

    #[test]
    fn test_first_tick_only_schedules() {
        let mut scene = Scene::new();
        let mut enemy = spawn(0, 300);
        step(&mut enemy, &mut scene, 0.0, 10);
        assert!(scene.is_empty());
        if let EntityKind::Enemy(state) = &enemy.kind {
            assert!(state.next_shot >= SHOT_DELAY);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_fires_once_schedule_elapses() {
        let mut scene = Scene::new();
        let mut enemy = spawn(0, 300);
        step(&mut enemy, &mut scene, 0.0, 1);
        step(&mut enemy, &mut scene, 100.0, 1);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_one_slot_shooter_blocks_second_shot() {
        let mut scene = Scene::new();
        let mut enemy = spawn(0, 300);
        step(&mut enemy, &mut scene, 0.0, 1);
        step(&mut enemy, &mut scene, 100.0, 1);
        step(&mut enemy, &mut scene, 200.0, 1);
        // The first bullet never despawned, so its slot is still held
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_dead_enemy_never_fires() {
        let mut scene = Scene::new();
        let mut enemy = spawn(0, 300);
        if let Some(combat) = &mut enemy.combat {
            combat.souls = 0;
        }
        step(&mut enemy, &mut scene, 0.0, 1);
        step(&mut enemy, &mut scene, 100.0, 1);
        assert!(scene.is_empty());
    }
}
