// Game entities
//
// Every object in the scene is an Entity: shared sprite, pixel buffer,
// animation and combat state, plus a kind payload for its behavior.
// Damage flows through `got_hurt`; a reaction animation named by
// `exit_clip` runs after a hit, and its finish drives the next
// lifecycle step (recover, hide, or despawn).

pub mod barrier;
pub mod bullet;
pub mod enemy;
pub mod mothership;
pub mod spaceship;

use crate::core::time::FrameTime;
use crate::engine::animation::{AnimationCatalog, AnimationSet};
use crate::engine::audio::SoundPlayer;
use crate::engine::scene::{EntityId, Scene};
use crate::engine::sprite::SpriteState;
use crate::engine::texture::PixelBuffer;
use crate::game::collision::CollisionResolver;
use crate::game::combat::Combat;
use crate::game::events::{EventQueue, GameEvent};
use crate::game::team::Team;
use glam::{IVec2, Vec2};
use rand::rngs::StdRng;

pub use bullet::BulletState;
pub use enemy::EnemyState;
pub use mothership::MothershipState;
pub use spaceship::SpaceshipState;

/// Reaction animation template names
pub const ENEMY_DYING: &str = "enemy_dying";
pub const SPACESHIP_ATTACKED: &str = "spaceship_attacked";
pub const SPACESHIP_DYING: &str = "spaceship_dying";
pub const MOTHERSHIP_ATTACKED: &str = "mothership_attacked";

/// Everything an entity may need while it updates.
///
/// The updating entity itself is taken out of the scene, so it can
/// spawn bullets and inspect other entities without aliasing.
pub struct UpdateCtx<'a> {
    pub time: FrameTime,
    /// Playfield size in pixels
    pub bounds: Vec2,
    pub alive_enemies: usize,
    pub scene: &'a mut Scene,
    pub resolver: &'a CollisionResolver,
    pub catalog: &'a AnimationCatalog,
    pub sounds: &'a mut dyn SoundPlayer,
    pub events: &'a mut EventQueue,
    pub rng: &'a mut StdRng,
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Spaceship(SpaceshipState),
    Enemy(EnemyState),
    Mothership(MothershipState),
    Barrier,
    Bullet(BulletState),
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub sprite: SpriteState,
    pub pixels: PixelBuffer,
    pub animation: AnimationSet,
    /// Animation member whose finish ends the current hit reaction
    pub exit_clip: Option<String>,
    pub combat: Option<Combat>,
    pub kind: EntityKind,
    pub despawned: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, sprite: SpriteState, pixels: PixelBuffer) -> Self {
        Self {
            id: EntityId(0),
            sprite,
            pixels,
            animation: AnimationSet::new("entity", 0.0),
            exit_clip: None,
            combat: None,
            kind,
            despawned: false,
        }
    }

    pub fn with_combat(mut self, combat: Combat) -> Self {
        self.combat = Some(combat);
        self
    }

    pub fn with_exit_clip(mut self, name: &str) -> Self {
        self.exit_clip = Some(name.to_string());
        self
    }

    pub fn team(&self) -> Team {
        match (&self.kind, &self.combat) {
            (EntityKind::Bullet(state), _) => state.team,
            (_, Some(combat)) => combat.team,
            _ => Team::None,
        }
    }

    pub fn is_attacker(&self) -> bool {
        matches!(self.kind, EntityKind::Bullet(_))
    }

    fn is_hurtable_bullet(&self) -> bool {
        matches!(&self.kind, EntityKind::Bullet(state) if state.hurtable)
    }

    fn touch_sensitive(&self) -> bool {
        self.combat
            .as_ref()
            .is_some_and(|combat| combat.policy.touch())
    }

    pub fn shape_rect(&self) -> crate::core::math::Rect {
        self.sprite.shape_rect()
    }

    pub fn update(&mut self, ctx: &mut UpdateCtx) {
        let animating = self.animation.is_running();
        if animating {
            self.animation.update(ctx.time, &mut self.sprite);
        }
        if let Some(exit) = self.exit_clip.clone() {
            if self.animation.member_finished(&exit) {
                self.turn_off_animation(ctx.catalog, ctx.events);
            }
        }
        if self.despawned {
            return;
        }
        let Entity {
            id,
            kind,
            sprite,
            combat,
            despawned,
            ..
        } = self;
        match kind {
            EntityKind::Bullet(state) => bullet::tick(state, *id, sprite, despawned, ctx),
            EntityKind::Spaceship(state) => spaceship::tick(state, *id, sprite, animating, ctx),
            EntityKind::Enemy(state) => enemy::tick(state, sprite, combat, ctx),
            EntityKind::Mothership(state) => mothership::tick(state, sprite, combat, animating, ctx),
            EntityKind::Barrier => {}
        }
        let alive = self.combat.as_ref().map_or(true, |combat| !combat.is_dead());
        if !self.despawned
            && self.sprite.visible
            && alive
            && (self.is_attacker() || self.touch_sensitive())
        {
            ctx.resolver.check_and_act(
                self,
                ctx.scene,
                ctx.catalog,
                ctx.sounds,
                ctx.events,
                ctx.rng,
            );
        }
    }

    /// React to contact with another entity.
    ///
    /// Hurtable bullets die to any contact and barriers lose pixels to
    /// it; everything else is hurt by attackers only, so plain touches
    /// pass through harmlessly.
    pub fn got_hurt(
        &mut self,
        source: &mut Entity,
        points: &[IVec2],
        catalog: &AnimationCatalog,
        sounds: &mut dyn SoundPlayer,
        events: &mut EventQueue,
    ) {
        if self.is_hurtable_bullet() {
            bullet::absorb_hit(self, events);
            return;
        }
        if matches!(self.kind, EntityKind::Barrier) {
            barrier::touched(self, source, points, sounds, events);
            return;
        }
        if !source.is_attacker() {
            return;
        }
        // The blink reaction doubles as invulnerability frames
        if matches!(self.kind, EntityKind::Spaceship(_)) && self.animation.is_running() {
            return;
        }
        self.attacked_by(source, catalog, sounds, events);
        if matches!(self.kind, EntityKind::Spaceship(_)) {
            let survived = self.combat.as_ref().is_some_and(|combat| !combat.is_dead());
            if survived {
                self.sprite.local.x = 0.0;
            }
            events.push(GameEvent::Score {
                ship: self.id,
                delta: spaceship::HIT_PENALTY,
            });
        }
    }

    /// Default hit reaction: lose a soul, start the reaction animation,
    /// and consume the attacking bullet.
    fn attacked_by(
        &mut self,
        source: &mut Entity,
        catalog: &AnimationCatalog,
        sounds: &mut dyn SoundPlayer,
        events: &mut EventQueue,
    ) {
        let (hostile, sound, value) = match &self.combat {
            Some(combat) => (
                source.team().hostile_to(combat.team),
                combat.attacked_sound,
                combat.score_value,
            ),
            None => return,
        };
        if !hostile {
            return;
        }
        sounds.play(sound);
        bullet::destroy(source, value, events);
        if let Some(combat) = &mut self.combat {
            combat.souls -= 1;
        }
        if let Some(exit) = self.exit_clip.clone() {
            if catalog.bind(&mut self.animation, &self.sprite, &exit, false, None) {
                if let Some(member) = self.animation.get_mut(&exit) {
                    member.start();
                }
            }
        }
        let dead = self.combat.as_ref().is_some_and(Combat::is_dead);
        if dead {
            if !self.animation.is_running() {
                self.sprite.visible = false;
            }
            if let Some(combat) = &mut self.combat {
                if !combat.killed_fired {
                    combat.killed_fired = true;
                    events.push(GameEvent::Killed(self.id));
                }
            }
            let finite = self.combat.as_ref().is_some_and(|combat| combat.finite);
            if finite && self.animation.is_empty() {
                self.despawned = true;
            }
        }
    }

    /// End the current reaction animation and advance the lifecycle
    pub fn turn_off_animation(&mut self, catalog: &AnimationCatalog, events: &mut EventQueue) {
        self.animation.reset(&mut self.sprite);
        let dead = self.combat.as_ref().is_some_and(Combat::is_dead);
        if dead {
            let finite = self.combat.as_ref().is_some_and(|combat| combat.finite);
            if finite {
                self.despawned = true;
            } else if matches!(self.kind, EntityKind::Mothership(_)) {
                self.sprite.visible = false;
            }
            if matches!(self.kind, EntityKind::Spaceship(_)) {
                events.push(GameEvent::OutOfSouls(self.id));
            }
            return;
        }
        let last_soul = self.combat.as_ref().is_some_and(|combat| combat.souls == 1);
        if last_soul && matches!(self.kind, EntityKind::Spaceship(_)) {
            // The next hit is lethal, so swap the reaction for the death throes
            catalog.bind(
                &mut self.animation,
                &self.sprite,
                SPACESHIP_DYING,
                true,
                None,
            );
            self.exit_clip = Some(SPACESHIP_DYING.to_string());
            if let Some(combat) = &mut self.combat {
                combat.finite = true;
            }
        }
    }

    /// Vacate shooter slots held by bullets removed this frame
    pub fn notify_removed(&mut self, removed: &[EntityId]) {
        let shooter = match &mut self.kind {
            EntityKind::Spaceship(state) => &mut state.shooter,
            EntityKind::Enemy(state) => &mut state.shooter,
            _ => return,
        };
        for &id in removed {
            shooter.release(id);
        }
    }

    #[cfg(test)]
    pub fn test_dummy(size: Vec2) -> Self {
        Self::new(
            EntityKind::Barrier,
            SpriteState::new(size),
            PixelBuffer::empty(size.x as u32, size.y as u32),
        )
    }
}
