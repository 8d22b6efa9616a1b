// Stage session
//
// A stage owns the whole simulation for one level: the scene, the
// animation catalog, formations, player ships and the mothership.
// Each update runs formation movement, then every entity in id order,
// then routes the frame's events to score and lifecycle bookkeeping.

use crate::core::time::FrameTime;
use crate::engine::animation::{AnimationCatalog, AnimationClip, AnimationSet};
use crate::engine::audio::SoundPlayer;
use crate::engine::scene::{EntityId, Scene};
use crate::game::collision::CollisionResolver;
use crate::game::entities::{
    mothership, spaceship, spaceship::ShipCommand, Entity, EntityKind, UpdateCtx, ENEMY_DYING,
    MOTHERSHIP_ATTACKED, SPACESHIP_ATTACKED, SPACESHIP_DYING,
};
use crate::game::events::{EventQueue, GameEvent};
use crate::game::formation::{BarrierRow, EnemyGrid};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

/// Vertical lane the mothership crosses in
const MOTHERSHIP_LANE: f32 = 40.0;

const ENEMY_DYING_DURATION: f32 = 1.7;
const ENEMY_DYING_REVOLUTIONS: f32 = 5.0;
const SPACESHIP_ATTACKED_DURATION: f32 = 2.0;
const SPACESHIP_BLINKS_PER_SECOND: f32 = 8.0;
const SPACESHIP_DYING_DURATION: f32 = 2.6;
const SPACESHIP_DYING_REVOLUTIONS: f32 = 6.0;
const MOTHERSHIP_ATTACKED_DURATION: f32 = 3.0;
const MOTHERSHIP_BLINKS_PER_SECOND: f32 = 15.0;
/// Common spin anchor for 32px sprites
const SPIN_ORIGIN: Vec2 = Vec2::new(16.0, 16.0);

#[derive(Debug, Error)]
pub enum StageError {
    #[error("player count must be between 1 and 2, got {0}")]
    InvalidPlayers(usize),
    #[error("playfield {0}x{1} is too small for the level layout")]
    BoundsTooSmall(f32, f32),
}

#[derive(Debug, Clone)]
pub struct StageConfig {
    pub level: u32,
    pub players: usize,
    pub bounds: Vec2,
    pub seed: u64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            level: 1,
            players: 1,
            bounds: Vec2::new(800.0, 600.0),
            seed: 0,
        }
    }
}

pub struct Stage {
    scene: Scene,
    resolver: CollisionResolver,
    catalog: AnimationCatalog,
    events: EventQueue,
    rng: StdRng,
    sounds: Box<dyn SoundPlayer>,
    grid: EnemyGrid,
    barriers: BarrierRow,
    ships: Vec<EntityId>,
    mothership: EntityId,
    bounds: Vec2,
    level: u32,
    over: bool,
}

impl Stage {
    pub fn new(config: StageConfig, sounds: Box<dyn SoundPlayer>) -> Result<Self, StageError> {
        if config.players == 0 || config.players > 2 {
            return Err(StageError::InvalidPlayers(config.players));
        }
        let cols = 9.0 + config.level as f32;
        if config.bounds.x < cols * 32.0 * 1.6 + 64.0 || config.bounds.y < 300.0 {
            return Err(StageError::BoundsTooSmall(config.bounds.x, config.bounds.y));
        }

        let mut scene = Scene::new();
        let grid = EnemyGrid::spawn(&mut scene, config.level);
        let barriers = BarrierRow::spawn(
            &mut scene,
            config.level,
            config.bounds,
            config.bounds.y - 96.0,
        );

        let mut ships = Vec::with_capacity(config.players);
        for index in 0..config.players {
            let id = scene.insert(spaceship::spawn(index));
            if let Some(entity) = scene.get_mut(id) {
                entity
                    .sprite
                    .set_zero_point(Vec2::new(0.0, config.bounds.y - 48.0));
            }
            ships.push(id);
        }

        let mothership = scene.insert(mothership::spawn());
        if let Some(entity) = scene.get_mut(mothership) {
            entity
                .sprite
                .set_zero_point(Vec2::new(0.0, MOTHERSHIP_LANE));
        }

        let mut resolver = CollisionResolver::new();
        for id in scene.drain_added() {
            if let Some(entity) = scene.get(id) {
                resolver.track(entity);
            }
        }

        Ok(Self {
            scene,
            resolver,
            catalog: build_catalog(),
            events: EventQueue::new(),
            rng: StdRng::seed_from_u64(config.seed),
            sounds,
            grid,
            barriers,
            ships,
            mothership,
            bounds: config.bounds,
            level: config.level,
            over: false,
        })
    }

    /// Set a ship's control input for the coming update
    pub fn command(&mut self, ship_index: usize, command: ShipCommand) {
        let Some(&id) = self.ships.get(ship_index) else {
            return;
        };
        if let Some(entity) = self.scene.get_mut(id) {
            if let EntityKind::Spaceship(state) = &mut entity.kind {
                state.command = command;
            }
        }
    }

    /// Run one fixed simulation step and report what happened
    pub fn update(&mut self, time: FrameTime) -> Vec<GameEvent> {
        if self.over {
            return Vec::new();
        }
        let defense_line = self.bounds.y - 48.0;
        self.grid.update(
            time,
            self.bounds,
            defense_line,
            &mut self.scene,
            &mut self.events,
        );
        self.barriers.update(time, &mut self.scene);

        let alive = self.grid.alive();
        for id in self.scene.ids() {
            let Some(mut entity) = self.scene.take(id) else {
                continue;
            };
            let mut ctx = UpdateCtx {
                time,
                bounds: self.bounds,
                alive_enemies: alive,
                scene: &mut self.scene,
                resolver: &self.resolver,
                catalog: &self.catalog,
                sounds: self.sounds.as_mut(),
                events: &mut self.events,
                rng: &mut self.rng,
            };
            entity.update(&mut ctx);
            self.scene.put_back(entity);
        }
        self.scene.sweep();

        let removed = self.scene.drain_removed();
        for &id in &removed {
            self.resolver.untrack(id);
        }
        for id in self.scene.drain_added() {
            if let Some(entity) = self.scene.get(id) {
                self.resolver.track(entity);
            }
        }
        if !removed.is_empty() {
            for id in self.scene.ids() {
                if let Some(entity) = self.scene.get_mut(id) {
                    entity.notify_removed(&removed);
                }
            }
        }

        let mut frame_events = self.events.drain();
        for &event in &frame_events {
            match event {
                GameEvent::Score { ship, delta } => {
                    if let Some(entity) = self.scene.get_mut(ship) {
                        if let EntityKind::Spaceship(state) = &mut entity.kind {
                            state.score = (state.score + delta).max(0);
                        }
                    }
                }
                GameEvent::Killed(id) => {
                    self.grid.on_killed(id, &mut self.events);
                }
                GameEvent::OutOfSouls(id) if self.ships.contains(&id) => {
                    self.over = true;
                }
                GameEvent::EnemiesReachedBottom => {
                    self.over = true;
                }
                GameEvent::AllEnemiesDead => {
                    self.over = true;
                }
                _ => {}
            }
        }
        // Formation bookkeeping may have raised follow-up events
        let follow_ups = self.events.drain();
        for event in &follow_ups {
            if matches!(event, GameEvent::AllEnemiesDead) {
                self.over = true;
            }
        }
        frame_events.extend(follow_ups);
        frame_events
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn alive_enemies(&self) -> usize {
        self.grid.alive()
    }

    pub fn score(&self, ship_index: usize) -> i32 {
        self.ships
            .get(ship_index)
            .and_then(|id| self.scene.get(*id))
            .and_then(|entity| match &entity.kind {
                EntityKind::Spaceship(state) => Some(state.score),
                _ => None,
            })
            .unwrap_or(0)
    }

    pub fn souls(&self, ship_index: usize) -> i32 {
        self.ships
            .get(ship_index)
            .and_then(|id| self.scene.get(*id))
            .and_then(|entity| entity.combat.as_ref().map(|combat| combat.souls))
            .unwrap_or(0)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn mothership(&self) -> Option<&Entity> {
        self.scene.get(self.mothership)
    }
}

fn build_catalog() -> AnimationCatalog {
    let mut catalog = AnimationCatalog::new();

    let mut enemy_dying = AnimationSet::new(ENEMY_DYING, ENEMY_DYING_DURATION);
    enemy_dying.add(AnimationClip::spin(
        "spin",
        ENEMY_DYING_DURATION,
        ENEMY_DYING_REVOLUTIONS / ENEMY_DYING_DURATION,
        SPIN_ORIGIN,
    ));
    enemy_dying.add(AnimationClip::shrink("shrink", ENEMY_DYING_DURATION));
    catalog.register(enemy_dying);

    let mut ship_attacked = AnimationSet::new(SPACESHIP_ATTACKED, SPACESHIP_ATTACKED_DURATION);
    ship_attacked.add(AnimationClip::blink(
        "blink",
        SPACESHIP_ATTACKED_DURATION,
        SPACESHIP_BLINKS_PER_SECOND,
        true,
    ));
    catalog.register(ship_attacked);

    let mut ship_dying = AnimationSet::new(SPACESHIP_DYING, SPACESHIP_DYING_DURATION);
    ship_dying.add(AnimationClip::spin(
        "spin",
        SPACESHIP_DYING_DURATION,
        SPACESHIP_DYING_REVOLUTIONS / SPACESHIP_DYING_DURATION,
        SPIN_ORIGIN,
    ));
    ship_dying.add(AnimationClip::fade_out("fade", SPACESHIP_DYING_DURATION));
    catalog.register(ship_dying);

    let mut mothership_attacked =
        AnimationSet::new(MOTHERSHIP_ATTACKED, MOTHERSHIP_ATTACKED_DURATION);
    mothership_attacked.add(AnimationClip::shrink("shrink", MOTHERSHIP_ATTACKED_DURATION));
    mothership_attacked.add(AnimationClip::blink(
        "blink",
        MOTHERSHIP_ATTACKED_DURATION,
        MOTHERSHIP_BLINKS_PER_SECOND,
        false,
    ));
    mothership_attacked.add(AnimationClip::fade_out(
        "fade",
        MOTHERSHIP_ATTACKED_DURATION,
    ));
    catalog.register(mothership_attacked);

    catalog
}
