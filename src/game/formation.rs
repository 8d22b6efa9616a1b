// Formations
//
// The marching grid owns enemy movement: enemies only know how to
// shoot, the grid repositions them as one block through their zero
// points. The barrier row does the same for barriers, swaying them
// side to side on higher levels.

use crate::core::time::FrameTime;
use crate::engine::scene::{EntityId, Scene};
use crate::game::entities::enemy::{self, ENEMY_SIZE};
use crate::game::entities::barrier::{self, BARRIER_SIZE};
use crate::game::events::{EventQueue, GameEvent};
use glam::Vec2;

/// Horizontal and vertical spacing between grid cells
const CELL_PITCH: f32 = ENEMY_SIZE.x * 1.6;
/// Pixels covered by a single jump
const JUMP_DISTANCE: f32 = ENEMY_SIZE.x / 2.0;
const BASE_JUMPS_PER_SECOND: f32 = 2.0;
/// Speed gain on every descent
const DESCENT_SPEEDUP: f32 = 1.05;
/// Speed gain per five kills
const KILL_SPEEDUP: f32 = 1.03;
const KILLS_PER_SPEEDUP: usize = 5;

pub const GRID_ROWS: usize = 5;
/// Kill values per row kind, top row first
const ROW_SCORES: [i32; 3] = [300, 200, 70];
/// Extra kill value per level beyond the first
const LEVEL_SCORE_BONUS: i32 = 100;

/// Marching enemy matrix
#[derive(Debug)]
pub struct EnemyGrid {
    ids: Vec<Vec<Option<EntityId>>>,
    base: Vec2,
    direction: f32,
    jumps_per_second: f32,
    last_jump: f64,
    first_col: usize,
    last_col: usize,
    last_row: usize,
    total_dead: usize,
    frozen: bool,
    cleared: bool,
}

impl EnemyGrid {
    /// Spawn a full grid for the given level into the scene
    pub fn spawn(scene: &mut Scene, level: u32) -> Self {
        let cols = 9 + level as usize;
        let bonus = LEVEL_SCORE_BONUS * (level as i32 - 1).max(0);
        let mut ids = Vec::with_capacity(GRID_ROWS);
        for row in 0..GRID_ROWS {
            let kind = row_kind(row);
            let score = ROW_SCORES[kind] + bonus;
            let mut row_ids = Vec::with_capacity(cols);
            for _ in 0..cols {
                row_ids.push(Some(scene.insert(enemy::spawn(kind, score))));
            }
            ids.push(row_ids);
        }
        let grid = Self {
            ids,
            base: Vec2::new(0.0, ENEMY_SIZE.y * 3.0),
            direction: 1.0,
            jumps_per_second: BASE_JUMPS_PER_SECOND,
            last_jump: 0.0,
            first_col: 0,
            last_col: cols - 1,
            last_row: GRID_ROWS - 1,
            total_dead: 0,
            frozen: false,
            cleared: false,
        };
        grid.place(scene);
        grid
    }

    pub fn alive(&self) -> usize {
        self.ids
            .iter()
            .flatten()
            .filter(|slot| slot.is_some())
            .count()
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Advance the march and reposition every live enemy
    pub fn update(
        &mut self,
        time: FrameTime,
        bounds: Vec2,
        defense_line: f32,
        scene: &mut Scene,
        events: &mut EventQueue,
    ) {
        if self.frozen || self.cleared {
            return;
        }
        if time.total - self.last_jump < f64::from(1.0 / self.jumps_per_second) {
            return;
        }
        self.last_jump = time.total;

        let left_edge = self.base.x + self.first_col as f32 * CELL_PITCH;
        let right_edge = self.base.x + self.last_col as f32 * CELL_PITCH + ENEMY_SIZE.x;
        let blocked = if self.direction > 0.0 {
            right_edge + JUMP_DISTANCE > bounds.x
        } else {
            left_edge - JUMP_DISTANCE < 0.0
        };
        if blocked {
            self.base.y += JUMP_DISTANCE;
            self.direction = -self.direction;
            self.jumps_per_second *= DESCENT_SPEEDUP;
        } else {
            self.base.x += self.direction * JUMP_DISTANCE;
        }
        self.place(scene);

        let lowest = self.base.y + self.last_row as f32 * CELL_PITCH + ENEMY_SIZE.y;
        if lowest >= defense_line {
            self.frozen = true;
            events.push(GameEvent::EnemiesReachedBottom);
        }
    }

    /// Drop a killed enemy out of the formation
    pub fn on_killed(&mut self, id: EntityId, events: &mut EventQueue) {
        let mut found = false;
        for row in &mut self.ids {
            for slot in row.iter_mut() {
                if *slot == Some(id) {
                    *slot = None;
                    found = true;
                }
            }
        }
        if !found {
            return;
        }
        self.total_dead += 1;
        if self.total_dead % KILLS_PER_SPEEDUP == 0 {
            self.jumps_per_second *= KILL_SPEEDUP;
        }
        self.shrink_bounds();
        if self.alive() == 0 && !self.cleared {
            self.cleared = true;
            events.push(GameEvent::AllEnemiesDead);
        }
    }

    fn place(&self, scene: &mut Scene) {
        for (row, row_ids) in self.ids.iter().enumerate() {
            for (col, slot) in row_ids.iter().enumerate() {
                let Some(id) = slot else { continue };
                if let Some(entity) = scene.get_mut(*id) {
                    entity.sprite.set_zero_point(
                        self.base + Vec2::new(col as f32, row as f32) * CELL_PITCH,
                    );
                }
            }
        }
    }

    fn shrink_bounds(&mut self) {
        let live_cols: Vec<usize> = (0..self.ids[0].len())
            .filter(|col| self.ids.iter().any(|row| row[*col].is_some()))
            .collect();
        if let (Some(first), Some(last)) = (live_cols.first(), live_cols.last()) {
            self.first_col = *first;
            self.last_col = *last;
        }
        if let Some(last_row) = (0..self.ids.len())
            .rev()
            .find(|row| self.ids[*row].iter().any(Option::is_some))
        {
            self.last_row = last_row;
        }
    }
}

fn row_kind(row: usize) -> usize {
    match row {
        0 => 0,
        1 | 2 => 1,
        _ => 2,
    }
}

/// Spacing between barrier centers, relative to barrier width
const BARRIER_SPACING: f32 = 2.3;
const BARRIER_COUNT: usize = 4;
/// Sway amplitude in pixels
const SWAY_LIMIT: f32 = BARRIER_SIZE.x / 2.0;
const BASE_SWAY_SPEED: f32 = 35.0;
/// Sway speed gain per level beyond the first
const SWAY_LEVEL_GAIN: f32 = 0.06;

/// Defensive barrier line; static on level one, swaying afterwards
#[derive(Debug)]
pub struct BarrierRow {
    ids: Vec<EntityId>,
    home: Vec2,
    offset: f32,
    direction: f32,
    speed: f32,
}

impl BarrierRow {
    pub fn spawn(scene: &mut Scene, level: u32, bounds: Vec2, line_y: f32) -> Self {
        let span = (BARRIER_COUNT - 1) as f32 * BARRIER_SIZE.x * BARRIER_SPACING + BARRIER_SIZE.x;
        let home = Vec2::new((bounds.x - span) / 2.0, line_y);
        let mut ids = Vec::with_capacity(BARRIER_COUNT);
        for slot in 0..BARRIER_COUNT {
            let id = scene.insert(barrier::spawn());
            if let Some(entity) = scene.get_mut(id) {
                entity.sprite.set_zero_point(
                    home + Vec2::new(slot as f32 * BARRIER_SIZE.x * BARRIER_SPACING, 0.0),
                );
            }
            ids.push(id);
        }
        let speed = if level <= 1 {
            0.0
        } else {
            (1.0 + (level as f32 - 1.0) * SWAY_LEVEL_GAIN) * BASE_SWAY_SPEED
        };
        Self {
            ids,
            home,
            offset: 0.0,
            direction: 1.0,
            speed,
        }
    }

    pub fn update(&mut self, time: FrameTime, scene: &mut Scene) {
        if self.speed == 0.0 {
            return;
        }
        self.offset += self.direction * self.speed * time.delta;
        if self.offset.abs() > SWAY_LIMIT {
            self.offset = self.offset.clamp(-SWAY_LIMIT, SWAY_LIMIT);
            self.direction = -self.direction;
        }
        for (slot, id) in self.ids.iter().enumerate() {
            if let Some(entity) = scene.get_mut(*id) {
                entity.sprite.set_zero_point(
                    self.home
                        + Vec2::new(
                            slot as f32 * BARRIER_SIZE.x * BARRIER_SPACING + self.offset,
                            0.0,
                        ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(delta: f32, total: f64) -> FrameTime {
        FrameTime::new(delta, total)
    }

    #[test]
    fn test_grid_spawns_level_sized_matrix() {
        let mut scene = Scene::new();
        let grid = EnemyGrid::spawn(&mut scene, 1);
        assert_eq!(grid.alive(), GRID_ROWS * 10);
        assert_eq!(scene.len(), GRID_ROWS * 10);

        let mut scene = Scene::new();
        let grid = EnemyGrid::spawn(&mut scene, 3);
        assert_eq!(grid.alive(), GRID_ROWS * 12);
    }

    #[test]
    fn test_grid_marches_sideways() {
        let mut scene = Scene::new();
        let mut grid = EnemyGrid::spawn(&mut scene, 1);
        let mut events = EventQueue::new();
        let bounds = Vec2::new(1000.0, 600.0);
        let first = grid.ids[0][0].unwrap();
        let start_x = scene.get(first).unwrap().sprite.zero_point.x;

        grid.update(frame(0.5, 0.5), bounds, 550.0, &mut scene, &mut events);
        let after = scene.get(first).unwrap().sprite.zero_point.x;
        assert_relative_eq!(after - start_x, JUMP_DISTANCE);
    }

    #[test]
    fn test_grid_descends_at_wall_and_flips() {
        let mut scene = Scene::new();
        let mut grid = EnemyGrid::spawn(&mut scene, 1);
        let mut events = EventQueue::new();
        // Playfield barely wider than the grid, so the first jump is blocked
        let span = 9.0 * CELL_PITCH + ENEMY_SIZE.x;
        let bounds = Vec2::new(span + 4.0, 600.0);
        let start_y = grid.base.y;

        grid.update(frame(0.5, 0.5), bounds, 550.0, &mut scene, &mut events);
        assert_relative_eq!(grid.base.y, start_y + JUMP_DISTANCE);
        assert!(grid.direction < 0.0);
        assert!(grid.jumps_per_second > BASE_JUMPS_PER_SECOND);
    }

    #[test]
    fn test_reaching_defense_line_freezes_grid() {
        let mut scene = Scene::new();
        let mut grid = EnemyGrid::spawn(&mut scene, 1);
        let mut events = EventQueue::new();
        let bounds = Vec2::new(1000.0, 600.0);
        // Defense line already inside the grid's lowest row
        grid.update(frame(0.5, 0.5), bounds, 100.0, &mut scene, &mut events);
        assert!(events.drain().contains(&GameEvent::EnemiesReachedBottom));

        let base = grid.base;
        grid.update(frame(0.5, 10.0), bounds, 100.0, &mut scene, &mut events);
        assert_eq!(grid.base, base);
    }

    #[test]
    fn test_kills_speed_up_and_clear_the_grid() {
        let mut scene = Scene::new();
        let mut grid = EnemyGrid::spawn(&mut scene, 1);
        let mut events = EventQueue::new();
        let all: Vec<EntityId> = grid.ids.iter().flatten().flatten().copied().collect();

        for (count, id) in all.iter().enumerate() {
            grid.on_killed(*id, &mut events);
            if count == KILLS_PER_SPEEDUP - 1 {
                assert!(grid.jumps_per_second > BASE_JUMPS_PER_SECOND);
            }
        }
        assert!(grid.is_cleared());
        assert!(events.drain().contains(&GameEvent::AllEnemiesDead));
    }

    #[test]
    fn test_bounds_shrink_when_edge_column_dies() {
        let mut scene = Scene::new();
        let mut grid = EnemyGrid::spawn(&mut scene, 1);
        let mut events = EventQueue::new();
        for row in 0..GRID_ROWS {
            let id = grid.ids[row][0].unwrap();
            grid.on_killed(id, &mut events);
        }
        assert_eq!(grid.first_col, 1);
    }

    #[test]
    fn test_barrier_row_static_on_level_one() {
        let mut scene = Scene::new();
        let mut row = BarrierRow::spawn(&mut scene, 1, Vec2::new(640.0, 480.0), 380.0);
        let first = row.ids[0];
        let before = scene.get(first).unwrap().sprite.zero_point;
        row.update(frame(1.0, 1.0), &mut scene);
        assert_eq!(scene.get(first).unwrap().sprite.zero_point, before);
    }

    #[test]
    fn test_barrier_row_sways_within_limit() {
        let mut scene = Scene::new();
        let mut row = BarrierRow::spawn(&mut scene, 2, Vec2::new(640.0, 480.0), 380.0);
        let first = row.ids[0];
        let home_x = scene.get(first).unwrap().sprite.zero_point.x;

        let mut max_offset: f32 = 0.0;
        for step in 0..600 {
            row.update(frame(0.016, f64::from(step) * 0.016), &mut scene);
            let x = scene.get(first).unwrap().sprite.zero_point.x;
            max_offset = max_offset.max((x - home_x).abs());
        }
        assert!(max_offset > 0.0);
        assert!(max_offset <= SWAY_LIMIT + 1e-3);
    }
}
