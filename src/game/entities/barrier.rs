// Barriers
//
// A barrier never dodges and never shoots back; it just loses pixels.
// A bullet bite eats rows across the bullet's width starting from the
// barrier edge it came from, digging one row deeper for every row it
// finds already hollowed out. Plain contact only erases the touching
// pixels. A barrier with no opaque pixels left is gone for good.

use crate::core::math::Rect;
use crate::engine::audio::SoundPlayer;
use crate::engine::sprite::SpriteState;
use crate::engine::texture::PixelBuffer;
use crate::game::combat::Combat;
use crate::game::events::{EventQueue, GameEvent};
use crate::game::team::{HurtPolicy, Team};
use glam::{IVec2, Vec2};

use super::{bullet, Entity, EntityKind};

pub const BARRIER_SIZE: Vec2 = Vec2::new(44.0, 32.0);

/// Fraction of the attacker's height eaten per bite
const BITE_DEPTH: f32 = 0.35;

const WALL_COLOR: crate::engine::texture::Color = [64, 200, 64, 255];

/// A fresh, fully opaque barrier
pub fn spawn() -> Entity {
    Entity::new(
        EntityKind::Barrier,
        SpriteState::new(BARRIER_SIZE),
        PixelBuffer::solid(BARRIER_SIZE.x as u32, BARRIER_SIZE.y as u32, WALL_COLOR),
    )
    .with_combat(
        Combat::new(
            Team::None,
            i32::MAX,
            HurtPolicy::ATTACK | HurtPolicy::TOUCH,
        )
        .finite(),
    )
}

/// Take damage from an attacker's bite or a plain contact
pub(super) fn touched(
    entity: &mut Entity,
    source: &mut Entity,
    points: &[IVec2],
    sounds: &mut dyn SoundPlayer,
    events: &mut EventQueue,
) {
    if source.is_attacker() {
        bite(entity, source.shape_rect());
        if let Some(combat) = &entity.combat {
            sounds.play(combat.attacked_sound);
        }
        bullet::destroy(source, 0, events);
    } else {
        let rect = entity.sprite.shape_rect();
        for point in points {
            entity.pixels.erase(point.x - rect.left(), point.y - rect.top());
        }
    }
    check_death(entity, events);
}

/// Chew rows off the barrier across the attacker's horizontal span.
///
/// Eating starts at the edge row facing the attacker and works inward.
/// A row with nothing left to eat extends the bite one row deeper, so
/// a shot into a hollowed channel still removes fresh material.
fn bite(entity: &mut Entity, attacker: Rect) {
    let rect = entity.sprite.shape_rect();
    let min_x = (attacker.left() - rect.left()).clamp(0, rect.w);
    let max_x = (attacker.right() - rect.left()).clamp(0, rect.w);
    let from_below = attacker.top() > rect.top();
    let (start_y, step) = if from_below { (rect.h - 1, -1) } else { (0, 1) };

    let mut depth = (BITE_DEPTH * attacker.h as f32).ceil() as i32;
    let mut row = 0;
    while row < depth {
        let y = start_y + row * step;
        if y < 0 || y >= rect.h {
            break;
        }
        let mut consumed = false;
        for x in min_x..max_x {
            if entity.pixels.is_opaque(x, y) {
                entity.pixels.erase(x, y);
                consumed = true;
            }
        }
        if !consumed {
            depth += 1;
        }
        row += 1;
    }
}

fn check_death(entity: &mut Entity, events: &mut EventQueue) {
    if entity.pixels.opaque_count() > 0 {
        return;
    }
    if let Some(combat) = &mut entity.combat {
        combat.souls = 0;
        if !combat.killed_fired {
            combat.killed_fired = true;
            events.push(GameEvent::Killed(entity.id));
        }
    }
    entity.despawned = true;
}
