// Pixel-accurate collision
//
// A cheap bounding-rectangle test gates the per-pixel pass. The pixel
// pass walks the full overlap region and reports every candidate
// point, flagging a hit when some pair of pixels is opaque on both
// sides. Hurt reactions such as barrier erosion need the full point
// list, not just the first hit.

use crate::core::math::Rect;
use crate::engine::animation::AnimationCatalog;
use crate::engine::audio::SoundPlayer;
use crate::engine::scene::{EntityId, Scene};
use crate::engine::texture::{PixelBuffer, TRANSPARENT};
use crate::game::entities::{bullet, Entity};
use crate::game::events::EventQueue;
use glam::IVec2;
use rand::rngs::StdRng;

/// Test two placed pixel buffers for opaque overlap.
///
/// Returns whether any pixel pair is opaque on both sides, plus every
/// screen coordinate of the overlap region that falls inside both
/// buffers.
pub fn pixel_overlap(
    a_rect: Rect,
    a_pixels: &PixelBuffer,
    b_rect: Rect,
    b_pixels: &PixelBuffer,
) -> (bool, Vec<IVec2>) {
    if !a_rect.intersects(&b_rect) {
        return (false, Vec::new());
    }
    let overlap = a_rect.intersection(&b_rect);
    let mut hit = false;
    let mut points = Vec::new();
    for y in overlap.top()..overlap.bottom() {
        for x in overlap.left()..overlap.right() {
            let a = a_pixels.pixel(x - a_rect.left(), y - a_rect.top());
            let b = b_pixels.pixel(x - b_rect.left(), y - b_rect.top());
            let (Some(a), Some(b)) = (a, b) else {
                continue;
            };
            points.push(IVec2::new(x, y));
            if a != TRANSPARENT && b != TRANSPARENT {
                hit = true;
            }
        }
    }
    (hit, points)
}

/// Tracks every entity that can take damage and resolves contacts
/// against them on behalf of the entity currently updating.
#[derive(Debug, Default)]
pub struct CollisionResolver {
    hurtables: Vec<EntityId>,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an entity if it can take damage
    pub fn track(&mut self, entity: &Entity) {
        if entity.combat.is_some() && !self.hurtables.contains(&entity.id) {
            self.hurtables.push(entity.id);
        }
    }

    pub fn untrack(&mut self, id: EntityId) {
        self.hurtables.retain(|tracked| *tracked != id);
    }

    pub fn tracked(&self) -> &[EntityId] {
        &self.hurtables
    }

    /// Resolve contacts between the updating entity and every tracked
    /// hurtable still in the scene.
    ///
    /// An attacker subject damages hostile targets whose policy allows
    /// attack damage. A touch-sensitive subject takes damage itself
    /// from whatever it overlaps.
    #[allow(clippy::too_many_arguments)]
    pub fn check_and_act(
        &self,
        subject: &mut Entity,
        scene: &mut Scene,
        catalog: &AnimationCatalog,
        sounds: &mut dyn SoundPlayer,
        events: &mut EventQueue,
        rng: &mut StdRng,
    ) {
        for &target_id in &self.hurtables {
            if subject.despawned {
                break;
            }
            if target_id == subject.id {
                continue;
            }
            let Some(target) = scene.get_mut(target_id) else {
                continue;
            };
            if target.despawned || !target.sprite.visible {
                continue;
            }
            let Some(target_combat) = target.combat.as_ref() else {
                continue;
            };
            if target_combat.is_dead() {
                continue;
            }
            let (hit, points) = pixel_overlap(
                subject.shape_rect(),
                &subject.pixels,
                target.shape_rect(),
                &target.pixels,
            );
            if !hit {
                continue;
            }
            if subject.is_attacker() {
                if target_combat.policy.attack() && subject.team().hostile_to(target.team()) {
                    bullet::kill(subject, target, &points, catalog, sounds, events, rng);
                }
            } else if subject
                .combat
                .as_ref()
                .is_some_and(|combat| combat.policy.touch())
            {
                subject.got_hurt(target, &points, catalog, sounds, events);
            }
        }
    }
}
