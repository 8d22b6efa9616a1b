// Entity storage
//
// Entities are updated one at a time by taking them out of the scene,
// so an entity can freely spawn or inspect others while it runs. The
// scene records additions and removals for systems that track entities
// by id, like the collision resolver.

use crate::game::entities::Entity;
use std::collections::HashMap;

/// Stable entity handle, never reused within a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

#[derive(Debug, Default)]
pub struct Scene {
    entities: HashMap<u32, Entity>,
    next_id: u32,
    added: Vec<EntityId>,
    removed: Vec<EntityId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, assigning it a fresh id
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;
        self.entities.insert(id.0, entity);
        self.added.push(id);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id.0)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id.0)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id.0)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove an entity for exclusive mutation during its update
    pub fn take(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id.0)
    }

    /// Return a taken entity, or record its removal if it despawned
    pub fn put_back(&mut self, entity: Entity) {
        if entity.despawned {
            self.removed.push(entity.id);
        } else {
            self.entities.insert(entity.id.0, entity);
        }
    }

    /// Drop an entity added this frame as if it was never inserted
    pub fn discard(&mut self, id: EntityId) {
        self.entities.remove(&id.0);
        self.added.retain(|added| *added != id);
    }

    /// Remove every entity flagged as despawned
    pub fn sweep(&mut self) {
        let dead: Vec<u32> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.despawned)
            .map(|(id, _)| *id)
            .collect();
        for id in dead {
            self.entities.remove(&id);
            self.removed.push(EntityId(id));
        }
    }

    /// Ids of all live entities in insertion order
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().map(|id| EntityId(*id)).collect();
        ids.sort();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn drain_added(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.added)
    }

    pub fn drain_removed(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Entity;
    use glam::Vec2;

    fn blank_entity() -> Entity {
        Entity::test_dummy(Vec2::splat(8.0))
    }

    #[test]
    fn test_insert_assigns_monotonic_ids() {
        let mut scene = Scene::new();
        let a = scene.insert(blank_entity());
        let b = scene.insert(blank_entity());
        assert!(b > a);
        assert_eq!(scene.drain_added(), vec![a, b]);
    }

    #[test]
    fn test_take_and_put_back() {
        let mut scene = Scene::new();
        let id = scene.insert(blank_entity());
        let entity = scene.take(id).unwrap();
        assert!(!scene.contains(id));
        scene.put_back(entity);
        assert!(scene.contains(id));
    }

    #[test]
    fn test_put_back_despawned_records_removal() {
        let mut scene = Scene::new();
        let id = scene.insert(blank_entity());
        let mut entity = scene.take(id).unwrap();
        entity.despawned = true;
        scene.put_back(entity);
        assert!(!scene.contains(id));
        assert_eq!(scene.drain_removed(), vec![id]);
    }

    #[test]
    fn test_sweep_removes_flagged_entities() {
        let mut scene = Scene::new();
        let keep = scene.insert(blank_entity());
        let drop = scene.insert(blank_entity());
        scene.get_mut(drop).unwrap().despawned = true;
        scene.sweep();
        assert!(scene.contains(keep));
        assert!(!scene.contains(drop));
        assert_eq!(scene.drain_removed(), vec![drop]);
    }

    #[test]
    fn test_discard_forgets_pending_addition() {
        let mut scene = Scene::new();
        let kept = scene.insert(blank_entity());
        let discarded = scene.insert(blank_entity());
        scene.discard(discarded);
        assert_eq!(scene.drain_added(), vec![kept]);
        assert!(!scene.contains(discarded));
    }
}
