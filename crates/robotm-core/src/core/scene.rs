use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Entity storage using a flat Vec. A level has a few hundred tiles at most.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(256),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove every entity matching `pred`, returning them.
    pub fn despawn_where(&mut self, mut pred: impl FnMut(&Entity) -> bool) -> Vec<Entity> {
        let mut removed = Vec::new();
        let mut i = 0;
        while i < self.entities.len() {
            if pred(&self.entities[i]) {
                removed.push(self.entities.swap_remove(i));
            } else {
                i += 1;
            }
        }
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Tag of an entity, or `None` if it does not exist.
    pub fn tag_of(&self, id: EntityId) -> Option<&str> {
        self.get(id).map(|e| e.tag.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Entities carrying a `PlayerState`.
    pub fn players(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.player.is_some())
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove every entity. Physics bodies must be dropped separately.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
