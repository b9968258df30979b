//! Live entity storage that selectors resolve against.
//!
//! The registry is a concurrent map, so command parsing on one thread can run
//! while another thread spawns or despawns entities. Snapshots returned by
//! [`EntityRegistry::all`] are ordered by spawn order, which is what the
//! `arbitrary` selector sort exposes.

use crate::entity::{Entity, EntityRef, EntityType};
use crate::types::{EntityId, Location, Position};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

struct Slot {
    spawn_order: u64,
    entity: EntityRef,
}

/// Concurrent store of every live entity.
#[derive(Default)]
pub struct EntityRegistry {
    entities: DashMap<EntityId, Slot>,
    next_spawn: AtomicU64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry and spawns every entity described by the snapshot.
    pub fn from_snapshot(snapshot: WorldSnapshot) -> Self {
        let registry = Self::new();
        for entity in snapshot.entities {
            registry.spawn(entity.into_entity());
        }
        registry
    }

    /// Adds an entity to the world, replacing any entity with the same id.
    pub fn spawn(&self, entity: Entity) -> EntityRef {
        let entity = Arc::new(entity);
        let spawn_order = self.next_spawn.fetch_add(1, Ordering::Relaxed);
        debug!(
            "Spawned {} '{}' ({}) in {}",
            entity.entity_type,
            entity.name,
            entity.id,
            entity.world()
        );
        self.entities.insert(
            entity.id,
            Slot {
                spawn_order,
                entity: entity.clone(),
            },
        );
        entity
    }

    pub fn despawn(&self, id: EntityId) -> Option<EntityRef> {
        let removed = self.entities.remove(&id).map(|(_, slot)| slot.entity);
        if let Some(entity) = &removed {
            debug!("Despawned {} ({})", entity.entity_type, entity.id);
        }
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<EntityRef> {
        self.entities.get(&id).map(|slot| slot.entity.clone())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Snapshot of all live entities in spawn order.
    pub fn all(&self) -> Vec<EntityRef> {
        let mut slots: Vec<(u64, EntityRef)> = self
            .entities
            .iter()
            .map(|slot| (slot.spawn_order, slot.entity.clone()))
            .collect();
        slots.sort_by_key(|(order, _)| *order);
        slots.into_iter().map(|(_, entity)| entity).collect()
    }

    pub fn players(&self) -> Vec<EntityRef> {
        self.all().into_iter().filter(|e| e.is_player()).collect()
    }

    /// Finds an online player by name, ignoring case.
    pub fn find_player(&self, name: &str) -> Option<EntityRef> {
        self.players()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entities", &self.entities.len())
            .finish()
    }
}

// ============================================================================
// Snapshots
// ============================================================================

fn default_world() -> String {
    "overworld".to_string()
}

/// Serializable description of a world's entities, used to seed a registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default)]
    pub entities: Vec<EntitySnapshot>,
}

/// One entity entry of a [`WorldSnapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_world")]
    pub world: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EntitySnapshot {
    fn into_entity(self) -> Entity {
        let mut entity = Entity::new(self.entity_type, self.name);
        entity.location = Location::new(self.world, self.position);
        entity.tags.extend(self.tags);
        entity
    }
}

impl WorldSnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_despawn() {
        let registry = EntityRegistry::new();
        let steve = registry.spawn(Entity::player("Steve"));
        let zombie = registry.spawn(Entity::new(EntityType::Zombie, ""));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(steve.id).unwrap().name, "Steve");

        let removed = registry.despawn(zombie.id).unwrap();
        assert_eq!(removed.id, zombie.id);
        assert!(registry.despawn(zombie.id).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_all_preserves_spawn_order() {
        let registry = EntityRegistry::new();
        let names = ["a", "b", "c", "d", "e"];
        for name in names {
            registry.spawn(Entity::player(name));
        }

        let listed: Vec<String> = registry.all().iter().map(|e| e.name.clone()).collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn test_find_player_ignores_case_and_mobs() {
        let registry = EntityRegistry::new();
        registry.spawn(Entity::new(EntityType::Zombie, "Alex"));
        registry.spawn(Entity::player("Alex"));

        let found = registry.find_player("alex").unwrap();
        assert!(found.is_player());
        assert!(registry.find_player("steve").is_none());
    }

    #[test]
    fn test_from_snapshot_json() {
        let json = r#"{
            "entities": [
                { "type": "player", "name": "Steve", "position": { "x": 1.0, "y": 64.0, "z": 2.0 } },
                { "type": "zombie", "world": "nether", "tags": ["boss"] }
            ]
        }"#;

        let registry = EntityRegistry::from_snapshot(WorldSnapshot::from_json(json).unwrap());
        let all = registry.all();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Steve");
        assert_eq!(all[0].world(), "overworld");
        assert_eq!(all[0].position(), Position::new(1.0, 64.0, 2.0));
        assert_eq!(all[1].entity_type, EntityType::Zombie);
        assert_eq!(all[1].world(), "nether");
        assert!(all[1].tags.contains("boss"));
    }
}
