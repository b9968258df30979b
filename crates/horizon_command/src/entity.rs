//! Entity model used by selectors and entity parameters.
//!
//! Entities are owned by the [`EntityRegistry`](crate::EntityRegistry) and handed
//! out as [`EntityRef`] handles. A parameter that expects a particular subtype
//! of entity checks membership through an [`EntityClass`].

use crate::types::{EntityId, Location, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Shared handle to a live entity.
pub type EntityRef = Arc<Entity>;

// ============================================================================
// Entity Types
// ============================================================================

/// The runtime type of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Player,
    Zombie,
    Skeleton,
    Creeper,
    Spider,
    Enderman,
    Villager,
    Cow,
    Pig,
    Sheep,
    Chicken,
    Wolf,
    Item,
    ArmorStand,
    Minecart,
    ExperienceOrb,
}

/// Returned when a string does not name a known [`EntityType`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown entity type '{0}'")]
pub struct UnknownEntityType(pub String);

impl EntityType {
    pub const ALL: [EntityType; 16] = [
        EntityType::Player,
        EntityType::Zombie,
        EntityType::Skeleton,
        EntityType::Creeper,
        EntityType::Spider,
        EntityType::Enderman,
        EntityType::Villager,
        EntityType::Cow,
        EntityType::Pig,
        EntityType::Sheep,
        EntityType::Chicken,
        EntityType::Wolf,
        EntityType::Item,
        EntityType::ArmorStand,
        EntityType::Minecart,
        EntityType::ExperienceOrb,
    ];

    /// The registry id of this type, as written in selectors (`type=zombie`).
    pub fn id(&self) -> &'static str {
        match self {
            EntityType::Player => "player",
            EntityType::Zombie => "zombie",
            EntityType::Skeleton => "skeleton",
            EntityType::Creeper => "creeper",
            EntityType::Spider => "spider",
            EntityType::Enderman => "enderman",
            EntityType::Villager => "villager",
            EntityType::Cow => "cow",
            EntityType::Pig => "pig",
            EntityType::Sheep => "sheep",
            EntityType::Chicken => "chicken",
            EntityType::Wolf => "wolf",
            EntityType::Item => "item",
            EntityType::ArmorStand => "armor_stand",
            EntityType::Minecart => "minecart",
            EntityType::ExperienceOrb => "experience_orb",
        }
    }

    pub fn is_living(&self) -> bool {
        !matches!(
            self,
            EntityType::Item
                | EntityType::ArmorStand
                | EntityType::Minecart
                | EntityType::ExperienceOrb
        )
    }

    pub fn is_hostile(&self) -> bool {
        matches!(
            self,
            EntityType::Zombie
                | EntityType::Skeleton
                | EntityType::Creeper
                | EntityType::Spider
                | EntityType::Enderman
        )
    }

    /// Living, non-hostile and not a player.
    pub fn is_passive(&self) -> bool {
        self.is_living() && !self.is_hostile() && *self != EntityType::Player
    }
}

impl std::str::FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.strip_prefix("minecraft:").unwrap_or(s);
        EntityType::ALL
            .iter()
            .copied()
            .find(|t| t.id().eq_ignore_ascii_case(key))
            .ok_or_else(|| UnknownEntityType(s.to_string()))
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// Target Classes
// ============================================================================

/// Type-compatibility predicate a parameter applies to resolved entities.
///
/// A selector parameter configured with `EntityClass::Player` accepts a
/// selector result only if every entity in it is a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    /// Every entity
    Any,
    /// Mobs and players
    Living,
    /// Monsters
    Hostile,
    /// Animals and villagers
    Passive,
    /// Players only
    Player,
    /// Exactly one entity type
    Kind(EntityType),
}

impl EntityClass {
    pub fn is_instance(&self, entity: &Entity) -> bool {
        let kind = entity.entity_type;
        match self {
            EntityClass::Any => true,
            EntityClass::Living => kind.is_living(),
            EntityClass::Hostile => kind.is_hostile(),
            EntityClass::Passive => kind.is_passive(),
            EntityClass::Player => kind == EntityType::Player,
            EntityClass::Kind(expected) => kind == *expected,
        }
    }
}

impl std::fmt::Display for EntityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityClass::Any => write!(f, "entity"),
            EntityClass::Living => write!(f, "living entity"),
            EntityClass::Hostile => write!(f, "hostile mob"),
            EntityClass::Passive => write!(f, "passive mob"),
            EntityClass::Player => write!(f, "player"),
            EntityClass::Kind(kind) => write!(f, "{}", kind),
        }
    }
}

// ============================================================================
// Entity
// ============================================================================

/// A unit of game-world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub entity_type: EntityType,
    /// Player name or custom name; empty for unnamed entities
    pub name: String,
    pub location: Location,
    pub tags: BTreeSet<String>,
}

impl Entity {
    /// Creates an entity at the origin of the `overworld`.
    pub fn new(entity_type: EntityType, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            entity_type,
            name: name.into(),
            location: Location::new("overworld", Position::default()),
            tags: BTreeSet::new(),
        }
    }

    pub fn player(name: impl Into<String>) -> Self {
        Self::new(EntityType::Player, name)
    }

    pub fn at(mut self, world: impl Into<String>, position: Position) -> Self {
        self.location = Location::new(world, position);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn is_player(&self) -> bool {
        self.entity_type == EntityType::Player
    }

    pub fn position(&self) -> Position {
        self.location.position
    }

    pub fn world(&self) -> &str {
        &self.location.world
    }

    /// Name shown to command users; falls back to the type id for unnamed entities.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.entity_type.id()
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_parsing() {
        assert_eq!("zombie".parse::<EntityType>().unwrap(), EntityType::Zombie);
        assert_eq!(
            "minecraft:armor_stand".parse::<EntityType>().unwrap(),
            EntityType::ArmorStand
        );
        assert_eq!("PLAYER".parse::<EntityType>().unwrap(), EntityType::Player);

        let err = "dragon".parse::<EntityType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown entity type 'dragon'");
    }

    #[test]
    fn test_entity_classes() {
        let player = Entity::player("Steve");
        let zombie = Entity::new(EntityType::Zombie, "");
        let cow = Entity::new(EntityType::Cow, "Bessie");
        let stand = Entity::new(EntityType::ArmorStand, "");

        assert!(EntityClass::Player.is_instance(&player));
        assert!(!EntityClass::Player.is_instance(&zombie));

        assert!(EntityClass::Living.is_instance(&player));
        assert!(EntityClass::Living.is_instance(&cow));
        assert!(!EntityClass::Living.is_instance(&stand));

        assert!(EntityClass::Hostile.is_instance(&zombie));
        assert!(!EntityClass::Hostile.is_instance(&cow));

        assert!(EntityClass::Passive.is_instance(&cow));
        assert!(!EntityClass::Passive.is_instance(&player));

        assert!(EntityClass::Kind(EntityType::ArmorStand).is_instance(&stand));
        assert!(EntityClass::Any.is_instance(&stand));
    }

    #[test]
    fn test_display_name_falls_back_to_type() {
        let zombie = Entity::new(EntityType::Zombie, "");
        assert_eq!(zombie.display_name(), "zombie");

        let named = Entity::new(EntityType::Zombie, "Bob").with_tag("boss");
        assert_eq!(named.display_name(), "Bob");
        assert!(named.tags.contains("boss"));
    }
}
