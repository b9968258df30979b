//! Command sources: the actor a command is executed on behalf of.

use crate::entity::EntityRef;
use crate::registry::EntityRegistry;
use crate::types::Location;
use std::sync::Arc;

/// The invoking actor of a command.
///
/// Selectors resolve relative to the source: `@s` is the source's own entity,
/// and `@p` or radius arguments measure distance from its location.
pub trait CommandSource: Send + Sync {
    /// Name used in logs and replies
    fn name(&self) -> &str;

    /// Where the source is, if it has a place in the world
    fn location(&self) -> Option<Location>;

    /// The entity behind the source, if any
    fn entity(&self) -> Option<EntityRef>;

    /// World state the source's commands act on
    fn registry(&self) -> &EntityRegistry;
}

/// The server console. It has no location and no entity.
#[derive(Debug, Clone)]
pub struct ConsoleSource {
    registry: Arc<EntityRegistry>,
}

impl ConsoleSource {
    pub fn new(registry: Arc<EntityRegistry>) -> Self {
        Self { registry }
    }
}

impl CommandSource for ConsoleSource {
    fn name(&self) -> &str {
        "Console"
    }

    fn location(&self) -> Option<Location> {
        None
    }

    fn entity(&self) -> Option<EntityRef> {
        None
    }

    fn registry(&self) -> &EntityRegistry {
        &self.registry
    }
}

/// A command executed by an entity, usually a player.
#[derive(Debug, Clone)]
pub struct EntitySource {
    entity: EntityRef,
    registry: Arc<EntityRegistry>,
}

impl EntitySource {
    pub fn new(entity: EntityRef, registry: Arc<EntityRegistry>) -> Self {
        Self { entity, registry }
    }
}

impl CommandSource for EntitySource {
    fn name(&self) -> &str {
        self.entity.display_name()
    }

    fn location(&self) -> Option<Location> {
        Some(self.entity.location.clone())
    }

    fn entity(&self) -> Option<EntityRef> {
        Some(self.entity.clone())
    }

    fn registry(&self) -> &EntityRegistry {
        &self.registry
    }
}
