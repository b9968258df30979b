//! Name-based entity lookups, used as fallbacks when no selector is given

use super::{ParameterValue, PatternMatchingValueParameter, ValueParameter};
use crate::args::CommandArgs;
use crate::context::CommandContext;
use crate::error::ArgumentParseError;
use crate::source::CommandSource;

/// Matches the names of online players.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerNameParameter;

impl PatternMatchingValueParameter for PlayerNameParameter {
    fn name(&self) -> &str {
        "player"
    }

    fn choices(&self, source: &dyn CommandSource) -> Vec<String> {
        source
            .registry()
            .players()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    fn value_for(&self, choice: &str, source: &dyn CommandSource) -> Option<ParameterValue> {
        source.registry().find_player(choice).map(ParameterValue::Entity)
    }
}

impl ValueParameter for PlayerNameParameter {
    fn get_value(
        &self,
        source: &dyn CommandSource,
        args: &mut CommandArgs,
        _context: &CommandContext,
    ) -> Result<Option<ParameterValue>, ArgumentParseError> {
        self.match_pattern(source, args)
    }
}

/// Matches the names of named entities of any type.
///
/// Several entities may share a name; a matched name stands for all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityNameParameter;

impl PatternMatchingValueParameter for EntityNameParameter {
    fn name(&self) -> &str {
        "entity"
    }

    fn choices(&self, source: &dyn CommandSource) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entity in source.registry().all() {
            if !entity.name.is_empty() && !names.contains(&entity.name) {
                names.push(entity.name.clone());
            }
        }
        names
    }

    fn value_for(&self, choice: &str, source: &dyn CommandSource) -> Option<ParameterValue> {
        let named: Vec<_> = source
            .registry()
            .all()
            .into_iter()
            .filter(|e| e.name == choice)
            .collect();
        if named.is_empty() {
            None
        } else {
            Some(ParameterValue::Entities(named))
        }
    }
}

impl ValueParameter for EntityNameParameter {
    fn get_value(
        &self,
        source: &dyn CommandSource,
        args: &mut CommandArgs,
        _context: &CommandContext,
    ) -> Result<Option<ParameterValue>, ArgumentParseError> {
        self.match_pattern(source, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityType};
    use crate::registry::EntityRegistry;
    use crate::source::ConsoleSource;
    use std::sync::Arc;

    #[test]
    fn test_player_names() {
        let registry = Arc::new(EntityRegistry::new());
        let steve = registry.spawn(Entity::player("Steve"));
        registry.spawn(Entity::player("Stella"));
        registry.spawn(Entity::new(EntityType::Zombie, "Steven"));
        let console = ConsoleSource::new(registry);

        let mut args = CommandArgs::new("steve").unwrap();
        let value = PlayerNameParameter
            .get_value(&console, &mut args, &CommandContext::new())
            .unwrap();
        assert_eq!(value, Some(ParameterValue::Entity(steve)));

        let mut args = CommandArgs::new("ste").unwrap();
        let value = PlayerNameParameter
            .get_value(&console, &mut args, &CommandContext::new())
            .unwrap()
            .unwrap();
        assert_eq!(value.as_entities().len(), 2);
    }

    #[test]
    fn test_player_name_pattern_cannot_match_mid_name() {
        let registry = Arc::new(EntityRegistry::new());
        registry.spawn(Entity::player("Steve"));
        let console = ConsoleSource::new(registry);

        for input in ["x)|(eve", "eve"] {
            let mut args = CommandArgs::new(input).unwrap();
            assert!(
                PlayerNameParameter
                    .get_value(&console, &mut args, &CommandContext::new())
                    .is_err(),
                "input: {}",
                input
            );
        }
    }

    #[test]
    fn test_entity_names_group_duplicates() {
        let registry = Arc::new(EntityRegistry::new());
        registry.spawn(Entity::new(EntityType::Cow, "Bessie"));
        registry.spawn(Entity::new(EntityType::Cow, "Bessie"));
        registry.spawn(Entity::new(EntityType::Pig, ""));
        let console = ConsoleSource::new(registry);

        assert_eq!(EntityNameParameter.choices(&console), ["Bessie"]);

        let mut args = CommandArgs::new("bessie").unwrap();
        let value = EntityNameParameter
            .get_value(&console, &mut args, &CommandContext::new())
            .unwrap()
            .unwrap();
        assert_eq!(value.as_entities().len(), 2);
    }
}
