//! Built-in console commands

use horizon_command::{
    CommandContext, CommandError, CommandManager, CommandResult, CommandSpec, Entity, EntityClass,
    EntityRef, EntityRegistry, SelectorValueParameter,
};
use std::sync::Arc;
use tracing::info;

/// Registers `select`, `players` and `kill` on the manager.
pub fn register_builtin_commands(
    manager: &CommandManager,
    registry: Arc<EntityRegistry>,
) -> Result<(), CommandError> {
    manager.register(
        CommandSpec::builder("select")
            .alias("list")
            .description("Shows the entities a selector or name matches")
            .parameter("targets", SelectorValueParameter::entities())
            .executor(|_source, context| Ok(describe(&targets(context)))),
    )?;

    manager.register(
        CommandSpec::builder("players")
            .description("Shows the players a selector or name matches")
            .parameter("targets", SelectorValueParameter::players())
            .executor(|_source, context| Ok(describe(&targets(context)))),
    )?;

    manager.register(
        CommandSpec::builder("kill")
            .description("Removes hostile mobs from the world")
            .parameter(
                "targets",
                SelectorValueParameter::entities_of(EntityClass::Hostile),
            )
            .executor(move |source, context| {
                let targets = targets(context);
                let mut result = CommandResult::success();
                for target in &targets {
                    // Names are matched without a type check
                    if !EntityClass::Hostile.is_instance(target) {
                        result = result.with_message(format!(
                            "{} is not a hostile mob",
                            target.display_name()
                        ));
                        continue;
                    }
                    if registry.despawn(target.id).is_some() {
                        info!("{} killed {} ({})", source.name(), target.display_name(), target.id);
                        result = result.with_message(format!("Killed {}", target.display_name()));
                        result.affected += 1;
                    }
                }
                if result.affected == 0 {
                    result = result.with_message("Nothing to kill");
                }
                Ok(result)
            }),
    )?;

    Ok(())
}

fn targets(context: &CommandContext) -> Vec<EntityRef> {
    context
        .all("targets")
        .iter()
        .flat_map(|value| value.as_entities())
        .collect()
}

fn describe(entities: &[EntityRef]) -> CommandResult {
    let mut result = CommandResult::success().affected(entities.len());
    if entities.is_empty() {
        return result.with_message("No entities matched");
    }
    for entity in entities {
        result = result.with_message(describe_entity(entity));
    }
    result
}

/// One-line description such as `Steve [player] overworld (0.0, 64.0, 0.0)`.
pub fn describe_entity(entity: &Entity) -> String {
    let position = entity.position();
    format!(
        "{} [{}] {} ({:.1}, {:.1}, {:.1})",
        entity.display_name(),
        entity.entity_type,
        entity.world(),
        position.x,
        position.y,
        position.z
    )
}
