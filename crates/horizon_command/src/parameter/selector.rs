//! Selector-aware entity parameter

use super::{EntityNameParameter, ParameterValue, PlayerNameParameter, ValueParameter};
use crate::args::CommandArgs;
use crate::context::CommandContext;
use crate::entity::EntityClass;
use crate::error::ArgumentParseError;
use crate::selector::Selector;
use crate::source::CommandSource;
use tracing::{debug, warn};

/// Tokens starting with this character are parsed as selectors.
pub const SELECTOR_PREFIX: char = '@';

/// Error message when a selector resolves to entities of the wrong type.
pub const INVALID_ENTITIES_MESSAGE: &str =
    "The selector returned entities that are not valid for this argument.";

/// An entity parameter that understands selectors.
///
/// When the next token starts with `@` it is consumed, parsed as a
/// [`Selector`] and resolved against the source. The result is accepted only
/// if every entity is an instance of the configured target class. Any other
/// token is handed to the fallback parameter untouched.
#[derive(Debug, Clone)]
pub struct SelectorValueParameter<F> {
    target: EntityClass,
    fallback: F,
}

impl<F> SelectorValueParameter<F> {
    pub fn new(target: EntityClass, fallback: F) -> Self {
        Self { target, fallback }
    }

    pub fn target(&self) -> EntityClass {
        self.target
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

impl SelectorValueParameter<PlayerNameParameter> {
    /// Players by selector or by name.
    pub fn players() -> Self {
        Self::new(EntityClass::Player, PlayerNameParameter)
    }
}

impl SelectorValueParameter<EntityNameParameter> {
    /// Any entities by selector or by name.
    pub fn entities() -> Self {
        Self::new(EntityClass::Any, EntityNameParameter)
    }

    /// Entities of `target` by selector, any named entity otherwise.
    pub fn entities_of(target: EntityClass) -> Self {
        Self::new(target, EntityNameParameter)
    }
}

impl<F: ValueParameter> ValueParameter for SelectorValueParameter<F> {
    fn get_value(
        &self,
        source: &dyn CommandSource,
        args: &mut CommandArgs,
        context: &CommandContext,
    ) -> Result<Option<ParameterValue>, ArgumentParseError> {
        if !args.peek()?.starts_with(SELECTOR_PREFIX) {
            return self.fallback.get_value(source, args, context);
        }

        let raw = args.next()?;
        let entities = Selector::parse(&raw)
            .and_then(|selector| selector.resolve(source))
            .map_err(|e| args.create_error(e.to_string()))?;

        if let Some(invalid) = entities.iter().find(|e| !self.target.is_instance(e)) {
            warn!(
                "Selector {} from {} returned {} '{}', expected {}",
                raw,
                source.name(),
                invalid.entity_type,
                invalid.display_name(),
                self.target
            );
            return Err(args.create_error(INVALID_ENTITIES_MESSAGE));
        }

        debug!("Selector {} accepted {} entities", raw, entities.len());
        Ok(Some(ParameterValue::Entities(entities)))
    }

    fn usage(&self, key: &str) -> String {
        format!("<{}|@selector>", key)
    }
}
