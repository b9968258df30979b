//! # Value Parameters
//!
//! A value parameter turns raw command tokens into a typed [`ParameterValue`].
//! Commands are declared as an ordered list of keyed parameters and the
//! [`CommandManager`](crate::CommandManager) runs them one after another over
//! the same [`CommandArgs`] cursor.
//!
//! - [`PatternMatchingValueParameter`] matches a token, read as a
//!   case-insensitive regex prefix, against a set of named choices.
//! - [`SelectorValueParameter`] accepts `@` selectors and checks the resolved
//!   entities against an expected [`EntityClass`](crate::EntityClass), falling
//!   back to another parameter for plain tokens.

mod entity;
mod pattern;
mod selector;

pub use entity::{EntityNameParameter, PlayerNameParameter};
pub use pattern::{ChoicesParameter, PatternMatchingValueParameter};
pub use selector::{SelectorValueParameter, INVALID_ENTITIES_MESSAGE, SELECTOR_PREFIX};

use crate::args::CommandArgs;
use crate::context::CommandContext;
use crate::entity::EntityRef;
use crate::error::ArgumentParseError;
use crate::source::CommandSource;

/// A value produced by a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// Entities resolved from a selector
    Entities(Vec<EntityRef>),
    /// A single entity matched by name
    Entity(EntityRef),
    Text(String),
    /// Several values matched by one pattern
    List(Vec<ParameterValue>),
}

impl ParameterValue {
    /// Every entity contained in this value, flattening lists.
    pub fn as_entities(&self) -> Vec<EntityRef> {
        match self {
            ParameterValue::Entities(entities) => entities.clone(),
            ParameterValue::Entity(entity) => vec![entity.clone()],
            ParameterValue::Text(_) => Vec::new(),
            ParameterValue::List(values) => values.iter().flat_map(|v| v.as_entities()).collect(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A pluggable unit converting raw command tokens into a value.
pub trait ValueParameter: Send + Sync {
    /// Reads from `args` and produces a value, `None` when the parameter
    /// deliberately yields nothing.
    fn get_value(
        &self,
        source: &dyn CommandSource,
        args: &mut CommandArgs,
        context: &CommandContext,
    ) -> Result<Option<ParameterValue>, ArgumentParseError>;

    /// Usage fragment shown in help output.
    fn usage(&self, key: &str) -> String {
        format!("<{}>", key)
    }
}
