//! # Horizon Command
//!
//! Command argument parsing for Horizon game server plugins, centred on entity
//! selectors.
//!
//! Plugin commands declare their arguments as [`ValueParameter`]s. The
//! [`SelectorValueParameter`] lets users name entities either directly
//! (`Steve`) or through a selector (`@e[type=zombie,r=10]`), and verifies that
//! whatever a selector resolves to is the kind of entity the command expects.
//!
//! ## Quick Start
//!
//! ```rust
//! use horizon_command::{
//!     CommandManager, CommandResult, CommandSpec, ConsoleSource, Entity, EntityRegistry,
//!     SelectorValueParameter,
//! };
//! use std::sync::Arc;
//!
//! let registry = Arc::new(EntityRegistry::new());
//! registry.spawn(Entity::player("Steve"));
//!
//! let manager = CommandManager::new();
//! manager
//!     .register(
//!         CommandSpec::builder("heal")
//!             .parameter("targets", SelectorValueParameter::players())
//!             .executor(|_source, context| {
//!                 let healed = context.one("targets").map(|v| v.as_entities().len()).unwrap_or(0);
//!                 Ok(CommandResult::success().affected(healed))
//!             }),
//!     )
//!     .unwrap();
//!
//! let console = ConsoleSource::new(registry);
//! assert_eq!(manager.process(&console, "/heal @a").unwrap().affected, 1);
//! ```

pub mod args;
pub mod context;
pub mod entity;
pub mod error;
pub mod manager;
pub mod parameter;
pub mod registry;
pub mod selector;
pub mod source;
pub mod types;

pub use args::{tokenize, ArgsState, CommandArgs, SingleArg};
pub use context::CommandContext;
pub use entity::{Entity, EntityClass, EntityRef, EntityType, UnknownEntityType};
pub use error::{ArgumentParseError, CommandError, SelectorError};
pub use manager::{CommandExecutor, CommandManager, CommandResult, CommandSpec, CommandSpecBuilder};
pub use parameter::{
    ChoicesParameter, EntityNameParameter, ParameterValue, PatternMatchingValueParameter,
    PlayerNameParameter, SelectorValueParameter, ValueParameter, INVALID_ENTITIES_MESSAGE,
    SELECTOR_PREFIX,
};
pub use registry::{EntitySnapshot, EntityRegistry, WorldSnapshot};
pub use selector::{Negatable, Selector, SelectorArguments, SelectorKind, SortMode};
pub use source::{CommandSource, ConsoleSource, EntitySource};
pub use types::{EntityId, Location, Position};
