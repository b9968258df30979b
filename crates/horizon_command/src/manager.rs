//! Command registration and dispatch
//!
//! A [`CommandSpec`] declares a command's name, aliases and ordered keyed
//! parameters. The [`CommandManager`] tokenizes an input line, runs each
//! parameter over the shared argument cursor, collects the values into a
//! [`CommandContext`] and hands it to the command's executor.

use crate::args::CommandArgs;
use crate::context::CommandContext;
use crate::error::CommandError;
use crate::parameter::ValueParameter;
use crate::source::CommandSource;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// Execution
// ============================================================================

/// Outcome of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Number of entities or objects the command acted on
    pub affected: usize,
    /// Replies for the command source
    pub messages: Vec<String>,
}

impl CommandResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn affected(mut self, affected: usize) -> Self {
        self.affected = affected;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }
}

/// Runs a command once its parameters have been parsed.
pub trait CommandExecutor: Send + Sync {
    fn execute(
        &self,
        source: &dyn CommandSource,
        context: &CommandContext,
    ) -> Result<CommandResult, CommandError>;
}

impl<F> CommandExecutor for F
where
    F: Fn(&dyn CommandSource, &CommandContext) -> Result<CommandResult, CommandError> + Send + Sync,
{
    fn execute(
        &self,
        source: &dyn CommandSource,
        context: &CommandContext,
    ) -> Result<CommandResult, CommandError> {
        self(source, context)
    }
}

// ============================================================================
// Command Specs
// ============================================================================

/// A registered command: names, parameters and executor.
pub struct CommandSpec {
    name: String,
    aliases: Vec<String>,
    description: String,
    parameters: Vec<(String, Box<dyn ValueParameter>)>,
    executor: Box<dyn CommandExecutor>,
}

impl CommandSpec {
    pub fn builder(name: impl Into<String>) -> CommandSpecBuilder {
        CommandSpecBuilder {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            parameters: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// One-line usage, e.g. `kill <targets|@selector>`.
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        for (key, parameter) in &self.parameters {
            usage.push(' ');
            usage.push_str(&parameter.usage(key));
        }
        usage
    }

    fn names(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .map(|n| n.to_lowercase())
    }
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("parameters", &self.parameters.len())
            .finish()
    }
}

/// Builder for [`CommandSpec`].
pub struct CommandSpecBuilder {
    name: String,
    aliases: Vec<String>,
    description: String,
    parameters: Vec<(String, Box<dyn ValueParameter>)>,
}

impl CommandSpecBuilder {
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a parameter; parameters run in the order they are added.
    pub fn parameter(mut self, key: impl Into<String>, parameter: impl ValueParameter + 'static) -> Self {
        self.parameters.push((key.into(), Box::new(parameter)));
        self
    }

    pub fn executor<F>(self, executor: F) -> CommandSpec
    where
        F: Fn(&dyn CommandSource, &CommandContext) -> Result<CommandResult, CommandError>
            + Send
            + Sync
            + 'static,
    {
        self.executor_boxed(Box::new(executor))
    }

    pub fn executor_boxed(self, executor: Box<dyn CommandExecutor>) -> CommandSpec {
        CommandSpec {
            name: self.name,
            aliases: self.aliases,
            description: self.description,
            parameters: self.parameters,
            executor,
        }
    }
}

// ============================================================================
// Command Manager
// ============================================================================

/// Registry and dispatcher for commands.
#[derive(Default)]
pub struct CommandManager {
    /// Keyed by lowercase name and by every lowercase alias
    commands: DashMap<String, Arc<CommandSpec>>,
}

impl CommandManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under its name and aliases.
    ///
    /// Fails without registering anything if any of the names is taken.
    pub fn register(&self, spec: CommandSpec) -> Result<(), CommandError> {
        let spec = Arc::new(spec);
        let mut names: Vec<String> = Vec::new();
        for name in spec.names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        for (claimed, name) in names.iter().enumerate() {
            // The shard lock is released before any rollback touches the map.
            let taken = match self.commands.entry(name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(spec.clone());
                    false
                }
                Entry::Occupied(_) => true,
            };

            if taken {
                for previous in &names[..claimed] {
                    self.commands
                        .remove_if(previous, |_, owner| Arc::ptr_eq(owner, &spec));
                }
                return Err(CommandError::AlreadyRegistered(name.clone()));
            }
        }

        info!("Registered command /{}", spec.usage());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<CommandSpec>> {
        self.commands
            .get(&name.to_lowercase())
            .map(|entry| entry.value().clone())
    }

    /// Primary names of all registered commands, sorted.
    pub fn commands(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .iter()
            .map(|entry| entry.value().name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Parses and executes one line of input on behalf of `source`.
    pub fn process(
        &self,
        source: &dyn CommandSource,
        line: &str,
    ) -> Result<CommandResult, CommandError> {
        let trimmed = line.trim();
        let input = trimmed.strip_prefix('/').unwrap_or(trimmed);

        let mut args = CommandArgs::new(input)?;
        let name = args.next().map_err(|_| CommandError::EmptyInput)?;
        let spec = self
            .get(&name)
            .ok_or_else(|| CommandError::UnknownCommand(name.clone()))?;

        debug!("{} is running /{}", source.name(), input);

        let mut context = CommandContext::new();
        for (key, parameter) in &spec.parameters {
            if let Some(value) = parameter.get_value(source, &mut args, &context)? {
                context.put(key.clone(), value);
            }
        }

        if args.has_next() {
            args.next()?;
            return Err(args.create_error("Too many arguments!").into());
        }

        spec.executor.execute(source, &context)
    }
}
