//! Error types for command parsing and selector resolution

use thiserror::Error;

/// The single error kind raised while turning raw tokens into values.
///
/// Carries the human-readable message plus the raw input and the byte offset
/// of the token that failed, so callers can point the user at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ArgumentParseError {
    message: String,
    input: String,
    position: usize,
}

impl ArgumentParseError {
    pub fn new(message: impl Into<String>, input: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            input: input.into(),
            position,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Renders the raw input with a caret under the failing position.
    ///
    /// ```rust
    /// use horizon_command::ArgumentParseError;
    ///
    /// let err = ArgumentParseError::new("bad", "tp @x", 3);
    /// assert_eq!(err.annotated_position(), "tp @x\n   ^");
    /// ```
    pub fn annotated_position(&self) -> String {
        let end = self.position.min(self.input.len());
        let column = self
            .input
            .get(..end)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(end);
        format!("{}\n{}^", self.input, " ".repeat(column))
    }
}

/// Selector syntax and resolution errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectorError {
    #[error("Selectors must start with '@'")]
    MissingPrefix,

    #[error("Missing selector type after '@'")]
    MissingType,

    #[error("Unknown selector type '@{0}'")]
    UnknownType(char),

    #[error("Expected ']' to close selector arguments")]
    UnterminatedArguments,

    #[error("Unexpected trailing input '{0}' after selector")]
    TrailingInput(String),

    #[error("Expected key=value in selector argument '{0}'")]
    MalformedArgument(String),

    #[error("Selector argument key cannot be empty")]
    EmptyKey,

    #[error("Unknown selector argument '{0}'")]
    UnknownArgument(String),

    #[error("Selector argument '{0}' may only be given once")]
    DuplicateArgument(String),

    #[error("Invalid number '{value}' for selector argument '{key}'")]
    InvalidNumber { key: String, value: String },

    #[error("Selector limit must be non-zero")]
    ZeroLimit,

    #[error("Unknown entity type '{0}'")]
    UnknownEntityType(String),

    #[error("Unknown sort mode '{0}'")]
    UnknownSort(String),

    #[error("Minimum radius {min} is greater than maximum radius {max}")]
    InvertedRadius { min: f64, max: f64 },
}

/// Errors surfaced by the command manager.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No command was given")]
    EmptyInput,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("{0}")]
    Parse(#[from] ArgumentParseError),

    #[error("Command failed: {0}")]
    Execution(String),
}

impl From<String> for CommandError {
    fn from(s: String) -> Self {
        CommandError::Execution(s)
    }
}

impl From<&str> for CommandError {
    fn from(s: &str) -> Self {
        CommandError::Execution(s.to_string())
    }
}
