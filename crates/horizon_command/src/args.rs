//! Raw command input tokenization and the argument cursor parameters read from.

use crate::error::ArgumentParseError;

/// One token of raw command input together with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleArg {
    pub value: String,
    pub start: usize,
    pub end: usize,
}

/// Splits raw command input into tokens.
///
/// Whitespace separates tokens except inside `"..."`/`'...'` quotes or inside
/// `[...]` (selector arguments such as `@e[type=zombie, r=10]`). Quotes are
/// removed and support `\` escapes; quoted and unquoted parts that touch are
/// joined into a single token. Inside brackets quotes are kept verbatim so the
/// selector parser sees them.
pub fn tokenize(input: &str) -> Result<Vec<SingleArg>, ArgumentParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let start = match chars.peek() {
            Some((i, _)) => *i,
            None => break,
        };

        let mut value = String::new();
        let mut depth = 0usize;
        // Open quote inside brackets; brackets within it are not counted.
        let mut bracket_quote: Option<char> = None;

        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() && depth == 0 {
                break;
            }

            if depth > 0 {
                match bracket_quote {
                    Some(q) if c == q => bracket_quote = None,
                    Some(_) => {}
                    None if c == '"' || c == '\'' => bracket_quote = Some(c),
                    None if c == '[' => depth += 1,
                    None if c == ']' => depth -= 1,
                    None => {}
                }
                value.push(c);
                chars.next();
                continue;
            }

            if c == '"' || c == '\'' {
                chars.next();
                loop {
                    match chars.next() {
                        Some((_, q)) if q == c => break,
                        Some((_, '\\')) => match chars.next() {
                            Some((_, escaped)) => value.push(escaped),
                            None => {
                                return Err(ArgumentParseError::new(
                                    "Unterminated quoted argument",
                                    input,
                                    i,
                                ))
                            }
                        },
                        Some((_, other)) => value.push(other),
                        None => {
                            return Err(ArgumentParseError::new(
                                "Unterminated quoted argument",
                                input,
                                i,
                            ))
                        }
                    }
                }
                continue;
            }

            if c == '[' {
                depth += 1;
            }
            value.push(c);
            chars.next();
        }

        let end = chars.peek().map(|(i, _)| *i).unwrap_or(input.len());
        tokens.push(SingleArg { value, start, end });
    }

    Ok(tokens)
}

/// Opaque cursor position, used to roll back after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgsState(usize);

/// Cursor over the unconsumed tokens of a command invocation.
#[derive(Debug, Clone)]
pub struct CommandArgs {
    raw: String,
    args: Vec<SingleArg>,
    index: usize,
}

impl CommandArgs {
    /// Tokenizes `raw` and positions the cursor before the first token.
    pub fn new(raw: impl Into<String>) -> Result<Self, ArgumentParseError> {
        let raw = raw.into();
        let args = tokenize(&raw)?;
        Ok(Self::from_tokens(raw, args))
    }

    pub fn from_tokens(raw: impl Into<String>, args: Vec<SingleArg>) -> Self {
        Self {
            raw: raw.into(),
            args,
            index: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.index < self.args.len()
    }

    /// Returns the next token without consuming it.
    pub fn peek(&self) -> Result<&str, ArgumentParseError> {
        self.args
            .get(self.index)
            .map(|arg| arg.value.as_str())
            .ok_or_else(|| self.not_enough_arguments())
    }

    /// Consumes and returns the next token.
    pub fn next(&mut self) -> Result<String, ArgumentParseError> {
        let value = self
            .args
            .get(self.index)
            .map(|arg| arg.value.clone())
            .ok_or_else(|| self.not_enough_arguments())?;
        self.index += 1;
        Ok(value)
    }

    pub fn next_if_present(&mut self) -> Option<String> {
        self.next().ok()
    }

    pub fn state(&self) -> ArgsState {
        ArgsState(self.index)
    }

    pub fn set_state(&mut self, state: ArgsState) {
        self.index = state.0.min(self.args.len());
    }

    /// Tokens that have not been consumed yet.
    pub fn remaining(&self) -> &[SingleArg] {
        &self.args[self.index..]
    }

    pub fn all(&self) -> &[SingleArg] {
        &self.args
    }

    pub fn raw_input(&self) -> &str {
        &self.raw
    }

    /// Creates a parse error pointing at the most recently consumed token,
    /// or at the upcoming one when nothing has been consumed yet.
    pub fn create_error(&self, message: impl Into<String>) -> ArgumentParseError {
        let position = self
            .index
            .checked_sub(1)
            .and_then(|i| self.args.get(i))
            .or_else(|| self.args.get(self.index))
            .map(|arg| arg.start)
            .unwrap_or(0);
        ArgumentParseError::new(message, self.raw.clone(), position)
    }

    fn not_enough_arguments(&self) -> ArgumentParseError {
        ArgumentParseError::new("Not enough arguments!", self.raw.clone(), self.raw.len())
    }
}
