//! Pattern matching over a set of named choices

use super::{ParameterValue, ValueParameter};
use crate::args::CommandArgs;
use crate::context::CommandContext;
use crate::error::ArgumentParseError;
use crate::source::CommandSource;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

/// A parameter whose token is matched against named choices.
///
/// The token is treated as a case-insensitive regular expression anchored at
/// the start of each choice, so `st` matches `Steve` and `Stone`. A choice
/// equal to the token (ignoring case) wins outright.
pub trait PatternMatchingValueParameter: Send + Sync {
    /// Name used in "no match" errors.
    fn name(&self) -> &str;

    /// Every choice available to `source`.
    fn choices(&self, source: &dyn CommandSource) -> Vec<String>;

    /// The value a matched choice stands for.
    fn value_for(&self, choice: &str, source: &dyn CommandSource) -> Option<ParameterValue>;

    /// Consumes one token and matches it against [`choices`](Self::choices).
    fn match_pattern(
        &self,
        source: &dyn CommandSource,
        args: &mut CommandArgs,
    ) -> Result<Option<ParameterValue>, ArgumentParseError> {
        let pattern = args.next()?;
        let choices = self.choices(source);

        if let Some(exact) = choices.iter().find(|c| c.eq_ignore_ascii_case(&pattern)) {
            if let Some(value) = self.value_for(exact, source) {
                return Ok(Some(value));
            }
        }

        // Compiling the bare pattern first rejects input that would close the
        // anchoring group early.
        let regex = Regex::new(&pattern)
            .and_then(|_| {
                RegexBuilder::new(&format!("^(?:{})", pattern))
                    .case_insensitive(true)
                    .build()
            })
            .map_err(|_| args.create_error(format!("Invalid pattern '{}'", pattern)))?;

        let mut values: Vec<ParameterValue> = choices
            .iter()
            .filter(|choice| regex.is_match(choice))
            .filter_map(|choice| self.value_for(choice, source))
            .collect();

        match values.len() {
            0 => Err(args.create_error(format!(
                "No values matching pattern '{}' present for {}!",
                pattern,
                self.name()
            ))),
            1 => Ok(values.pop()),
            _ => Ok(Some(ParameterValue::List(values))),
        }
    }
}

/// A fixed set of keywords mapped to text values.
#[derive(Debug, Clone)]
pub struct ChoicesParameter {
    name: String,
    choices: BTreeMap<String, String>,
}

impl ChoicesParameter {
    pub fn new<I, K, V>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            choices: choices
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PatternMatchingValueParameter for ChoicesParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn choices(&self, _source: &dyn CommandSource) -> Vec<String> {
        self.choices.keys().cloned().collect()
    }

    fn value_for(&self, choice: &str, _source: &dyn CommandSource) -> Option<ParameterValue> {
        self.choices.get(choice).cloned().map(ParameterValue::Text)
    }
}

impl ValueParameter for ChoicesParameter {
    fn get_value(
        &self,
        source: &dyn CommandSource,
        args: &mut CommandArgs,
        _context: &CommandContext,
    ) -> Result<Option<ParameterValue>, ArgumentParseError> {
        self.match_pattern(source, args)
    }

    fn usage(&self, key: &str) -> String {
        let options: Vec<&str> = self.choices.keys().map(String::as_str).collect();
        format!("<{}: {}>", key, options.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EntityRegistry;
    use crate::source::ConsoleSource;
    use std::sync::Arc;

    fn difficulty() -> ChoicesParameter {
        ChoicesParameter::new(
            "difficulty",
            [("peaceful", "0"), ("easy", "1"), ("normal", "2"), ("hard", "3"), ("hardcore", "4")],
        )
    }

    fn run(parameter: &ChoicesParameter, input: &str) -> Result<Option<ParameterValue>, ArgumentParseError> {
        let console = ConsoleSource::new(Arc::new(EntityRegistry::new()));
        let mut args = CommandArgs::new(input).unwrap();
        parameter.get_value(&console, &mut args, &CommandContext::new())
    }

    fn text(value: &str) -> Option<ParameterValue> {
        Some(ParameterValue::Text(value.to_string()))
    }

    #[test]
    fn test_prefix_match() {
        assert_eq!(run(&difficulty(), "pea").unwrap(), text("0"));
        assert_eq!(run(&difficulty(), "NORM").unwrap(), text("2"));
    }

    #[test]
    fn test_exact_match_wins_over_longer_choices() {
        assert_eq!(run(&difficulty(), "Hard").unwrap(), text("3"));
    }

    #[test]
    fn test_ambiguous_prefix_returns_every_match() {
        let value = run(&difficulty(), "har").unwrap();
        assert_eq!(
            value,
            Some(ParameterValue::List(vec![
                ParameterValue::Text("3".to_string()),
                ParameterValue::Text("4".to_string()),
            ]))
        );
    }

    #[test]
    fn test_regex_pattern() {
        assert_eq!(run(&difficulty(), "e.s").unwrap(), text("1"));
    }

    #[test]
    fn test_no_match_error() {
        let err = run(&difficulty(), "extreme").unwrap_err();
        assert_eq!(
            err.message(),
            "No values matching pattern 'extreme' present for difficulty!"
        );
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn test_pattern_stays_anchored_to_the_start() {
        let err = run(&difficulty(), "x)|(ard").unwrap_err();
        assert_eq!(err.message(), "Invalid pattern 'x)|(ard'");

        assert!(run(&difficulty(), "zzz|eac").is_err());
        assert_eq!(run(&difficulty(), "zzz|pea").unwrap(), text("0"));
    }

    #[test]
    fn test_invalid_pattern_error() {
        let err = run(&difficulty(), "(").unwrap_err();
        assert_eq!(err.message(), "Invalid pattern '('");
    }

    #[test]
    fn test_usage_lists_choices() {
        assert_eq!(
            difficulty().usage("level"),
            "<level: easy|hard|hardcore|normal|peaceful>"
        );
    }
}
