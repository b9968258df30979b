//! Parsed argument storage for a single command invocation

use crate::parameter::ParameterValue;
use std::collections::HashMap;

/// Values produced by a command's parameters, keyed by parameter name.
///
/// A key may hold several values when a parameter is repeated.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    values: HashMap<String, Vec<ParameterValue>>,
}

impl CommandContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, value: ParameterValue) {
        self.values.entry(key.into()).or_default().push(value);
    }

    /// The first value stored under `key`.
    pub fn one(&self, key: &str) -> Option<&ParameterValue> {
        self.values.get(key).and_then(|values| values.first())
    }

    pub fn all(&self, key: &str) -> &[ParameterValue] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_any(&self, key: &str) -> bool {
        !self.all(key).is_empty()
    }

    /// Number of distinct keys with at least one value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
