//! Reference read-only config.

use std::collections::HashMap;

use serde_json::Value;

use super::ConfigV1;
use super::defaults;
use crate::context::Context;

/// Immutable keyed config. Absent keys read as `None`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    values: HashMap<String, Value>,
}

impl StaticConfig {
    /// An empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// A config holding every built-in default.
    pub fn with_defaults() -> Self {
        let values = defaults::BUILTIN
            .iter()
            .map(|(key, value)| (key.to_string(), Value::from(*value)))
            .collect();
        Self { values }
    }

    /// Adds or replaces one value.
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Adds or replaces every value in `values`.
    pub fn with_values(mut self, values: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.values.extend(values);
        self
    }
}

impl ConfigV1 for StaticConfig {
    fn get(&self, _ctx: &Context, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}
