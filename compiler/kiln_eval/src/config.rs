//! Per-unit compile-time configuration.
//!
//! Created when a unit starts and dropped when it ends. Compile-time code
//! reads and writes the option table through `config.<key>`; the limits
//! are fixed for the unit.

use indexmap::IndexMap;

use crate::Value;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;
pub const DEFAULT_MAX_UNROLL: usize = 4096;
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000;

/// An initial option value supplied by the driver.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<ConfigValue> for Value {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Bool(b) => Value::Bool(b),
            ConfigValue::Int(n) => Value::int(n),
            ConfigValue::Str(s) => Value::str(&s),
        }
    }
}

#[derive(Debug)]
pub struct CompileTimeConfig {
    /// Nested compile-time calls before execution fails.
    pub max_call_depth: usize,
    /// Elements a single `#for` may unroll.
    pub max_unroll: usize,
    /// Iterations a single compile-time loop may run.
    pub max_iterations: usize,
    pub(crate) entries: IndexMap<String, Value>,
}

impl CompileTimeConfig {
    pub fn new() -> Self {
        CompileTimeConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_unroll: DEFAULT_MAX_UNROLL,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            entries: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = (String, ConfigValue)>) -> Self {
        self.entries
            .extend(entries.into_iter().map(|(key, value)| (key, value.into())));
        self
    }

    /// Missing keys read as `nil`.
    pub fn get(&self, key: &str) -> Value {
        self.entries.get(key).cloned().unwrap_or(Value::Nil)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        tracing::debug!(key, %value, "config set");
        self.entries.insert(key.to_string(), value);
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for CompileTimeConfig {
    fn default() -> Self {
        Self::new()
    }
}
