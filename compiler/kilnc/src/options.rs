//! Per-unit options supplied by the caller.

use kiln_eval::{
    CompileTimeConfig, ConfigValue, DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_ITERATIONS,
    DEFAULT_MAX_UNROLL,
};

/// Options for compiling one unit.
///
/// `config` seeds the table compile-time code sees as `config`; the
/// limits bound what that code may do.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitOptions {
    /// Shown in rendered diagnostics.
    pub name: String,
    pub max_unroll: usize,
    pub max_call_depth: usize,
    pub max_iterations: usize,
    pub config: Vec<(String, ConfigValue)>,
}

impl UnitOptions {
    pub fn new(name: impl Into<String>) -> Self {
        UnitOptions {
            name: name.into(),
            max_unroll: DEFAULT_MAX_UNROLL,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            config: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.config.push((key.into(), value));
        self
    }

    /// Parse a `key=value` command-line option. Integers and booleans are
    /// recognised; anything else is a string.
    pub fn parse_config_arg(arg: &str) -> Option<(String, ConfigValue)> {
        let (key, value) = arg.split_once('=')?;
        if key.is_empty() {
            return None;
        }
        let value = match value {
            "true" => ConfigValue::Bool(true),
            "false" => ConfigValue::Bool(false),
            _ => value
                .parse::<i64>()
                .map_or_else(|_| ConfigValue::Str(value.to_string()), ConfigValue::Int),
        };
        Some((key.to_string(), value))
    }

    pub(crate) fn to_config(&self) -> CompileTimeConfig {
        let mut config = CompileTimeConfig::new().with_entries(self.config.iter().cloned());
        config.max_unroll = self.max_unroll;
        config.max_call_depth = self.max_call_depth;
        config.max_iterations = self.max_iterations;
        config
    }
}

impl Default for UnitOptions {
    fn default() -> Self {
        Self::new("unit")
    }
}
