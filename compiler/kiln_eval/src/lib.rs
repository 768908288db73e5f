//! Kiln compile-time evaluator.
//!
//! Executes the code embedded in a unit (`#{ }` blocks, splices, `#if` and
//! `#for` conditions) while the parser runs, and again when a later phase
//! completes and deferred hooks fire.
//!
//! - [`Evaluator`]: execution state for one unit and the entry points the
//!   parser and driver call
//! - [`SymbolTable`]: arena of scopes and symbols shared with analysis
//! - [`HookScheduler`]: per-phase FIFO queues of deferred callbacks
//! - [`Value`]: compile-time values, including code (`Value::Ast`)
//! - [`TypeOracle`] / [`FragmentParser`]: seams to analysis and the parser

mod builtins;
mod config;
mod convert;
mod errors;
mod hooks;
mod interpreter;
mod oracle;
mod symbols;
mod value;

#[cfg(test)]
mod test_helpers;

pub use builtins::{Builtin, Namespace};
pub use config::{
    CompileTimeConfig, ConfigValue, DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_ITERATIONS,
    DEFAULT_MAX_UNROLL,
};
pub use errors::{
    execution, static_assertion, static_error, syntax, unconvertible_value, undeclared_symbol,
    EvalError, EvalErrorKind, EvalResult,
};
pub use hooks::{DeferredHook, HookPhase, HookScheduler};
pub use interpreter::{Declaration, DeclarationKind, Evaluator};
pub use oracle::{FragmentParser, PrimitivesOnly, TypeOracle};
pub use symbols::{AssignError, ScopeId, Symbol, SymbolFlags, SymbolId, SymbolTable};
pub use value::{BoundMethod, Closure, Macro, Value};
