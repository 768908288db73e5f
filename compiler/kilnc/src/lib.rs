//! Kiln compiler driver.
//!
//! Runs one compilation unit through the pipeline: lexing, parsing with
//! compile-time code executed in place, declaration typing, name
//! resolution, and the deferred hooks waiting on each analysis phase.

mod options;
mod tracing_setup;
mod unit;

pub use options::UnitOptions;
pub use tracing_setup::init_tracing;
pub use unit::{compile_unit, CompiledUnit};
