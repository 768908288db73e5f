//! One compilation unit, from source text to analyzed AST.
//!
//! The unit owns every piece of compile-time state (interner, symbol
//! table, hook queues, config). It is created when compilation starts and
//! everything it owns is dropped with it.

use std::rc::Rc;

use kiln_diagnostic::Diagnostic;
use kiln_eval::{Evaluator, HookPhase, SymbolTable, Value};
use kiln_ir::{SharedInterner, Stmt, Type};
use kiln_sema::ExprTyper;

use crate::UnitOptions;

/// A unit that made it through every phase.
pub struct CompiledUnit {
    pub name: String,
    /// Host AST with every preprocessor construct expanded.
    pub stmts: Vec<Stmt>,
    eval: Evaluator,
}

impl CompiledUnit {
    pub fn interner(&self) -> &SharedInterner {
        self.eval.interner()
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.eval.symbols()
    }

    /// Final value of a compile-time `config` entry.
    pub fn config(&self, key: &str) -> Value {
        self.eval.config().get(key)
    }

    /// Type of the root-scope binding `name`, if there is one.
    pub fn type_of(&self, name: &str) -> Option<Type> {
        let name = self.interner().intern(name);
        let symbols = self.symbols();
        symbols
            .lookup_from(symbols.root(), name)
            .map(|id| symbols.symbol(id).ty.clone())
    }
}

/// Compile `source` as one unit.
///
/// Phases run strictly in order: lex, parse (running compile-time code as
/// it is met), type inference, after-type-inference hooks, name
/// resolution, after-analysis hooks. The first failure ends the unit.
#[tracing::instrument(level = "debug", skip_all, fields(unit = %options.name))]
pub fn compile_unit(source: &str, options: &UnitOptions) -> Result<CompiledUnit, Diagnostic> {
    let interner = SharedInterner::new();
    let tokens = kiln_lexer::lex(source, &interner).map_err(|err| err.to_diagnostic())?;

    let mut eval =
        Evaluator::new(interner, options.to_config()).with_oracle(Box::new(ExprTyper));
    let stmts = kiln_parse::parse_unit(Rc::new(tokens), &mut eval)
        .map_err(|err| err.to_diagnostic())?;

    kiln_sema::infer_declarations(&mut eval).map_err(|err| err.to_diagnostic())?;
    eval.signal_phase(HookPhase::AfterTypeInference)
        .map_err(|err| err.to_diagnostic())?;

    kiln_sema::resolve_names(&stmts, &eval).map_err(|err| err.to_diagnostic())?;
    eval.signal_phase(HookPhase::AfterAnalysis)
        .map_err(|err| err.to_diagnostic())?;

    tracing::debug!(
        stmts = stmts.len(),
        hooks_run = eval.hooks().ran(),
        "unit compiled"
    );
    Ok(CompiledUnit {
        name: options.name.clone(),
        stmts,
        eval,
    })
}
