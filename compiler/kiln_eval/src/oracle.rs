//! Seams to the collaborators the evaluator calls back into.

use kiln_ir::{AstFragment, Expr, PrimitiveType, Quote, StringInterner, Type};

use crate::symbols::{ScopeId, SymbolTable};
use crate::{EvalResult, Evaluator};

/// Type queries answered by the analysis engine.
///
/// Answers reflect how far inference has progressed: before the
/// after-type-inference phase, declarations read as `Type::Unresolved`.
pub trait TypeOracle {
    /// Type of `expr` as if it appeared in `scope`.
    fn type_of(
        &self,
        expr: &Expr,
        scope: ScopeId,
        symbols: &SymbolTable,
        interner: &StringInterner,
    ) -> Type;

    /// Descriptor for a primitive type name such as `uint8`.
    fn primitive_type(&self, name: &str) -> Option<Type> {
        PrimitiveType::from_name(name).map(Type::Primitive)
    }
}

/// Oracle that knows primitive names and nothing else.
#[derive(Copy, Clone, Debug, Default)]
pub struct PrimitivesOnly;

impl TypeOracle for PrimitivesOnly {
    fn type_of(&self, _: &Expr, _: ScopeId, _: &SymbolTable, _: &StringInterner) -> Type {
        Type::Unresolved
    }
}

/// Re-parses a quoted token range into a fresh AST fragment.
///
/// Splices and compile-time blocks inside the range run against the
/// evaluator's current state.
pub trait FragmentParser {
    fn parse_fragment(&self, quote: &Quote, eval: &mut Evaluator) -> EvalResult<AstFragment>;
}
