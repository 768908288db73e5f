//! Expression typing, as seen by compile-time `typeof`.

use kiln_eval::{ScopeId, SymbolTable, TypeOracle};
use kiln_ir::{Expr, ExprKind, PrimitiveType, StringInterner, Type};
use kiln_num::Numeric;

use crate::operators::{binary_result, unary_result};

/// Types expressions from literals and the declared types in the symbol
/// table. Names whose declaration has not been inferred yet read as
/// `Type::Unresolved`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ExprTyper;

impl TypeOracle for ExprTyper {
    fn type_of(
        &self,
        expr: &Expr,
        scope: ScopeId,
        symbols: &SymbolTable,
        interner: &StringInterner,
    ) -> Type {
        match &expr.kind {
            ExprKind::Number(value) => literal_type(value),
            ExprKind::Str(_) => PrimitiveType::String.into(),
            ExprKind::Bool(_) => PrimitiveType::Boolean.into(),
            ExprKind::Nil => Type::Nil,
            ExprKind::Ident(name) => symbols
                .lookup_from(scope, *name)
                .map_or(Type::Unresolved, |id| symbols.symbol(id).ty.clone()),
            ExprKind::Unary { op, operand } => {
                unary_result(*op, &self.type_of(operand, scope, symbols, interner))
            }
            ExprKind::Binary { op, left, right } => binary_result(
                *op,
                &self.type_of(left, scope, symbols, interner),
                &self.type_of(right, scope, symbols, interner),
            ),
            ExprKind::Call { callee, .. } => match self.type_of(callee, scope, symbols, interner) {
                Type::Function { ret, .. } => *ret,
                _ => Type::Unresolved,
            },
            ExprKind::List(_) => Type::List,
            ExprKind::Lambda { params, .. } => Type::Function {
                params: params
                    .iter()
                    .map(|p| {
                        p.ty.and_then(|ty| self.primitive_type(interner.lookup(ty)))
                            .unwrap_or(Type::Unresolved)
                    })
                    .collect(),
                ret: Box::new(Type::Unresolved),
            },
            ExprKind::Field { .. } | ExprKind::Quote(_) => Type::Unresolved,
        }
    }
}

/// Unsuffixed literal type: the narrowest of `int64`, `int128`, `uint128`
/// for integers, `float64` otherwise. Integers wider than that stay
/// unresolved; typing the declaration reports them.
pub fn literal_type(value: &Numeric) -> Type {
    if value.is_integer() {
        return value
            .literal_width()
            .and_then(PrimitiveType::from_int_width)
            .map_or(Type::Unresolved, Type::Primitive);
    }
    PrimitiveType::Float64.into()
}
