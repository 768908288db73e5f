//! Declaration typing.
//!
//! Walks the declarations the parser registered, in source order, and
//! fixes each symbol's type: the annotation when there is one, the
//! initializer's type otherwise. Integer literals are checked against
//! their declared width here; this is where `let x: uint8 = 300;` fails.

use kiln_eval::{DeclarationKind, Evaluator, TypeOracle, Value};
use kiln_ir::{Expr, ExprKind, Name, PrimitiveType, Span, Type, UnaryOp};
use kiln_num::{NarrowMode, Numeric};

use crate::operators::assignable;
use crate::typer::{literal_type, ExprTyper};
use crate::TypeCheckError;

#[tracing::instrument(level = "debug", skip_all, fields(declarations = eval.declarations().len()))]
pub fn infer_declarations(eval: &mut Evaluator) -> Result<(), TypeCheckError> {
    let declarations = eval.declarations().to_vec();
    for decl in &declarations {
        let ty = match &decl.kind {
            DeclarationKind::Binding {
                annotation, init, ..
            } => binding_type(eval, decl.symbol, *annotation, init.as_ref(), decl.span)?,
            DeclarationKind::Function { params, ret } => {
                let params = params
                    .iter()
                    .map(|param| match param.ty {
                        Some(ty) => resolve_type(eval, ty, decl.span),
                        None => Ok(Type::Unresolved),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let ret = match ret {
                    Some(ty) => resolve_type(eval, *ty, decl.span)?,
                    None => PrimitiveType::Void.into(),
                };
                Type::Function {
                    params,
                    ret: Box::new(ret),
                }
            }
        };
        tracing::trace!(
            name = eval.interner().lookup(eval.symbols().symbol(decl.symbol).name),
            %ty,
            "inferred"
        );
        eval.symbols_mut().set_type(decl.symbol, ty);
    }
    Ok(())
}

fn binding_type(
    eval: &Evaluator,
    symbol: kiln_eval::SymbolId,
    annotation: Option<Name>,
    init: Option<&Expr>,
    decl_span: Span,
) -> Result<Type, TypeCheckError> {
    let data = eval.symbols().symbol(symbol);
    let span = init.map_or(decl_span, |e| e.span);
    // A const carries its evaluated value; otherwise only a literal
    // initializer has a value known here.
    let value = data
        .value
        .as_ref()
        .and_then(Value::as_number)
        .or_else(|| init.and_then(literal_value));
    let found = match (init, value) {
        (_, Some(value)) => literal_type(&value),
        (Some(init), None) => ExprTyper.type_of(init, data.scope, eval.symbols(), eval.interner()),
        (None, None) => Type::Unresolved,
    };

    let Some(annotation) = annotation else {
        if let Some(value) = value.filter(|v| v.is_integer() && v.literal_width().is_none()) {
            return Err(TypeCheckError::overflow(value, PrimitiveType::UInt128, span));
        }
        return Ok(found);
    };

    let ty = resolve_type(eval, annotation, decl_span)?;
    let Some(primitive) = ty.as_primitive() else {
        return Ok(ty);
    };
    if !assignable(primitive, &found) {
        return Err(TypeCheckError::mismatch(primitive, found, span));
    }
    if let (Some(width), Some(value)) = (primitive.int_width(), value) {
        value
            .narrow(width, NarrowMode::Checked)
            .map_err(|_| TypeCheckError::overflow(value, primitive, span))?;
    }
    Ok(ty)
}

fn resolve_type(eval: &Evaluator, name: Name, span: Span) -> Result<Type, TypeCheckError> {
    let text = eval.interner().lookup(name);
    ExprTyper
        .primitive_type(text)
        .ok_or_else(|| TypeCheckError::unknown_type(text, span))
}

/// Value of a numeric literal initializer, looking through negation.
fn literal_value(expr: &Expr) -> Option<Numeric> {
    match &expr.kind {
        ExprKind::Number(value) => Some(*value),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => literal_value(operand).map(Numeric::negate),
        _ => None,
    }
}
