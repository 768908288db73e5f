//! Result types of the built-in operators.

use kiln_ir::{BinaryOp, PrimitiveType, Type, UnaryOp};

/// Type of `left op right`; `Unresolved` when an operand is.
pub fn binary_result(op: BinaryOp, left: &Type, right: &Type) -> Type {
    match op {
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::And
        | BinaryOp::Or => PrimitiveType::Boolean.into(),
        BinaryOp::Range => Type::List,
        BinaryOp::Add if is_string(left) || is_string(right) => PrimitiveType::String.into(),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            match (left.as_primitive(), right.as_primitive()) {
                (Some(l), Some(r)) => join_numeric(l, r).map_or(Type::Unresolved, Type::Primitive),
                _ => Type::Unresolved,
            }
        }
    }
}

pub fn unary_result(op: UnaryOp, operand: &Type) -> Type {
    match op {
        UnaryOp::Not => PrimitiveType::Boolean.into(),
        UnaryOp::Neg => operand.clone(),
    }
}

/// Common numeric type of two operands: floats absorb integers, and the
/// wider integer wins.
fn join_numeric(left: PrimitiveType, right: PrimitiveType) -> Option<PrimitiveType> {
    if left.is_float() || right.is_float() {
        if (left.is_float() || left.is_integer()) && (right.is_float() || right.is_integer()) {
            return Some(PrimitiveType::Float64);
        }
        return None;
    }
    if !left.is_integer() || !right.is_integer() {
        return None;
    }
    Some(if right.bits() > left.bits() { right } else { left })
}

fn is_string(ty: &Type) -> bool {
    ty.as_primitive() == Some(PrimitiveType::String)
}

/// Whether a value of type `found` may initialize a binding declared `expected`.
pub fn assignable(expected: PrimitiveType, found: &Type) -> bool {
    let Some(found) = found.as_primitive() else {
        // Unknown until later; nothing to check.
        return true;
    };
    if expected == found {
        return true;
    }
    if expected.is_integer() {
        return found.is_integer();
    }
    if expected.is_float() {
        return found.is_integer() || found.is_float();
    }
    false
}
