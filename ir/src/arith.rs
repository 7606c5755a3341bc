//! Scalar arithmetic used to derive extents.
//!
//! Operations on two constant integers fold into a new constant; identities
//! such as `x * 1` and `x + 0` return the operand. Everything else registers
//! an expression whose output is a fresh symbolic scalar.

use fuser_dtype::DataType;
use snafu::{OptionExt, ensure};

use crate::error::*;
use crate::{BinaryOpType, ExprKind, ExprType, Fusion, TernaryOpType, UnaryOpType, ValId};

pub fn add(fusion: &mut Fusion, lhs: ValId, rhs: ValId) -> Result<ValId> {
    binary_op(fusion, BinaryOpType::Add, lhs, rhs)
}

pub fn sub(fusion: &mut Fusion, lhs: ValId, rhs: ValId) -> Result<ValId> {
    binary_op(fusion, BinaryOpType::Sub, lhs, rhs)
}

pub fn mul(fusion: &mut Fusion, lhs: ValId, rhs: ValId) -> Result<ValId> {
    binary_op(fusion, BinaryOpType::Mul, lhs, rhs)
}

pub fn ceil_div(fusion: &mut Fusion, lhs: ValId, rhs: ValId) -> Result<ValId> {
    binary_op(fusion, BinaryOpType::CeilDiv, lhs, rhs)
}

fn fold_int(op: BinaryOpType, lhs: i64, rhs: i64) -> Option<i64> {
    match op {
        BinaryOpType::Add => lhs.checked_add(rhs),
        BinaryOpType::Sub => lhs.checked_sub(rhs),
        BinaryOpType::Mul => lhs.checked_mul(rhs),
        BinaryOpType::Div => lhs.checked_div(rhs),
        BinaryOpType::Mod => lhs.checked_rem(rhs),
        BinaryOpType::CeilDiv => {
            let quotient = lhs.checked_div(rhs)?;
            let rounds_up = lhs % rhs != 0 && (lhs < 0) == (rhs < 0);
            quotient.checked_add(i64::from(rounds_up))
        }
        BinaryOpType::Max => Some(lhs.max(rhs)),
        BinaryOpType::Min => Some(lhs.min(rhs)),
        _ => None,
    }
}

/// Operand returned unchanged by `op` when the other operand is an
/// identity element.
fn fold_identity(fusion: &Fusion, op: BinaryOpType, lhs: ValId, rhs: ValId) -> Option<ValId> {
    let (l, r) = (fusion.val(lhs), fusion.val(rhs));
    match op {
        BinaryOpType::Add if l.is_zero_int() => Some(rhs),
        BinaryOpType::Add | BinaryOpType::Sub if r.is_zero_int() => Some(lhs),
        BinaryOpType::Mul if l.is_one_int() => Some(rhs),
        BinaryOpType::Mul | BinaryOpType::Div | BinaryOpType::CeilDiv if r.is_one_int() => Some(lhs),
        _ => None,
    }
}

/// Combine two scalars, folding constants where possible.
pub fn binary_op(fusion: &mut Fusion, op: BinaryOpType, lhs: ValId, rhs: ValId) -> Result<ValId> {
    for id in [lhs, rhs] {
        ensure!(
            fusion.try_val(id)?.is_scalar(),
            InvalidOperandSnafu { op: ExprType::BinaryOp, id: fusion.render(id), expected: "scalar" }
        );
    }
    let (l, r) = (fusion.val(lhs), fusion.val(rhs));

    if matches!(op, BinaryOpType::Div | BinaryOpType::CeilDiv | BinaryOpType::Mod) {
        ensure!(!r.is_zero_int(), DivisionByZeroSnafu);
    }
    if let (Some(a), Some(b)) = (l.const_int(), r.const_int())
        && let Some(folded) = fold_int(op, a, b)
    {
        return Ok(fusion.new_int(folded));
    }
    if let Some(operand) = fold_identity(fusion, op, lhs, rhs) {
        return Ok(operand);
    }

    let dtype = if op.is_logical() {
        DataType::Bool
    } else {
        DataType::promote(&[l.dtype(), r.dtype()])
            .context(TypePromotionSnafu { lhs: l.dtype(), rhs: r.dtype() })?
    };
    let out = fusion.new_symbolic(dtype);
    fusion.register_expr(ExprKind::BinaryOp { op }, &[lhs, rhs], &[out])?;
    Ok(out)
}

pub fn unary_op(fusion: &mut Fusion, op: UnaryOpType, input: ValId) -> Result<ValId> {
    let val = fusion.try_val(input)?;
    ensure!(
        val.is_scalar(),
        InvalidOperandSnafu { op: ExprType::UnaryOp, id: fusion.render(input), expected: "scalar" }
    );
    if let (UnaryOpType::Neg, Some(v)) = (op, val.const_int())
        && let Some(negated) = v.checked_neg()
    {
        return Ok(fusion.new_int(negated));
    }

    let dtype = if op == UnaryOpType::Not { DataType::Bool } else { val.dtype() };
    let out = fusion.new_symbolic(dtype);
    fusion.register_expr(ExprKind::UnaryOp { op }, &[input], &[out])?;
    Ok(out)
}

pub fn ternary_op(fusion: &mut Fusion, op: TernaryOpType, a: ValId, b: ValId, c: ValId) -> Result<ValId> {
    for id in [a, b, c] {
        ensure!(
            fusion.try_val(id)?.is_scalar(),
            InvalidOperandSnafu { op: ExprType::TernaryOp, id: fusion.render(id), expected: "scalar" }
        );
    }
    // The value operands of `where` are the last two.
    let operands = if op == TernaryOpType::Where { [b, c] } else { [a, b] };
    let dtypes = operands.map(|id| fusion.val(id).dtype());
    let dtype = DataType::promote(&dtypes).context(TypePromotionSnafu { lhs: dtypes[0], rhs: dtypes[1] })?;

    let out = fusion.new_symbolic(dtype);
    fusion.register_expr(ExprKind::TernaryOp { op }, &[a, b, c], &[out])?;
    Ok(out)
}
