//! Scalar arithmetic and constant folding tests.

use test_case::test_case;

use crate::{BinaryOpType, DataType, Error, ExprKind, Fusion, UnaryOpType, arith};

#[test_case(BinaryOpType::Add, 7, 5, 12; "add")]
#[test_case(BinaryOpType::Sub, 7, 5, 2; "sub")]
#[test_case(BinaryOpType::Mul, 7, 5, 35; "mul")]
#[test_case(BinaryOpType::Div, 7, 5, 1; "div")]
#[test_case(BinaryOpType::Mod, 7, 5, 2; "mod")]
#[test_case(BinaryOpType::CeilDiv, 7, 5, 2; "ceil div")]
#[test_case(BinaryOpType::CeilDiv, 10, 5, 2; "ceil div exact")]
#[test_case(BinaryOpType::CeilDiv, -7, 5, -1; "ceil div negative")]
#[test_case(BinaryOpType::Max, 7, 5, 7; "max")]
#[test_case(BinaryOpType::Min, 7, 5, 5; "min")]
fn test_constant_folding(op: BinaryOpType, lhs: i64, rhs: i64, expected: i64) {
    let mut fusion = Fusion::default();
    let (a, b) = (fusion.new_int(lhs), fusion.new_int(rhs));
    let out = arith::binary_op(&mut fusion, op, a, b).unwrap();
    assert_eq!(fusion.val(out).const_int(), Some(expected));
    assert!(fusion.val(out).definition().is_none());
}

#[test]
fn test_identities_return_operand() {
    let mut fusion = Fusion::default();
    let x = fusion.new_symbolic(DataType::Int);
    let (zero, one) = (fusion.zero_val(), fusion.one_val());

    assert_eq!(arith::add(&mut fusion, zero, x).unwrap(), x);
    assert_eq!(arith::add(&mut fusion, x, zero).unwrap(), x);
    assert_eq!(arith::sub(&mut fusion, x, zero).unwrap(), x);
    assert_eq!(arith::mul(&mut fusion, one, x).unwrap(), x);
    assert_eq!(arith::mul(&mut fusion, x, one).unwrap(), x);
    assert_eq!(arith::ceil_div(&mut fusion, x, one).unwrap(), x);
    assert_eq!(fusion.exprs().count(), 0);
}

#[test]
fn test_symbolic_operation_registers_expr() {
    let mut fusion = Fusion::default();
    let x = fusion.new_symbolic(DataType::Int);
    let four = fusion.new_int(4);
    let out = arith::ceil_div(&mut fusion, x, four).unwrap();

    let def = fusion.definition(out).expect("symbolic result has a definition");
    let expr = fusion.expr(def);
    assert_eq!(expr.kind(), &ExprKind::BinaryOp { op: BinaryOpType::CeilDiv });
    assert_eq!(expr.inputs(), &[x, four]);
    assert_eq!(fusion.val(out).dtype(), DataType::Int);
    assert!(fusion.val(x).uses().contains(&def));
}

#[test]
fn test_promotes_dtype() {
    let mut fusion = Fusion::default();
    let x = fusion.new_symbolic(DataType::Int);
    let y = fusion.new_symbolic(DataType::Double);
    let out = arith::add(&mut fusion, x, y).unwrap();
    assert_eq!(fusion.val(out).dtype(), DataType::Double);

    let cmp = arith::binary_op(&mut fusion, BinaryOpType::LT, x, y).unwrap();
    assert_eq!(fusion.val(cmp).dtype(), DataType::Bool);
}

#[test_case(BinaryOpType::Div; "div")]
#[test_case(BinaryOpType::CeilDiv; "ceil div")]
#[test_case(BinaryOpType::Mod; "mod")]
fn test_division_by_constant_zero(op: BinaryOpType) {
    let mut fusion = Fusion::default();
    let x = fusion.new_symbolic(DataType::Int);
    let zero = fusion.zero_val();
    assert_eq!(arith::binary_op(&mut fusion, op, x, zero).unwrap_err(), Error::DivisionByZero);
}

#[test]
fn test_overflow_is_not_folded() {
    let mut fusion = Fusion::default();
    let (a, b) = (fusion.new_int(i64::MAX), fusion.new_int(2));
    let out = arith::mul(&mut fusion, a, b).unwrap();
    assert_eq!(fusion.val(out).const_int(), None);
    assert!(fusion.definition(out).is_some());
}

#[test]
fn test_unary_ops() {
    let mut fusion = Fusion::default();
    let five = fusion.new_int(5);
    let neg = arith::unary_op(&mut fusion, UnaryOpType::Neg, five).unwrap();
    assert_eq!(fusion.val(neg).const_int(), Some(-5));

    let flag = fusion.new_symbolic(DataType::Int);
    let not = arith::unary_op(&mut fusion, UnaryOpType::Not, flag).unwrap();
    assert_eq!(fusion.val(not).dtype(), DataType::Bool);
}

#[test]
fn test_non_scalar_operand_rejected() {
    let mut fusion = Fusion::default();
    let id = crate::test::helpers::const_domain(&mut fusion, 4);
    let one = fusion.one_val();
    let err = arith::add(&mut fusion, id, one).unwrap_err();
    assert!(matches!(err, Error::InvalidOperand { expected: "scalar", .. }), "{err}");
}
