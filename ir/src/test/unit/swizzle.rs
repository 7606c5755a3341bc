//! Swizzle tests.

use crate::test::helpers::*;
use crate::{Error, ExprKind, Fusion, IterDomain, IterType, ParallelType, Swizzle2DType, TensorDomain};

#[test]
fn test_swizzle_copies_inputs() {
    let mut fusion = Fusion::default();
    let x = const_domain(&mut fusion, 8);
    let y = const_domain(&mut fusion, 4);
    IterDomain::parallelize(&mut fusion, y, ParallelType::TIDx).unwrap();

    let (out_x, out_y) = IterDomain::swizzle(&mut fusion, Swizzle2DType::ZShape, x, y).unwrap();
    assert_ne!((out_x, out_y), (x, y));
    assert_eq!(fusion.iter_domain(out_x).unwrap(), fusion.iter_domain(x).unwrap());
    assert_eq!(fusion.iter_domain(out_y).unwrap().parallel_type(), ParallelType::TIDx);

    let def = fusion.definition(out_x).unwrap();
    let expr = fusion.expr(def);
    assert_eq!(expr.kind(), &ExprKind::Swizzle2D { swizzle_type: Swizzle2DType::ZShape });
    assert_eq!(expr.inputs(), &[x, y]);
    assert_eq!(expr.outputs(), &[out_x, out_y]);
}

#[test]
fn test_swizzle_rejects_reduction() {
    let mut fusion = Fusion::default();
    let x = const_domain(&mut fusion, 8);
    let y = domain_of(&mut fusion, 4, IterType::Reduction);
    let err = IterDomain::swizzle(&mut fusion, Swizzle2DType::Xor, x, y).unwrap_err();
    assert!(matches!(err, Error::InvalidSwizzle { .. }), "{err}");
}

#[test]
fn test_swizzle_rejects_zero_extent() {
    let mut fusion = Fusion::default();
    let x = const_domain(&mut fusion, 0);
    let y = const_domain(&mut fusion, 4);
    let err = IterDomain::swizzle(&mut fusion, Swizzle2DType::Xor, x, y).unwrap_err();
    assert!(matches!(err, Error::InvalidSwizzle { reason: "extent is zero", .. }), "{err}");
}

#[test]
fn test_swizzle_rejects_broadcast_history() {
    let mut fusion = Fusion::default();
    let b = domain_of(&mut fusion, 1, IterType::Broadcast);
    let i = const_domain(&mut fusion, 8);
    let merged = IterDomain::merge(&mut fusion, b, i).unwrap();
    let y = const_domain(&mut fusion, 4);

    let err = IterDomain::swizzle(&mut fusion, Swizzle2DType::Transpose, merged, y).unwrap_err();
    assert!(matches!(err, Error::InvalidSwizzle { .. }), "{err}");
}

#[test]
fn test_tensor_domain_swizzle_in_place() {
    let mut fusion = Fusion::default();
    let td = root_domain(&mut fusion, &[2, 8, 4]);
    let before = fusion.tensor_domain(td).unwrap().domain().to_vec();

    TensorDomain::swizzle(&mut fusion, td, Swizzle2DType::ZShape, 1, -1).unwrap();
    let after = fusion.tensor_domain(td).unwrap().domain().to_vec();
    assert_eq!(after[0], before[0]);
    assert_ne!(after[1], before[1]);
    assert_ne!(after[2], before[2]);
    assert_eq!(extents(&fusion, td), vec![Some(2), Some(8), Some(4)]);
}

#[test]
fn test_tensor_domain_swizzle_same_axis_fails() {
    let mut fusion = Fusion::default();
    let td = root_domain(&mut fusion, &[8, 4]);
    let err = TensorDomain::swizzle(&mut fusion, td, Swizzle2DType::Xor, 0, -2).unwrap_err();
    assert!(matches!(err, Error::InvalidSwizzle { .. }), "{err}");
}
