//! Flattening a range of axes into an rfactor domain.

use crate::test::helpers::*;
use crate::{Error, ExprType, Fusion, IterType, TensorDomain};

fn rfactor_extents(fusion: &Fusion, td: crate::ValId) -> Vec<Option<i64>> {
    let domain = fusion.tensor_domain(td).unwrap();
    domain.rfactor_domain().iter().map(|&id| axis_extent(fusion, id)).collect()
}

#[test]
fn test_flatten_middle() {
    init_tracing();
    let mut fusion = Fusion::default();
    let td = root_domain(&mut fusion, &[2, 3, 4, 5]);
    let flat = TensorDomain::flatten(&mut fusion, td, 1, 2).unwrap();

    assert_eq!(rfactor_extents(&fusion, flat), vec![Some(2), Some(12), Some(5)]);
    let domain = fusion.tensor_domain(flat).unwrap();
    assert_eq!(domain.root_domain().len(), 4);
    assert_eq!(domain.domain(), domain.rfactor_domain());
    assert_eq!(domain.contiguity(), &[true, true, true]);
    for &id in domain.rfactor_domain() {
        assert!(fusion.iter_domain(id).unwrap().is_rfactor_product());
    }

    let merged = domain.rfactor_domain()[1];
    let def = fusion.definition(merged).unwrap();
    assert_eq!(fusion.expr(def).etype(), ExprType::Merge);
}

#[test]
fn test_flatten_whole_domain() {
    let mut fusion = Fusion::default();
    let td = root_domain(&mut fusion, &[2, 3, 4]);
    let flat = TensorDomain::flatten(&mut fusion, td, 0, -1).unwrap();
    assert_eq!(rfactor_extents(&fusion, flat), vec![Some(24)]);
}

#[test]
fn test_flatten_single_axis_is_a_copy() {
    let mut fusion = Fusion::default();
    let td = root_domain(&mut fusion, &[2, 3]);
    let flat = TensorDomain::flatten(&mut fusion, td, 1, 1).unwrap();
    let domain = fusion.tensor_domain(flat).unwrap();
    assert_eq!(domain.rfactor_domain(), domain.root_domain());
    assert_eq!(rfactor_extents(&fusion, flat), vec![Some(2), Some(3)]);
}

#[test]
fn test_flatten_skips_reductions() {
    let mut fusion = Fusion::default();
    let td = root_domain_of(
        &mut fusion,
        &[(2, IterType::Iteration), (7, IterType::Reduction), (3, IterType::Iteration)],
    );
    let flat = TensorDomain::flatten(&mut fusion, td, 0, 1).unwrap();
    assert_eq!(rfactor_extents(&fusion, flat), vec![Some(6)]);
}

#[test]
fn test_flatten_keeps_broadcast_flag() {
    let mut fusion = Fusion::default();
    let td = root_domain_of(
        &mut fusion,
        &[(1, IterType::Broadcast), (3, IterType::Iteration), (4, IterType::Iteration)],
    );
    let flat = TensorDomain::flatten(&mut fusion, td, 1, 2).unwrap();
    let domain = fusion.tensor_domain(flat).unwrap();
    let first = fusion.iter_domain(domain.root_domain()[0]).unwrap();
    assert!(first.is_broadcast());
    assert!(!first.is_rfactor_product());
    assert!(domain.has_view_like_rfactor(&fusion));
}

#[test]
fn test_flatten_invalid_range() {
    let mut fusion = Fusion::default();
    let td = root_domain(&mut fusion, &[2, 3, 4]);
    for (start, end) in [(2, 1), (0, 3), (-4, 0)] {
        let err = TensorDomain::flatten(&mut fusion, td, start, end).unwrap_err();
        assert!(matches!(err, Error::InvalidFlattenRange { ndims: 3, .. }), "{err}");
    }
}
