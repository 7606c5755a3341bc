//! Two-stage reduction replay.

use test_case::test_case;

use crate::test::helpers::*;
use crate::{Error, ExprType, Fusion, IterType, ParallelType, TensorDomain, ValId};

/// `[i4, r8]` with the reduction split by 2 into `[i4, r4, r2]`.
fn split_reduction(fusion: &mut Fusion) -> ValId {
    let td = root_domain_of(fusion, &[(4, IterType::Iteration), (8, IterType::Reduction)]);
    let factor = fusion.new_int(2);
    TensorDomain::split(fusion, td, 1, factor, true, false).unwrap();
    td
}

fn rfactor_flags(fusion: &Fusion, ids: &[ValId]) -> Vec<bool> {
    ids.iter().map(|&id| fusion.iter_domain(id).unwrap().is_rfactor_product()).collect()
}

#[test]
fn test_rfactor_outer_reduction() {
    init_tracing();
    let mut fusion = Fusion::default();
    let td = split_reduction(&mut fusion);
    let (producer, consumer) = TensorDomain::rfactor(&mut fusion, td, &[1]).unwrap();

    let p = fusion.tensor_domain(producer).unwrap();
    assert_eq!(p.root_domain().len(), 2);
    assert_eq!(p.rfactor_domain(), p.domain());
    assert_eq!(iter_types(&fusion, p.root_domain()), vec![IterType::Iteration, IterType::Reduction]);
    assert_eq!(rfactor_flags(&fusion, p.root_domain()), vec![false, true]);
    assert_eq!(
        iter_types(&fusion, p.domain()),
        vec![IterType::Iteration, IterType::Reduction, IterType::Iteration]
    );
    assert_eq!(rfactor_flags(&fusion, p.domain()), vec![false, true, false]);
    assert_eq!(extents(&fusion, producer), vec![Some(4), Some(4), Some(2)]);
    assert!(!p.has_view_like_rfactor(&fusion));

    let c = fusion.tensor_domain(consumer).unwrap();
    assert!(!c.has_rfactor());
    assert_eq!(iter_types(&fusion, c.domain()), vec![IterType::Iteration, IterType::Reduction]);
    assert_eq!(extents(&fusion, consumer), vec![Some(4), Some(2)]);
    assert_eq!(rfactor_flags(&fusion, c.root_domain()), vec![false, false]);
}

#[test]
fn test_rfactor_replays_history() {
    let mut fusion = Fusion::default();
    let td = split_reduction(&mut fusion);
    let (producer, _) = TensorDomain::rfactor(&mut fusion, td, &[-1]).unwrap();

    let p = fusion.tensor_domain(producer).unwrap();
    let split = fusion.definition(p.axis(1).unwrap()).unwrap();
    let expr = fusion.expr(split);
    assert_eq!(expr.etype(), ExprType::Split);
    assert_eq!(expr.inputs(), &p.root_domain()[1..]);
    assert_eq!(iter_types(&fusion, p.domain()), vec![IterType::Iteration, IterType::Iteration, IterType::Reduction]);
}

#[test]
fn test_rfactor_keeps_current_placement() {
    let mut fusion = Fusion::default();
    let td = split_reduction(&mut fusion);
    let inner = fusion.tensor_domain(td).unwrap().axis(2).unwrap();
    crate::IterDomain::parallelize(&mut fusion, inner, ParallelType::TIDx).unwrap();

    let (producer, consumer) = TensorDomain::rfactor(&mut fusion, td, &[1]).unwrap();
    let p_inner = fusion.tensor_domain(producer).unwrap().axis(2).unwrap();
    assert_eq!(fusion.iter_domain(p_inner).unwrap().parallel_type(), ParallelType::TIDx);
    let c_inner = fusion.tensor_domain(consumer).unwrap().axis(1).unwrap();
    assert_eq!(fusion.iter_domain(c_inner).unwrap().parallel_type(), ParallelType::TIDx);
}

#[test_case(&[]; "no axes")]
#[test_case(&[3]; "out of range")]
#[test_case(&[-4]; "negative out of range")]
#[test_case(&[0]; "iteration axis")]
#[test_case(&[1, 2]; "every reduction")]
fn test_invalid_rfactor(axes: &[i64]) {
    let mut fusion = Fusion::default();
    let td = split_reduction(&mut fusion);
    let err = TensorDomain::rfactor(&mut fusion, td, axes).unwrap_err();
    assert!(matches!(err, Error::InvalidRFactor { .. }), "{err}");
}

#[test]
fn test_rfactor_rejects_partial_root() {
    let mut fusion = Fusion::default();
    let extent = fusion.new_int(8);
    let start = fusion.new_int(1);
    let partial = crate::IterDomainBuilder::new(start, extent)
        .iter_type(IterType::Reduction)
        .build(&mut fusion)
        .unwrap();
    let other = domain_of(&mut fusion, 4, IterType::Reduction);
    let td = TensorDomain::new_root(&mut fusion, vec![partial, other], None).unwrap();

    let err = TensorDomain::rfactor(&mut fusion, td, &[0]).unwrap_err();
    assert!(matches!(err, Error::InvalidRFactor { .. }), "{err}");
    TensorDomain::rfactor(&mut fusion, td, &[1]).unwrap();
}
