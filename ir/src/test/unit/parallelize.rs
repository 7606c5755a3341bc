//! Parallel placement tests.

use test_case::test_case;

use crate::test::helpers::*;
use crate::{Error, Fusion, IterDomain, IterDomainBuilder, IterType, ParallelType};

#[test_case(ParallelType::Vectorize; "vectorize")]
#[test_case(ParallelType::Unroll; "unroll")]
#[test_case(ParallelType::Group; "group")]
fn test_static_extent_accepted(ptype: ParallelType) {
    let mut fusion = Fusion::default();
    let id = const_domain(&mut fusion, 4);
    IterDomain::parallelize(&mut fusion, id, ptype).unwrap();
    assert_eq!(fusion.iter_domain(id).unwrap().parallel_type(), ptype);
}

#[test]
fn test_vectorize_is_idempotent() {
    let mut fusion = Fusion::default();
    let id = const_domain(&mut fusion, 4);
    IterDomain::parallelize(&mut fusion, id, ParallelType::Vectorize).unwrap();
    let before = *fusion.iter_domain(id).unwrap();
    let vals = fusion.num_vals();

    IterDomain::parallelize(&mut fusion, id, ParallelType::Vectorize).unwrap();
    assert_eq!(*fusion.iter_domain(id).unwrap(), before);
    assert_eq!(fusion.num_vals(), vals);
}

#[test_case(ParallelType::Vectorize; "vectorize")]
#[test_case(ParallelType::Unroll; "unroll")]
#[test_case(ParallelType::Group; "group")]
fn test_symbolic_extent_rejected(ptype: ParallelType) {
    let mut fusion = Fusion::default();
    let id = symbolic_domain(&mut fusion);
    let err = IterDomain::parallelize(&mut fusion, id, ptype).unwrap_err();
    assert!(matches!(err, Error::InvalidParallelize { ptype: p, .. } if p == ptype), "{err}");
    assert_eq!(fusion.iter_domain(id).unwrap().parallel_type(), ParallelType::Serial);
}

#[test]
fn test_vectorize_rejects_non_zero_start() {
    let mut fusion = Fusion::default();
    let extent = fusion.new_int(8);
    let start = fusion.new_int(1);
    let id = IterDomainBuilder::new(start, extent).build(&mut fusion).unwrap();
    let err = IterDomain::parallelize(&mut fusion, id, ParallelType::Vectorize).unwrap_err();
    assert!(matches!(err, Error::InvalidParallelize { .. }), "{err}");
}

#[test]
fn test_thread_placement_accepts_symbolic_extent() {
    let mut fusion = Fusion::default();
    let id = symbolic_domain(&mut fusion);
    IterDomain::parallelize(&mut fusion, id, ParallelType::TIDx).unwrap();
    IterDomain::parallelize(&mut fusion, id, ParallelType::BIDy).unwrap();
    assert_eq!(fusion.iter_domain(id).unwrap().parallel_type(), ParallelType::BIDy);
}

#[test]
fn test_group_requires_iteration() {
    let mut fusion = Fusion::default();
    let id = domain_of(&mut fusion, 4, IterType::Reduction);
    let err = IterDomain::parallelize(&mut fusion, id, ParallelType::Group).unwrap_err();
    assert!(matches!(err, Error::InvalidParallelize { ptype: ParallelType::Group, .. }), "{err}");
}

#[test_case(ParallelType::Vectorize, true; "vectorize")]
#[test_case(ParallelType::TIDx, true; "thread x")]
#[test_case(ParallelType::TIDy, false; "thread y")]
#[test_case(ParallelType::BIDx, false; "block x")]
#[test_case(ParallelType::Unroll, false; "unroll")]
fn test_mma_swizzled_placement(ptype: ParallelType, allowed: bool) {
    let mut fusion = Fusion::default();
    let id = const_domain(&mut fusion, 8);
    IterDomain::mark_mma_swizzled(&mut fusion, id).unwrap();
    assert_eq!(IterDomain::parallelize(&mut fusion, id, ptype).is_ok(), allowed);
}

#[test]
fn test_mma_swizzled_can_return_to_serial() {
    let mut fusion = Fusion::default();
    let id = const_domain(&mut fusion, 8);
    IterDomain::parallelize(&mut fusion, id, ParallelType::TIDx).unwrap();
    IterDomain::mark_mma_swizzled(&mut fusion, id).unwrap();
    IterDomain::parallelize(&mut fusion, id, ParallelType::Serial).unwrap();
    assert!(!fusion.iter_domain(id).unwrap().is_parallelized());
}

#[test]
fn test_pad_to_multiple_of_warp() {
    let mut fusion = Fusion::default();
    let id = symbolic_domain(&mut fusion);
    let err = IterDomain::pad_to_multiple_of_warp(&mut fusion, id, Some(64)).unwrap_err();
    assert!(matches!(err, Error::InvalidParallelize { .. }), "{err}");

    IterDomain::parallelize(&mut fusion, id, ParallelType::TIDx).unwrap();
    IterDomain::pad_to_multiple_of_warp(&mut fusion, id, Some(64)).unwrap();
    let domain = fusion.iter_domain(id).unwrap();
    assert!(domain.is_padded_dimension());
    assert_eq!(domain.padded_to_size(), Some(64));
}

#[test]
fn test_placement_predicates() {
    let mut fusion = Fusion::default();
    let id = const_domain(&mut fusion, 8);
    IterDomain::parallelize(&mut fusion, id, ParallelType::TIDy).unwrap();
    let domain = fusion.iter_domain(id).unwrap();
    assert!(domain.is_thread_dim());
    assert!(!domain.is_block_dim());
    assert!(domain.is_thread());

    IterDomain::parallelize(&mut fusion, id, ParallelType::BIDz).unwrap();
    let domain = fusion.iter_domain(id).unwrap();
    assert!(domain.is_block_dim());
    assert!(domain.is_thread());
}
