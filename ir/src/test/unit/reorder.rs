//! Reordering the current domain.

use test_case::test_case;

use crate::test::helpers::*;
use crate::{Error, Fusion, TensorDomain};

#[test_case(&[(0, 2)], &[3, 4, 2]; "move first to last")]
#[test_case(&[(2, 0)], &[4, 2, 3]; "move last to first")]
#[test_case(&[(0, 1), (1, 0)], &[3, 2, 4]; "swap leading pair")]
#[test_case(&[(-1, 0), (0, -1)], &[4, 3, 2]; "negative positions")]
#[test_case(&[], &[2, 3, 4]; "empty map")]
fn test_reorder(map: &[(i64, i64)], expected: &[i64]) {
    let mut fusion = Fusion::default();
    let td = root_domain(&mut fusion, &[2, 3, 4]);
    TensorDomain::reorder(&mut fusion, td, map).unwrap();
    let expected: Vec<Option<i64>> = expected.iter().map(|&e| Some(e)).collect();
    assert_eq!(extents(&fusion, td), expected);
}

#[test]
fn test_reorder_leaves_history_untouched() {
    let mut fusion = Fusion::default();
    let td = root_domain(&mut fusion, &[2, 3]);
    let exprs = fusion.exprs().count();
    TensorDomain::reorder(&mut fusion, td, &[(0, 1)]).unwrap();
    assert_eq!(fusion.exprs().count(), exprs);
    let domain = fusion.tensor_domain(td).unwrap();
    assert_eq!(domain.domain()[0], domain.root_domain()[1]);
}

#[test_case(&[(0, 3)]; "new out of range")]
#[test_case(&[(-4, 0)]; "old out of range")]
#[test_case(&[(0, 1), (0, 2)]; "duplicate old")]
#[test_case(&[(0, 1), (2, 1)]; "duplicate new")]
fn test_invalid_reorder(map: &[(i64, i64)]) {
    let mut fusion = Fusion::default();
    let td = root_domain(&mut fusion, &[2, 3, 4]);
    let before = fusion.tensor_domain(td).unwrap().domain().to_vec();
    let err = TensorDomain::reorder(&mut fusion, td, map).unwrap_err();
    assert!(matches!(err, Error::InvalidReorder { .. }), "{err}");
    assert_eq!(fusion.tensor_domain(td).unwrap().domain(), before.as_slice());
}

#[test]
fn test_reorder_empty_domain() {
    let mut fusion = Fusion::default();
    let td = TensorDomain::new_root(&mut fusion, Vec::new(), None).unwrap();
    TensorDomain::reorder(&mut fusion, td, &[]).unwrap();
    let err = TensorDomain::reorder(&mut fusion, td, &[(0, 0)]).unwrap_err();
    assert!(matches!(err, Error::EmptyDomain { .. }), "{err}");
}

#[test]
fn test_normalize_old2new_fills_gaps_in_order() {
    // Old 3 goes to 0, the rest keep their relative order.
    assert_eq!(TensorDomain::normalize_old2new(&[(3, 0)], 4).unwrap(), vec![1, 2, 3, 0]);
    assert_eq!(TensorDomain::normalize_old2new(&[(0, 2)], 4).unwrap(), vec![2, 0, 1, 3]);
}
