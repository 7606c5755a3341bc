//! Copying graphs between fusions.

use crate::test::helpers::*;
use crate::{DataType, Fusion, IrCloner, IterType, StructuralEq, TensorDomain};

/// A tensor with a split and merged domain marked as input and output.
fn scheduled(fusion: &mut Fusion) -> crate::ValId {
    let td = root_domain_of(fusion, &[(8, IterType::Iteration), (6, IterType::Reduction)]);
    let factor = fusion.new_int(2);
    TensorDomain::split(fusion, td, 0, factor, true, false).unwrap();
    TensorDomain::merge(fusion, td, 0, 1).unwrap();
    let tv = fusion.new_tensor_view(td, DataType::Float).unwrap();
    let extent = fusion.new_symbolic(DataType::Int);
    fusion.add_input(extent).unwrap();
    fusion.add_input(tv).unwrap();
    fusion.add_output(tv).unwrap();
    tv
}

#[test]
fn test_copy_preserves_structure() {
    init_tracing();
    let mut fusion = Fusion::default();
    let tv = scheduled(&mut fusion);
    let (copy, map) = fusion.copy().unwrap();

    assert_eq!(copy.num_vals(), fusion.num_vals());
    assert_eq!(copy.exprs().count(), fusion.exprs().count());
    assert_eq!(copy.inputs().len(), 2);
    assert_eq!(copy.outputs(), &[map[&tv]]);
    assert!(copy.val(map[&tv]).is_fusion_input());
    assert!(StructuralEq::new(&fusion, &copy).vals(tv, map[&tv]));
    assert_eq!(map[&fusion.zero_val()], copy.zero_val());
}

#[test]
fn test_copy_preserves_history() {
    let mut fusion = Fusion::default();
    let tv = scheduled(&mut fusion);
    let (copy, map) = fusion.copy().unwrap();

    let td = fusion.tensor_view(tv).unwrap().domain();
    let copied_td = copy.tensor_view(map[&tv]).unwrap().domain();
    let original = fusion.tensor_domain(td).unwrap();
    let copied = copy.tensor_domain(copied_td).unwrap();
    for (&a, &b) in original.domain().iter().zip(copied.domain()) {
        assert_eq!(map[&a], b);
        match (fusion.definition(a), copy.definition(b)) {
            (Some(x), Some(y)) => assert!(StructuralEq::new(&fusion, &copy).exprs(x, y)),
            (None, None) => {}
            other => panic!("definitions differ: {other:?}"),
        }
    }
    assert_eq!(copy.to_string().lines().count(), fusion.to_string().lines().count());
}

#[test]
fn test_clone_domain_into_other_fusion() {
    let mut source = Fusion::default();
    let td = root_domain(&mut source, &[12]);
    let factor = source.new_int(4);
    TensorDomain::split(&mut source, td, 0, factor, false, false).unwrap();

    let mut target = Fusion::default();
    target.new_int(99);
    let cloned = TensorDomain::clone_into(&source, &mut target, td).unwrap();
    assert!(StructuralEq::new(&source, &target).vals(td, cloned));
    assert_eq!(target.exprs().count(), 1);
    assert_eq!(extents(&target, cloned), vec![Some(4), Some(3)]);
}

#[test]
fn test_cloner_memoizes() {
    let mut source = Fusion::default();
    let id = const_domain(&mut source, 7);
    let mut target = Fusion::default();
    let mut cloner = IrCloner::new(&source, &target);

    let first = cloner.clone_val(&mut target, id).unwrap();
    let again = cloner.clone_val(&mut target, id).unwrap();
    assert_eq!(first, again);
    assert_eq!(cloner.val_map().len(), 4);
    assert!(cloner.expr_map().is_empty());
}
