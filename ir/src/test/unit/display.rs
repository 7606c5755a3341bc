//! Text rendering.

use test_case::test_case;

use crate::test::helpers::*;
use crate::{
    Complex, DataType, Fusion, IterDomain, IterDomainBuilder, IterType, ParallelType, Swizzle2DType, TensorDomain,
};

#[test]
fn test_iter_domain() {
    let mut fusion = Fusion::default();
    let id = const_domain(&mut fusion, 12);
    assert_eq!(fusion.render(id), format!("iS{}{{12}}", id.index()));
}

#[test_case(IterType::Reduction, ParallelType::BIDx, "rbx"; "block reduction")]
#[test_case(IterType::Broadcast, ParallelType::TIDy, "bty"; "thread broadcast")]
#[test_case(IterType::Stride, ParallelType::Serial, "sS"; "stride")]
#[test_case(IterType::Gather, ParallelType::Unroll, "gUR"; "unrolled gather")]
fn test_iter_domain_prefix(iter_type: IterType, ptype: ParallelType, prefix: &str) {
    let mut fusion = Fusion::default();
    let id = domain_of(&mut fusion, 4, iter_type);
    IterDomain::parallelize(&mut fusion, id, ptype).unwrap();
    assert_eq!(fusion.render(id), format!("{prefix}{}{{4}}", id.index()));
}

#[test]
fn test_iter_domain_start_expanded_and_rfactor() {
    let mut fusion = Fusion::default();
    let (start, extent) = (fusion.new_int(2), fusion.new_int(8));
    let id = IterDomainBuilder::new(start, extent).build(&mut fusion).unwrap();
    assert_eq!(fusion.render(id), format!("iS{}{{2 : 8}}", id.index()));

    let (zero, one, expanded) = (fusion.zero_val(), fusion.one_val(), fusion.new_int(16));
    let id = IterDomainBuilder::new(zero, one)
        .iter_type(IterType::Broadcast)
        .expanded_extent(Some(expanded))
        .build(&mut fusion)
        .unwrap();
    assert_eq!(fusion.render(id), format!("bS{}{{1 ex 16}}", id.index()));

    let id = IterDomainBuilder::new(zero, extent).is_rfactor_product(true).build(&mut fusion).unwrap();
    assert_eq!(fusion.render(id), format!("iS{}{{8}}rf", id.index()));
}

#[test]
fn test_scalars() {
    let mut fusion = Fusion::default();
    let int = fusion.new_int(-3);
    let double = fusion.new_double(2.0);
    let boolean = fusion.new_bool(true);
    let complex = fusion.new_complex(Complex::new(1.0, 2.0));
    let symbolic = fusion.new_symbolic(DataType::Int);
    let float = fusion.new_symbolic(DataType::Float);
    let named = fusion.new_parallel_dim(ParallelType::TIDx).unwrap();

    assert_eq!(fusion.render(int), "-3");
    assert_eq!(fusion.render(double), "2.0");
    assert_eq!(fusion.render(boolean), "true");
    assert!(!fusion.render(complex).is_empty());
    assert_eq!(fusion.render(symbolic), format!("i{}", symbolic.index()));
    assert_eq!(fusion.render(float), format!("d{}", float.index()));
    assert_eq!(fusion.render(named), "blockDim.x");
}

#[test]
fn test_tensor_domain_and_view() {
    let mut fusion = Fusion::default();
    let td = root_domain(&mut fusion, &[2, 3]);
    let [a, b] = fusion.tensor_domain(td).unwrap().domain() else { panic!("expected two axes") };
    let expected = format!("[ iS{}{{2}}, iS{}{{3}} ]", a.index(), b.index());
    assert_eq!(fusion.render(td), expected);

    let tv = fusion.new_tensor_view(td, DataType::Float).unwrap();
    assert_eq!(fusion.render(tv), format!("T{}_float{expected}", tv.index()));
}

#[test]
fn test_split_expr() {
    let mut fusion = Fusion::default();
    let id = const_domain(&mut fusion, 12);
    let factor = fusion.new_int(4);
    let (outer, inner) = IterDomain::split(&mut fusion, id, factor, true, None, None).unwrap();
    let def = fusion.definition(outer).unwrap();
    assert_eq!(
        fusion.display_expr(def).to_string(),
        format!("Split: iS{}{{12}} by factor 4 -> iS{}{{3}}, iS{}{{4}}", id.index(), outer.index(), inner.index())
    );

    let (outer, _) = IterDomain::split(&mut fusion, inner, factor, false, None, None).unwrap();
    let def = fusion.definition(outer).unwrap();
    assert!(fusion.display_expr(def).to_string().starts_with("Outer split: "));
}

#[test]
fn test_merge_and_swizzle_exprs() {
    let mut fusion = Fusion::default();
    let (a, b) = (const_domain(&mut fusion, 6), const_domain(&mut fusion, 4));
    let merged = IterDomain::merge(&mut fusion, a, b).unwrap();
    let def = fusion.definition(merged).unwrap();
    assert_eq!(
        fusion.display_expr(def).to_string(),
        format!("Merge: iS{}{{6}} and iS{}{{4}} -> iS{}{{24}}", a.index(), b.index(), merged.index())
    );

    let (x, _) = IterDomain::swizzle(&mut fusion, Swizzle2DType::Xor, a, b).unwrap();
    let def = fusion.definition(x).unwrap();
    assert!(fusion.display_expr(def).to_string().starts_with("Xor("));
}

#[test]
fn test_fusion_listing() {
    let mut fusion = Fusion::default();
    let td = root_domain(&mut fusion, &[4, 4]);
    TensorDomain::merge(&mut fusion, td, 0, 1).unwrap();
    let tv = fusion.new_tensor_view(td, DataType::Float).unwrap();
    fusion.add_input(tv).unwrap();
    fusion.add_output(tv).unwrap();

    let listing = fusion.to_string();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Inputs: T"));
    assert!(lines[1].trim_start().starts_with("Merge: "));
    assert!(lines[2].starts_with("Outputs: T"));
}
