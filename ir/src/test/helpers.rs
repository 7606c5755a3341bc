//! Shared fixtures for unit and property tests.

use crate::{DataType, Fusion, IterDomainBuilder, IterType, TensorDomain, ValId};

/// Route `tracing` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Iteration domain over `[0, extent)`.
pub fn const_domain(fusion: &mut Fusion, extent: i64) -> ValId {
    domain_of(fusion, extent, IterType::Iteration)
}

pub fn domain_of(fusion: &mut Fusion, extent: i64, iter_type: IterType) -> ValId {
    let extent = fusion.new_int(extent);
    let zero = fusion.zero_val();
    IterDomainBuilder::new(zero, extent).iter_type(iter_type).build(fusion).unwrap()
}

/// Iteration domain whose extent is a symbolic fusion input.
pub fn symbolic_domain(fusion: &mut Fusion) -> ValId {
    let extent = fusion.new_symbolic(DataType::Int);
    fusion.add_input(extent).unwrap();
    let zero = fusion.zero_val();
    IterDomainBuilder::new(zero, extent).build(fusion).unwrap()
}

/// Root tensor domain of iteration axes with constant extents.
pub fn root_domain(fusion: &mut Fusion, extents: &[i64]) -> ValId {
    let root = extents.iter().map(|&e| const_domain(fusion, e)).collect();
    TensorDomain::new_root(fusion, root, None).unwrap()
}

/// Root tensor domain with one axis per `(extent, kind)` pair.
pub fn root_domain_of(fusion: &mut Fusion, axes: &[(i64, IterType)]) -> ValId {
    let root = axes.iter().map(|&(e, kind)| domain_of(fusion, e, kind)).collect();
    TensorDomain::new_root(fusion, root, None).unwrap()
}

/// Float tensor over a fresh root domain.
pub fn tensor(fusion: &mut Fusion, axes: &[(i64, IterType)]) -> ValId {
    let td = root_domain_of(fusion, axes);
    fusion.new_tensor_view(td, DataType::Float).unwrap()
}

/// Constant extents of the current domain, `None` for symbolic ones.
pub fn extents(fusion: &Fusion, td: ValId) -> Vec<Option<i64>> {
    fusion.tensor_domain(td).unwrap().domain().iter().map(|&id| axis_extent(fusion, id)).collect()
}

pub fn axis_extent(fusion: &Fusion, id: ValId) -> Option<i64> {
    fusion.val(fusion.iter_domain(id).unwrap().extent()).const_int()
}

pub fn iter_types(fusion: &Fusion, ids: &[ValId]) -> Vec<IterType> {
    ids.iter().map(|&id| fusion.iter_domain(id).unwrap().iter_type()).collect()
}
