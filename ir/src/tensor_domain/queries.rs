use snafu::{OptionExt, ensure};

use crate::error::*;
use crate::{Fusion, IterDomain, ParallelType, TensorDomain, ValId, equality::StructuralEq};

fn iter_domains<'a>(fusion: &'a Fusion, ids: &'a [ValId]) -> impl Iterator<Item = (ValId, &'a IterDomain)> + 'a {
    ids.iter().filter_map(|&id| fusion.get_val(id)?.as_iter_domain().map(|d| (id, d)))
}

/// Axes that are neither reductions nor strides.
pub fn no_reductions(fusion: &Fusion, ids: &[ValId]) -> Vec<ValId> {
    iter_domains(fusion, ids).filter(|(_, d)| !d.is_reduction() && !d.is_stride()).map(|(id, _)| id).collect()
}

pub fn no_broadcasts(fusion: &Fusion, ids: &[ValId]) -> Vec<ValId> {
    iter_domains(fusion, ids).filter(|(_, d)| !d.is_broadcast()).map(|(id, _)| id).collect()
}

pub fn has_broadcast(fusion: &Fusion, ids: &[ValId]) -> bool {
    iter_domains(fusion, ids).any(|(_, d)| d.is_broadcast())
}

pub fn has_reduction(fusion: &Fusion, ids: &[ValId]) -> bool {
    iter_domains(fusion, ids).any(|(_, d)| d.is_reduction())
}

/// Any reduction other than one over a constant extent of one.
pub fn has_nontrivial_reduction(fusion: &Fusion, ids: &[ValId]) -> bool {
    iter_domains(fusion, ids).any(|(_, d)| d.is_reduction() && !d.is_trivial_reduction(fusion))
}

/// Pairwise structural equality of two axis lists of one fusion.
pub fn same_domains(fusion: &Fusion, lhs: &[ValId], rhs: &[ValId]) -> bool {
    StructuralEq::new(fusion, fusion).val_lists(lhs, rhs)
}

/// Resolve a possibly negative axis against `ndims`.
pub(crate) fn normalize_axis(axis: i64, ndims: usize) -> Result<usize> {
    let signed = if axis < 0 { axis + ndims as i64 } else { axis };
    ensure!(signed >= 0 && (signed as usize) < ndims, AxisOutOfRangeSnafu { axis, ndims });
    Ok(signed as usize)
}

impl TensorDomain {
    /// Current axis at `i`; negative indices count from the end.
    pub fn axis(&self, i: i64) -> Result<ValId> {
        ensure!(!self.domain.is_empty(), EmptyDomainSnafu { op: "access an axis of" });
        Ok(self.domain[normalize_axis(i, self.domain.len())?])
    }

    /// Position of `id` in the current domain.
    pub fn pos_of(&self, fusion: &Fusion, id: ValId) -> Result<usize> {
        ensure!(!self.domain.is_empty(), EmptyDomainSnafu { op: "search" });
        self.domain.iter().position(|&d| d == id).with_context(|| DomainNotFoundSnafu {
            id: fusion.render(id),
            domain: "the current domain",
        })
    }

    /// Position of `id` in the root domain.
    pub fn root_pos_of(&self, fusion: &Fusion, id: ValId) -> Result<usize> {
        ensure!(!self.root_domain.is_empty(), EmptyDomainSnafu { op: "search" });
        self.root_domain.iter().position(|&d| d == id).with_context(|| DomainNotFoundSnafu {
            id: fusion.render(id),
            domain: "the root domain",
        })
    }

    fn any_axis(&self, fusion: &Fusion, pred: impl Fn(&IterDomain) -> bool) -> bool {
        iter_domains(fusion, &self.domain).any(|(_, d)| pred(d))
    }

    /// Whether any current axis is a reduction over more than one element.
    pub fn has_reduction(&self) -> bool {
        self.has_nontrivial_reduction
    }

    pub fn has_block_reduction(&self, fusion: &Fusion) -> bool {
        self.any_axis(fusion, |d| d.is_reduction() && d.is_thread_dim())
    }

    pub fn has_grid_reduction(&self, fusion: &Fusion) -> bool {
        self.any_axis(fusion, |d| d.is_reduction() && d.is_block_dim())
    }

    pub fn has_broadcast(&self) -> bool {
        self.no_bcast_domain.len() != self.domain.len()
    }

    pub fn has_block_broadcast(&self, fusion: &Fusion) -> bool {
        self.any_axis(fusion, |d| d.is_broadcast() && d.is_thread_dim())
    }

    pub fn has_grid_broadcast(&self, fusion: &Fusion) -> bool {
        self.any_axis(fusion, |d| d.is_broadcast() && d.is_block_dim())
    }

    pub fn has_rfactor(&self) -> bool {
        !self.rfactor_domain.is_empty()
    }

    /// An rfactor domain none of whose axes is a reduction rfactor product,
    /// as produced by reshapes rather than by [`rfactor`](Self::rfactor).
    pub fn has_view_like_rfactor(&self, fusion: &Fusion) -> bool {
        self.has_rfactor()
            && !iter_domains(fusion, self.maybe_rfactor_domain())
                .any(|(_, d)| d.is_reduction() && d.is_rfactor_product())
    }

    pub fn has_vectorize(&self, fusion: &Fusion) -> bool {
        self.any_axis(fusion, |d| {
            matches!(d.parallel_type(), ParallelType::Vectorize | ParallelType::MisalignedVectorize)
        })
    }

    /// Position of the first reduction axis.
    pub fn reduction_axis(&self, fusion: &Fusion) -> Option<usize> {
        self.domain
            .iter()
            .position(|&id| fusion.get_val(id).and_then(|v| v.as_iter_domain()).is_some_and(IterDomain::is_reduction))
    }
}
