use std::collections::BTreeSet;

use snafu::ensure;

use super::queries::normalize_axis;
use crate::error::*;
use crate::rfactor::{RFactorReplay, ReplayRFactor};
use crate::{ExprKind, Fusion, IterDomain, IterDomainBuilder, Swizzle2DType, TensorDomain, ValId, arith};

impl TensorDomain {
    fn current(fusion: &Fusion, td: ValId, op: &'static str) -> Result<Vec<ValId>> {
        let domain = fusion.tensor_domain(td)?.domain.clone();
        ensure!(!domain.is_empty(), EmptyDomainSnafu { op });
        Ok(domain)
    }

    fn ensure_not_mma_swizzled(fusion: &Fusion, id: ValId, op: &'static str) -> Result<()> {
        ensure!(!fusion.iter_domain(id)?.is_mma_swizzled(), MmaSwizzledTransformSnafu { op, id: fusion.render(id) });
        Ok(())
    }

    /// Split current axis `axis` by `factor`, replacing it with the outer and
    /// inner outputs in that order. Trimming is only allowed on root axes.
    pub fn split(
        fusion: &mut Fusion,
        td: ValId,
        axis: i64,
        factor: ValId,
        inner_split: bool,
        trim_out_of_bounds: bool,
    ) -> Result<()> {
        let mut domain = Self::current(fusion, td, "split")?;
        let pos = normalize_axis(axis, domain.len())?;
        let id = domain[pos];

        if trim_out_of_bounds {
            let is_root = fusion.tensor_domain(td)?.root_domain.contains(&id);
            ensure!(is_root, PartialSplitOnDerivedSnafu { id: fusion.render(id) });
        }
        Self::ensure_not_mma_swizzled(fusion, id, "split")?;

        let (outer, inner) = IterDomain::split_trimmed(fusion, id, factor, inner_split, trim_out_of_bounds)?;
        domain.splice(pos..=pos, [outer, inner]);
        Self::set_domain(fusion, td, domain)
    }

    /// Merge two current axes into one placed at the smaller position. The
    /// axis at the smaller position becomes the outer input.
    pub fn merge(fusion: &mut Fusion, td: ValId, axis_o: i64, axis_i: i64) -> Result<()> {
        let mut domain = Self::current(fusion, td, "merge")?;
        let o = normalize_axis(axis_o, domain.len())?;
        let i = normalize_axis(axis_i, domain.len())?;
        ensure!(o != i, SameAxisMergeSnafu { axis: o });
        let (o, i) = if o > i { (i, o) } else { (o, i) };

        let (first, second) = (domain[o], domain[i]);
        Self::ensure_not_mma_swizzled(fusion, first, "merge")?;
        Self::ensure_not_mma_swizzled(fusion, second, "merge")?;

        let merged = IterDomain::merge(fusion, first, second)?;
        domain.remove(i);
        domain[o] = merged;
        Self::set_domain(fusion, td, domain)
    }

    /// Reorder the current domain by a partial `(old, new)` position map.
    ///
    /// Axes missing from the map keep their relative order and fill the
    /// unclaimed positions.
    pub fn reorder(fusion: &mut Fusion, td: ValId, old2new: &[(i64, i64)]) -> Result<()> {
        let domain = fusion.tensor_domain(td)?.domain.clone();
        ensure!(!domain.is_empty() || old2new.is_empty(), EmptyDomainSnafu { op: "reorder" });

        let reordered = Self::ordered_as(&domain, old2new)?;
        fusion.log_transform("reorder", &domain, &reordered);
        Self::set_domain(fusion, td, reordered)
    }

    /// `domain` permuted by a partial `(old, new)` position map.
    pub fn ordered_as(domain: &[ValId], old2new: &[(i64, i64)]) -> Result<Vec<ValId>> {
        if old2new.is_empty() {
            return Ok(domain.to_vec());
        }
        let old2new = Self::normalize_old2new(old2new, domain.len())?;
        let mut reordered = domain.to_vec();
        for (old, &new) in old2new.iter().enumerate() {
            reordered[new] = domain[old];
        }
        Ok(reordered)
    }

    /// Complete a partial `(old, new)` map into a full permutation indexed by
    /// old position.
    pub fn normalize_old2new(old2new: &[(i64, i64)], ndims: usize) -> Result<Vec<usize>> {
        let normalize = |pos: i64| normalize_axis(pos, ndims).map_err(|_| Error::InvalidReorder {
            reason: format!("position {pos} is out of range for {ndims} axes"),
        });
        let pairs =
            old2new.iter().map(|&(old, new)| Ok((normalize(old)?, normalize(new)?))).collect::<Result<Vec<_>>>()?;

        let olds: BTreeSet<usize> = pairs.iter().map(|&(old, _)| old).collect();
        let news: BTreeSet<usize> = pairs.iter().map(|&(_, new)| new).collect();
        ensure!(
            olds.len() == pairs.len() && news.len() == pairs.len(),
            InvalidReorderSnafu { reason: format!("duplicate entries in {old2new:?}") }
        );

        let mut new2old: Vec<Option<usize>> = vec![None; ndims];
        for &(old, new) in &pairs {
            new2old[new] = Some(old);
        }
        let mut unspecified = (0..ndims).filter(|pos| !olds.contains(pos));
        let mut result = vec![0; ndims];
        for (new, slot) in new2old.into_iter().enumerate() {
            // Both sets have the same size, so the free positions line up.
            let old = slot.or_else(|| unspecified.next()).unwrap_or(new);
            result[old] = new;
        }
        Ok(result)
    }

    /// Swizzle current axes `x` and `y`, replacing both in place.
    pub fn swizzle(fusion: &mut Fusion, td: ValId, swizzle_type: Swizzle2DType, x: i64, y: i64) -> Result<()> {
        let mut domain = Self::current(fusion, td, "swizzle")?;
        let x = normalize_axis(x, domain.len())?;
        let y = normalize_axis(y, domain.len())?;
        ensure!(
            x != y,
            InvalidSwizzleSnafu { id: fusion.render(domain[x]), reason: "an axis cannot be swizzled with itself" }
        );

        let (out_x, out_y) = IterDomain::swizzle(fusion, swizzle_type, domain[x], domain[y])?;
        domain[x] = out_x;
        domain[y] = out_y;
        Self::set_domain(fusion, td, domain)
    }

    /// Split `td` into a producer computing a partial reduction over `axes`
    /// and a consumer finishing it, using the default replay.
    pub fn rfactor(fusion: &mut Fusion, td: ValId, axes: &[i64]) -> Result<(ValId, ValId)> {
        Self::rfactor_with(fusion, td, axes, &ReplayRFactor)
    }

    pub fn rfactor_with(
        fusion: &mut Fusion,
        td: ValId,
        axes: &[i64],
        replay: &impl RFactorReplay,
    ) -> Result<(ValId, ValId)> {
        let (producer, consumer) = replay.run_replay(fusion, td, axes)?;
        tracing::debug!(%td, %producer, %consumer, ?axes, "rfactor");
        Ok((producer, consumer))
    }

    /// A new tensor domain whose rfactor domain merges the non-reduction
    /// axes `start..=end` of `td`'s rfactor-or-root domain into one.
    pub fn flatten(fusion: &mut Fusion, td: ValId, start: i64, end: i64) -> Result<ValId> {
        let input = fusion.tensor_domain(td)?;
        let input = super::no_reductions(fusion, input.maybe_rfactor_domain());
        let ndims = input.len();
        let range_error = || Error::InvalidFlattenRange { start, end, ndims };
        let first = normalize_axis(start, ndims).map_err(|_| range_error())?;
        let last = normalize_axis(end, ndims).map_err(|_| range_error())?;
        ensure!(first <= last, InvalidFlattenRangeSnafu { start, end, ndims });

        let mut root = Vec::with_capacity(ndims);
        for &id in &input {
            let domain = *fusion.iter_domain(id)?;
            let clone =
                IterDomainBuilder::from_existing(&domain).is_rfactor_product(!domain.is_broadcast()).build(fusion)?;
            root.push(clone);
        }

        let zero = fusion.zero_val();
        let mut merged = root[first];
        for &next in &root[first + 1..=last] {
            let (lhs, rhs) = (fusion.iter_domain(merged)?.extent(), fusion.iter_domain(next)?.extent());
            let extent = arith::mul(fusion, lhs, rhs)?;
            let out = IterDomainBuilder::new(zero, extent).is_rfactor_product(true).build(fusion)?;
            fusion.register_expr(ExprKind::Merge, &[merged, next], &[out])?;
            merged = out;
        }

        let rfactor: Vec<ValId> =
            root[..first].iter().copied().chain([merged]).chain(root[last + 1..].iter().copied()).collect();
        fusion.log_transform("flatten", &input, &rfactor);
        let contiguity = vec![true; rfactor.len()];
        Self::with_rfactor(fusion, root, rfactor.clone(), rfactor, Some(contiguity))
    }
}
